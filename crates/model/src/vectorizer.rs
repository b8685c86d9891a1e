//! Feature vector construction for priority inference.
//!
//! The layout is a strict contract with the frozen classifier: the tf-idf
//! text block first, then exactly four numeric columns in training order
//! (category code, image severity, hour of day, night flag). Column count
//! and order must never vary with the input.

use civiq_core::features::{hour_of_day, is_night};
use civiq_core::types::Timestamp;

use crate::encoder::CategoryEncoder;
use crate::tfidf::TfidfTransform;

/// Numeric columns appended after the text block.
pub const NUMERIC_FEATURES: usize = 4;

/// Combines the frozen text transform and category encoder into the fixed
/// feature layout the classifier was trained on.
#[derive(Debug, Clone)]
pub struct FeatureVectorizer {
    tfidf: TfidfTransform,
    encoder: CategoryEncoder,
}

impl FeatureVectorizer {
    pub fn new(tfidf: TfidfTransform, encoder: CategoryEncoder) -> Self {
        Self { tfidf, encoder }
    }

    /// Total column count: text block + numeric tail.
    pub fn dim(&self) -> usize {
        self.tfidf.dim() + NUMERIC_FEATURES
    }

    /// Build the feature row for one complaint.
    ///
    /// Infallible: an unrecognized category degrades to the -1 sentinel
    /// and out-of-vocabulary text contributes zeros.
    pub fn vectorize(
        &self,
        category: &str,
        description: &str,
        image_severity: f64,
        submitted_at: Timestamp,
    ) -> Vec<f64> {
        let mut row = self.tfidf.transform(description);
        row.reserve_exact(NUMERIC_FEATURES);

        let hour = hour_of_day(submitted_at);
        row.push(self.encoder.encode(category));
        row.push(image_severity);
        row.push(f64::from(hour));
        row.push(if is_night(hour) { 1.0 } else { 0.0 });
        row
    }
}

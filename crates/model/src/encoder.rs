//! Frozen category label encoder.
//!
//! Mirrors the training-time ordinal encoder: a category maps to its index
//! in the fitted class list. Categories the encoder has never seen encode
//! to the -1 sentinel so inference degrades instead of failing.

use serde::Deserialize;

use civiq_core::features::CATEGORY_UNKNOWN;

/// On-disk shape of `category_encoder.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEncoder {
    /// Fitted class labels, in training order.
    pub classes: Vec<String>,
}

impl CategoryEncoder {
    /// Encode a category label to its ordinal, or the -1 sentinel.
    pub fn encode(&self, category: &str) -> f64 {
        self.classes
            .iter()
            .position(|c| c == category)
            .map_or(CATEGORY_UNKNOWN, |i| i as f64)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("encoder has no classes".to_string());
        }
        Ok(())
    }
}

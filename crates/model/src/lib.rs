//! Frozen priority-classification model for complaint triage.
//!
//! Training happens offline; this crate only loads the exported artifacts
//! and replays inference. Three JSON files make up a model directory:
//!
//! - `tfidf_vectorizer.json`: vocabulary and idf weights for the text block
//! - `category_encoder.json`: fitted category class list
//! - `priority_model.json`: logistic-regression coefficients and labels
//!
//! [`PriorityClassifier::load`] reads and cross-validates all three and
//! fails fast on any missing, corrupt, or shape-mismatched artifact.

pub mod classifier;
pub mod encoder;
pub mod error;
pub mod tfidf;
pub mod vectorizer;

pub use error::ModelError;

use std::fs;
use std::path::Path;

use civiq_core::complaint::Priority;
use civiq_core::types::Timestamp;
use serde::de::DeserializeOwned;

use crate::classifier::LinearClassifier;
use crate::encoder::CategoryEncoder;
use crate::tfidf::TfidfTransform;
use crate::vectorizer::FeatureVectorizer;

pub const TFIDF_ARTIFACT: &str = "tfidf_vectorizer.json";
pub const ENCODER_ARTIFACT: &str = "category_encoder.json";
pub const CLASSIFIER_ARTIFACT: &str = "priority_model.json";

// ---------------------------------------------------------------------------
// Inference interface
// ---------------------------------------------------------------------------

/// Raw complaint fields the model consumes.
#[derive(Debug, Clone, Copy)]
pub struct ComplaintFeatures<'a> {
    pub category: &'a str,
    pub description: &'a str,
    pub image_severity: f64,
    pub submitted_at: Timestamp,
}

/// One classification outcome.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inference {
    pub priority: Priority,
    pub confidence: f64,
}

/// Anything that can turn complaint fields into a priority.
///
/// The service layer depends on this trait so tests can substitute a
/// deterministic stub for the frozen artifacts.
pub trait PriorityModel: Send + Sync {
    fn infer(&self, input: ComplaintFeatures<'_>) -> Result<Inference, ModelError>;
}

// ---------------------------------------------------------------------------
// Frozen artifact bundle
// ---------------------------------------------------------------------------

/// The production [`PriorityModel`]: frozen vectorizer plus linear classifier.
#[derive(Debug)]
pub struct PriorityClassifier {
    vectorizer: FeatureVectorizer,
    classifier: LinearClassifier,
}

impl PriorityClassifier {
    /// Load and cross-validate the artifact bundle from a model directory.
    ///
    /// Any missing file, parse failure, or shape mismatch is a startup
    /// error; callers are expected to abort rather than serve without a
    /// working model.
    pub fn load(artifact_dir: &Path) -> Result<Self, ModelError> {
        let tfidf: TfidfTransform = load_artifact(&artifact_dir.join(TFIDF_ARTIFACT))?;
        let encoder: CategoryEncoder = load_artifact(&artifact_dir.join(ENCODER_ARTIFACT))?;
        let classifier: LinearClassifier = load_artifact(&artifact_dir.join(CLASSIFIER_ARTIFACT))?;

        tfidf
            .validate()
            .map_err(|reason| ModelError::startup(TFIDF_ARTIFACT, reason))?;
        encoder
            .validate()
            .map_err(|reason| ModelError::startup(ENCODER_ARTIFACT, reason))?;
        classifier
            .validate()
            .map_err(|reason| ModelError::startup(CLASSIFIER_ARTIFACT, reason))?;

        let vectorizer = FeatureVectorizer::new(tfidf, encoder);
        if classifier.n_features() != vectorizer.dim() {
            return Err(ModelError::startup(
                CLASSIFIER_ARTIFACT,
                format!(
                    "classifier expects {} features but vectorizer produces {}",
                    classifier.n_features(),
                    vectorizer.dim()
                ),
            ));
        }
        for label in &classifier.classes {
            if Priority::from_model_label(label).is_none() {
                return Err(ModelError::startup(
                    CLASSIFIER_ARTIFACT,
                    format!("unknown priority label {label:?}"),
                ));
            }
        }

        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    /// Total feature-vector width the bundle operates on.
    pub fn dim(&self) -> usize {
        self.vectorizer.dim()
    }
}

impl PriorityModel for PriorityClassifier {
    fn infer(&self, input: ComplaintFeatures<'_>) -> Result<Inference, ModelError> {
        let row = self.vectorizer.vectorize(
            input.category,
            input.description,
            input.image_severity,
            input.submitted_at,
        );
        let (index, confidence) = self.classifier.predict(&row)?;
        let label = &self.classifier.classes[index];
        let priority = Priority::from_model_label(label)
            .ok_or_else(|| ModelError::Inference(format!("unknown priority label {label:?}")))?;
        Ok(Inference {
            priority,
            confidence,
        })
    }
}

fn load_artifact<T: DeserializeOwned>(path: &Path) -> Result<T, ModelError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| ModelError::startup(path.display().to_string(), e))?;
    serde_json::from_str(&raw).map_err(|e| ModelError::startup(path.display().to_string(), e))
}

//! Frozen multinomial logistic-regression classifier.
//!
//! Prediction is `argmax softmax(Wx + b)` over the exported coefficient
//! matrix; the max class probability doubles as the confidence score.

use serde::Deserialize;

use crate::error::ModelError;

/// On-disk shape of `priority_model.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct LinearClassifier {
    /// Output class labels, aligned with coefficient rows ("P1".."P4").
    pub classes: Vec<String>,
    /// One coefficient row per class, one column per feature.
    pub coefficients: Vec<Vec<f64>>,
    /// One intercept per class.
    pub intercepts: Vec<f64>,
}

impl LinearClassifier {
    /// Number of input features each coefficient row expects.
    pub fn n_features(&self) -> usize {
        self.coefficients.first().map_or(0, Vec::len)
    }

    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if self.classes.is_empty() {
            return Err("classifier has no classes".to_string());
        }
        if self.coefficients.len() != self.classes.len() {
            return Err(format!(
                "{} classes but {} coefficient rows",
                self.classes.len(),
                self.coefficients.len()
            ));
        }
        if self.intercepts.len() != self.classes.len() {
            return Err(format!(
                "{} classes but {} intercepts",
                self.classes.len(),
                self.intercepts.len()
            ));
        }
        let width = self.n_features();
        if width == 0 {
            return Err("coefficient rows are empty".to_string());
        }
        if self.coefficients.iter().any(|row| row.len() != width) {
            return Err("coefficient rows have inconsistent widths".to_string());
        }
        Ok(())
    }

    /// Class probability distribution for one feature vector.
    pub fn predict_proba(&self, features: &[f64]) -> Result<Vec<f64>, ModelError> {
        if features.len() != self.n_features() {
            return Err(ModelError::Inference(format!(
                "Expected {} features, got {}",
                self.n_features(),
                features.len()
            )));
        }

        let logits: Vec<f64> = self
            .coefficients
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect();

        Ok(softmax(&logits))
    }

    /// Predicted class index and its probability.
    pub fn predict(&self, features: &[f64]) -> Result<(usize, f64), ModelError> {
        let proba = self.predict_proba(features)?;
        let (index, &confidence) = proba
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .ok_or_else(|| ModelError::Inference("Empty probability vector".to_string()))?;
        Ok((index, confidence))
    }
}

/// Numerically stable softmax.
fn softmax(logits: &[f64]) -> Vec<f64> {
    let max = logits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = logits.iter().map(|z| (z - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

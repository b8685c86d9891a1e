//! Frozen term-frequency/inverse-document-frequency transform.
//!
//! The vocabulary and idf weights were fitted offline by the training
//! pipeline and exported to JSON; this module only replays the transform.
//! Tokenization matches the training tokenizer: lowercase, alphanumeric
//! runs of two or more characters.

use std::collections::HashMap;

use serde::Deserialize;

/// On-disk shape of `tfidf_vectorizer.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct TfidfTransform {
    /// token → column index into the text block of the feature vector.
    pub vocabulary: HashMap<String, usize>,
    /// idf weight per column, same length as the vocabulary.
    pub idf: Vec<f64>,
    /// Whether input text is lowercased before tokenization.
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
}

fn default_lowercase() -> bool {
    true
}

impl TfidfTransform {
    /// Number of text columns this transform produces.
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    /// Check internal consistency after deserialization.
    pub fn validate(&self) -> Result<(), String> {
        if self.vocabulary.len() != self.idf.len() {
            return Err(format!(
                "vocabulary has {} tokens but idf has {} weights",
                self.vocabulary.len(),
                self.idf.len()
            ));
        }
        for (token, &index) in &self.vocabulary {
            if index >= self.idf.len() {
                return Err(format!("token {token:?} maps to out-of-range column {index}"));
            }
        }
        Ok(())
    }

    /// Transform free text into its dense tf-idf row (l2-normalized).
    ///
    /// Out-of-vocabulary tokens are simply dropped; an all-zero row stays
    /// all-zero rather than dividing by a zero norm.
    pub fn transform(&self, text: &str) -> Vec<f64> {
        let mut row = vec![0.0; self.dim()];

        let lowered;
        let text = if self.lowercase {
            lowered = text.to_lowercase();
            &lowered
        } else {
            text
        };

        for token in tokenize(text) {
            if let Some(&index) = self.vocabulary.get(token) {
                row[index] += 1.0;
            }
        }

        for (value, idf) in row.iter_mut().zip(&self.idf) {
            *value *= idf;
        }

        l2_normalize(&mut row);
        row
    }
}

/// Alphanumeric runs of length >= 2, matching the training tokenizer.
fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| token.chars().count() >= 2)
}

fn l2_normalize(row: &mut [f64]) {
    let norm: f64 = row.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}

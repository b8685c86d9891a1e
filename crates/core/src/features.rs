//! Time features and input validation for priority inference.
//!
//! The frozen classifier was trained on a fixed feature layout; the numeric
//! tail of that layout (category code, image severity, hour, is_night) is
//! computed from helpers here so the vectorizer and its tests agree on the
//! exact semantics.

use chrono::Timelike;

use crate::error::CoreError;
use crate::types::Timestamp;

/// Sentinel written in place of the category code when the frozen encoder
/// does not recognize the submitted category. Inference must still proceed.
pub const CATEGORY_UNKNOWN: f64 = -1.0;

/// Hour of day (0-23) of the submission timestamp.
pub fn hour_of_day(ts: Timestamp) -> u32 {
    ts.hour()
}

/// Night flag: 1 iff hour >= 21 or hour <= 6.
pub fn is_night(hour: u32) -> bool {
    hour >= 21 || hour <= 6
}

/// Image-severity scores come from the upstream image-understanding
/// collaborator and must lie in 0.0-1.0 (0 when no image was supplied).
pub fn validate_severity(severity: f64) -> Result<(), CoreError> {
    if (0.0..=1.0).contains(&severity) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Image severity must be within 0.0-1.0, got {severity}"
        )))
    }
}

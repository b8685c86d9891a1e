//! Great-circle distance and location-string parsing.
//!
//! Complaint locations are stored as `"lat, lon"` strings (decimal degrees);
//! worker coordinates are stored as separate decimal-string columns. Both
//! funnel through the parsers here before any distance math.

use crate::error::CoreError;

/// Mean Earth radius in kilometers, used by the haversine formula.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometers between two points in decimal degrees.
pub fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Parse a complaint location string of the form `"lat, lon"`.
///
/// Whitespace around the comma is tolerated. Anything else (missing comma,
/// non-numeric parts, empty string) is a validation error; callers listing
/// many complaints should exclude the offending row rather than fail the page.
pub fn parse_location(location: &str) -> Result<(f64, f64), CoreError> {
    let mut parts = location.splitn(2, ',');
    match (parts.next(), parts.next()) {
        (Some(lat), Some(lon)) => {
            let lat = parse_coordinate(lat, "latitude")?;
            let lon = parse_coordinate(lon, "longitude")?;
            Ok((lat, lon))
        }
        _ => Err(CoreError::Validation(format!(
            "Location must be \"lat, lon\", got {location:?}"
        ))),
    }
}

/// Parse a single decimal-degree coordinate stored as a string column.
pub fn parse_coordinate(value: &str, which: &str) -> Result<f64, CoreError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| CoreError::Validation(format!("Invalid {which}: {value:?}")))
}

//! Geographic points and great-circle distance.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_METRES: f64 = 6_371_008.8;

/// Validation failures for geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeoValidationError {
    InvalidCoordinate { field: &'static str, value: f64 },
}

impl std::fmt::Display for GeoValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCoordinate { field, value } => {
                write!(f, "{field} is out of range: {value}")
            }
        }
    }
}

impl std::error::Error for GeoValidationError {}

impl GeoValidationError {
    /// Name of the offending coordinate (`lng` or `lat`).
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidCoordinate { field, .. } => field,
        }
    }
}

/// A WGS84 point with longitude first, matching GeoJSON ordering.
///
/// ## Invariants
/// - Both coordinates are finite.
/// - `longitude` lies in `[-180, 180]` and `latitude` in `[-90, 90]`.
///
/// # Examples
/// ```
/// use catalogue::domain::GeoPoint;
///
/// let point = GeoPoint::new(-0.1276, 51.5072).expect("valid point");
/// assert_eq!(point.as_coordinates(), [-0.1276, 51.5072]);
/// assert!(GeoPoint::new(181.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Validate and build a point.
    pub fn new(longitude: f64, latitude: f64) -> Result<Self, GeoValidationError> {
        validate_longitude(longitude)?;
        validate_latitude(latitude)?;
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// `[longitude, latitude]`.
    pub fn as_coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Haversine distance to `other` in metres.
    #[must_use]
    pub fn distance_metres(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let d_lat = (other.latitude - self.latitude).to_radians();
        let d_lng = (other.longitude - self.longitude).to_radians();
        let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_METRES * h.sqrt().min(1.0).asin()
    }
}

impl TryFrom<[f64; 2]> for GeoPoint {
    type Error = GeoValidationError;

    fn try_from(value: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(value[0], value[1])
    }
}

impl From<GeoPoint> for [f64; 2] {
    fn from(value: GeoPoint) -> Self {
        value.as_coordinates()
    }
}

fn validate_longitude(value: f64) -> Result<(), GeoValidationError> {
    if !value.is_finite() || !(-180.0..=180.0).contains(&value) {
        return Err(GeoValidationError::InvalidCoordinate {
            field: "lng",
            value,
        });
    }
    Ok(())
}

fn validate_latitude(value: f64) -> Result<(), GeoValidationError> {
    if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
        return Err(GeoValidationError::InvalidCoordinate {
            field: "lat",
            value,
        });
    }
    Ok(())
}

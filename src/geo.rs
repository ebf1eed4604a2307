//! Geo helpers
//!
//! - [`Coordinates`]: validated latitude/longitude pair
//! - [`distance_km`]: haversine great-circle distance, rounded to 2 decimals
//! - [`resolve_geo_context`]: request > profile > none precedence

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean earth radius used by the haversine formula
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeoError {
    #[error("invalid latitude {0} (must be between -90 and 90)")]
    InvalidLatitude(f64),
    #[error("invalid longitude {0} (must be between -180 and 180)")]
    InvalidLongitude(f64),
}

/// A validated (latitude, longitude) pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    #[schema(example = -6.2088)]
    pub latitude: f64,
    #[schema(example = 106.8456)]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Build from two nullable columns; both must be present
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Distance to another point in kilometers
    #[inline]
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        distance_km(self, other)
    }
}

/// Haversine distance in kilometers, rounded to two decimal places.
pub fn distance_km(a: &Coordinates, b: &Coordinates) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    (EARTH_RADIUS_KM * c * 100.0).round() / 100.0
}

/// Pick the coordinates a request is ranked against.
///
/// Explicit request coordinates win; otherwise the caller's stored profile
/// location; otherwise there is no geo-context.
pub fn resolve_geo_context(
    request: Option<Coordinates>,
    profile: Option<Coordinates>,
) -> Option<Coordinates> {
    request.or(profile)
}

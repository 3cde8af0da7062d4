//! Geographic position with validated coordinate ranges.

use crate::error::KerbError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in meters, used for haversine distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated WGS84 position: latitude in [-90, 90], longitude in [-180, 180].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Construct a position, validating coordinate ranges.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, KerbError> {
        if !(-90.0..=90.0).contains(&latitude) || latitude.is_nan() {
            return Err(KerbError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        if !(-180.0..=180.0).contains(&longitude) || longitude.is_nan() {
            return Err(KerbError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Whether this is the (0, 0) null-island position — a near-certain GPS
    /// failure, rejected at the ingress boundary.
    pub fn is_null_island(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Great-circle distance to `other` in meters (haversine).
    pub fn distance_m(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let dlat = (other.latitude - self.latitude).to_radians();
        let dlng = (other.longitude - self.longitude).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().asin();
        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rejects_out_of_range_latitude() {
        assert!(GeoPoint::new(90.1, 0.0).is_err());
        assert!(GeoPoint::new(-90.1, 0.0).is_err());
    }

    #[test]
    fn rejects_out_of_range_longitude() {
        assert!(GeoPoint::new(0.0, 180.1).is_err());
        assert!(GeoPoint::new(0.0, -180.1).is_err());
    }

    #[test]
    fn accepts_boundary_coordinates() {
        assert!(GeoPoint::new(90.0, 180.0).is_ok());
        assert!(GeoPoint::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn null_island_is_flagged() {
        assert!(GeoPoint::new(0.0, 0.0).unwrap().is_null_island());
        assert!(!GeoPoint::new(0.0001, 0.0).unwrap().is_null_island());
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = GeoPoint::new(31.2304, 121.4737).unwrap();
        assert!(p.distance_m(&p) < 1e-9);
    }

    #[test]
    fn known_distance_is_close() {
        // ~0.001 degrees of latitude is ~111 meters.
        let a = GeoPoint::new(31.2304, 121.4737).unwrap();
        let b = GeoPoint::new(31.2314, 121.4737).unwrap();
        let d = a.distance_m(&b);
        assert!((d - 111.2).abs() < 1.0, "got {d}");
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(
            lat1 in -89.0f64..89.0, lng1 in -179.0f64..179.0,
            lat2 in -89.0f64..89.0, lng2 in -179.0f64..179.0,
        ) {
            let a = GeoPoint::new(lat1, lng1).unwrap();
            let b = GeoPoint::new(lat2, lng2).unwrap();
            let ab = a.distance_m(&b);
            let ba = b.distance_m(&a);
            prop_assert!((ab - ba).abs() < 1e-6);
        }

        #[test]
        fn distance_is_non_negative_and_bounded(
            lat1 in -90.0f64..=90.0, lng1 in -180.0f64..=180.0,
            lat2 in -90.0f64..=90.0, lng2 in -180.0f64..=180.0,
        ) {
            let a = GeoPoint::new(lat1, lng1).unwrap();
            let b = GeoPoint::new(lat2, lng2).unwrap();
            let d = a.distance_m(&b);
            // Half the Earth's circumference is the farthest two points can be.
            prop_assert!(d >= 0.0 && d <= EARTH_RADIUS_M * std::f64::consts::PI + 1.0);
        }
    }
}

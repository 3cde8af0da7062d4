//! Deterministic location hash for on-chain duplicate-claim prevention.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use kerb_types::{FacilityType, GeoPoint};
use std::fmt;

type Blake2b256 = Blake2b<U32>;

/// A 256-bit digest of a facility's rounded position and type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocationHash([u8; 32]);

impl LocationHash {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Debug for LocationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocationHash({})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for LocationHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// Compute the location hash of a submission.
///
/// Coordinates are rounded to 5 decimal places (~1 m precision) so that two
/// photographs of the same physical facility hash identically regardless of
/// GPS jitter below that scale. The preimage format `lat:lng:type` is
/// stable — the distributor contract keys its claim records on it.
pub fn location_hash(position: GeoPoint, facility_type: FacilityType) -> LocationHash {
    let preimage = format!(
        "{:.5}:{:.5}:{}",
        position.latitude(),
        position.longitude(),
        facility_type.as_str()
    );
    let mut hasher = Blake2b256::new();
    hasher.update(preimage.as_bytes());
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    LocationHash(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::new(lat, lng).unwrap()
    }

    #[test]
    fn sub_meter_jitter_hashes_identically() {
        let a = location_hash(point(31.230001, 121.470002), FacilityType::Ramp);
        let b = location_hash(point(31.230002, 121.470001), FacilityType::Ramp);
        assert_eq!(a, b);
    }

    #[test]
    fn different_type_same_position_differs() {
        let a = location_hash(point(31.23, 121.47), FacilityType::Ramp);
        let b = location_hash(point(31.23, 121.47), FacilityType::Toilet);
        assert_ne!(a, b);
    }

    #[test]
    fn distinct_positions_differ() {
        let a = location_hash(point(31.23, 121.47), FacilityType::Ramp);
        let b = location_hash(point(31.24, 121.47), FacilityType::Ramp);
        assert_ne!(a, b);
    }

    #[test]
    fn hex_form_is_64_chars() {
        let h = location_hash(point(0.0, 1.0), FacilityType::Elevator);
        assert_eq!(h.to_hex().len(), 64);
    }

    proptest! {
        #[test]
        fn hash_is_deterministic(
            lat in -90.0f64..=90.0,
            lng in -180.0f64..=180.0,
        ) {
            let p = point(lat, lng);
            for ty in FacilityType::ALL {
                prop_assert_eq!(location_hash(p, ty), location_hash(p, ty));
            }
        }
    }
}

//! Geospatial duplicate index trait.

use crate::StoreError;
use async_trait::async_trait;
use kerb_types::{FacilityId, FacilityType, GeoPoint};

/// The nearest existing same-type facility to a candidate submission.
#[derive(Clone, Debug, PartialEq)]
pub struct NearbyFacility {
    pub facility_id: FacilityId,
    /// Distance from the query origin in meters.
    pub distance_m: f64,
    /// Whole days since the facility's last confirmed update.
    pub days_since_update: u32,
}

/// Answers "does a facility of this type already exist near this position,
/// and when was it last confirmed?".
///
/// The radius is inclusive: a facility at exactly `radius_m` counts as
/// within range. When several candidates fall inside the radius the nearest
/// by distance wins, regardless of recency.
#[async_trait]
pub trait DuplicateIndex: Send + Sync {
    async fn find_nearest(
        &self,
        facility_type: FacilityType,
        origin: GeoPoint,
        radius_m: f64,
    ) -> Result<Option<NearbyFacility>, StoreError>;
}

//! Facility repository trait and record types.

use crate::StoreError;
use async_trait::async_trait;
use kerb_types::{FacilityId, FacilityType, GeoPoint, Timestamp, WalletAddress};
use serde::{Deserialize, Serialize};

/// A persisted facility record — the single source of truth for facility state.
///
/// Type, position, contributor, and creation time are immutable once set;
/// only the image reference and classification payload change on updates.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: FacilityId,
    pub facility_type: FacilityType,
    pub position: GeoPoint,
    /// Image URI; `"pending"` until the async upload completes.
    pub image_ref: String,
    /// Raw vision-model output, stored verbatim.
    pub classification: serde_json::Value,
    pub contributor: WalletAddress,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The fields needed to create a facility; id and timestamps are assigned
/// by the repository.
#[derive(Clone, Debug)]
pub struct NewFacility {
    pub facility_type: FacilityType,
    pub position: GeoPoint,
    pub image_ref: String,
    pub classification: serde_json::Value,
    pub contributor: WalletAddress,
}

/// Trait for facility storage operations.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// Create a new facility and return its assigned id.
    async fn create(&self, facility: NewFacility) -> Result<FacilityId, StoreError>;

    /// Replace the image reference and classification payload of an existing
    /// facility, bumping its updated-at timestamp. All other fields are
    /// immutable.
    async fn update_observation(
        &self,
        id: &FacilityId,
        image_ref: String,
        classification: serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Fetch a facility by id.
    async fn get(&self, id: &FacilityId) -> Result<FacilityRecord, StoreError>;

    /// All facilities within `radius_m` of `origin`, nearest first,
    /// optionally filtered by type.
    async fn find_within(
        &self,
        origin: GeoPoint,
        radius_m: f64,
        facility_type: Option<FacilityType>,
    ) -> Result<Vec<FacilityRecord>, StoreError>;

    /// Facility counts per type, for platform statistics.
    async fn count_by_type(&self) -> Result<Vec<(FacilityType, u64)>, StoreError>;

    /// Number of distinct contributors across all facilities.
    async fn contributor_count(&self) -> Result<u64, StoreError>;
}

//! Always-failing storage doubles for abort-path testing.

use async_trait::async_trait;
use kerb_store::{FacilityRecord, FacilityStore, NewFacility, RewardLedger, RewardRecord, StoreError};
use kerb_types::{FacilityId, FacilityType, GeoPoint, TxHash, WalletAddress};

fn backend_error() -> StoreError {
    StoreError::Backend("injected failure".into())
}

/// A facility repository whose every operation fails.
pub struct FailingFacilityStore;

#[async_trait]
impl FacilityStore for FailingFacilityStore {
    async fn create(&self, _facility: NewFacility) -> Result<FacilityId, StoreError> {
        Err(backend_error())
    }

    async fn update_observation(
        &self,
        _id: &FacilityId,
        _image_ref: String,
        _classification: serde_json::Value,
    ) -> Result<(), StoreError> {
        Err(backend_error())
    }

    async fn get(&self, _id: &FacilityId) -> Result<FacilityRecord, StoreError> {
        Err(backend_error())
    }

    async fn find_within(
        &self,
        _origin: GeoPoint,
        _radius_m: f64,
        _facility_type: Option<FacilityType>,
    ) -> Result<Vec<FacilityRecord>, StoreError> {
        Err(backend_error())
    }

    async fn count_by_type(&self) -> Result<Vec<(FacilityType, u64)>, StoreError> {
        Err(backend_error())
    }

    async fn contributor_count(&self) -> Result<u64, StoreError> {
        Err(backend_error())
    }
}

/// A reward ledger whose every operation fails.
pub struct FailingLedger;

#[async_trait]
impl RewardLedger for FailingLedger {
    async fn append(
        &self,
        _contributor: &WalletAddress,
        _facility_id: &FacilityId,
        _amount: u64,
        _tx_hash: Option<TxHash>,
    ) -> Result<String, StoreError> {
        Err(backend_error())
    }

    async fn rewards_for(
        &self,
        _contributor: &WalletAddress,
    ) -> Result<Vec<RewardRecord>, StoreError> {
        Err(backend_error())
    }

    async fn unpaid(&self) -> Result<Vec<RewardRecord>, StoreError> {
        Err(backend_error())
    }

    async fn total_amount(&self) -> Result<u64, StoreError> {
        Err(backend_error())
    }
}

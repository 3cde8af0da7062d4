//! In-memory store — thread-safe implementation of every storage contract.
//!
//! Backs the daemon's standalone mode and deterministic tests. Real
//! deployments replace this with an external spatial store behind the same
//! traits.

use crate::clock::{Clock, SystemClock};
use crate::facility::{FacilityRecord, FacilityStore, NewFacility};
use crate::rate::RateCounter;
use crate::rewards::{RewardLedger, RewardRecord};
use crate::spatial::{DuplicateIndex, NearbyFacility};
use crate::StoreError;
use async_trait::async_trait;
use kerb_types::params::SECS_PER_DAY;
use kerb_types::{FacilityId, FacilityType, GeoPoint, Timestamp, TxHash, WalletAddress};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// An in-memory facility repository, duplicate index, rate counter, and
/// reward ledger in one. Thread-safe for use with tokio's multi-threaded
/// runtime.
pub struct MemoryStore {
    facilities: Mutex<HashMap<String, FacilityRecord>>,
    rewards: Mutex<Vec<RewardRecord>>,
    clock: Arc<dyn Clock>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Build a store that reads time from the given clock (frozen clocks in
    /// tests, the system clock everywhere else).
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            facilities: Mutex::new(HashMap::new()),
            rewards: Mutex::new(Vec::new()),
            clock,
        }
    }

    pub fn facility_count(&self) -> usize {
        self.facilities.lock().unwrap().len()
    }

    pub fn reward_count(&self) -> usize {
        self.rewards.lock().unwrap().len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FacilityStore for MemoryStore {
    async fn create(&self, facility: NewFacility) -> Result<FacilityId, StoreError> {
        let id = FacilityId::new(uuid::Uuid::new_v4().to_string());
        let now = self.clock.now();
        let record = FacilityRecord {
            id: id.clone(),
            facility_type: facility.facility_type,
            position: facility.position,
            image_ref: facility.image_ref,
            classification: facility.classification,
            contributor: facility.contributor,
            created_at: now,
            updated_at: now,
        };
        self.facilities
            .lock()
            .unwrap()
            .insert(id.as_str().to_string(), record);
        Ok(id)
    }

    async fn update_observation(
        &self,
        id: &FacilityId,
        image_ref: String,
        classification: serde_json::Value,
    ) -> Result<(), StoreError> {
        let mut facilities = self.facilities.lock().unwrap();
        let record = facilities
            .get_mut(id.as_str())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        record.image_ref = image_ref;
        record.classification = classification;
        record.updated_at = self.clock.now();
        Ok(())
    }

    async fn get(&self, id: &FacilityId) -> Result<FacilityRecord, StoreError> {
        self.facilities
            .lock()
            .unwrap()
            .get(id.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn find_within(
        &self,
        origin: GeoPoint,
        radius_m: f64,
        facility_type: Option<FacilityType>,
    ) -> Result<Vec<FacilityRecord>, StoreError> {
        let facilities = self.facilities.lock().unwrap();
        let mut hits: Vec<(f64, FacilityRecord)> = facilities
            .values()
            .filter(|f| facility_type.map_or(true, |t| f.facility_type == t))
            .map(|f| (origin.distance_m(&f.position), f.clone()))
            .filter(|(d, _)| *d <= radius_m)
            .collect();
        hits.sort_by(|a, b| a.0.total_cmp(&b.0));
        Ok(hits.into_iter().map(|(_, f)| f).collect())
    }

    async fn count_by_type(&self) -> Result<Vec<(FacilityType, u64)>, StoreError> {
        let facilities = self.facilities.lock().unwrap();
        Ok(FacilityType::ALL
            .iter()
            .map(|&t| {
                let n = facilities.values().filter(|f| f.facility_type == t).count();
                (t, n as u64)
            })
            .collect())
    }

    async fn contributor_count(&self) -> Result<u64, StoreError> {
        let facilities = self.facilities.lock().unwrap();
        let unique: HashSet<&str> = facilities
            .values()
            .map(|f| f.contributor.as_str())
            .collect();
        Ok(unique.len() as u64)
    }
}

#[async_trait]
impl DuplicateIndex for MemoryStore {
    async fn find_nearest(
        &self,
        facility_type: FacilityType,
        origin: GeoPoint,
        radius_m: f64,
    ) -> Result<Option<NearbyFacility>, StoreError> {
        let now = self.clock.now();
        let facilities = self.facilities.lock().unwrap();
        let nearest = facilities
            .values()
            .filter(|f| f.facility_type == facility_type)
            .map(|f| (origin.distance_m(&f.position), f))
            .filter(|(d, _)| *d <= radius_m)
            .min_by(|a, b| a.0.total_cmp(&b.0));

        Ok(nearest.map(|(distance_m, f)| NearbyFacility {
            facility_id: f.id.clone(),
            distance_m,
            days_since_update: (f.updated_at.elapsed_since(now) / SECS_PER_DAY) as u32,
        }))
    }
}

#[async_trait]
impl RateCounter for MemoryStore {
    async fn count_created_since(
        &self,
        contributor: &WalletAddress,
        since: Timestamp,
    ) -> Result<u32, StoreError> {
        let facilities = self.facilities.lock().unwrap();
        let n = facilities
            .values()
            .filter(|f| f.contributor == *contributor && f.created_at > since)
            .count();
        Ok(n as u32)
    }
}

#[async_trait]
impl RewardLedger for MemoryStore {
    async fn append(
        &self,
        contributor: &WalletAddress,
        facility_id: &FacilityId,
        amount: u64,
        tx_hash: Option<TxHash>,
    ) -> Result<String, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let record = RewardRecord {
            id: id.clone(),
            contributor: contributor.clone(),
            facility_id: facility_id.clone(),
            amount,
            tx_hash,
            created_at: self.clock.now(),
        };
        self.rewards.lock().unwrap().push(record);
        Ok(id)
    }

    async fn rewards_for(
        &self,
        contributor: &WalletAddress,
    ) -> Result<Vec<RewardRecord>, StoreError> {
        let rewards = self.rewards.lock().unwrap();
        Ok(rewards
            .iter()
            .rev()
            .filter(|r| r.contributor == *contributor)
            .cloned()
            .collect())
    }

    async fn unpaid(&self) -> Result<Vec<RewardRecord>, StoreError> {
        let rewards = self.rewards.lock().unwrap();
        Ok(rewards.iter().filter(|r| r.tx_hash.is_none()).cloned().collect())
    }

    async fn total_amount(&self) -> Result<u64, StoreError> {
        let rewards = self.rewards.lock().unwrap();
        Ok(rewards.iter().map(|r| r.amount).sum())
    }
}

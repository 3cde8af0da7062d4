//! Duplicate detection and reward-tier assignment.

use kerb_store::{DuplicateIndex, StoreError};
use kerb_types::{FacilityId, FacilityType, GeoPoint, PolicyParams};
use std::sync::Arc;

/// How a submission relates to the existing map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disposition {
    /// No same-type facility nearby — create and pay the full tier.
    New,
    /// A stale same-type facility nearby — refresh it and pay the reduced tier.
    Update,
    /// A recently confirmed same-type facility nearby — reject, no reward.
    Duplicate,
}

/// The verdict on one submission. Computed fresh per submission, never stored.
#[derive(Clone, Debug)]
pub struct FraudVerdict {
    pub disposition: Disposition,
    pub reward: u64,
    /// The conflicting or to-be-updated facility, when one exists.
    pub existing: Option<FacilityId>,
    /// Machine-readable reason code, surfaced to the caller on rejection.
    pub reason: &'static str,
}

/// Classifies a candidate submission against the geospatial duplicate index.
pub struct FraudPolicy {
    index: Arc<dyn DuplicateIndex>,
    params: PolicyParams,
}

impl FraudPolicy {
    pub fn new(index: Arc<dyn DuplicateIndex>, params: PolicyParams) -> Self {
        Self { index, params }
    }

    pub fn params(&self) -> &PolicyParams {
        &self.params
    }

    /// Evaluate a submission's position and classified type.
    ///
    /// The nearest same-type facility within the proximity radius is
    /// authoritative (nearest by distance, not by recency). If the index is
    /// unreachable the policy fails open to a full-reward NEW verdict with a
    /// distinguishing reason code.
    pub async fn evaluate(&self, position: GeoPoint, facility_type: FacilityType) -> FraudVerdict {
        let nearest = self
            .index
            .find_nearest(facility_type, position, self.params.duplicate_radius_m)
            .await;

        let nearest = match nearest {
            Ok(n) => n,
            Err(e) => return self.fail_open(facility_type, position, e),
        };

        match nearest {
            None => FraudVerdict {
                disposition: Disposition::New,
                reward: self.params.new_facility_reward,
                existing: None,
                reason: "new_facility",
            },
            Some(hit) if hit.days_since_update < self.params.freshness_window_days => {
                tracing::warn!(
                    facility_type = %facility_type,
                    existing = %hit.facility_id,
                    days_since_update = hit.days_since_update,
                    "duplicate submission detected"
                );
                FraudVerdict {
                    disposition: Disposition::Duplicate,
                    reward: 0,
                    existing: Some(hit.facility_id),
                    reason: "recently_verified",
                }
            }
            Some(hit) => FraudVerdict {
                disposition: Disposition::Update,
                reward: self.params.update_facility_reward,
                existing: Some(hit.facility_id),
                reason: "facility_update",
            },
        }
    }

    fn fail_open(
        &self,
        facility_type: FacilityType,
        position: GeoPoint,
        error: StoreError,
    ) -> FraudVerdict {
        tracing::warn!(
            facility_type = %facility_type,
            position = %position,
            error = %error,
            "duplicate index unreachable, defaulting to NEW"
        );
        FraudVerdict {
            disposition: Disposition::New,
            reward: self.params.new_facility_reward,
            existing: None,
            reason: "check_failed_default_new",
        }
    }
}

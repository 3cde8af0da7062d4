//! Typed pipeline results.

use kerb_types::{FacilityId, FacilityType, TxHash};
use serde::Serialize;

/// Terminal category of a pipeline run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineOutcome {
    /// Facility persisted; payment attempted; ledger written.
    Done,
    /// Content or fraud rejection — terminal, user-facing, no retry.
    Rejected,
    /// A required external service failed — nothing user-visible persisted.
    Failed,
}

/// The full result of one pipeline run, surfaced to the caller.
///
/// Failure is never a raw internal error string: `reason` carries a
/// machine-readable code (or the classifier's stated content judgment), and
/// a fraud rejection names the conflicting facility in
/// `existing_facility`.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineResult {
    pub outcome: PipelineOutcome,
    pub facility_id: Option<FacilityId>,
    pub facility_type: Option<FacilityType>,
    pub reward_amount: Option<u64>,
    pub tx_hash: Option<TxHash>,
    /// True when both payment paths failed and the run degraded to a null
    /// transaction. Distinct from pipeline failure: the facility exists and
    /// the contribution stands.
    pub payment_failed: bool,
    /// True when the reward ledger entry was written. A missed entry after
    /// a successful persist is surfaced here and logged, not escalated.
    pub ledger_recorded: bool,
    pub reason: Option<String>,
    /// The conflicting facility on a duplicate rejection.
    pub existing_facility: Option<FacilityId>,
}

impl PipelineResult {
    pub fn rejected(reason: impl Into<String>, existing_facility: Option<FacilityId>) -> Self {
        Self {
            outcome: PipelineOutcome::Rejected,
            facility_id: None,
            facility_type: None,
            reward_amount: None,
            tx_hash: None,
            payment_failed: false,
            ledger_recorded: false,
            reason: Some(reason.into()),
            existing_facility,
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            outcome: PipelineOutcome::Failed,
            facility_id: None,
            facility_type: None,
            reward_amount: None,
            tx_hash: None,
            payment_failed: false,
            ledger_recorded: false,
            reason: Some(reason.into()),
            existing_facility: None,
        }
    }
}

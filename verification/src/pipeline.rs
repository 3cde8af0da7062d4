//! The pipeline orchestrator — fixed stage order, explicit failure policy.

use crate::outcome::{PipelineOutcome, PipelineResult};
use crate::stage::PipelineStage;
use crate::submission::Submission;
use kerb_chain::{location_hash, TokenPayer};
use kerb_policy::{Disposition, FraudPolicy, FraudVerdict};
use kerb_store::{FacilityStore, NewFacility, RewardLedger};
use kerb_types::{FacilityId, FacilityType, PolicyParams, TxHash};
use kerb_vision::{Classification, Classifier, ClassifierError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Placeholder image reference while the async upload is still in flight.
const PENDING_IMAGE_REF: &str = "pending";

/// Sequences classification, fraud check, persistence, payment, and ledger
/// write for one submission at a time.
///
/// The pipeline holds no mutable state of its own: concurrent runs interact
/// only through the external stores behind the injected traits. A single
/// run creates at most one facility and at most one ledger record; the
/// duplicate-window policy is the sole (best-effort) defense against two
/// concurrent first submissions of the same physical location both being
/// rewarded as new.
pub struct VerificationPipeline {
    classifier: Arc<dyn Classifier>,
    fraud: FraudPolicy,
    facilities: Arc<dyn FacilityStore>,
    payer: Arc<dyn TokenPayer>,
    ledger: Arc<dyn RewardLedger>,
    call_timeout: Duration,
}

impl VerificationPipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        fraud: FraudPolicy,
        facilities: Arc<dyn FacilityStore>,
        payer: Arc<dyn TokenPayer>,
        ledger: Arc<dyn RewardLedger>,
        params: &PolicyParams,
    ) -> Self {
        Self {
            classifier,
            fraud,
            facilities,
            payer,
            ledger,
            call_timeout: Duration::from_secs(params.external_call_timeout_secs),
        }
    }

    /// Bound an external call; a call that never returns is a local failure
    /// of its stage, not pipeline corruption.
    async fn bounded<T>(&self, call: impl Future<Output = T>) -> Option<T> {
        tokio::time::timeout(self.call_timeout, call).await.ok()
    }

    /// Run one submission to a terminal state.
    ///
    /// Once persistence has succeeded the run always proceeds through
    /// payment and recording, and always returns `Done` — payment and
    /// ledger degradation are reported on the result, not as failure.
    pub async fn run(&self, submission: Submission) -> PipelineResult {
        // ── CLASSIFYING ─────────────────────────────────────────────────
        let classification = match self.classify(&submission).await {
            Ok(c) => c,
            Err(result) => return *result,
        };

        let facility_type = match (classification.is_valid, classification.facility_type) {
            (false, _) => {
                let reason = classification
                    .condition_notes
                    .unwrap_or_else(|| "not_an_accessibility_facility".to_string());
                tracing::info!(stage = %PipelineStage::Classifying, %reason, "submission rejected");
                return PipelineResult::rejected(reason, None);
            }
            (true, None) => {
                // The classifier contract guarantees a type on a valid
                // verdict; a violation is a content rejection, not a crash.
                return PipelineResult::rejected("unrecognized_facility_type", None);
            }
            (true, Some(ty)) => ty,
        };

        // ── FRAUD_CHECK ─────────────────────────────────────────────────
        let verdict = self.fraud_check(&submission, facility_type).await;

        if verdict.disposition == Disposition::Duplicate {
            tracing::info!(
                stage = %PipelineStage::FraudCheck,
                reason = verdict.reason,
                existing = ?verdict.existing,
                "duplicate submission rejected"
            );
            return PipelineResult::rejected(verdict.reason, verdict.existing);
        }

        // ── PERSISTING ──────────────────────────────────────────────────
        // Must complete before any payment: a reward is never issued for
        // data that was not durably recorded.
        let facility_id = match self
            .persist(&submission, facility_type, &verdict, classification.raw_details)
            .await
        {
            Ok(id) => id,
            Err(result) => return *result,
        };

        // ── PAYING ──────────────────────────────────────────────────────
        // The facility now exists regardless of payment outcome; a failed
        // transfer degrades to a null transaction and the run continues.
        let tx_hash = self.pay(&submission, facility_type, verdict.reward).await;
        let payment_failed = tx_hash.is_none();

        // ── RECORDING ───────────────────────────────────────────────────
        // Always executed once persistence succeeded, so an audit record
        // exists even for failed payments — reconciliation re-pays by
        // scanning for null-transaction records.
        let ledger_recorded = self
            .record(&submission, &facility_id, verdict.reward, tx_hash.clone())
            .await;

        tracing::info!(
            stage = %PipelineStage::Done,
            facility = %facility_id,
            facility_type = %facility_type,
            reward = verdict.reward,
            payment_failed,
            "submission verified"
        );

        PipelineResult {
            outcome: PipelineOutcome::Done,
            facility_id: Some(facility_id),
            facility_type: Some(facility_type),
            reward_amount: Some(verdict.reward),
            tx_hash,
            payment_failed,
            ledger_recorded,
            reason: None,
            existing_facility: None,
        }
    }

    async fn classify(
        &self,
        submission: &Submission,
    ) -> Result<Classification, Box<PipelineResult>> {
        let outcome = self.bounded(self.classifier.classify(&submission.image)).await;
        match outcome {
            None => {
                tracing::error!(stage = %PipelineStage::Classifying, "classifier call timed out");
                Err(Box::new(PipelineResult::failed("classifier_timeout")))
            }
            Some(Err(e)) => {
                // A service error is not a content judgment; there is no
                // safe default for classification.
                tracing::error!(stage = %PipelineStage::Classifying, error = %e, "classifier failed");
                let reason = match e {
                    ClassifierError::Timeout => "classifier_timeout",
                    ClassifierError::Transport(_) => "classifier_unavailable",
                    ClassifierError::InvalidResponse(_) => "classifier_invalid_response",
                };
                Err(Box::new(PipelineResult::failed(reason)))
            }
            Some(Ok(c)) => Ok(c),
        }
    }

    async fn fraud_check(&self, submission: &Submission, facility_type: FacilityType) -> FraudVerdict {
        let evaluated = self
            .bounded(self.fraud.evaluate(submission.position, facility_type))
            .await;
        // The policy already fails open on an unreachable index; a hung
        // index is the same condition seen through a timeout.
        evaluated.unwrap_or_else(|| {
            tracing::warn!(
                stage = %PipelineStage::FraudCheck,
                "duplicate index timed out, defaulting to NEW"
            );
            FraudVerdict {
                disposition: Disposition::New,
                reward: self.fraud.params().new_facility_reward,
                existing: None,
                reason: "check_failed_default_new",
            }
        })
    }

    async fn persist(
        &self,
        submission: &Submission,
        facility_type: FacilityType,
        verdict: &FraudVerdict,
        raw_classification: serde_json::Value,
    ) -> Result<FacilityId, Box<PipelineResult>> {
        let image_ref = submission
            .image_ref
            .clone()
            .unwrap_or_else(|| PENDING_IMAGE_REF.to_string());

        let persisted = match (&verdict.disposition, &verdict.existing) {
            // An update verdict always carries the existing facility id.
            (Disposition::Update, Some(existing)) => self
                .bounded(self.facilities.update_observation(
                    existing,
                    image_ref,
                    raw_classification,
                ))
                .await
                .map(|r| r.map(|()| existing.clone())),
            _ => self
                .bounded(self.facilities.create(NewFacility {
                    facility_type,
                    position: submission.position,
                    image_ref,
                    classification: raw_classification,
                    contributor: submission.contributor.clone(),
                }))
                .await,
        };

        match persisted {
            Some(Ok(id)) => Ok(id),
            Some(Err(e)) => {
                // Clean abort: nothing downstream has happened yet.
                tracing::error!(stage = %PipelineStage::Persisting, error = %e, "repository write failed");
                Err(Box::new(PipelineResult::failed("repository_error")))
            }
            None => {
                tracing::error!(stage = %PipelineStage::Persisting, "repository call timed out");
                Err(Box::new(PipelineResult::failed("repository_error")))
            }
        }
    }

    /// Attempt the primary payment path, then one fallback, then give up
    /// and return `None`. This is the only retry/fallback logic in the core.
    async fn pay(
        &self,
        submission: &Submission,
        facility_type: FacilityType,
        amount: u64,
    ) -> Option<TxHash> {
        let location = location_hash(submission.position, facility_type);

        let primary = self
            .bounded(self.payer.pay_primary(&submission.contributor, amount, &location))
            .await;
        match primary {
            Some(Ok(tx)) => return Some(tx),
            Some(Err(e)) => {
                tracing::warn!(stage = %PipelineStage::Paying, error = %e, "primary payment failed, trying fallback");
            }
            None => {
                tracing::warn!(stage = %PipelineStage::Paying, "primary payment timed out, trying fallback");
            }
        }

        let fallback = self
            .bounded(self.payer.pay_fallback(&submission.contributor, amount))
            .await;
        match fallback {
            Some(Ok(tx)) => Some(tx),
            Some(Err(e)) => {
                tracing::error!(
                    stage = %PipelineStage::Paying,
                    contributor = %submission.contributor,
                    amount,
                    error = %e,
                    "both payment paths failed, degrading to null transaction"
                );
                None
            }
            None => {
                tracing::error!(
                    stage = %PipelineStage::Paying,
                    contributor = %submission.contributor,
                    amount,
                    "both payment paths failed, degrading to null transaction"
                );
                None
            }
        }
    }

    async fn record(
        &self,
        submission: &Submission,
        facility_id: &FacilityId,
        amount: u64,
        tx_hash: Option<TxHash>,
    ) -> bool {
        let appended = self
            .bounded(
                self.ledger
                    .append(&submission.contributor, facility_id, amount, tx_hash),
            )
            .await;
        match appended {
            Some(Ok(_)) => true,
            Some(Err(e)) => {
                tracing::error!(
                    stage = %PipelineStage::Recording,
                    facility = %facility_id,
                    error = %e,
                    "ledger write failed after successful persist"
                );
                false
            }
            None => {
                tracing::error!(
                    stage = %PipelineStage::Recording,
                    facility = %facility_id,
                    "ledger write timed out after successful persist"
                );
                false
            }
        }
    }
}

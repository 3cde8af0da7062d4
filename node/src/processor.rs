//! The submission processor — rate limiting, detached pipeline execution,
//! and outcome accounting.

use crate::metrics::PipelineMetrics;
use kerb_policy::{RateDecision, RateLimiter};
use kerb_verification::{PipelineOutcome, PipelineResult, Submission, VerificationPipeline};
use std::sync::Arc;

/// What happened to a submitted claim.
#[derive(Clone, Debug)]
pub enum SubmissionOutcome {
    /// Denied by the rate limiter before any classification cost was spent.
    Denied(RateDecision),
    /// The pipeline ran to a terminal state.
    Completed(PipelineResult),
}

/// Owns the wired pipeline and fronts it with the rate limiter.
pub struct SubmissionProcessor {
    pipeline: Arc<VerificationPipeline>,
    limiter: RateLimiter,
    metrics: Arc<PipelineMetrics>,
}

impl SubmissionProcessor {
    pub fn new(
        pipeline: VerificationPipeline,
        limiter: RateLimiter,
        metrics: Arc<PipelineMetrics>,
    ) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            limiter,
            metrics,
        }
    }

    /// Process one submission.
    ///
    /// The rate check runs first so a throttled contributor costs no
    /// classifier call. The pipeline itself runs on a detached task: a
    /// caller that abandons the request cannot cancel payment or ledger
    /// recording once persistence has begun — partial results are never
    /// rolled back.
    pub async fn submit(&self, submission: Submission) -> SubmissionOutcome {
        let decision = self.limiter.check(&submission.contributor).await;
        if !decision.allowed {
            tracing::info!(
                contributor = %submission.contributor,
                reason = decision.reason,
                "submission rate limited"
            );
            self.metrics.rate_limited_total.inc();
            return SubmissionOutcome::Denied(decision);
        }

        self.metrics.submissions_total.inc();

        let pipeline = self.pipeline.clone();
        let handle = tokio::spawn(async move { pipeline.run(submission).await });

        let result = match handle.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(error = %e, "pipeline task aborted");
                PipelineResult::failed("internal_error")
            }
        };

        match result.outcome {
            PipelineOutcome::Done => self.metrics.submissions_done.inc(),
            PipelineOutcome::Rejected => self.metrics.submissions_rejected.inc(),
            PipelineOutcome::Failed => self.metrics.submissions_failed.inc(),
        }
        if result.payment_failed {
            self.metrics.payment_failures_total.inc();
        }

        SubmissionOutcome::Completed(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerb_nullables::{ManualClock, NullClassifier, NullPayer};
    use kerb_policy::FraudPolicy;
    use kerb_store::{FacilityStore, MemoryStore, NewFacility, RewardLedger};
    use kerb_types::{FacilityType, GeoPoint, PolicyParams, WalletAddress};
    use std::time::Duration;

    const T0: u64 = 1_700_000_000;

    struct Harness {
        store: Arc<MemoryStore>,
        classifier: Arc<NullClassifier>,
        metrics: Arc<PipelineMetrics>,
        processor: Arc<SubmissionProcessor>,
    }

    fn harness(payer: NullPayer) -> Harness {
        let clock = Arc::new(ManualClock::new(T0));
        let store = Arc::new(MemoryStore::with_clock(clock.clone()));
        let classifier = Arc::new(NullClassifier::always_valid(FacilityType::Ramp));
        let metrics = Arc::new(PipelineMetrics::new());
        let params = PolicyParams::kerb_defaults();

        let pipeline = VerificationPipeline::new(
            classifier.clone(),
            FraudPolicy::new(store.clone(), params.clone()),
            store.clone(),
            Arc::new(payer),
            store.clone(),
            &params,
        );
        let limiter = RateLimiter::new(store.clone(), clock, params);
        let processor = Arc::new(SubmissionProcessor::new(pipeline, limiter, metrics.clone()));

        Harness {
            store,
            classifier,
            metrics,
            processor,
        }
    }

    fn contributor() -> WalletAddress {
        WalletAddress::new(format!("0x{}", "b".repeat(40)))
    }

    fn submission_at(lat: f64, lng: f64) -> Submission {
        Submission {
            image: vec![0xff, 0xd8],
            position: GeoPoint::new(lat, lng).unwrap(),
            contributor: contributor(),
            image_ref: None,
        }
    }

    #[tokio::test]
    async fn completed_submission_bumps_done_counter() {
        let h = harness(NullPayer::succeeding());
        let outcome = h.processor.submit(submission_at(31.0, 121.0)).await;
        assert!(matches!(
            outcome,
            SubmissionOutcome::Completed(PipelineResult {
                outcome: PipelineOutcome::Done,
                ..
            })
        ));
        assert_eq!(h.metrics.submissions_done.get(), 1);
        assert_eq!(h.metrics.submissions_total.get(), 1);
    }

    #[tokio::test]
    async fn eleventh_hourly_submission_is_denied_before_classification() {
        let h = harness(NullPayer::succeeding());

        // Ten prior creations by this contributor inside the trailing hour.
        for i in 0..10 {
            h.store
                .create(NewFacility {
                    facility_type: FacilityType::Ramp,
                    position: GeoPoint::new(10.0 + i as f64, 10.0).unwrap(),
                    image_ref: "pending".into(),
                    classification: serde_json::json!({}),
                    contributor: contributor(),
                })
                .await
                .unwrap();
        }

        let outcome = h.processor.submit(submission_at(55.0, 55.0)).await;
        match outcome {
            SubmissionOutcome::Denied(decision) => {
                assert_eq!(decision.reason, "hourly_limit_exceeded");
                assert_eq!(decision.retry_after_mins, Some(60));
            }
            other => panic!("expected rate-limit denial, got {other:?}"),
        }

        // The classifier was never consulted for the denied submission.
        assert_eq!(h.classifier.calls(), 0);
        assert_eq!(h.metrics.rate_limited_total.get(), 1);
        assert_eq!(h.metrics.submissions_total.get(), 0);
    }

    #[tokio::test]
    async fn payment_failure_bumps_payment_counter_but_completes() {
        let h = harness(NullPayer::all_down());
        let outcome = h.processor.submit(submission_at(31.0, 121.0)).await;
        match outcome {
            SubmissionOutcome::Completed(result) => {
                assert_eq!(result.outcome, PipelineOutcome::Done);
                assert!(result.payment_failed);
            }
            other => panic!("expected completion, got {other:?}"),
        }
        assert_eq!(h.metrics.payment_failures_total.get(), 1);
        assert_eq!(h.metrics.submissions_done.get(), 1);
    }

    #[tokio::test]
    async fn abandoned_caller_does_not_cancel_payment_or_recording() {
        let h = harness(NullPayer::succeeding().with_delay(Duration::from_millis(200)));

        // Drop the submit future mid-payment, as an HTTP layer would when
        // the client disconnects.
        let processor = h.processor.clone();
        tokio::select! {
            _ = processor.submit(submission_at(31.0, 121.0)) => {
                panic!("submission should not finish before the deadline");
            }
            _ = tokio::time::sleep(Duration::from_millis(50)) => {}
        }

        // The detached pipeline task still runs payment and recording.
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(h.store.facility_count(), 1);
        assert_eq!(h.store.reward_count(), 1);
        let rewards = h.store.rewards_for(&contributor()).await.unwrap();
        assert!(rewards[0].tx_hash.is_some());
    }
}

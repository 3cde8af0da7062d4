//! Integration tests exercising the full submission pipeline:
//! rate check → classification → fraud check → persistence → payment →
//! ledger readback.
//!
//! These tests wire together components that are normally only connected
//! inside `node.rs`, verifying the system works end-to-end — not just
//! in isolation.

use kerb_node::{PipelineMetrics, SubmissionOutcome, SubmissionProcessor};
use kerb_nullables::{ManualClock, NullClassifier, NullPayer};
use kerb_policy::{FraudPolicy, RateLimiter};
use kerb_store::{FacilityStore, MemoryStore, RewardLedger};
use kerb_types::params::SECS_PER_DAY;
use kerb_types::{FacilityType, GeoPoint, PolicyParams, WalletAddress};
use kerb_verification::{PipelineOutcome, Submission, VerificationPipeline};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const T0: u64 = 1_700_000_000;

struct TestNode {
    clock: Arc<ManualClock>,
    store: Arc<MemoryStore>,
    metrics: Arc<PipelineMetrics>,
    processor: SubmissionProcessor,
}

fn wire(classifier: NullClassifier, payer: NullPayer) -> TestNode {
    let clock = Arc::new(ManualClock::new(T0));
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));
    let metrics = Arc::new(PipelineMetrics::new());
    let params = PolicyParams::kerb_defaults();

    let pipeline = VerificationPipeline::new(
        Arc::new(classifier),
        FraudPolicy::new(store.clone(), params.clone()),
        store.clone(),
        Arc::new(payer),
        store.clone(),
        &params,
    );
    let limiter = RateLimiter::new(store.clone(), clock.clone(), params);
    let processor = SubmissionProcessor::new(pipeline, limiter, metrics.clone());

    TestNode {
        clock,
        store,
        metrics,
        processor,
    }
}

fn wallet(seed: u8) -> WalletAddress {
    WalletAddress::new(format!("0x{:040x}", seed))
}

fn submission(contributor: WalletAddress, lat: f64, lng: f64) -> Submission {
    Submission {
        image: vec![0xff, 0xd8, 0xff, 0xe0],
        position: GeoPoint::new(lat, lng).unwrap(),
        contributor,
        image_ref: Some(format!("https://img.kerb.net/{lat}-{lng}.jpg")),
    }
}

fn completed(outcome: SubmissionOutcome) -> kerb_verification::PipelineResult {
    match outcome {
        SubmissionOutcome::Completed(result) => result,
        SubmissionOutcome::Denied(decision) => {
            panic!("expected completion, was rate limited: {}", decision.reason)
        }
    }
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn facility_lifecycle_new_duplicate_then_update() {
    let node = wire(
        NullClassifier::always_valid(FacilityType::Ramp),
        NullPayer::succeeding(),
    );
    let alice = wallet(1);
    let bob = wallet(2);

    // Alice maps a new ramp and earns the full tier.
    let first = completed(node.processor.submit(submission(alice.clone(), 31.2304, 121.4737)).await);
    assert_eq!(first.outcome, PipelineOutcome::Done);
    assert_eq!(first.reward_amount, Some(50));
    let facility_id = first.facility_id.clone().unwrap();

    // Bob photographs the same ramp the next day: duplicate, no reward,
    // and the response names the conflicting facility.
    node.clock.advance(SECS_PER_DAY);
    let second = completed(node.processor.submit(submission(bob.clone(), 31.23041, 121.47371)).await);
    assert_eq!(second.outcome, PipelineOutcome::Rejected);
    assert_eq!(second.reason.as_deref(), Some("recently_verified"));
    assert_eq!(second.existing_facility.as_ref(), Some(&facility_id));

    // Twenty days later the record has gone stale; Bob's re-photograph
    // refreshes it for the reduced tier.
    node.clock.advance(20 * SECS_PER_DAY);
    let third = completed(node.processor.submit(submission(bob.clone(), 31.23041, 121.47371)).await);
    assert_eq!(third.outcome, PipelineOutcome::Done);
    assert_eq!(third.reward_amount, Some(25));
    assert_eq!(third.facility_id.as_ref(), Some(&facility_id));

    // One facility, two reward records, rewards attributed per contributor.
    assert_eq!(node.store.facility_count(), 1);
    assert_eq!(node.store.reward_count(), 2);
    let alice_rewards = node.store.rewards_for(&alice).await.unwrap();
    let bob_rewards = node.store.rewards_for(&bob).await.unwrap();
    assert_eq!(alice_rewards.iter().map(|r| r.amount).sum::<u64>(), 50);
    assert_eq!(bob_rewards.iter().map(|r| r.amount).sum::<u64>(), 25);

    assert_eq!(node.metrics.submissions_done.get(), 2);
    assert_eq!(node.metrics.submissions_rejected.get(), 1);
}

#[tokio::test]
async fn same_position_different_type_is_independent() {
    let node = wire(
        NullClassifier::scripted(
            [
                kerb_nullables::ClassifierReply::Valid(FacilityType::Ramp),
                kerb_nullables::ClassifierReply::Valid(FacilityType::Elevator),
            ],
            kerb_nullables::ClassifierReply::Error,
        ),
        NullPayer::succeeding(),
    );
    let alice = wallet(1);

    let ramp = completed(node.processor.submit(submission(alice.clone(), 31.23, 121.47)).await);
    let elevator = completed(node.processor.submit(submission(alice, 31.23, 121.47)).await);

    // A ramp does not deduplicate an elevator at the same entrance.
    assert_eq!(ramp.outcome, PipelineOutcome::Done);
    assert_eq!(elevator.outcome, PipelineOutcome::Done);
    assert_eq!(elevator.reward_amount, Some(50));
    assert_eq!(node.store.facility_count(), 2);
}

// ---------------------------------------------------------------------------
// Payment degradation, end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_payment_leaves_reconcilable_ledger_trail() {
    let node = wire(
        NullClassifier::always_valid(FacilityType::Toilet),
        NullPayer::all_down(),
    );
    let alice = wallet(7);

    let result = completed(node.processor.submit(submission(alice.clone(), 39.9, 116.4)).await);
    assert_eq!(result.outcome, PipelineOutcome::Done);
    assert!(result.payment_failed);
    assert!(result.tx_hash.is_none());

    // The contribution stands and the unpaid scan finds the gap.
    assert_eq!(node.store.facility_count(), 1);
    let unpaid = node.store.unpaid().await.unwrap();
    assert_eq!(unpaid.len(), 1);
    assert_eq!(unpaid[0].contributor, alice);
    assert_eq!(unpaid[0].amount, 50);
    assert_eq!(node.metrics.payment_failures_total.get(), 1);
}

// ---------------------------------------------------------------------------
// Rate limiting, end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn hourly_quota_recovers_as_the_window_slides() {
    let node = wire(
        NullClassifier::always_valid(FacilityType::Wheelchair),
        NullPayer::succeeding(),
    );
    let alice = wallet(3);

    // Fill the hourly quota with ten distinct facilities.
    for i in 0..10 {
        let result = completed(
            node.processor
                .submit(submission(alice.clone(), 30.0 + i as f64 * 0.01, 120.0))
                .await,
        );
        assert_eq!(result.outcome, PipelineOutcome::Done);
    }

    // The eleventh is denied without reaching the pipeline.
    let denied = node
        .processor
        .submit(submission(alice.clone(), 31.0, 120.0))
        .await;
    assert!(matches!(denied, SubmissionOutcome::Denied(_)));

    // An hour later the hourly window has slid past those creations.
    node.clock.advance(3601);
    let result = completed(node.processor.submit(submission(alice, 31.0, 120.0)).await);
    assert_eq!(result.outcome, PipelineOutcome::Done);
}

#[tokio::test]
async fn rejected_submissions_do_not_consume_quota() {
    let node = wire(
        NullClassifier::always(kerb_nullables::ClassifierReply::Invalid(
            "not a facility".into(),
        )),
        NullPayer::succeeding(),
    );
    let alice = wallet(4);

    // Far more rejected submissions than the hourly creation limit.
    for i in 0..15 {
        let result = completed(
            node.processor
                .submit(submission(alice.clone(), 30.0 + i as f64 * 0.01, 120.0))
                .await,
        );
        assert_eq!(result.outcome, PipelineOutcome::Rejected);
    }

    // Nothing was persisted, so nothing counts against the limiter.
    assert_eq!(node.store.facility_count(), 0);
    let outcome = node.processor.submit(submission(alice, 31.0, 120.0)).await;
    assert!(
        matches!(outcome, SubmissionOutcome::Completed(_)),
        "rejections must not rate limit the contributor"
    );
}

// ---------------------------------------------------------------------------
// Read-side queries over pipeline output
// ---------------------------------------------------------------------------

#[tokio::test]
async fn nearby_query_and_stats_reflect_processed_submissions() {
    let node = wire(
        NullClassifier::scripted(
            [
                kerb_nullables::ClassifierReply::Valid(FacilityType::Ramp),
                kerb_nullables::ClassifierReply::Valid(FacilityType::Ramp),
                kerb_nullables::ClassifierReply::Valid(FacilityType::Toilet),
            ],
            kerb_nullables::ClassifierReply::Error,
        ),
        NullPayer::succeeding(),
    );

    // Two ramps ~1.1 km apart plus a toilet next to the first ramp.
    completed(node.processor.submit(submission(wallet(1), 31.2300, 121.4700)).await);
    completed(node.processor.submit(submission(wallet(2), 31.2400, 121.4700)).await);
    completed(node.processor.submit(submission(wallet(1), 31.2301, 121.4700)).await);

    let origin = GeoPoint::new(31.2300, 121.4700).unwrap();
    let nearby = node.store.find_within(origin, 500.0, None).await.unwrap();
    assert_eq!(nearby.len(), 2, "the far ramp is outside the radius");

    let ramps_only = node
        .store
        .find_within(origin, 500.0, Some(FacilityType::Ramp))
        .await
        .unwrap();
    assert_eq!(ramps_only.len(), 1);

    let by_type = node.store.count_by_type().await.unwrap();
    let ramp_count = by_type
        .iter()
        .find(|(t, _)| *t == FacilityType::Ramp)
        .map(|(_, n)| *n);
    assert_eq!(ramp_count, Some(2));
    assert_eq!(node.store.contributor_count().await.unwrap(), 2);
    assert_eq!(node.store.total_amount().await.unwrap(), 150);
}

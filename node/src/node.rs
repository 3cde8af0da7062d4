//! Composition root — builds a fully wired node from configuration.

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::metrics::PipelineMetrics;
use crate::processor::SubmissionProcessor;
use kerb_chain::HttpPayer;
use kerb_policy::{FraudPolicy, RateLimiter};
use kerb_store::{FacilityStore, MemoryStore, RewardLedger, SystemClock};
use kerb_verification::VerificationPipeline;
use kerb_vision::HttpClassifier;
use std::sync::Arc;
use std::time::Duration;

/// A wired KERB node: the submission processor plus the read-side handles
/// the HTTP layer queries.
///
/// Business logic never branches on deployment mode; the choice of
/// implementations happens here, at the composition root, and nowhere else.
pub struct KerbNode {
    pub processor: Arc<SubmissionProcessor>,
    pub facilities: Arc<dyn FacilityStore>,
    pub ledger: Arc<dyn RewardLedger>,
    pub metrics: Arc<PipelineMetrics>,
}

impl KerbNode {
    /// Build a standalone node: in-memory storage, HTTP classifier and
    /// payout adapters.
    pub fn standalone(config: &NodeConfig) -> Result<Self, NodeError> {
        let vision_url = config
            .vision_url
            .as_deref()
            .ok_or_else(|| NodeError::Config("vision_url is required".into()))?;
        let payout_url = config
            .payout_url
            .as_deref()
            .ok_or_else(|| NodeError::Config("payout_url is required".into()))?;

        let params = config.policy.clone();
        let call_timeout = Duration::from_secs(params.external_call_timeout_secs);
        let clock = Arc::new(SystemClock);
        let store = Arc::new(MemoryStore::new());
        let metrics = Arc::new(PipelineMetrics::new());

        let pipeline = VerificationPipeline::new(
            Arc::new(HttpClassifier::new(vision_url, call_timeout)),
            FraudPolicy::new(store.clone(), params.clone()),
            store.clone(),
            Arc::new(HttpPayer::new(payout_url, call_timeout)),
            store.clone(),
            &params,
        );
        let limiter = RateLimiter::new(store.clone(), clock, params);
        let processor = Arc::new(SubmissionProcessor::new(pipeline, limiter, metrics.clone()));

        tracing::info!(vision_url, payout_url, "standalone node wired with in-memory store");

        Ok(Self {
            processor,
            facilities: store.clone(),
            ledger: store,
            metrics,
        })
    }
}

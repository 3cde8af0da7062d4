//! Per-contributor sliding-window rate limiting.

use kerb_store::{Clock, RateCounter, StoreError};
use kerb_types::params::{SECS_PER_DAY, SECS_PER_HOUR};
use kerb_types::{PolicyParams, WalletAddress};
use std::sync::Arc;

/// Wait-time hint when the hourly window is exhausted.
const HOURLY_RETRY_AFTER_MINS: u64 = 60;

/// Wait-time hint when the daily window is exhausted.
const DAILY_RETRY_AFTER_MINS: u64 = 1440;

/// Outcome of a rate-limit check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    /// Machine-readable reason code naming the breached limit, or
    /// `"within_limits"` / `"check_failed_default_allow"`.
    pub reason: &'static str,
    /// Minutes until the contributor should retry, on denial.
    pub retry_after_mins: Option<u64>,
    pub hourly_count: u32,
    pub daily_count: u32,
}

impl RateDecision {
    fn allow(reason: &'static str, hourly_count: u32, daily_count: u32) -> Self {
        Self {
            allowed: true,
            reason,
            retry_after_mins: None,
            hourly_count,
            daily_count,
        }
    }
}

/// Bounds facility creations per contributor over two independent sliding
/// windows: the trailing hour and the trailing day.
///
/// Counting is based on facility-creation timestamps, not pipeline
/// invocations, so rejected or duplicate submissions never consume quota.
pub struct RateLimiter {
    counter: Arc<dyn RateCounter>,
    clock: Arc<dyn Clock>,
    params: PolicyParams,
}

impl RateLimiter {
    pub fn new(counter: Arc<dyn RateCounter>, clock: Arc<dyn Clock>, params: PolicyParams) -> Self {
        Self {
            counter,
            clock,
            params,
        }
    }

    /// Check whether a contributor may submit right now.
    ///
    /// If the counting store is unreachable the limiter fails open: a
    /// reward-side-effect-only limiter prefers availability over strict
    /// enforcement.
    pub async fn check(&self, contributor: &WalletAddress) -> RateDecision {
        let now = self.clock.now();

        let hourly = self
            .counter
            .count_created_since(contributor, now.minus_secs(SECS_PER_HOUR))
            .await;
        let hourly_count = match hourly {
            Ok(n) => n,
            Err(e) => return self.fail_open(contributor, e),
        };

        let daily = self
            .counter
            .count_created_since(contributor, now.minus_secs(SECS_PER_DAY))
            .await;
        let daily_count = match daily {
            Ok(n) => n,
            Err(e) => return self.fail_open(contributor, e),
        };

        if hourly_count >= self.params.hourly_submission_limit {
            return RateDecision {
                allowed: false,
                reason: "hourly_limit_exceeded",
                retry_after_mins: Some(HOURLY_RETRY_AFTER_MINS),
                hourly_count,
                daily_count,
            };
        }

        if daily_count >= self.params.daily_submission_limit {
            return RateDecision {
                allowed: false,
                reason: "daily_limit_exceeded",
                retry_after_mins: Some(DAILY_RETRY_AFTER_MINS),
                hourly_count,
                daily_count,
            };
        }

        RateDecision::allow("within_limits", hourly_count, daily_count)
    }

    fn fail_open(&self, contributor: &WalletAddress, error: StoreError) -> RateDecision {
        tracing::warn!(
            contributor = %contributor,
            error = %error,
            "rate counter unreachable, allowing submission"
        );
        RateDecision::allow("check_failed_default_allow", 0, 0)
    }
}

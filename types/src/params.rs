//! Policy parameters — the canonical tunables for fraud detection,
//! reward tiers, and rate limiting.

use serde::{Deserialize, Serialize};

/// Seconds in one hour.
pub const SECS_PER_HOUR: u64 = 3600;

/// Seconds in one day.
pub const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// All policy parameters, loaded from configuration at startup.
///
/// There is exactly one reward-tier table: 50 for a new facility, 25 for an
/// update, 0 for a duplicate. A duplicate never carries a reward.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyParams {
    // ── Duplicate detection ──────────────────────────────────────────────
    /// Two submissions of the same type within this distance refer to the
    /// same physical facility (inclusive at the boundary).
    #[serde(default = "default_duplicate_radius_m")]
    pub duplicate_radius_m: f64,

    /// A same-type facility updated less than this many days ago makes a
    /// submission a duplicate rather than an update.
    #[serde(default = "default_freshness_window_days")]
    pub freshness_window_days: u32,

    // ── Reward tiers ─────────────────────────────────────────────────────
    /// Token reward for a brand-new facility.
    #[serde(default = "default_new_facility_reward")]
    pub new_facility_reward: u64,

    /// Token reward for refreshing a stale facility.
    #[serde(default = "default_update_facility_reward")]
    pub update_facility_reward: u64,

    // ── Rate limiting ────────────────────────────────────────────────────
    /// Maximum facility creations per contributor in the trailing hour.
    #[serde(default = "default_hourly_submission_limit")]
    pub hourly_submission_limit: u32,

    /// Maximum facility creations per contributor in the trailing day.
    #[serde(default = "default_daily_submission_limit")]
    pub daily_submission_limit: u32,

    // ── External calls ───────────────────────────────────────────────────
    /// Bound on every external service call made by the pipeline.
    #[serde(default = "default_external_call_timeout_secs")]
    pub external_call_timeout_secs: u64,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_duplicate_radius_m() -> f64 {
    50.0
}

fn default_freshness_window_days() -> u32 {
    15
}

fn default_new_facility_reward() -> u64 {
    50
}

fn default_update_facility_reward() -> u64 {
    25
}

fn default_hourly_submission_limit() -> u32 {
    10
}

fn default_daily_submission_limit() -> u32 {
    50
}

fn default_external_call_timeout_secs() -> u64 {
    30
}

impl PolicyParams {
    /// KERB production defaults.
    pub fn kerb_defaults() -> Self {
        Self {
            duplicate_radius_m: default_duplicate_radius_m(),
            freshness_window_days: default_freshness_window_days(),
            new_facility_reward: default_new_facility_reward(),
            update_facility_reward: default_update_facility_reward(),
            hourly_submission_limit: default_hourly_submission_limit(),
            daily_submission_limit: default_daily_submission_limit(),
            external_call_timeout_secs: default_external_call_timeout_secs(),
        }
    }
}

/// Default is the KERB production configuration.
impl Default for PolicyParams {
    fn default() -> Self {
        Self::kerb_defaults()
    }
}

//! Rate counter trait — backs the sliding-window rate limiter.

use crate::StoreError;
use async_trait::async_trait;
use kerb_types::{Timestamp, WalletAddress};

/// Counts facility creations attributable to a contributor.
///
/// The count is over facility-creation timestamps, not pipeline invocations:
/// a rejected or duplicate submission that never reached persistence does
/// not consume quota.
#[async_trait]
pub trait RateCounter: Send + Sync {
    async fn count_created_since(
        &self,
        contributor: &WalletAddress,
        since: Timestamp,
    ) -> Result<u32, StoreError>;
}

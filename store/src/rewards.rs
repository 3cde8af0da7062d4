//! Reward ledger trait and record type.

use crate::StoreError;
use async_trait::async_trait;
use kerb_types::{FacilityId, Timestamp, TxHash, WalletAddress};
use serde::{Deserialize, Serialize};

/// An append-only record of a paid or attempted reward.
///
/// Never mutated after creation. A `None` transaction hash means the payment
/// was not confirmed; a reconciliation process can find and re-pay those by
/// scanning with [`RewardLedger::unpaid`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RewardRecord {
    pub id: String,
    pub contributor: WalletAddress,
    pub facility_id: FacilityId,
    /// Token amount; zero-amount records are never written.
    pub amount: u64,
    pub tx_hash: Option<TxHash>,
    pub created_at: Timestamp,
}

/// Append-only ledger of rewards, keyed to a facility and a payment attempt.
#[async_trait]
pub trait RewardLedger: Send + Sync {
    /// Append a reward record and return its assigned id.
    async fn append(
        &self,
        contributor: &WalletAddress,
        facility_id: &FacilityId,
        amount: u64,
        tx_hash: Option<TxHash>,
    ) -> Result<String, StoreError>;

    /// All rewards earned by a contributor, newest first.
    async fn rewards_for(&self, contributor: &WalletAddress)
        -> Result<Vec<RewardRecord>, StoreError>;

    /// All records whose payment was never confirmed (`tx_hash` is `None`).
    async fn unpaid(&self) -> Result<Vec<RewardRecord>, StoreError>;

    /// Total token amount across all records, for platform statistics.
    async fn total_amount(&self) -> Result<u64, StoreError>;
}

//! The token payer contract.

use crate::error::ChainError;
use crate::hash::LocationHash;
use async_trait::async_trait;
use kerb_types::{TxHash, WalletAddress};

/// Performs the on-chain reward transfer.
///
/// Two paths: the primary path goes through the reward distributor, which
/// records the location hash on-chain to prevent duplicate claims
/// independently of the pipeline's own dedup; the fallback path is a direct
/// transfer without the hash record. Implementations make a single attempt
/// per call — the one retry/fallback decision lives in the pipeline.
#[async_trait]
pub trait TokenPayer: Send + Sync {
    async fn pay_primary(
        &self,
        recipient: &WalletAddress,
        amount: u64,
        location: &LocationHash,
    ) -> Result<TxHash, ChainError>;

    async fn pay_fallback(
        &self,
        recipient: &WalletAddress,
        amount: u64,
    ) -> Result<TxHash, ChainError>;
}

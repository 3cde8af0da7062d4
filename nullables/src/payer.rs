//! Nullable token payer — controllable payment outcomes for testing.

use async_trait::async_trait;
use kerb_chain::{ChainError, LocationHash, TokenPayer};
use kerb_types::{TxHash, WalletAddress};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A payer whose primary and fallback paths can each be made to fail,
/// with an optional per-call delay for cancellation tests.
pub struct NullPayer {
    primary_fails: bool,
    fallback_fails: bool,
    delay: Duration,
    primary_calls: AtomicUsize,
    fallback_calls: AtomicUsize,
}

impl NullPayer {
    /// Both paths succeed.
    pub fn succeeding() -> Self {
        Self::new(false, false)
    }

    /// Primary path fails; fallback succeeds.
    pub fn primary_down() -> Self {
        Self::new(true, false)
    }

    /// Both paths fail.
    pub fn all_down() -> Self {
        Self::new(true, true)
    }

    fn new(primary_fails: bool, fallback_fails: bool) -> Self {
        Self {
            primary_fails,
            fallback_fails,
            delay: Duration::ZERO,
            primary_calls: AtomicUsize::new(0),
            fallback_calls: AtomicUsize::new(0),
        }
    }

    /// Sleep this long inside every payment call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn primary_calls(&self) -> usize {
        self.primary_calls.load(Ordering::SeqCst)
    }

    pub fn fallback_calls(&self) -> usize {
        self.fallback_calls.load(Ordering::SeqCst)
    }

    /// Total payment attempts across both paths.
    pub fn total_calls(&self) -> usize {
        self.primary_calls() + self.fallback_calls()
    }
}

#[async_trait]
impl TokenPayer for NullPayer {
    async fn pay_primary(
        &self,
        _recipient: &WalletAddress,
        _amount: u64,
        _location: &LocationHash,
    ) -> Result<TxHash, ChainError> {
        let n = self.primary_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.primary_fails {
            Err(ChainError::Rpc("injected failure".into()))
        } else {
            Ok(TxHash::new(format!("0xprimary{n}")))
        }
    }

    async fn pay_fallback(
        &self,
        _recipient: &WalletAddress,
        _amount: u64,
    ) -> Result<TxHash, ChainError> {
        let n = self.fallback_calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.fallback_fails {
            Err(ChainError::Rpc("injected failure".into()))
        } else {
            Ok(TxHash::new(format!("0xfallback{n}")))
        }
    }
}

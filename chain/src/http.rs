//! HTTP adapter for an external payout service.
//!
//! The payout service owns keys, gas, and contract interaction; this client
//! speaks a small typed JSON contract with it and never interprets chain
//! state itself.

use crate::error::ChainError;
use crate::hash::LocationHash;
use crate::payer::TokenPayer;
use async_trait::async_trait;
use kerb_types::{TxHash, WalletAddress};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Serialize)]
struct PayoutRequest<'a> {
    recipient: &'a str,
    amount: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    location_hash: Option<String>,
}

#[derive(Deserialize)]
struct PayoutResponse {
    tx_hash: String,
}

/// Client for the payout service's primary and fallback endpoints.
pub struct HttpPayer {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPayer {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn post_payout(
        &self,
        path: &str,
        request: &PayoutRequest<'_>,
    ) -> Result<TxHash, ChainError> {
        let url = format!("{}/{}", self.base_url, path);
        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChainError::Timeout
                } else {
                    ChainError::Rpc(e.to_string())
                }
            })?;

        let status = resp.status();
        if status.is_client_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ChainError::Rejected(format!("HTTP {status}: {body}")));
        }
        if !status.is_success() {
            return Err(ChainError::Rpc(format!("HTTP {status} from {url}")));
        }

        let payout: PayoutResponse = resp
            .json()
            .await
            .map_err(|e| ChainError::Rpc(format!("malformed payout response: {e}")))?;
        tracing::debug!(path, tx_hash = %payout.tx_hash, "payout confirmed");
        Ok(TxHash::new(payout.tx_hash))
    }
}

#[async_trait]
impl TokenPayer for HttpPayer {
    async fn pay_primary(
        &self,
        recipient: &WalletAddress,
        amount: u64,
        location: &LocationHash,
    ) -> Result<TxHash, ChainError> {
        self.post_payout(
            "payouts/primary",
            &PayoutRequest {
                recipient: recipient.as_str(),
                amount,
                location_hash: Some(location.to_hex()),
            },
        )
        .await
    }

    async fn pay_fallback(
        &self,
        recipient: &WalletAddress,
        amount: u64,
    ) -> Result<TxHash, ChainError> {
        self.post_payout(
            "payouts/fallback",
            &PayoutRequest {
                recipient: recipient.as_str(),
                amount,
                location_hash: None,
            },
        )
        .await
    }
}

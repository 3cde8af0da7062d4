use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("payout rpc error: {0}")]
    Rpc(String),

    #[error("payout request timed out")]
    Timeout,

    #[error("payout rejected: {0}")]
    Rejected(String),
}

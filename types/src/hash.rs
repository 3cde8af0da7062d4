//! Transaction hash type for on-chain payment identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque transaction identifier returned by the token payer.
///
/// Stored verbatim in reward records; the core never interprets it beyond
/// equality and display.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TxHash(String);

impl TxHash {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

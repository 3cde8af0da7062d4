//! Contributor wallet address type.

use crate::error::KerbError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An EVM-style wallet address: `0x` followed by 40 hex digits.
///
/// Rewards are paid to this address; it is also the identity the rate
/// limiter counts against.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// The standard prefix for all wallet addresses.
    pub const PREFIX: &'static str = "0x";

    /// Total length of a well-formed address string.
    pub const LEN: usize = 42;

    /// Create a wallet address from a raw string without validation.
    ///
    /// Intended for trusted inputs (storage, tests). Use [`WalletAddress::parse`]
    /// at the ingress boundary.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Parse and validate an address string.
    pub fn parse(raw: impl Into<String>) -> Result<Self, KerbError> {
        let s = raw.into();
        let addr = Self(s);
        if addr.is_valid() {
            Ok(addr)
        } else {
            Err(KerbError::InvalidAddress(addr.0))
        }
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate that this address is well-formed.
    pub fn is_valid(&self) -> bool {
        self.0.len() == Self::LEN
            && self.0.starts_with(Self::PREFIX)
            && self.0[2..].bytes().all(|b| b.is_ascii_hexdigit())
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_well_formed_address() {
        let addr = WalletAddress::parse(format!("0x{}", "ab".repeat(20))).unwrap();
        assert!(addr.is_valid());
    }

    #[test]
    fn parse_rejects_missing_prefix() {
        assert!(WalletAddress::parse("ab".repeat(21)).is_err());
    }

    #[test]
    fn parse_rejects_wrong_length() {
        assert!(WalletAddress::parse("0xabcd").is_err());
    }

    #[test]
    fn parse_rejects_non_hex() {
        assert!(WalletAddress::parse(format!("0x{}", "zz".repeat(20))).is_err());
    }
}

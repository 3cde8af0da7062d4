//! Token payer boundary for the KERB network.
//!
//! The on-chain semantics of the reward token are an opaque external
//! concern; this crate defines the narrow [`TokenPayer`] contract the
//! pipeline depends on, the deterministic location hash the primary payout
//! path uses for on-chain duplicate-claim prevention, and an HTTP adapter
//! for an external payout service.

pub mod error;
pub mod hash;
pub mod http;
pub mod payer;

pub use error::ChainError;
pub use hash::{location_hash, LocationHash};
pub use http::HttpPayer;
pub use payer::TokenPayer;

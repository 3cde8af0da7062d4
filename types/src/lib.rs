//! Fundamental types for the KERB network.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! wallet addresses, facility identities, geographic positions, timestamps,
//! transaction hashes, and policy parameters.

pub mod address;
pub mod error;
pub mod facility;
pub mod geo;
pub mod hash;
pub mod params;
pub mod time;

pub use address::WalletAddress;
pub use error::KerbError;
pub use facility::{FacilityId, FacilityType};
pub use geo::GeoPoint;
pub use hash::TxHash;
pub use params::PolicyParams;
pub use time::Timestamp;

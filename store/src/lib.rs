//! Storage contracts for the KERB network.
//!
//! This crate defines the narrow trait boundaries the pipeline depends on —
//! facility repository, geospatial duplicate index, rate counter, and reward
//! ledger — together with their record types and a thread-safe in-memory
//! implementation used by the daemon's standalone mode and by tests.
//!
//! Real deployments back these traits with an external spatial store; the
//! pipeline only ever sees the contracts in this crate.

pub mod clock;
pub mod error;
pub mod facility;
pub mod memory;
pub mod rate;
pub mod rewards;
pub mod spatial;

pub use clock::{Clock, SystemClock};
pub use error::StoreError;
pub use facility::{FacilityRecord, FacilityStore, NewFacility};
pub use memory::MemoryStore;
pub use rate::RateCounter;
pub use rewards::{RewardLedger, RewardRecord};
pub use spatial::{DuplicateIndex, NearbyFacility};

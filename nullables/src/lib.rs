//! Nullable infrastructure for deterministic testing.
//!
//! All external dependencies of the pipeline (clock, classifier, token
//! payer, storage) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod classifier;
pub mod clock;
pub mod failing;
pub mod payer;

pub use classifier::{ClassifierReply, NullClassifier};
pub use clock::ManualClock;
pub use failing::{FailingFacilityStore, FailingLedger};
pub use payer::NullPayer;

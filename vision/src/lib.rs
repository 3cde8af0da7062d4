//! Image classifier boundary for the KERB network.
//!
//! The vision model itself is an opaque external service. This crate
//! defines the typed [`Classifier`] contract the pipeline consumes — a
//! structured verdict, never free text — and an HTTP adapter for a vision
//! gateway that returns that contract as JSON.

pub mod classifier;
pub mod http;

pub use classifier::{Classification, Classifier, ClassifierError};
pub use http::HttpClassifier;

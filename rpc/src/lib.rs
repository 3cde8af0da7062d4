//! HTTP API for the KERB node.
//!
//! A thin ingress over the submission processor and the read-side store
//! queries. Provides endpoints for:
//! - Facility submission (multipart image upload)
//! - Nearby facility queries
//! - Reward history per wallet
//! - Platform statistics, health, and Prometheus metrics
//!
//! No business rule lives here: validation failures are mapped to HTTP
//! errors, and everything else is delegated to the node.

pub mod error;
pub mod handlers;
pub mod server;

pub use server::RpcServer;

//! KERB node — configuration, logging, metrics, and the submission
//! processor that owns the wired verification pipeline.

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod node;
pub mod processor;

pub use config::NodeConfig;
pub use error::NodeError;
pub use logging::{init_logging, LogFormat};
pub use metrics::PipelineMetrics;
pub use node::KerbNode;
pub use processor::{SubmissionOutcome, SubmissionProcessor};

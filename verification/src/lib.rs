//! The verification-and-reward pipeline.
//!
//! One submission flows through a fixed forward-only state machine:
//! classification, fraud check, durable persistence, token payment, reward
//! ledger entry. The step order is known at design time; every stage
//! consumes the prior stage's output and produces exactly one of
//! continue / reject / fail, with the asymmetric failure policy of the
//! payment stage handled explicitly.

pub mod outcome;
pub mod pipeline;
pub mod stage;
pub mod submission;

pub use outcome::{PipelineOutcome, PipelineResult};
pub use pipeline::VerificationPipeline;
pub use stage::PipelineStage;
pub use submission::Submission;

//! Pipeline stages, in strict forward order.

use std::fmt;

/// The stages a submission moves through. No backward transitions exist;
/// `Rejected` and `Failed` are absorbing terminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Classifying,
    FraudCheck,
    Persisting,
    Paying,
    Recording,
    Done,
    Rejected,
    Failed,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Classifying => "classifying",
            PipelineStage::FraudCheck => "fraud_check",
            PipelineStage::Persisting => "persisting",
            PipelineStage::Paying => "paying",
            PipelineStage::Recording => "recording",
            PipelineStage::Done => "done",
            PipelineStage::Rejected => "rejected",
            PipelineStage::Failed => "failed",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

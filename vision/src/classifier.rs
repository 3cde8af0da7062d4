//! The classifier contract and its typed verdict.

use async_trait::async_trait;
use kerb_types::FacilityType;
use thiserror::Error;

/// Structured verdict from the vision service.
///
/// `is_valid = false` is a content judgment ("this is not an accessibility
/// facility"), distinct from the transport failures in [`ClassifierError`].
/// When `is_valid` is true, `facility_type` is always present.
#[derive(Clone, Debug)]
pub struct Classification {
    pub is_valid: bool,
    pub facility_type: Option<FacilityType>,
    /// Human-readable description of the facility's condition, or of why
    /// the image was judged invalid.
    pub condition_notes: Option<String>,
    pub confidence: f32,
    /// The service's full response, stored verbatim on the facility record.
    pub raw_details: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("classifier transport error: {0}")]
    Transport(String),

    #[error("classifier request timed out")]
    Timeout,

    #[error("classifier returned a malformed response: {0}")]
    InvalidResponse(String),
}

/// Submits an image for classification.
///
/// A transport or timeout error is never a content judgment — the caller
/// must not fall back to accepting or rejecting the image on error.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError>;
}

//! The transient unit of work flowing through the pipeline.

use kerb_types::{GeoPoint, WalletAddress};

/// One photographed facility claim.
///
/// Exists only for the duration of a single pipeline run and is passed
/// explicitly through every stage; nothing about a submission lives in
/// shared state. It is not retained after completion except as the
/// facility and reward records it produces.
#[derive(Clone, Debug)]
pub struct Submission {
    /// Raw image bytes.
    pub image: Vec<u8>,
    pub position: GeoPoint,
    pub contributor: WalletAddress,
    /// URI of the already-uploaded image, if the upload finished before
    /// verification; otherwise the facility record carries a placeholder.
    pub image_ref: Option<String>,
}

//! HTTP request handlers.

use crate::error::RpcError;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kerb_node::{KerbNode, SubmissionOutcome};
use kerb_store::{FacilityRecord, FacilityStore, RewardLedger, RewardRecord};
use kerb_types::{FacilityType, GeoPoint, WalletAddress};
use kerb_verification::{PipelineOutcome, Submission};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Maximum accepted image size: 10 MiB.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Accepted image content types.
const ACCEPTED_IMAGE_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

// ── Submission ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SubmitResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility_type: Option<FacilityType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    pub payment_failed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub existing_facility_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_mins: Option<u64>,
}

/// Parsed multipart fields of a submission request.
struct SubmitForm {
    image: Vec<u8>,
    latitude: f64,
    longitude: f64,
    wallet_address: String,
    image_ref: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<SubmitForm, RpcError> {
    let mut image = None;
    let mut latitude = None;
    let mut longitude = None;
    let mut wallet_address = None;
    let mut image_ref = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().map(|s| s.to_string());
        match name.as_deref() {
            Some("image") => {
                let content_type = field.content_type().unwrap_or("").to_string();
                if !ACCEPTED_IMAGE_TYPES.contains(&content_type.as_str()) {
                    return Err(RpcError::InvalidRequest(format!(
                        "invalid image type: {content_type}; use JPEG, PNG, or WebP"
                    )));
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
                if bytes.len() > MAX_IMAGE_BYTES {
                    return Err(RpcError::InvalidRequest("image too large (max 10MB)".into()));
                }
                image = Some(bytes.to_vec());
            }
            Some("latitude") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
                latitude = Some(
                    text.parse::<f64>()
                        .map_err(|_| RpcError::InvalidRequest("latitude must be a number".into()))?,
                );
            }
            Some("longitude") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
                longitude = Some(text.parse::<f64>().map_err(|_| {
                    RpcError::InvalidRequest("longitude must be a number".into())
                })?);
            }
            Some("wallet_address") => {
                wallet_address = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?,
                );
            }
            Some("image_ref") => {
                image_ref = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    Ok(SubmitForm {
        image: image.ok_or_else(|| RpcError::InvalidRequest("missing image".into()))?,
        latitude: latitude.ok_or_else(|| RpcError::InvalidRequest("missing latitude".into()))?,
        longitude: longitude
            .ok_or_else(|| RpcError::InvalidRequest("missing longitude".into()))?,
        wallet_address: wallet_address
            .ok_or_else(|| RpcError::InvalidRequest("missing wallet_address".into()))?,
        image_ref,
    })
}

/// POST /submissions
pub async fn submit(
    State(node): State<Arc<KerbNode>>,
    multipart: Multipart,
) -> Result<Response, RpcError> {
    let form = read_form(multipart).await?;

    let position = GeoPoint::new(form.latitude, form.longitude)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
    if position.is_null_island() {
        return Err(RpcError::InvalidRequest("invalid coordinates (0, 0)".into()));
    }
    let contributor = WalletAddress::parse(form.wallet_address)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

    let submission = Submission {
        image: form.image,
        position,
        contributor,
        image_ref: form.image_ref,
    };

    let outcome = node.processor.submit(submission).await;
    Ok(match outcome {
        SubmissionOutcome::Denied(decision) => {
            let body = SubmitResponse {
                success: false,
                facility_id: None,
                facility_type: None,
                reward_amount: None,
                tx_hash: None,
                payment_failed: false,
                reason: Some(decision.reason.to_string()),
                existing_facility_id: None,
                retry_after_mins: decision.retry_after_mins,
            };
            (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response()
        }
        SubmissionOutcome::Completed(result) => {
            let status = match result.outcome {
                PipelineOutcome::Done | PipelineOutcome::Rejected => StatusCode::OK,
                PipelineOutcome::Failed => StatusCode::BAD_GATEWAY,
            };
            let body = SubmitResponse {
                success: result.outcome == PipelineOutcome::Done,
                facility_id: result.facility_id.map(|id| id.to_string()),
                facility_type: result.facility_type,
                reward_amount: result.reward_amount,
                tx_hash: result.tx_hash.map(|tx| tx.to_string()),
                payment_failed: result.payment_failed,
                reason: result.reason,
                existing_facility_id: result.existing_facility.map(|id| id.to_string()),
                retry_after_mins: None,
            };
            (status, Json(body)).into_response()
        }
    })
}

// ── Facility queries ─────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FacilitiesQuery {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_radius")]
    pub radius: f64,
    #[serde(default)]
    pub facility_type: Option<FacilityType>,
}

fn default_radius() -> f64 {
    200.0
}

#[derive(Serialize)]
pub struct FacilityListResponse {
    pub facilities: Vec<FacilityRecord>,
    pub count: usize,
}

/// GET /facilities
pub async fn list_facilities(
    State(node): State<Arc<KerbNode>>,
    Query(query): Query<FacilitiesQuery>,
) -> Result<Json<FacilityListResponse>, RpcError> {
    let origin = GeoPoint::new(query.latitude, query.longitude)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;
    let radius = query.radius.clamp(10.0, 5000.0);

    let facilities = node
        .facilities
        .find_within(origin, radius, query.facility_type)
        .await?;
    let count = facilities.len();
    Ok(Json(FacilityListResponse { facilities, count }))
}

/// GET /facilities/{id}
pub async fn get_facility(
    State(node): State<Arc<KerbNode>>,
    Path(id): Path<String>,
) -> Result<Json<FacilityRecord>, RpcError> {
    let record = node
        .facilities
        .get(&kerb_types::FacilityId::new(id))
        .await?;
    Ok(Json(record))
}

// ── Rewards ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RewardsResponse {
    pub wallet_address: String,
    pub rewards: Vec<RewardRecord>,
    pub total_earned: u64,
    pub contribution_count: usize,
}

/// GET /rewards/{wallet}
pub async fn get_rewards(
    State(node): State<Arc<KerbNode>>,
    Path(wallet): Path<String>,
) -> Result<Json<RewardsResponse>, RpcError> {
    let wallet = WalletAddress::parse(wallet)
        .map_err(|e| RpcError::InvalidRequest(e.to_string()))?;

    let rewards = node.ledger.rewards_for(&wallet).await?;
    let total_earned = rewards.iter().map(|r| r.amount).sum();
    let contribution_count = rewards.len();
    Ok(Json(RewardsResponse {
        wallet_address: wallet.to_string(),
        rewards,
        total_earned,
        contribution_count,
    }))
}

// ── Statistics ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsResponse {
    pub total_facilities: u64,
    pub total_rewards_distributed: u64,
    pub unique_contributors: u64,
    pub facilities_by_type: std::collections::BTreeMap<String, u64>,
}

/// GET /stats
pub async fn get_stats(
    State(node): State<Arc<KerbNode>>,
) -> Result<Json<StatsResponse>, RpcError> {
    let by_type = node.facilities.count_by_type().await?;
    let facilities_by_type: std::collections::BTreeMap<String, u64> = by_type
        .iter()
        .map(|(ty, n)| (ty.as_str().to_string(), *n))
        .collect();
    Ok(Json(StatsResponse {
        total_facilities: by_type.iter().map(|(_, n)| n).sum(),
        total_rewards_distributed: node.ledger.total_amount().await?,
        unique_contributors: node.facilities.contributor_count().await?,
        facilities_by_type,
    }))
}

// ── Health & metrics ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /metrics
pub async fn metrics(State(node): State<Arc<KerbNode>>) -> Result<Response, RpcError> {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&node.metrics.registry.gather(), &mut buffer)
        .map_err(|e| RpcError::Server(e.to_string()))?;
    Ok((
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, encoder.format_type().to_string())],
        buffer,
    )
        .into_response())
}

//! HTTP adapter for a vision gateway.
//!
//! The gateway wraps whatever model is deployed behind it and answers with
//! the typed JSON contract below. The raw response body is preserved
//! verbatim for storage on the facility record.

use crate::classifier::{Classification, Classifier, ClassifierError};
use async_trait::async_trait;
use kerb_types::FacilityType;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize)]
struct ClassifyResponse {
    is_valid: bool,
    #[serde(default)]
    facility_type: Option<String>,
    #[serde(default)]
    condition: Option<String>,
    #[serde(default)]
    confidence: f32,
}

/// Client for the vision gateway's `/classify` endpoint.
pub struct HttpClassifier {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpClassifier {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout,
        }
    }

    /// Turn the gateway's raw JSON into a [`Classification`].
    ///
    /// A verdict that claims validity but names no recognizable facility
    /// type is normalized to invalid — the pipeline never stores a facility
    /// of unknown type.
    fn normalize(raw: serde_json::Value) -> Result<Classification, ClassifierError> {
        let parsed: ClassifyResponse = serde_json::from_value(raw.clone())
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;

        let facility_type = match parsed.facility_type.as_deref() {
            Some(s) => s.parse::<FacilityType>().ok(),
            None => None,
        };

        if parsed.is_valid && facility_type.is_none() {
            return Ok(Classification {
                is_valid: false,
                facility_type: None,
                condition_notes: Some("unrecognized facility type".to_string()),
                confidence: parsed.confidence,
                raw_details: raw,
            });
        }

        Ok(Classification {
            is_valid: parsed.is_valid,
            facility_type,
            condition_notes: parsed.condition,
            confidence: parsed.confidence,
            raw_details: raw,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, image: &[u8]) -> Result<Classification, ClassifierError> {
        let url = format!("{}/classify", self.base_url);
        let resp = self
            .client
            .post(&url)
            .timeout(self.timeout)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec())
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ClassifierError::Timeout
                } else {
                    ClassifierError::Transport(e.to_string())
                }
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClassifierError::Transport(format!(
                "HTTP {status} from {url}"
            )));
        }

        let raw: serde_json::Value = resp
            .json()
            .await
            .map_err(|e| ClassifierError::InvalidResponse(e.to_string()))?;
        let classification = Self::normalize(raw)?;
        tracing::debug!(
            is_valid = classification.is_valid,
            facility_type = ?classification.facility_type,
            confidence = classification.confidence,
            "classification received"
        );
        Ok(classification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalize_valid_verdict() {
        let raw = json!({
            "is_valid": true,
            "facility_type": "ramp",
            "condition": "in good condition",
            "confidence": 0.93,
            "details": {"features": ["clear signage"]}
        });
        let c = HttpClassifier::normalize(raw.clone()).unwrap();
        assert!(c.is_valid);
        assert_eq!(c.facility_type, Some(FacilityType::Ramp));
        assert_eq!(c.raw_details, raw);
    }

    #[test]
    fn normalize_invalid_verdict_keeps_reason() {
        let raw = json!({
            "is_valid": false,
            "condition": "indoor stairs, not an accessibility facility",
            "confidence": 0.88
        });
        let c = HttpClassifier::normalize(raw).unwrap();
        assert!(!c.is_valid);
        assert!(c.condition_notes.unwrap().contains("stairs"));
    }

    #[test]
    fn valid_with_unknown_type_is_normalized_to_invalid() {
        let raw = json!({
            "is_valid": true,
            "facility_type": "escalator",
            "confidence": 0.7
        });
        let c = HttpClassifier::normalize(raw).unwrap();
        assert!(!c.is_valid);
        assert!(c.facility_type.is_none());
    }

    #[test]
    fn structurally_malformed_response_is_an_error() {
        let raw = json!({"verdict": "yes"});
        assert!(HttpClassifier::normalize(raw).is_err());
    }
}

//! Node configuration with TOML file support.

use kerb_types::PolicyParams;
use serde::{Deserialize, Serialize};

use crate::NodeError;

/// Configuration for a KERB node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Port for the HTTP API.
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Base URL of the vision gateway (required to process submissions).
    #[serde(default)]
    pub vision_url: Option<String>,

    /// Base URL of the payout service (required to process submissions).
    #[serde(default)]
    pub payout_url: Option<String>,

    /// Policy parameters: radius, freshness window, reward tiers, limits.
    #[serde(default)]
    pub policy: PolicyParams,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whether to enable the Prometheus metrics endpoint.
    #[serde(default)]
    pub enable_metrics: bool,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_api_port() -> u16 {
    8080
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, NodeError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| NodeError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("NodeConfig is always serializable to TOML")
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            vision_url: None,
            payout_url: None,
            policy: PolicyParams::default(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            enable_metrics: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = NodeConfig::default();
        let toml_str = config.to_toml_string();
        let parsed = NodeConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.api_port, config.api_port);
        assert_eq!(parsed.policy.new_facility_reward, 50);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = NodeConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.api_port, 8080);
        assert_eq!(config.log_format, "human");
        assert_eq!(config.policy.duplicate_radius_m, 50.0);
        assert_eq!(config.policy.freshness_window_days, 15);
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            api_port = 9999
            vision_url = "http://vision.internal"

            [policy]
            hourly_submission_limit = 3
        "#;
        let config = NodeConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.api_port, 9999);
        assert_eq!(config.vision_url.as_deref(), Some("http://vision.internal"));
        assert_eq!(config.policy.hourly_submission_limit, 3);
        // Untouched policy fields keep their defaults.
        assert_eq!(config.policy.daily_submission_limit, 50);
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = NodeConfig::from_toml_file("/nonexistent/kerb.toml");
        assert!(result.is_err());
        let err = result.unwrap_err();
        assert!(matches!(err, NodeError::Config(_)));
    }

    #[test]
    fn config_file_on_disk_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kerb.toml");
        std::fs::write(&path, "api_port = 7171\n").unwrap();
        let config = NodeConfig::from_toml_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.api_port, 7171);
    }
}

//! Axum-based HTTP server.

use crate::error::RpcError;
use crate::handlers;
use axum::routing::{get, post};
use axum::Router;
use kerb_node::KerbNode;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub struct RpcServer {
    pub port: u16,
    pub enable_metrics: bool,
}

impl RpcServer {
    pub fn new(port: u16) -> Self {
        Self {
            port,
            enable_metrics: false,
        }
    }

    pub fn with_metrics(mut self, enable: bool) -> Self {
        self.enable_metrics = enable;
        self
    }

    /// Build the full route table over a wired node.
    pub fn router(node: Arc<KerbNode>, enable_metrics: bool) -> Router {
        let mut router = Router::new()
            .route("/submissions", post(handlers::submit))
            .route("/facilities", get(handlers::list_facilities))
            .route("/facilities/:id", get(handlers::get_facility))
            .route("/rewards/:wallet", get(handlers::get_rewards))
            .route("/stats", get(handlers::get_stats))
            .route("/health", get(handlers::health));
        if enable_metrics {
            router = router.route("/metrics", get(handlers::metrics));
        }
        router.layer(CorsLayer::permissive()).with_state(node)
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(&self, node: Arc<KerbNode>) -> Result<(), RpcError> {
        let app = Self::router(node, self.enable_metrics);
        let addr = format!("0.0.0.0:{}", self.port);
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))?;
        tracing::info!(%addr, "HTTP API listening");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}

/// Resolve when the process receives SIGINT.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install shutdown signal handler");
    }
}

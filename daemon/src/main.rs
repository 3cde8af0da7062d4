//! KERB daemon — entry point for running a KERB node.

use clap::Parser;
use kerb_node::{init_logging, KerbNode, LogFormat, NodeConfig};
use kerb_rpc::RpcServer;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "kerb-daemon", about = "KERB accessibility network daemon")]
struct Cli {
    /// Port for the HTTP API.
    #[arg(long, env = "KERB_API_PORT")]
    api_port: Option<u16>,

    /// Base URL of the vision gateway.
    #[arg(long, env = "KERB_VISION_URL")]
    vision_url: Option<String>,

    /// Base URL of the payout service.
    #[arg(long, env = "KERB_PAYOUT_URL")]
    payout_url: Option<String>,

    /// Enable the Prometheus metrics endpoint.
    #[arg(long, env = "KERB_ENABLE_METRICS")]
    metrics: bool,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "KERB_LOG_LEVEL")]
    log_level: String,

    /// Log format: "human" or "json".
    #[arg(long, default_value = "human", env = "KERB_LOG_FORMAT")]
    log_format: String,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config: Option<NodeConfig> = if let Some(ref config_path) = cli.config {
        match NodeConfig::from_toml_file(&config_path.display().to_string()) {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                eprintln!("failed to load config file {}: {e}", config_path.display());
                None
            }
        }
    } else {
        None
    };

    let base = file_config.unwrap_or_default();
    let config = NodeConfig {
        api_port: cli.api_port.unwrap_or(base.api_port),
        vision_url: cli.vision_url.or(base.vision_url),
        payout_url: cli.payout_url.or(base.payout_url),
        policy: base.policy,
        enable_metrics: cli.metrics || base.enable_metrics,
        log_level: cli.log_level,
        log_format: cli.log_format,
    };

    init_logging(LogFormat::parse(&config.log_format), &config.log_level);
    if cli.config.is_some() {
        tracing::info!("loaded config file");
    }

    tracing::info!(
        api_port = config.api_port,
        new_reward = config.policy.new_facility_reward,
        update_reward = config.policy.update_facility_reward,
        "starting KERB node"
    );

    let node = Arc::new(KerbNode::standalone(&config)?);
    RpcServer::new(config.api_port)
        .with_metrics(config.enable_metrics)
        .start(node)
        .await?;

    tracing::info!("KERB daemon exited cleanly");
    Ok(())
}

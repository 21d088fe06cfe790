use std::sync::Arc;

use anyhow::Context;

use followup_assist::api::api_routes;
use followup_assist::config::{ServerConfig, ThreadingConfig};
use followup_assist::threading::ThreadingEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let server_config = ServerConfig::from_env();
    let threading_config = ThreadingConfig::from_env();

    let engine = Arc::new(
        ThreadingEngine::new(threading_config).context("Invalid threading configuration")?,
    );

    eprintln!("📬 Followup Assist v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   API: http://{}/api/conversations", server_config.listen_addr());
    eprintln!(
        "   Nudge threshold: {}h, recency window: {}d",
        threading_config.nudge_threshold.num_hours(),
        threading_config.recency_window.num_days()
    );
    eprintln!(
        "   Auth: {}\n",
        if server_config.api_key.is_some() {
            "bearer API key"
        } else {
            "disabled"
        }
    );

    let app = api_routes(engine, server_config.api_key.clone());

    let listener = tokio::net::TcpListener::bind(server_config.listen_addr())
        .await
        .with_context(|| format!("Failed to bind {}", server_config.listen_addr()))?;
    tracing::info!(addr = %server_config.listen_addr(), "Followup API server started");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

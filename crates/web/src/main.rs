use std::sync::Arc;

use anyhow::Context;
use vetcard_web::app::{AppState, build_app};
use vetcard_web::config::WebConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = WebConfig::from_env().context("invalid configuration")?;
    vetcard_observability::init(config.log_format);

    let state = AppState::from_config(&config).context("failed to assemble application")?;
    let app = build_app(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        backend = config.api_url.as_deref().unwrap_or("demo"),
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

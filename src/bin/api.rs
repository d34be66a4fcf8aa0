use std::sync::Arc;

use anyhow::Context;
use recap::core::config::AppConfig;
use recap::SummaryError;
use recap::features::Pipeline;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real deployments set the environment directly.
    let _ = dotenvy::dotenv();
    recap::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        let err = SummaryError::Config(e);
        error!(error = %err, "Failed to load configuration");
        err
    })?;

    let pipeline = Arc::new(Pipeline::from_config(&config));
    let app = recap::api::router(pipeline);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(
        bind_addr = %config.bind_addr,
        model = config.model_name(),
        "recap API listening"
    );

    axum::serve(listener, app).await?;
    Ok(())
}

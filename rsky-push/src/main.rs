use std::sync::Arc;

use rsky_push::{AppConfig, AppState, SnsProvider, sns};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,rsky_push=debug")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    info!(
        "Starting Blacksky Push Service on {}:{}",
        config.host, config.port
    );

    let sdk_config = sns::load_sdk_config(&config).await;
    let provider = SnsProvider::new(&sdk_config);

    let state = Arc::new(AppState {
        config: config.clone(),
        provider: Arc::new(provider),
    });

    let app = rsky_push::app(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

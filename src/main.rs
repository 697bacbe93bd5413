//! Duologue server binary.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use duologue::adapters::ai::{GeminiConfig, GeminiProvider};
use duologue::adapters::http::{app_router, AppState};
use duologue::adapters::rate_limiter::InMemoryRateLimiter;
use duologue::config::AppConfig;
use duologue::ports::AIProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.server.log_level))
        .init();

    if !config.ai.has_api_key() {
        tracing::warn!("DUOLOGUE__AI__GEMINI_API_KEY is not set; provider calls will fail");
    }

    let gemini = GeminiConfig::new(config.ai.gemini_api_key.clone().unwrap_or_default())
        .with_model(&config.ai.model)
        .with_base_url(&config.ai.base_url)
        .with_timeout(config.ai.timeout());
    let provider = Arc::new(GeminiProvider::new(gemini));

    let info = provider.provider_info();
    tracing::info!(
        provider = %info.name,
        model = %info.model,
        "text-generation provider configured"
    );

    let limiter = Arc::new(InMemoryRateLimiter::with_defaults());
    let state = AppState::new(provider, limiter, config.server.environment.clone());
    let app = app_router(state, &config.server);

    let addr = config.server.socket_addr();
    tracing::info!(%addr, environment = %config.server.environment, "duologue listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

/// Resolves when SIGINT or SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received, stopping server");
}

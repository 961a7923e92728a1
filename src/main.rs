use std::net::SocketAddr;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use api_shared::allowed_ip_from_env_value;
use triage_core::{config::triage_config_from_lookup, TriageService, DEFAULT_REST_ADDR};

/// Main entry point for the triage service
///
/// Resolves configuration once, then serves the REST API until Ctrl-C.
///
/// # Environment Variables
/// - `TRIAGE_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `TRIAGE_ALLOWED_IP`: single client IP allowed to call the triage endpoints (default: any)
/// - `GEMINI_API_KEY`: upstream API key (required)
/// - `GEMINI_BASE_URL`, `GEMINI_MODEL`, `GEMINI_TIMEOUT_SECS`: upstream overrides
/// - `TRIAGE_FAILURE_POLICY`: `fallback` (default) or `propagate`
/// - `TRIAGE_LABEL_POLICY`: `permissive` (default) or `strict`
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - any configuration value is missing or invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("triage_run=info".parse()?)
                .add_directive("triage_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("TRIAGE_REST_ADDR")
        .unwrap_or_else(|_| DEFAULT_REST_ADDR.into())
        .parse()?;

    let cfg = triage_config_from_lookup(|key| std::env::var(key).ok())?;
    let allowed_ip = allowed_ip_from_env_value(std::env::var("TRIAGE_ALLOWED_IP").ok())
        .map_err(anyhow::Error::msg)?;

    tracing::info!(?cfg, ?allowed_ip, "++ Starting triage REST API on {}", rest_addr);

    let triage = TriageService::from_config(&cfg)?;
    let app = api_rest::router(AppState::new(triage, allowed_ip));

    let listener = tokio::net::TcpListener::bind(rest_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("-- Triage REST API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

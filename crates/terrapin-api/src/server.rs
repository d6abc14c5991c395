//! Router construction and startup.

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::routes;
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/", get(routes::root::info))
        .route("/widgets.json", get(routes::widgets::widgets))
        .route(
            "/debt_payment_schedule",
            get(routes::schedule::debt_payment_schedule),
        )
        .route("/health", get(routes::health::health_check))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the OpenBB front ends.
///
/// Credentials cannot be combined with wildcard methods or headers, so both
/// are mirrored from the request instead.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Run the server.
pub async fn run_server(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.config.host, state.config.port);
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Terrapin API listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET  /");
    tracing::info!("  GET  /widgets.json");
    tracing::info!("  GET  /debt_payment_schedule?payment_type=interest|principal|total");
    tracing::info!("  GET  /health");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Shutdown signal handler.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install CTRL+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down...");
}

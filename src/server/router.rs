//! Server setup and routing.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::http::HeaderValue;
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::DefaultMakeSpan;
use tower_http::trace::DefaultOnRequest;
use tower_http::trace::DefaultOnResponse;
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing::info;
use utoipa::OpenApi as _;
use utoipa_swagger_ui::SwaggerUi;

use super::api::AppState;
use crate::config::Config;
use crate::execution::MemoryStore;
use crate::server::api;

/// Create the application router.
#[bon::builder]
pub fn create_router(state: AppState, cors: Option<CorsLayer>) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    Router::new()
        .merge(
            SwaggerUi::new("/api/v1/swagger-ui")
                .url("/api/v1/openapi.json", api::v1::ApiDoc::openapi()),
        )
        .merge(api::create_router(state))
        .layer(cors.unwrap_or_else(CorsLayer::new))
        .layer(trace)
}

/// Builds the CORS layer for the allowed origins.
fn cors_layer(allowed_origins: &[String]) -> anyhow::Result<CorsLayer> {
    let mut cors = CorsLayer::new();
    for origin in allowed_origins {
        let header = origin
            .parse::<HeaderValue>()
            .with_context(|| format!("invalid CORS origin: `{origin}`"))?;

        cors = cors.allow_origin(header);
    }

    Ok(cors)
}

/// Run the server.
///
/// # Errors
///
/// Returns an error if the server fails to start or bind to the address.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(store, &config.execution);
    let cors = cors_layer(&config.server.allowed_origins)?;

    let app = create_router().state(state).cors(cors).call();

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to `{addr}`"))?;

    info!("server listening on {addr}");
    axum::serve(listener, app).await?;

    Ok(())
}

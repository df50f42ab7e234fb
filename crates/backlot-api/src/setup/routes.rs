//! Route configuration and setup.
//!
//! Admin routes sit behind the bearer-key middleware; health probes and API
//! docs stay public.

use crate::api_doc::ApiDoc;
use crate::auth::{admin_auth_middleware, AdminAuthState};
use crate::handlers;
use crate::setup::health;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use backlot_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Slack on top of the image limit for multipart boundaries and form fields.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AdminAuthState {
        admin_api_key: config.admin_api_key.clone(),
    });

    let admin_routes = Router::new()
        .route("/admin/media", get(handlers::media_index::list_media))
        .route(
            "/admin/media/{id}/edit",
            get(handlers::media_edit::edit_media),
        )
        .route("/admin/media/{id}", post(handlers::media_save::save_media))
        .route(
            "/admin/media/{id}/album-art",
            post(handlers::media_album_art::save_album_art),
        )
        .route(
            "/admin/media/{id}/status",
            post(handlers::media_status::update_status),
        )
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            admin_auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/health/live", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );

    let http_concurrency_limit = std::env::var("HTTP_CONCURRENCY_LIMIT")
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1024)
        .max(1);
    tracing::info!(
        http_concurrency_limit = http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let app = public_routes
        .merge(admin_routes)
        .merge(utoipa_rapidoc::RapiDoc::new("/api-docs/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(
            config.max_image_size_bytes() + MULTIPART_OVERHEAD_BYTES,
        ))
        .layer(DefaultBodyLimit::disable())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();
        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

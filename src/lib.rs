pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::AppConfig;
use crate::services::store::TranscriptionStore;
use crate::services::transcription::TranscriptionService;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::transcriptions::upload_transcriptions,
        api::handlers::transcriptions::list_transcriptions,
        api::handlers::health::health_check,
    ),
    components(
        schemas(
            models::FileOutcome,
            models::TranscriptionRecord,
            models::TranscriptionEntry,
            api::handlers::health::HealthResponse,
        )
    ),
    tags(
        (name = "transcriptions", description = "Audio upload and transcription listing"),
        (name = "system", description = "Health and diagnostics")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub transcriptions: Arc<TranscriptionService>,
    pub store: Arc<TranscriptionStore>,
    pub config: AppConfig,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/api/transcriptions",
            post(api::handlers::transcriptions::upload_transcriptions)
                .get(api::handlers::transcriptions::list_transcriptions),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        // Headroom on top of the per-file limit for multipart framing and
        // multi-file batches
        .layer(axum::extract::DefaultBodyLimit::max(
            state.config.max_file_size + 10 * 1024 * 1024,
        ))
        .with_state(state)
}

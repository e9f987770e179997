use crate::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub store: String,
    pub records: usize,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (store_status, records) = match state.store.count().await {
        Ok(n) => ("available", n),
        Err(_) => ("unavailable", 0),
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        store: store_status.to_string(),
        records,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

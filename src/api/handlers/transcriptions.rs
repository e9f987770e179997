use crate::AppState;
use crate::api::error::AppError;
use crate::models::{FileOutcome, TranscriptionEntry};
use crate::services::transcription::UploadedAudio;
use axum::{
    Json,
    extract::{Multipart, State},
    response::{IntoResponse, Response},
};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/transcriptions",
    request_body(content = Multipart, description = "One or more audio files as multipart form fields"),
    responses(
        (status = 200, description = "Per-file transcription outcomes, in input order", body = Vec<FileOutcome>),
        (status = 400, description = "No audio file provided")
    ),
    tag = "transcriptions"
)]
pub async fn upload_transcriptions(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Vec<FileOutcome>>, AppError> {
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name != "audio" && name != "file" {
            continue;
        }

        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("failed to read upload: {}", e)))?;

        uploads.push(UploadedAudio {
            file_name,
            content_type,
            data,
        });
    }

    if uploads.is_empty() {
        return Err(AppError::BadRequest("No audio file provided".to_string()));
    }

    tracing::info!("📥 Received transcription batch of {} file(s)", uploads.len());
    let outcomes = state.transcriptions.transcribe_batch(uploads).await;
    Ok(Json(outcomes))
}

#[utoipa::path(
    get,
    path = "/api/transcriptions",
    responses(
        (status = 200, description = "All persisted transcriptions, newest first", body = Vec<TranscriptionEntry>)
    ),
    tag = "transcriptions"
)]
pub async fn list_transcriptions(State(state): State<AppState>) -> Response {
    // Never propagates a store failure past this boundary: the front end
    // expects {"transcriptions": null} with a 200 when the store is
    // unreadable.
    match state.store.list_all().await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => {
            tracing::error!("Failed to read transcription store: {:#}", e);
            Json(json!({ "transcriptions": null })).into_response()
        }
    }
}

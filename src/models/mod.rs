use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A completed transcription, persisted as one JSON file in the store
/// directory. Records are append-only: once written they are never mutated
/// or deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptionRecord {
    /// Original name of the uploaded audio file, if one was supplied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    pub transcription: String,

    /// Authoritative creation timestamp (epoch milliseconds). Listing order
    /// is derived from this field, not from the filename on disk.
    #[serde(default)]
    pub created_at_ms: i64,
}

impl TranscriptionRecord {
    pub fn new(file_name: Option<String>, transcription: String) -> Self {
        Self {
            file_name,
            transcription,
            created_at_ms: Utc::now().timestamp_millis(),
        }
    }
}

/// One element of the listing returned by `GET /api/transcriptions`:
/// the stored filename plus the parsed record.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranscriptionEntry {
    pub name: String,
    pub content: TranscriptionRecord,
}

/// Per-file result of a transcription batch. One outcome is returned for
/// every file field in the request, in input order; a failed file never
/// aborts the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FileOutcome {
    #[serde(rename_all = "camelCase")]
    Success {
        file_name: String,
        transcription: String,
    },
    #[serde(rename_all = "camelCase")]
    Failure { file_name: String, error: String },
}

impl FileOutcome {
    pub fn file_name(&self) -> &str {
        match self {
            FileOutcome::Success { file_name, .. } => file_name,
            FileOutcome::Failure { file_name, .. } => file_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Success { .. })
    }
}

use crate::models::{FileOutcome, TranscriptionRecord};
use crate::services::staging::StagingArea;
use crate::services::store::TranscriptionStore;
use crate::services::transcriber::Transcriber;
use crate::utils::validation::{sanitize_filename, validate_file_size, validate_mime_type};
use anyhow::{Result, anyhow};
use bytes::Bytes;
use std::sync::Arc;

/// One uploaded audio file, as extracted from a multipart field. Lives only
/// for the duration of the request that carried it.
pub struct UploadedAudio {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Orchestrates the upload pipeline: validate, stage to disk, call the
/// external transcriber, persist the record, clean up the staged copy.
pub struct TranscriptionService {
    transcriber: Arc<dyn Transcriber>,
    store: Arc<TranscriptionStore>,
    staging: StagingArea,
    max_file_size: usize,
}

impl TranscriptionService {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        store: Arc<TranscriptionStore>,
        staging: StagingArea,
        max_file_size: usize,
    ) -> Self {
        Self {
            transcriber,
            store,
            staging,
            max_file_size,
        }
    }

    /// Processes a batch of uploads concurrently. Returns exactly one
    /// outcome per input, in input order; a failed file never aborts the
    /// rest of the batch.
    pub async fn transcribe_batch(&self, uploads: Vec<UploadedAudio>) -> Vec<FileOutcome> {
        let futures = uploads.into_iter().map(|upload| self.process_one(upload));
        futures::future::join_all(futures).await
    }

    async fn process_one(&self, upload: UploadedAudio) -> FileOutcome {
        let file_name = upload.file_name.clone();
        match self.try_process(upload).await {
            Ok(transcription) => FileOutcome::Success {
                file_name,
                transcription,
            },
            Err(e) => {
                tracing::warn!("Transcription failed for {}: {:#}", file_name, e);
                FileOutcome::Failure {
                    file_name,
                    error: format!("{:#}", e),
                }
            }
        }
    }

    async fn try_process(&self, upload: UploadedAudio) -> Result<String> {
        let content_type = upload
            .content_type
            .as_deref()
            .ok_or_else(|| anyhow!("missing content type"))?;

        // Rejected entries must never reach the external service
        validate_mime_type(content_type)?;
        validate_file_size(upload.data.len(), self.max_file_size)?;
        let safe_name = sanitize_filename(&upload.file_name)?;

        let staged = self.staging.stage(&safe_name, &upload.data).await?;
        let result = self
            .transcribe_and_persist(content_type, &upload.data, &upload.file_name)
            .await;
        // Cleanup runs on every exit path, success or failure
        staged.cleanup().await;

        result
    }

    async fn transcribe_and_persist(
        &self,
        content_type: &str,
        data: &[u8],
        file_name: &str,
    ) -> Result<String> {
        let transcription = self.transcriber.transcribe(content_type, data).await?;

        let record =
            TranscriptionRecord::new(Some(file_name.to_string()), transcription.clone());
        self.store.persist(&record).await?;

        Ok(transcription)
    }
}

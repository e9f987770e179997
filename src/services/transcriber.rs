use crate::config::AppConfig;
use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const TRANSCRIBE_INSTRUCTION: &str =
    "Transcribe the audio in this file and return only the transcription text.";

/// External speech-to-text collaborator. One logical call per file, no
/// retries; a failure is final for that file.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, mime_type: &str, audio: &[u8]) -> Result<String>;
}

/// Transcriber backed by the Gemini `generateContent` REST API. Audio is
/// sent inline as base64 together with a fixed transcription instruction.
pub struct GeminiTranscriber {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiTranscriber {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Result<Self> {
        if api_key.is_empty() {
            bail!("GEMINI_API_KEY is not set; cannot initialize transcriber");
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            config.gemini_api_key.clone(),
            config.gemini_model.clone(),
            Duration::from_secs(config.request_timeout_secs),
        )
    }
}

#[async_trait]
impl Transcriber for GeminiTranscriber {
    async fn transcribe(&self, mime_type: &str, audio: &[u8]) -> Result<String> {
        let url = format!("{}/{}:generateContent", GEMINI_BASE_URL, self.model);

        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": mime_type,
                            "data": BASE64.encode(audio),
                        }
                    },
                    { "text": TRANSCRIBE_INSTRUCTION }
                ]
            }]
        });

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("transcription request failed")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!(
                "transcription service returned {}: {}",
                status,
                detail.chars().take(200).collect::<String>()
            );
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .context("malformed transcription response")?;

        extract_text(parsed)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Pulls the transcription text out of a `generateContent` response. An
/// answer with no text parts counts as a malformed response.
fn extract_text(response: GenerateContentResponse) -> Result<String> {
    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("transcription response contained no candidates"))?;

    let text: String = candidate
        .content
        .map(|c| {
            c.parts
                .into_iter()
                .filter_map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();

    let text = text.trim().to_string();
    if text.is_empty() {
        bail!("transcription response contained no text");
    }
    Ok(text)
}

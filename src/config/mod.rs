use std::env;
use std::path::PathBuf;

/// Runtime configuration for the transcription backend
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Bind host (default: "127.0.0.1")
    pub host: String,

    /// Bind port (default: 3000)
    pub port: u16,

    /// Directory holding persisted transcription records
    pub store_dir: PathBuf,

    /// Directory for temporary staged copies of uploaded audio
    pub staging_dir: PathBuf,

    /// Maximum accepted audio file size in bytes (default: 20 MiB)
    pub max_file_size: usize,

    /// Gemini API key; required to construct the transcriber
    pub gemini_api_key: String,

    /// Gemini model used for transcription (default: "gemini-1.5-pro")
    pub gemini_model: String,

    /// Timeout for one transcription call in seconds (default: 120)
    pub request_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            store_dir: PathBuf::from("data/transcriptions"),
            staging_dir: PathBuf::from("data/staging"),
            max_file_size: 20 * 1024 * 1024, // 20 MiB
            gemini_api_key: String::new(),
            gemini_model: "gemini-1.5-pro".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            host: env::var("HOST").unwrap_or(default.host),

            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            store_dir: env::var("TRANSCRIPTION_STORE_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.store_dir),

            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.staging_dir),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            gemini_api_key: env::var("GEMINI_API_KEY").unwrap_or(default.gemini_api_key),

            gemini_model: env::var("GEMINI_MODEL").unwrap_or(default.gemini_model),

            request_timeout_secs: env::var("TRANSCRIBE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.request_timeout_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_file_size, 20 * 1024 * 1024);
        assert_eq!(config.gemini_model, "gemini-1.5-pro");
        assert_eq!(config.request_timeout_secs, 120);
        assert!(config.gemini_api_key.is_empty());
    }

    #[test]
    fn test_store_dir_default() {
        let config = AppConfig::default();
        assert_eq!(config.store_dir, PathBuf::from("data/transcriptions"));
        assert_eq!(config.staging_dir, PathBuf::from("data/staging"));
    }
}

use anyhow::{Result, anyhow};
use std::path::Path;

/// Allowed MIME types for uploaded audio
pub const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3", // common browser alias for audio/mpeg
    "audio/wav",
    "audio/ogg",
];

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub code: &'static str,
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validates file size: non-empty and within the configured maximum
pub fn validate_file_size(size: usize, max_size: usize) -> Result<()> {
    if size == 0 {
        return Err(anyhow!(ValidationError {
            code: "EMPTY_FILE",
            message: "File appears to be empty".to_string(),
        }));
    }

    if size > max_size {
        return Err(anyhow!(ValidationError {
            code: "FILE_TOO_LARGE",
            message: format!(
                "File size {} bytes exceeds maximum allowed {} bytes ({} MB)",
                size,
                max_size,
                max_size / 1024 / 1024
            ),
        }));
    }
    Ok(())
}

/// Validates the declared MIME type against the audio allowlist
pub fn validate_mime_type(content_type: &str) -> Result<()> {
    let normalized = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase();

    if ALLOWED_AUDIO_TYPES
        .iter()
        .any(|&allowed| allowed == normalized)
    {
        return Ok(());
    }

    Err(anyhow!(ValidationError {
        code: "INVALID_MIME_TYPE",
        message: format!(
            "MIME type '{}' is not allowed. Please upload an audio file.",
            content_type
        ),
    }))
}

/// Sanitizes a client-supplied filename so it is safe to embed in a path
/// on the staging disk. Strips any directory components, replaces reserved
/// characters, and clamps the length.
pub fn sanitize_filename(filename: &str) -> Result<String> {
    // Get only the filename component (remove any path)
    let name = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.is_empty() {
        return Err(anyhow!(ValidationError {
            code: "INVALID_FILENAME",
            message: "Filename cannot be empty".to_string(),
        }));
    }

    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        tracing::warn!("Path traversal attempt detected: {}", filename);
    }

    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c == '/'
                || c == '\\'
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    // Limit length safely for UTF-8
    let sanitized = if sanitized.len() > 255 {
        let mut end = 255;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized
    };

    Ok(sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_audio_types() {
        assert!(validate_mime_type("audio/mpeg").is_ok());
        assert!(validate_mime_type("audio/wav").is_ok());
        assert!(validate_mime_type("audio/ogg").is_ok());
        assert!(validate_mime_type("audio/mp3").is_ok());
    }

    #[test]
    fn test_mime_type_normalization() {
        assert!(validate_mime_type("AUDIO/WAV").is_ok());
        assert!(validate_mime_type("audio/ogg; codecs=opus").is_ok());
        assert!(validate_mime_type("  audio/mpeg  ").is_ok());
    }

    #[test]
    fn test_rejected_mime_types() {
        assert!(validate_mime_type("text/plain").is_err());
        assert!(validate_mime_type("video/mp4").is_err());
        assert!(validate_mime_type("application/pdf").is_err());
        assert!(validate_mime_type("").is_err());
    }

    #[test]
    fn test_file_size_limits() {
        assert!(validate_file_size(1, 1024).is_ok());
        assert!(validate_file_size(1024, 1024).is_ok());
        assert!(validate_file_size(1025, 1024).is_err());
        assert!(validate_file_size(0, 1024).is_err());
    }

    #[test]
    fn test_sanitize_strips_path_components() {
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
        assert_eq!(sanitize_filename("dir/interview.wav").unwrap(), "interview.wav");
        assert_eq!(sanitize_filename("podcast.mp3").unwrap(), "podcast.mp3");
    }

    #[test]
    fn test_sanitize_replaces_reserved_characters() {
        assert_eq!(sanitize_filename("a:b*c?.wav").unwrap(), "a_b_c_.wav");
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(sanitize_filename("").is_err());
        assert!(sanitize_filename("/").is_err());
    }
}

use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Holds temporary on-disk copies of uploaded audio while the external
/// transcription call is in flight.
pub struct StagingArea {
    dir: PathBuf,
}

impl StagingArea {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create staging directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Writes the uploaded bytes to `upload_<epoch-ms>_<filename>` and
    /// returns a handle that must be cleaned up once the request resolves.
    pub async fn stage(&self, file_name: &str, data: &[u8]) -> Result<StagedFile> {
        let name = format!("upload_{}_{}", Utc::now().timestamp_millis(), file_name);
        let path = self.dir.join(name);

        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("failed to stage upload to {}", path.display()))?;

        Ok(StagedFile {
            path,
            cleaned: false,
        })
    }
}

/// A staged upload. `cleanup` must run on every exit path of the request;
/// the Drop impl is a best-effort backstop for panics.
pub struct StagedFile {
    path: PathBuf,
    cleaned: bool,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the staged file. Deletion failures cannot be recovered from
    /// mid-request, so they are logged and swallowed.
    pub async fn cleanup(mut self) {
        self.cleaned = true;
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            tracing::warn!(
                "Failed to delete staged file {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.cleaned {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

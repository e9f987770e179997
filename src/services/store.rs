use crate::models::{TranscriptionEntry, TranscriptionRecord};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Directory-backed persistence for transcription records. One JSON file per
/// record, named `transcription_<epoch-ms>_<uuid>.json`; the uuid suffix
/// keeps concurrent writers from colliding. Listing order comes from the
/// `created_at_ms` field inside each record, not from the filename.
pub struct TranscriptionStore {
    dir: PathBuf,
}

const RECORD_PREFIX: &str = "transcription_";
const RECORD_SUFFIX: &str = ".json";

impl TranscriptionStore {
    /// Opens the store, creating the directory if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create store directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes a record to the store and returns the stored filename.
    pub async fn persist(&self, record: &TranscriptionRecord) -> Result<String> {
        let name = format!(
            "{}{}_{}{}",
            RECORD_PREFIX,
            record.created_at_ms,
            Uuid::new_v4(),
            RECORD_SUFFIX
        );
        let path = self.dir.join(&name);

        let data = serde_json::to_vec(record).context("failed to serialize record")?;
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("failed to write record {}", path.display()))?;

        tracing::debug!("Persisted transcription record {}", name);
        Ok(name)
    }

    /// Returns all persisted records, newest first. A record that cannot be
    /// read or parsed is skipped with a warning rather than failing the
    /// whole listing.
    pub async fn list_all(&self) -> Result<Vec<TranscriptionEntry>> {
        let mut dir = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to read store directory {}", self.dir.display()))?;

        let mut entries = Vec::new();
        while let Some(item) = dir.next_entry().await? {
            let name = item.file_name().to_string_lossy().to_string();
            if !name.starts_with(RECORD_PREFIX) || !name.ends_with(RECORD_SUFFIX) {
                continue;
            }

            let data = match tokio::fs::read(item.path()).await {
                Ok(data) => data,
                Err(e) => {
                    tracing::warn!("Skipping unreadable record {}: {}", name, e);
                    continue;
                }
            };

            match serde_json::from_slice::<TranscriptionRecord>(&data) {
                Ok(content) => entries.push(TranscriptionEntry { name, content }),
                Err(e) => {
                    tracing::warn!("Skipping malformed record {}: {}", name, e);
                }
            }
        }

        // Newest first; tie-break on name so the order is deterministic
        entries.sort_by(|a, b| {
            b.content
                .created_at_ms
                .cmp(&a.content.created_at_ms)
                .then_with(|| b.name.cmp(&a.name))
        });

        Ok(entries)
    }

    /// Number of record files currently in the store.
    pub async fn count(&self) -> Result<usize> {
        let mut dir = tokio::fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("failed to read store directory {}", self.dir.display()))?;

        let mut count = 0;
        while let Some(item) = dir.next_entry().await? {
            let name = item.file_name().to_string_lossy().to_string();
            if name.starts_with(RECORD_PREFIX) && name.ends_with(RECORD_SUFFIX) {
                count += 1;
            }
        }
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(file_name: &str, text: &str, created_at_ms: i64) -> TranscriptionRecord {
        TranscriptionRecord {
            file_name: Some(file_name.to_string()),
            transcription: text.to_string(),
            created_at_ms,
        }
    }

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptionStore::new(dir.path()).unwrap();
        assert!(store.list_all().await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_listing_is_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptionStore::new(dir.path()).unwrap();

        store.persist(&record("a.wav", "first", 1000)).await.unwrap();
        store.persist(&record("b.wav", "second", 2000)).await.unwrap();
        store.persist(&record("c.wav", "third", 3000)).await.unwrap();

        let entries = store.list_all().await.unwrap();
        let texts: Vec<&str> = entries
            .iter()
            .map(|e| e.content.transcription.as_str())
            .collect();
        assert_eq!(texts, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_roundtrip_preserves_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptionStore::new(dir.path()).unwrap();

        store
            .persist(&record("voice.ogg", "héllo wörld 🎙️", 42))
            .await
            .unwrap();

        let entries = store.list_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content.transcription, "héllo wörld 🎙️");
        assert_eq!(entries[0].content.file_name.as_deref(), Some("voice.ogg"));
    }

    #[tokio::test]
    async fn test_malformed_record_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptionStore::new(dir.path()).unwrap();

        store.persist(&record("good.wav", "intact", 500)).await.unwrap();
        tokio::fs::write(dir.path().join("transcription_999_broken.json"), b"{not json")
            .await
            .unwrap();

        let entries = store.list_all().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].content.transcription, "intact");
    }

    #[tokio::test]
    async fn test_non_record_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let store = TranscriptionStore::new(dir.path()).unwrap();

        tokio::fs::write(dir.path().join("notes.txt"), b"unrelated")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("other.json"), b"{}")
            .await
            .unwrap();

        assert!(store.list_all().await.unwrap().is_empty());
    }
}

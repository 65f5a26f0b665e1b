use crate::domain::tts::StoredFormat;
use crate::error::{TtsError, TtsResult};
use crate::infrastructure::config::StorageConfig;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reference to a persisted conversion result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAudio {
    pub path: PathBuf,
    pub bytes_written: usize,
    pub format: StoredFormat,
}

/// Persists conversion payloads
#[async_trait]
pub trait AudioStorage: Send + Sync {
    /// Store `bytes` as `{name}.{ext}` with `ext` taken from `format`, overwriting any previous file
    async fn store(&self, name: &str, format: StoredFormat, bytes: &[u8])
        -> TtsResult<StoredAudio>;
}

/// Local filesystem storage rooted at `{root}/{directory}`
pub struct DiskAudioStorage {
    directory: PathBuf,
}

impl DiskAudioStorage {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.root.join(&config.directory))
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }
}

#[async_trait]
impl AudioStorage for DiskAudioStorage {
    async fn store(
        &self,
        name: &str,
        format: StoredFormat,
        bytes: &[u8],
    ) -> TtsResult<StoredAudio> {
        tokio::fs::create_dir_all(&self.directory).await.map_err(|e| {
            tracing::error!(
                error = %e,
                directory = %self.directory.display(),
                "Failed to create storage directory"
            );
            TtsError::Storage(format!(
                "Failed to create {}: {}",
                self.directory.display(),
                e
            ))
        })?;

        let path = self.directory.join(format!("{}.{}", name, format.extension()));
        tokio::fs::write(&path, bytes).await.map_err(|e| {
            tracing::error!(error = %e, path = %path.display(), "Failed to write audio file");
            TtsError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })?;

        tracing::debug!(
            path = %path.display(),
            bytes_written = bytes.len(),
            format = %format,
            "Audio file stored"
        );

        Ok(StoredAudio {
            path,
            bytes_written: bytes.len(),
            format,
        })
    }
}

use super::{Storage, StorageError};
use crate::migration::MigrationReport;
use crate::utils::now_iso;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

/// Current on-disk schema version.
pub const SCHEMA_VERSION: u32 = 1;

/// The document written by [`FileStorage`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredReports {
    /// Schema version for future format changes
    pub schema_version: u32,

    /// When the record set was last written
    pub updated_at: String,

    /// Reports in the order they were stored
    pub reports: Vec<MigrationReport>,
}

impl StoredReports {
    pub fn new(reports: Vec<MigrationReport>) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            updated_at: now_iso(),
            reports,
        }
    }
}

/// Stores migration reports in a single JSON file.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_unlocked(&self) -> Result<Vec<MigrationReport>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let stored: StoredReports = serde_json::from_str(&content)?;
        if stored.schema_version != SCHEMA_VERSION {
            return Err(StorageError::UnsupportedSchema(stored.schema_version));
        }

        Ok(stored.reports)
    }

    /// Write atomically using temp file + rename
    async fn write_unlocked(&self, reports: &[MigrationReport]) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&StoredReports::new(reports.to_vec()))?;
        fs::write(&temp_path, &content).await?;
        fs::rename(&temp_path, &self.path).await?;

        debug!(path = %self.path.display(), count = reports.len(), "Stored migration reports");
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn get_all(&self) -> Result<Vec<MigrationReport>, StorageError> {
        let _guard = self.lock.lock().await;
        self.read_unlocked().await
    }

    async fn store(&self, reports: &[MigrationReport]) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        self.write_unlocked(reports).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _guard = self.lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "Cleared migration reports");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

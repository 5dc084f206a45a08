use super::{Storage, StorageError};
use crate::migration::MigrationReport;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Keeps reports in memory only.
///
/// Not durable across restarts. Useful in tests, or for applications that
/// persist the record set through their own channel.
#[derive(Default)]
pub struct MemoryStorage {
    reports: Mutex<Vec<MigrationReport>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing record set.
    pub fn with_reports(reports: Vec<MigrationReport>) -> Self {
        Self {
            reports: Mutex::new(reports),
        }
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_all(&self) -> Result<Vec<MigrationReport>, StorageError> {
        Ok(self.reports.lock().await.clone())
    }

    async fn store(&self, reports: &[MigrationReport]) -> Result<(), StorageError> {
        *self.reports.lock().await = reports.to_vec();
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.reports.lock().await.clear();
        Ok(())
    }
}

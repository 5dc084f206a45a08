mod file;
mod forget;
mod memory;

pub use file::{FileStorage, StoredReports, SCHEMA_VERSION};
pub use forget::{forget_reports, ForgetSummary};
pub use memory::MemoryStorage;

use crate::migration::MigrationReport;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unsupported storage schema version: {0}")]
    UnsupportedSchema(u32),
}

/// Durable record of which migrations have been attempted.
///
/// Implementations must survive process restarts and keep reports in the
/// order they were stored. There is no compare-and-swap: callers sharing one
/// backing store across processes need their own mutual exclusion.
#[async_trait]
pub trait Storage: Send + Sync {
    /// The full record set. Empty (not an error) when nothing was stored yet.
    async fn get_all(&self) -> Result<Vec<MigrationReport>, StorageError>;

    /// Replace the entire record set with `reports`.
    async fn store(&self, reports: &[MigrationReport]) -> Result<(), StorageError>;

    /// Remove every stored report.
    async fn clear(&self) -> Result<(), StorageError>;
}

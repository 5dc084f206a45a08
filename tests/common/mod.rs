#![allow(dead_code)]

use async_trait::async_trait;
use journey::{Migration, MigrationError, MigrationResult};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Create a temporary directory for testing
pub fn create_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Path of the reports file inside a test directory
pub fn reports_path(dir: &Path) -> PathBuf {
    dir.join(".journey").join("reports.json")
}

/// Shared, ordered log of every call made on counting migrations.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// A migration that counts its invocations and can be told to fail.
pub struct CountingMigration {
    id: String,
    fail: bool,
    migrate_calls: AtomicUsize,
    rollback_calls: AtomicUsize,
    log: CallLog,
}

impl CountingMigration {
    pub fn new(id: &str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            fail: false,
            migrate_calls: AtomicUsize::new(0),
            rollback_calls: AtomicUsize::new(0),
            log: Arc::clone(log),
        })
    }

    pub fn failing(id: &str, log: &CallLog) -> Arc<Self> {
        Arc::new(Self {
            id: id.to_string(),
            fail: true,
            migrate_calls: AtomicUsize::new(0),
            rollback_calls: AtomicUsize::new(0),
            log: Arc::clone(log),
        })
    }

    pub fn migrate_calls(&self) -> usize {
        self.migrate_calls.load(Ordering::SeqCst)
    }

    pub fn rollback_calls(&self) -> usize {
        self.rollback_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Migration for CountingMigration {
    fn id(&self) -> &str {
        &self.id
    }

    async fn migrate(&self) -> Result<MigrationResult, MigrationError> {
        self.migrate_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("migrate:{}", self.id));
        if self.fail {
            return Err(anyhow::anyhow!("{} could not run", self.id).into());
        }
        Ok(MigrationResult::with_value(format!("{} done", self.id)))
    }

    async fn rollback(&self) -> Result<(), MigrationError> {
        self.rollback_calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(format!("rollback:{}", self.id));
        Ok(())
    }
}

//! The journey: runs pending migrations and keeps the record set in step.

use super::catalogue::{CatalogueError, MigrationCatalogue};
use super::types::{Migration, MigrationError, MigrationReport};
use crate::config::{default_storage_path, ConfigError};
use crate::storage::{forget_reports, FileStorage, Storage, StorageError};
use futures::FutureExt;
use std::any::Any;
use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Error types for journey operations.
///
/// A migration failing inside `migrate()` is not an error: it is recorded
/// as a failed [`MigrationReport`].
#[derive(Error, Debug)]
pub enum JourneyError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Rollback failed for migration {id}: {source}")]
    RollbackFailed {
        id: String,
        #[source]
        source: MigrationError,
    },

    #[error("Catalogue error: {0}")]
    Catalogue(#[from] CatalogueError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Runs each migration of a catalogue at most once.
///
/// Every operation reads the whole record set, works on it, and writes it
/// back. Two journeys sharing one backing store at the same time will lose
/// each other's writes; callers must serialise access themselves.
pub struct Journey {
    catalogue: MigrationCatalogue,
    storage: Arc<dyn Storage>,
}

impl Journey {
    /// Create a journey over `migrations` (in the order they were introduced).
    pub fn new(
        migrations: Vec<Arc<dyn Migration>>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, JourneyError> {
        Ok(Self {
            catalogue: MigrationCatalogue::new(migrations)?,
            storage,
        })
    }

    /// Create a journey backed by a [`FileStorage`] at the default location.
    pub fn with_default_storage(
        migrations: Vec<Arc<dyn Migration>>,
    ) -> Result<Self, JourneyError> {
        let path = default_storage_path()?;
        Self::new(migrations, Arc::new(FileStorage::new(path)))
    }

    /// Ids of the catalogue, in execution order.
    pub fn migrations(&self) -> Vec<String> {
        self.catalogue.ids()
    }

    /// Run every migration that has no stored report yet.
    ///
    /// Returns the reports produced by this call only. A failing migration
    /// (an error or a panic) yields a failed report and does not stop the
    /// ones after it; it will not be retried until its record is removed by
    /// `rollback()` or `reset()`.
    pub async fn migrate(&self) -> Result<Vec<MigrationReport>, JourneyError> {
        let previous = self.storage.get_all().await?;
        let previous_ids: HashSet<&str> = previous.iter().map(|r| r.migration_id()).collect();
        let pending = self.catalogue.pending(&previous_ids);

        info!(
            pending = pending.len(),
            recorded = previous.len(),
            "Starting migrations"
        );

        let mut reports = Vec::with_capacity(pending.len());
        for migration in &pending {
            let id = migration.id();
            info!(id = %id, "Applying migration");

            let report = match AssertUnwindSafe(migration.migrate()).catch_unwind().await {
                Ok(Ok(result)) => MigrationReport::success(id, result),
                Ok(Err(e)) => {
                    error!(id = %id, error = %e, "Migration failed");
                    MigrationReport::failure(id, e.to_string())
                }
                Err(payload) => {
                    let message = panic_message(payload.as_ref());
                    error!(id = %id, error = %message, "Migration panicked");
                    MigrationReport::failure(id, format!("Migration panicked: {message}"))
                }
            };
            reports.push(report);
        }

        let mut all = previous;
        all.extend(reports.iter().cloned());
        self.storage.store(&all).await?;

        let failed = reports.iter().filter(|r| !r.succeeded()).count();
        info!(
            applied = reports.len() - failed,
            failed,
            "Migrations completed"
        );

        Ok(reports)
    }

    /// Roll back every migration in the catalogue and forget it ran.
    ///
    /// `rollback()` is called on each migration in catalogue order, whether or
    /// not it ever ran. If one fails the sweep stops there: the migrations
    /// already rolled back are still removed from storage, and the failure is
    /// returned.
    pub async fn rollback(&self) -> Result<(), JourneyError> {
        let mut rolled_back = Vec::with_capacity(self.catalogue.len());
        let mut failure = None;

        for migration in self.catalogue.iter() {
            let id = migration.id();
            info!(id = %id, "Rolling back migration");

            if let Err(e) = migration.rollback().await {
                error!(id = %id, error = %e, "Rollback failed");
                failure = Some(JourneyError::RollbackFailed {
                    id: id.to_string(),
                    source: e,
                });
                break;
            }
            rolled_back.push(id.to_string());
        }

        let persisted = forget_reports(self.storage.as_ref(), &rolled_back).await;

        match failure {
            Some(rollback_err) => {
                if let Err(storage_err) = persisted {
                    error!(
                        error = %storage_err,
                        "Failed to persist partial rollback"
                    );
                }
                Err(rollback_err)
            }
            None => {
                persisted?;
                info!(count = rolled_back.len(), "Rollback completed");
                Ok(())
            }
        }
    }

    /// Forget every migration ran, without rolling any of them back.
    pub async fn reset(&self) -> Result<(), JourneyError> {
        warn!("Resetting migration records without rollback");
        self.storage.clear().await?;
        Ok(())
    }

    /// Ids the next `migrate()` call would run, in catalogue order.
    pub async fn pending(&self) -> Result<Vec<String>, JourneyError> {
        let previous = self.storage.get_all().await?;
        let previous_ids: HashSet<&str> = previous.iter().map(|r| r.migration_id()).collect();

        Ok(self
            .catalogue
            .pending(&previous_ids)
            .iter()
            .map(|m| m.id().to_string())
            .collect())
    }

    /// Every stored report.
    pub async fn history(&self) -> Result<Vec<MigrationReport>, JourneyError> {
        Ok(self.storage.get_all().await?)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

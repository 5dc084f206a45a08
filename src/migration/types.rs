//! Types for the migration system.

use crate::utils::now_iso;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error types returned by migration bodies.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Trait for a single one-time migration.
///
/// The `id` must be stable and unique across the application's lifetime.
/// Once a migration has shipped, its id must never be reused for a
/// different operation: the id is the only thing recorded in storage.
#[async_trait]
pub trait Migration: Send + Sync {
    /// Stable identity of this migration.
    fn id(&self) -> &str;

    /// Perform the one-time work.
    async fn migrate(&self) -> Result<MigrationResult, MigrationError>;

    /// Revert the work. Does nothing unless overridden.
    async fn rollback(&self) -> Result<(), MigrationError> {
        Ok(())
    }
}

/// Opaque success payload returned by a migration body.
///
/// JSON `null` is the empty payload, so `with_value(Value::Null)` and
/// `empty()` are the same result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MigrationResult(serde_json::Value);

impl MigrationResult {
    /// A result carrying no value.
    pub fn empty() -> Self {
        Self(serde_json::Value::Null)
    }

    /// A result carrying a free-form value.
    pub fn with_value(value: impl Into<serde_json::Value>) -> Self {
        Self(value.into())
    }

    /// The carried value. `None` for an empty result.
    pub fn value(&self) -> Option<&serde_json::Value> {
        if self.0.is_null() {
            None
        } else {
            Some(&self.0)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }
}

/// Success or failure of one attempt. Holding exactly one variant keeps
/// `result` and `errorMessage` mutually exclusive, also when read back from disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
enum Outcome {
    #[serde(rename_all = "camelCase")]
    Succeeded {
        #[serde(default)]
        result: MigrationResult,
    },
    #[serde(rename_all = "camelCase")]
    Failed { error_message: String },
}

/// Outcome of one execution attempt for one migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MigrationReport {
    migration_id: String,
    #[serde(flatten)]
    outcome: Outcome,
    executed_at: String,
}

impl MigrationReport {
    /// Report a successful attempt.
    pub fn success(migration_id: impl Into<String>, result: MigrationResult) -> Self {
        Self {
            migration_id: migration_id.into(),
            outcome: Outcome::Succeeded { result },
            executed_at: now_iso(),
        }
    }

    /// Report a failed attempt.
    pub fn failure(migration_id: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            migration_id: migration_id.into(),
            outcome: Outcome::Failed {
                error_message: error_message.into(),
            },
            executed_at: now_iso(),
        }
    }

    pub fn migration_id(&self) -> &str {
        &self.migration_id
    }

    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Succeeded { .. })
    }

    /// The payload returned by the migration. `None` for failed attempts.
    pub fn result(&self) -> Option<&MigrationResult> {
        match &self.outcome {
            Outcome::Succeeded { result } => Some(result),
            Outcome::Failed { .. } => None,
        }
    }

    /// Description of the failure. `None` for successful attempts.
    pub fn error_message(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Succeeded { .. } => None,
            Outcome::Failed { error_message } => Some(error_message),
        }
    }

    /// When the attempt was made (RFC 3339).
    pub fn executed_at(&self) -> &str {
        &self.executed_at
    }
}

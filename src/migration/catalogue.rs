//! Ordered catalogue of every migration the application has defined.

use super::types::Migration;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CatalogueError {
    #[error("Migration id {0} is used more than once")]
    DuplicateMigrationId(String),
}

/// The full historical list of migrations, in the order they were introduced.
///
/// Unlike a version-keyed registry, the catalogue never reorders its
/// entries: execution order is exactly the order supplied by the caller.
pub struct MigrationCatalogue {
    migrations: Vec<Arc<dyn Migration>>,
}

impl MigrationCatalogue {
    /// Build a catalogue, rejecting duplicate ids.
    pub fn new(migrations: Vec<Arc<dyn Migration>>) -> Result<Self, CatalogueError> {
        let mut seen = HashSet::new();
        for migration in &migrations {
            if !seen.insert(migration.id()) {
                return Err(CatalogueError::DuplicateMigrationId(
                    migration.id().to_string(),
                ));
            }
        }

        Ok(Self { migrations })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Migration>> {
        self.migrations.iter()
    }

    /// Ids of all migrations, in catalogue order.
    pub fn ids(&self) -> Vec<String> {
        self.migrations.iter().map(|m| m.id().to_string()).collect()
    }

    /// Migrations whose id is not in `recorded`, in catalogue order.
    pub fn pending(&self, recorded: &HashSet<&str>) -> Vec<Arc<dyn Migration>> {
        self.migrations
            .iter()
            .filter(|m| !recorded.contains(m.id()))
            .map(Arc::clone)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }
}

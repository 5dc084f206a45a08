//! One-time migrations.
//!
//! Each migration runs at most once per application instance. Which ones
//! already ran is remembered through a [`Storage`](crate::storage::Storage).
//!
//! # Overview
//!
//! - Migrations implement the `Migration` trait with `migrate()` and an
//!   optional `rollback()`
//! - The `Journey` holds the ordered catalogue and a storage backend
//! - `Journey::migrate()` runs only migrations without a stored report and
//!   records a `MigrationReport` for each attempt, successful or not
//! - `Journey::rollback()` undoes every migration and forgets it ran
//! - `Journey::reset()` forgets everything without undoing anything
//!
//! # Usage
//!
//! ```ignore
//! let journey = Journey::new(vec![Arc::new(SeedDefaults)], Arc::new(FileStorage::new(path)))?;
//! for report in journey.migrate().await? {
//!     if !report.succeeded() {
//!         eprintln!("{} failed: {:?}", report.migration_id(), report.error_message());
//!     }
//! }
//! ```

mod catalogue;
mod journey;
mod types;

pub use catalogue::{CatalogueError, MigrationCatalogue};
pub use journey::{Journey, JourneyError};
pub use types::{Migration, MigrationError, MigrationReport, MigrationResult};

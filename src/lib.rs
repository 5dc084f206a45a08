pub mod config;
pub mod migration;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use config::{default_storage_path, ConfigError};
pub use migration::{
    Journey, JourneyError, Migration, MigrationCatalogue, MigrationError, MigrationReport,
    MigrationResult,
};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};

use std::path::PathBuf;
use thiserror::Error;

/// Environment variable overriding the default storage location.
pub const STORAGE_PATH_ENV: &str = "JOURNEY_STORAGE_PATH";

/// Name of the per-user journey folder
pub const JOURNEY_FOLDER: &str = ".journey";

/// Name of the default reports file inside the journey folder
pub const REPORTS_FILE: &str = "reports.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine home directory")]
    HomeDirNotFound,
}

/// Get the path to the per-user journey directory (~/.journey)
pub fn get_journey_dir() -> Result<PathBuf, ConfigError> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| ConfigError::HomeDirNotFound)?;

    Ok(PathBuf::from(home).join(JOURNEY_FOLDER))
}

/// Resolve where the file-backed storage lives.
///
/// `JOURNEY_STORAGE_PATH` wins when set and non-empty, otherwise
/// `~/.journey/reports.json`.
pub fn default_storage_path() -> Result<PathBuf, ConfigError> {
    match std::env::var(STORAGE_PATH_ENV) {
        Ok(path) if !path.trim().is_empty() => Ok(PathBuf::from(path)),
        _ => Ok(get_journey_dir()?.join(REPORTS_FILE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journey_dir_is_hidden_folder_under_home() {
        let Ok(home) = std::env::var("HOME").or_else(|_| std::env::var("USERPROFILE")) else {
            return;
        };

        let dir = get_journey_dir().unwrap();
        assert_eq!(dir, PathBuf::from(home).join(".journey"));
    }

    #[test]
    fn test_default_storage_path_is_reports_file_in_journey_dir() {
        match std::env::var(STORAGE_PATH_ENV) {
            Ok(custom) if !custom.trim().is_empty() => {
                assert_eq!(default_storage_path().unwrap(), PathBuf::from(custom));
            }
            _ => {
                if let Ok(dir) = get_journey_dir() {
                    assert_eq!(default_storage_path().unwrap(), dir.join("reports.json"));
                }
            }
        }
    }
}

//! Startup validation of log destination and weight table.
//!
//! Everything here runs before the first subject is evaluated; any
//! failure is a [`ConfigError`] and aborts the run.

use std::fs::{File, OpenOptions};
use std::path::Path;

use modelscore_core::{ConfigError, WeightTable};

/// Open an existing log file for appending.
pub fn open_log_file(path: &Path) -> Result<File, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::LogFile {
            path: path.to_path_buf(),
            reason: "file does not exist".to_string(),
        });
    }
    OpenOptions::new()
        .append(true)
        .open(path)
        .map_err(|e| ConfigError::LogFile {
            path: path.to_path_buf(),
            reason: format!("not writable: {e}"),
        })
}

/// The weight table from `path`, or the standard weights.
pub fn load_weights(path: Option<&Path>) -> Result<WeightTable, ConfigError> {
    match path {
        Some(path) => WeightTable::from_json_file(path),
        None => Ok(WeightTable::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.log");
        assert!(matches!(
            open_log_file(&missing),
            Err(ConfigError::LogFile { .. })
        ));
        assert!(open_log_file(dir.path()).is_err());

        let present = dir.path().join("run.log");
        std::fs::write(&present, "").unwrap();
        open_log_file(&present).unwrap();
    }

    #[test]
    fn default_weights_without_a_file() {
        assert_eq!(load_weights(None).unwrap(), WeightTable::default());
    }
}

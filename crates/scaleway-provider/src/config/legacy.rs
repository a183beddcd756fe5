//! Legacy `~/.scwrc` configuration file (read only)
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const LEGACY_CONFIG_FILE: &str = ".scwrc";

/// Content of the legacy configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyConfigFile {
    #[serde(default)]
    pub organization: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Error)]
pub enum LegacyConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// `~/.scwrc`, if a home directory is known
pub fn legacy_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(LEGACY_CONFIG_FILE))
}

/// Parse the legacy configuration file
///
/// ## Errors
/// - `LegacyConfigError::Io` - file cannot be opened
/// - `LegacyConfigError::Json` - file is not a JSON object of the expected shape
pub fn read_legacy_config(path: &Path) -> Result<LegacyConfigFile, LegacyConfigError> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_legacy_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"organization": "org", "token": "tok", "version": "1.20"}}"#
        )
        .unwrap();

        let config = read_legacy_config(file.path()).unwrap();
        assert_eq!(config.organization, "org");
        assert_eq!(config.token, "tok");
        assert_eq!(config.version, "1.20");
    }

    #[test]
    fn test_read_legacy_config_missing_fields() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"token": "tok"}}"#).unwrap();

        let config = read_legacy_config(file.path()).unwrap();
        assert_eq!(config.token, "tok");
        assert!(config.organization.is_empty());
    }

    #[test]
    fn test_read_legacy_config_malformed() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "organization = org").unwrap();

        let err = read_legacy_config(file.path()).unwrap_err();
        assert!(matches!(err, LegacyConfigError::Json(_)));
    }

    #[test]
    fn test_read_legacy_config_missing_file() {
        let err = read_legacy_config(Path::new("/path/that/does/not/exist/.scwrc")).unwrap_err();
        assert!(matches!(err, LegacyConfigError::Io(_)));
    }

    #[test]
    fn test_legacy_config_path_file_name() {
        if let Some(path) = legacy_config_path() {
            assert!(path.ends_with(LEGACY_CONFIG_FILE));
        }
    }
}

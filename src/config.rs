/// Configuration loading
///
/// The only settings are the locations of the two helper executables:
///
/// ```json
/// { "paths": { "file": "/usr/bin/file", "olevba": "/usr/local/bin/olevba" } }
/// ```

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

/// File looked up next to the executable when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "document_config.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Paths of the external helpers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPaths {
    /// MIME detector, invoked as `file --brief --mime <path>`
    pub file: PathBuf,
    /// Macro analyzer, invoked as `olevba -a <path>`
    pub olevba: PathBuf,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            file: PathBuf::from("file"),
            olevba: PathBuf::from("olevba"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub paths: ToolPaths,
}

impl Config {
    /// Parse a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Resolve the configuration for this run.
    ///
    /// An explicit path must exist and parse. Otherwise `document_config.json`
    /// beside the executable is used when present, falling back to defaults.
    pub fn locate(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match default_config_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => {
                debug!("No configuration file found, using tools from PATH");
                Ok(Self::default())
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    Some(exe.parent()?.join(DEFAULT_CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_paths() {
        let config = Config::from_json(
            r#"{"paths": {"file": "/usr/bin/file", "olevba": "/opt/oletools/olevba"}}"#,
        )
        .unwrap();

        assert_eq!(config.paths.file, PathBuf::from("/usr/bin/file"));
        assert_eq!(config.paths.olevba, PathBuf::from("/opt/oletools/olevba"));
    }

    #[test]
    fn test_missing_tool_key_is_rejected() {
        assert!(Config::from_json(r#"{"paths": {"file": "file"}}"#).is_err());
        assert!(Config::from_json(r#"{}"#).is_err());
    }

    #[test]
    fn test_load_reports_path_on_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");

        let err = Config::locate(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_explicit_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");
        fs::write(&path, r#"{"paths": {"file": "myfile", "olevba": "myolevba"}}"#).unwrap();

        let config = Config::locate(Some(&path)).unwrap();
        assert_eq!(config.paths.file, PathBuf::from("myfile"));
        assert_eq!(config.paths.olevba, PathBuf::from("myolevba"));
    }

    #[test]
    fn test_defaults_use_path_lookup() {
        let config = Config::default();
        assert_eq!(config.paths.file, PathBuf::from("file"));
        assert_eq!(config.paths.olevba, PathBuf::from("olevba"));
    }
}

//! JSON configuration.
//!
//! A configuration names the symbol repositories to read, where documents
//! go, and any extra footprint aliases. It is read from the file given with
//! `--config`, or from `config.json` in the per-user directory
//! (`~/.pinout-docs/` on Linux and macOS, `%USERPROFILE%\.pinout-docs\` on
//! Windows). `config/example-config.json` shows every field.

mod settings;

pub use settings::{Config, LoggingConfig, OutputConfig, PackagesConfig, RepositoryConfig};

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "config.json";

/// Returns the per-user configuration directory, `~/.pinout-docs`.
#[must_use]
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pinout-docs"))
}

/// Returns the per-user configuration file path.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    default_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Reads, parses and validates a configuration file.
///
/// With `path` set to `None` the per-user file is read.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`] if there is no such file, and a read,
/// parse or validation error otherwise. Validation covers repository names,
/// the output extension, the log level and package aliases.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path
        .map(Path::to_path_buf)
        .or_else(default_config_path)
        .ok_or_else(|| ConfigError::NotFound {
            path: PathBuf::from(CONFIG_FILE_NAME),
        })?;

    let config = read_config_file(&path)?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_config`], but a missing per-user file yields the default
/// configuration. An explicitly given path must still exist.
///
/// # Errors
///
/// Returns an error for the same reasons as [`load_config`], except a missing
/// per-user file.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config, ConfigError> {
    match load_config(path) {
        Err(ConfigError::NotFound { .. }) if path.is_none() => Ok(Config::default()),
        other => other,
    }
}

fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    if !path.is_file() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&contents).map_err(|source| ConfigError::ParseError {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "repositories": [ { "name": "Local", "path": "symbols" } ] }"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.repositories[0].name, "Local");
        assert_eq!(config.output.extension, "md");
    }

    #[test]
    fn load_reports_missing_and_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.json");
        assert!(matches!(
            load_config(Some(&missing)),
            Err(ConfigError::NotFound { .. })
        ));

        assert!(matches!(
            load_config_or_default(Some(&missing)),
            Err(ConfigError::NotFound { .. })
        ));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ \"repositories\": ").unwrap();
        assert!(matches!(
            load_config(Some(&broken)),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn default_path_is_in_config_dir() {
        let path = default_config_path().unwrap();
        assert_eq!(path.parent(), default_config_dir().as_deref());
        assert!(path.ends_with(CONFIG_FILE_NAME));
    }
}

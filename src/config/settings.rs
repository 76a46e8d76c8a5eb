//! Configuration structures for deserialisation.
//!
//! These structures map directly to the JSON configuration file format.

use std::path::PathBuf;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::packages::PackageRegistry;

/// Root configuration structure.
///
/// This is the top-level structure that matches the JSON config file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Optional JSON schema reference (ignored during parsing).
    #[serde(rename = "$schema", default)]
    _schema: Option<String>,

    /// Optional comment field (ignored during parsing).
    #[serde(rename = "_comment", default)]
    _comment: Option<String>,

    /// Symbol repositories, lowest priority first.
    #[serde(default)]
    pub repositories: Vec<RepositoryConfig>,

    /// Document output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Package registry settings.
    #[serde(default)]
    pub packages: PackagesConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any validation checks fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (i, repo) in self.repositories.iter().enumerate() {
            if repo.name.trim().is_empty() {
                return Err(ConfigError::ValidationError {
                    message: format!("Repository #{} has an empty name", i + 1),
                });
            }
            if self.repositories[..i].iter().any(|r| r.name == repo.name) {
                return Err(ConfigError::ValidationError {
                    message: format!("Repository '{}' is listed twice", repo.name),
                });
            }
        }

        let extension = self.output.extension.trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ConfigError::ValidationError {
                message: format!("Invalid output extension '{}'", self.output.extension),
            });
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!(
                    "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ),
            });
        }

        // Unknown package slugs surface here
        self.registry().map(|_| ())
    }

    /// Builds the package registry: the built-in packages plus configured aliases.
    ///
    /// # Errors
    ///
    /// Returns an error if an alias names an unknown package or is an invalid
    /// pattern.
    pub fn registry(&self) -> Result<PackageRegistry, ConfigError> {
        self.packages
            .aliases
            .iter()
            .fold(PackageRegistry::builtin_builder(), |builder, (id, slug)| {
                builder.alias(id.as_str(), slug.as_str())
            })
            .build()
    }
}

/// A symbol repository to read libraries from.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Human-readable name, shown in generated documents.
    pub name: String,

    /// Directory holding the `.kicad_sym` files.
    pub path: PathBuf,

    /// Public URL of the repository.
    #[serde(default)]
    pub url: String,

    /// Fixed revision; when absent it is read from git.
    #[serde(default)]
    pub revision: Option<String>,
}

/// Document output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory documents are written to.
    /// Default: "docs"
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,

    /// File extension of written documents.
    /// Default: "md"
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Template file replacing the built-in Markdown template.
    #[serde(default)]
    pub template: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            extension: default_extension(),
            template: None,
        }
    }
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("docs")
}

fn default_extension() -> String {
    "md".to_string()
}

/// Package registry configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackagesConfig {
    /// Extra footprint identifiers (exact or wildcard) mapped to package slugs.
    #[serde(default)]
    pub aliases: IndexMap<String, String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let json = r"{}";
        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert!(config.repositories.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let json = r#"{
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "_comment": "Test config",
            "repositories": [
                {
                    "name": "DigiKey KiCad library",
                    "path": "/data/digikey-kicad-library/modern-symbols",
                    "url": "https://github.com/Digi-Key/digikey-kicad-library"
                },
                {
                    "name": "KiCad symbol library",
                    "path": "/data/kicad-symbols",
                    "url": "https://gitlab.com/kicad/libraries/kicad-symbols",
                    "revision": "8.0.4"
                }
            ],
            "output": {
                "directory": "/srv/pinouts",
                "extension": "txt",
                "template": "/srv/pinout.jinja"
            },
            "packages": {
                "aliases": {
                    "Package_DIP:DIP-8_W7.62mm_Socket": "DIP",
                    "TO-92*": "TO-92"
                }
            },
            "logging": {
                "level": "debug"
            }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.repositories.len(), 2);
        assert_eq!(config.repositories[0].revision, None);
        assert_eq!(config.repositories[1].revision.as_deref(), Some("8.0.4"));
        assert_eq!(config.output.directory, PathBuf::from("/srv/pinouts"));
        assert_eq!(config.output.extension, "txt");
        assert_eq!(
            config.output.template,
            Some(PathBuf::from("/srv/pinout.jinja"))
        );
        assert_eq!(config.packages.aliases.len(), 2);
        assert_eq!(config.logging.level, "debug");

        let registry = config.registry().unwrap();
        assert_eq!(
            registry
                .resolve("Package_DIP:DIP-8_W7.62mm_Socket")
                .map(|p| p.slug()),
            Some("DIP")
        );
        assert_eq!(
            registry.resolve("MyLib:TO-92L").map(|p| p.slug()),
            Some("TO-92")
        );
    }

    #[test]
    fn output_config_defaults() {
        let config = OutputConfig::default();
        assert_eq!(config.directory, PathBuf::from("docs"));
        assert_eq!(config.extension, "md");
        assert!(config.template.is_none());
    }

    #[test]
    fn logging_config_defaults() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn reject_unknown_package_alias() {
        let json = r#"{
            "packages": { "aliases": { "Lib:QFN-32": "QFN" } }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_duplicate_repository() {
        let json = r#"{
            "repositories": [
                { "name": "KiCad", "path": "/a" },
                { "name": "KiCad", "path": "/b" }
            ]
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_invalid_log_level() {
        let json = r#"{ "logging": { "level": "loud" } }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn reject_unknown_fields() {
        let json = r#"{
            "unknown_field": "value"
        }"#;

        let result: Result<Config, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}

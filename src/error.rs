//! Error types for pinout-docs.
//!
//! Per-component failures ([`PartError`]) are isolated by the batch driver:
//! they are logged and counted, and processing moves on to the next entry.
//! Configuration and rendering failures are surfaced to the caller.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file could not be read.
    #[error("failed to read configuration file: {path}")]
    ReadError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration file could not be parsed.
    #[error("failed to parse configuration file: {path}")]
    ParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// Configuration file not found.
    #[error("configuration file not found: {path}")]
    NotFound {
        /// Path where the configuration file was expected.
        path: PathBuf,
    },

    /// Configuration validation failed.
    #[error("configuration validation failed: {message}")]
    ValidationError {
        /// Description of the validation failure.
        message: String,
    },
}

/// Violations of a package's pin-grouping preconditions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    /// Two pins share the same number.
    #[error("pin number {number} appears more than once")]
    DuplicatePinNumber {
        /// The repeated pin number.
        number: u32,
    },

    /// The package cannot hold this many pins.
    #[error("{count} pins exceed the package maximum of {max}")]
    TooManyPins {
        /// Number of pins supplied.
        count: usize,
        /// Maximum the package allows.
        max: usize,
    },

    /// The pins cannot be split evenly across the package's groups.
    #[error("{count} pins cannot be split evenly into {groups} groups")]
    UnevenGroups {
        /// Number of pins supplied.
        count: usize,
        /// Number of named groups in the package.
        groups: usize,
    },
}

/// A failure that prevents one component from producing any part.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartError {
    /// The component's pins violate a package's grouping rules.
    #[error("part '{part}' is malformed for package {package}")]
    Malformed {
        /// Entry name of the component.
        part: String,
        /// Slug of the package being grouped.
        package: String,
        /// The violated precondition.
        #[source]
        source: GroupingError,
    },

    /// A pin number is not a positive integer.
    #[error("part '{part}' is malformed: pin number '{number}' is not a positive integer")]
    InvalidPinNumber {
        /// Entry name of the component.
        part: String,
        /// The raw pin number text.
        number: String,
    },

    /// Two pin-bearing units declare the same pin number with different names.
    #[error("part '{part}' is malformed: pin {number} is named both '{first}' and '{second}'")]
    ConflictingPin {
        /// Entry name of the component.
        part: String,
        /// The shared pin number.
        number: u32,
        /// Name seen first.
        first: String,
        /// Name seen later.
        second: String,
    },

    /// The `extends` target does not exist in the library.
    #[error("part '{part}' extends '{parent}', which is not in the library")]
    DanglingReference {
        /// Entry name of the component.
        part: String,
        /// Name of the missing parent.
        parent: String,
    },
}

impl PartError {
    /// Returns the entry name of the component that failed.
    #[must_use]
    pub fn part(&self) -> &str {
        match self {
            Self::Malformed { part, .. }
            | Self::InvalidPinNumber { part, .. }
            | Self::ConflictingPin { part, .. }
            | Self::DanglingReference { part, .. } => part,
        }
    }

    /// Returns true for the malformed-part family of failures.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        !matches!(self, Self::DanglingReference { .. })
    }
}

/// Errors raised while locating libraries in the symbol repositories.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A repository directory does not exist.
    #[error("repository '{name}' not found at {path}")]
    MissingRepository {
        /// Configured repository name.
        name: String,
        /// Configured repository path.
        path: PathBuf,
    },

    /// The library file pattern could not be compiled.
    #[error("invalid library pattern: {pattern}")]
    Pattern {
        /// The glob pattern.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: glob::PatternError,
    },

    /// A directory entry could not be read during enumeration.
    #[error("failed to enumerate libraries")]
    Walk {
        /// The underlying glob error.
        #[source]
        source: glob::GlobError,
    },

    /// No repository holds a library with this name.
    #[error("library '{name}' not found in any repository")]
    LibraryNotFound {
        /// Library stem or path as given.
        name: String,
    },

    /// A library file could not be read or parsed.
    #[error("failed to load library: {path}")]
    Library {
        /// Path to the library file.
        path: PathBuf,
        /// The underlying reader error.
        #[source]
        source: crate::kicad::KicadError,
    },
}

/// Errors raised while turning a part into a document on disk.
#[derive(Error, Debug)]
pub enum RenderError {
    /// The template could not be loaded or rendered.
    #[error("failed to render template for part '{part_id}'")]
    Template {
        /// Identifier of the part being rendered.
        part_id: String,
        /// The underlying template error.
        #[source]
        source: minijinja::Error,
    },

    /// A custom template file could not be read.
    #[error("failed to read template file: {path}")]
    TemplateRead {
        /// Path to the template file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The output document could not be written.
    #[error("failed to write document: {path}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Joins an error and all of its sources into one line, outermost first.
#[must_use]
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

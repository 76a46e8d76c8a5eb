//! Symbol repositories and the libraries inside them.
//!
//! Repositories are listed lowest priority first. When two repositories
//! produce a part with the same identifier the later one wins, so a curated
//! library can be layered over a broader one. Distinct identifiers that map
//! to the same document name are reported as collisions; the later part wins
//! there too.

use std::path::{Path, PathBuf};
use std::process::Command;

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::config::{Config, RepositoryConfig};
use crate::error::{error_chain, CatalogError};
use crate::kicad::{Symbol, SymbolLib, SYMBOL_LIB_EXTENSION};
use crate::packages::PackageRegistry;
use crate::part::{Part, Provenance};
use crate::render::file_stem;
use crate::resolver::{BatchReport, ComponentResolver};

/// Revision recorded when none is configured and git cannot tell.
pub const UNKNOWN_REVISION: &str = "unknown";

/// A symbol repository with its revision resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Human-readable name.
    pub name: String,
    /// Directory holding the libraries.
    pub path: PathBuf,
    /// Public URL.
    pub url: String,
    /// Revision the libraries were read at.
    pub revision: String,
}

impl Repository {
    /// Creates a repository from its configuration, resolving the revision.
    ///
    /// A configured revision is used as is; otherwise the short `HEAD` hash
    /// of the directory's git checkout, or [`UNKNOWN_REVISION`].
    #[must_use]
    pub fn from_config(config: &RepositoryConfig) -> Self {
        let revision = config
            .revision
            .clone()
            .or_else(|| git_short_head(&config.path))
            .unwrap_or_else(|| UNKNOWN_REVISION.to_string());

        Self {
            name: config.name.clone(),
            path: config.path.clone(),
            url: config.url.clone(),
            revision,
        }
    }

    /// Returns the provenance stamped on parts from this repository.
    #[must_use]
    pub fn provenance(&self) -> Provenance {
        Provenance::new(&self.name, &self.url, &self.revision)
    }

    /// Lists the library files directly inside the repository, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory does not exist or cannot be read.
    pub fn library_paths(&self) -> Result<Vec<PathBuf>, CatalogError> {
        if !self.path.is_dir() {
            return Err(CatalogError::MissingRepository {
                name: self.name.clone(),
                path: self.path.clone(),
            });
        }

        let pattern = format!(
            "{}/*.{SYMBOL_LIB_EXTENSION}",
            glob::Pattern::escape(&self.path.to_string_lossy())
        );

        let mut paths = glob::glob(&pattern)
            .map_err(|source| CatalogError::Pattern {
                pattern: pattern.clone(),
                source,
            })?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| CatalogError::Walk { source })?;

        paths.retain(|p| p.is_file());
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(paths)
    }

    /// Returns the path of the library with the given stem, if present.
    #[must_use]
    pub fn library_path(&self, stem: &str) -> Option<PathBuf> {
        let path = self
            .path
            .join(format!("{stem}.{SYMBOL_LIB_EXTENSION}"));
        path.is_file().then_some(path)
    }
}

/// Reads the short `HEAD` hash of the git checkout containing `dir`.
#[must_use]
pub fn git_short_head(dir: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    if !out.status.success() {
        return None;
    }

    let rev = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!rev.is_empty()).then_some(rev)
}

/// Reads a library file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a symbol library.
pub fn load_library(path: &Path) -> Result<SymbolLib, CatalogError> {
    SymbolLib::open(path).map_err(|source| CatalogError::Library {
        path: path.to_path_buf(),
        source,
    })
}

/// Result of resolving every library in every repository.
#[derive(Debug, Default)]
pub struct CatalogReport {
    /// Parts, failures and skips across all libraries.
    pub batch: BatchReport,

    /// Libraries that could not be read; their entries were not processed.
    pub broken_libraries: Vec<CatalogError>,

    /// Repositories whose directory could not be listed.
    pub unreadable_repositories: Vec<CatalogError>,

    /// Parts replaced by a same-identifier part from a later repository.
    pub overridden: usize,

    /// Parts replaced by a differently named part with the same document name.
    pub collisions: Vec<DocumentCollision>,
}

/// Two part identifiers that map to the same document file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentCollision {
    /// Identifier of the part whose document is written.
    pub kept: String,
    /// Identifier of the part that was dropped.
    pub replaced: String,
}

/// The ordered set of configured repositories.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    repositories: Vec<Repository>,
}

impl Catalog {
    /// Creates a catalog from repositories, lowest priority first.
    #[must_use]
    pub const fn new(repositories: Vec<Repository>) -> Self {
        Self { repositories }
    }

    /// Creates a catalog from the configured repositories.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config
                .repositories
                .iter()
                .map(Repository::from_config)
                .collect(),
        )
    }

    /// Returns the repositories, lowest priority first.
    #[must_use]
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Finds a library by path, or by stem in the highest-priority repository
    /// that has it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LibraryNotFound`] if neither applies.
    pub fn locate_library(&self, name: &str) -> Result<PathBuf, CatalogError> {
        let as_path = Path::new(name);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let stem = name
            .strip_suffix(&format!(".{SYMBOL_LIB_EXTENSION}"))
            .unwrap_or(name);

        self.repositories
            .iter()
            .rev()
            .find_map(|repo| repo.library_path(stem))
            .ok_or_else(|| CatalogError::LibraryNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the repository a library path belongs to, if any.
    #[must_use]
    pub fn repository_of(&self, library: &Path) -> Option<&Repository> {
        let dir = library.parent()?;
        self.repositories.iter().rev().find(|r| r.path == dir)
    }

    /// Searches every library for an entry by exact name.
    ///
    /// Higher-priority repositories are searched first. Unreadable libraries
    /// are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository directory cannot be listed.
    pub fn find_symbol(&self, name: &str) -> Result<Option<(PathBuf, Symbol)>, CatalogError> {
        for repo in self.repositories.iter().rev() {
            for path in repo.library_paths()? {
                let lib = match load_library(&path) {
                    Ok(lib) => lib,
                    Err(e) => {
                        warn!(error = %error_chain(&e), "Skipping library");
                        continue;
                    }
                };

                if let Some(symbol) = lib.get(name) {
                    return Ok(Some((path, symbol.clone())));
                }
            }
        }

        Ok(None)
    }

    /// Resolves every entry of every library into parts.
    ///
    /// Parts are keyed by the file name their document gets, so a later part
    /// replaces an earlier one exactly when it would overwrite its document.
    /// Per-entry failures, unreadable libraries and missing repositories are
    /// collected in the report rather than stopping the run.
    #[must_use]
    pub fn resolve_all(&self, registry: &PackageRegistry) -> CatalogReport {
        let mut report = CatalogReport::default();
        let mut parts: IndexMap<String, Part> = IndexMap::new();

        for repo in &self.repositories {
            let paths = match repo.library_paths() {
                Ok(paths) => paths,
                Err(e) => {
                    warn!(error = %error_chain(&e), "Skipping repository");
                    report.unreadable_repositories.push(e);
                    continue;
                }
            };
            info!(
                repository = %repo.name,
                revision = %repo.revision,
                libraries = paths.len(),
                "Reading repository"
            );

            let resolver = ComponentResolver::new(registry, repo.provenance());
            for path in paths {
                let lib = match load_library(&path) {
                    Ok(lib) => lib,
                    Err(e) => {
                        warn!(error = %error_chain(&e), "Skipping library");
                        report.broken_libraries.push(e);
                        continue;
                    }
                };

                let mut batch = resolver.resolve_library(&lib);
                debug!(
                    library = %path.display(),
                    parts = batch.parts.len(),
                    failures = batch.failures.len(),
                    "Library resolved"
                );

                for part in std::mem::take(&mut batch.parts) {
                    let part_id = part.part_id.clone();
                    let Some(replaced) = parts.insert(file_stem(&part_id), part) else {
                        continue;
                    };

                    if replaced.part_id == part_id {
                        report.overridden += 1;
                    } else {
                        warn!(
                            part = %part_id,
                            replaced = %replaced.part_id,
                            "Parts share a document name"
                        );
                        report.collisions.push(DocumentCollision {
                            kept: part_id,
                            replaced: replaced.part_id,
                        });
                    }
                }
                report.batch.merge(batch);
            }
        }

        report.batch.parts = parts.into_values().collect();
        report
    }
}

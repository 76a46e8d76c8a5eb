//! Footprint identifier to package lookup.
//!
//! Identifiers are matched exactly first. Identifiers containing `*` or `?`
//! are also kept as glob patterns, compiled once into anchored regexes and
//! tried in registration order when no exact entry exists.

use std::collections::HashMap;

use regex::Regex;

use super::catalog::builtin_packages;
use super::Package;
use crate::error::ConfigError;

/// Read-only mapping from footprint identifiers to packages.
#[derive(Debug)]
pub struct PackageRegistry {
    packages: Vec<Package>,
    exact: HashMap<String, usize>,
    patterns: Vec<(Regex, usize)>,
}

impl PackageRegistry {
    /// Builds the registry of built-in packages.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in wildcard pattern fails to compile.
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::builtin_builder().build()
    }

    /// Returns a builder preloaded with the built-in packages.
    #[must_use]
    pub fn builtin_builder() -> RegistryBuilder {
        builtin_packages()
            .into_iter()
            .fold(RegistryBuilder::new(), |builder, (package, footprints)| {
                builder.family(package, footprints.iter().copied())
            })
    }

    /// Resolves a footprint identifier to its package.
    ///
    /// Unregistered identifiers return `None`.
    #[must_use]
    pub fn resolve(&self, footprint: &str) -> Option<&Package> {
        if let Some(&idx) = self.exact.get(footprint) {
            return Some(&self.packages[idx]);
        }

        // KiCad filter patterns name footprints without the library nickname
        let bare = footprint.split_once(':').map(|(_, name)| name);

        self.patterns
            .iter()
            .find(|(regex, _)| {
                regex.is_match(footprint) || bare.is_some_and(|name| regex.is_match(name))
            })
            .map(|&(_, idx)| &self.packages[idx])
    }

    /// Gets a package by slug.
    #[must_use]
    pub fn package(&self, slug: &str) -> Option<&Package> {
        self.packages.iter().find(|p| p.slug() == slug)
    }

    /// Returns all registered packages.
    #[must_use]
    pub fn packages(&self) -> &[Package] {
        &self.packages
    }

    /// Returns the number of exact identifiers registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.exact.len()
    }

    /// Returns true if no identifiers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

/// Collects packages and identifiers before compiling a [`PackageRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    packages: Vec<Package>,
    entries: Vec<(String, String)>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a package together with the identifiers that map to it.
    ///
    /// A package with the same slug as an existing one replaces it.
    #[must_use]
    pub fn family<I, S>(mut self, package: Package, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slug = package.slug().to_string();
        self.packages.retain(|p| p.slug() != slug);
        self.packages.push(package);
        self.entries
            .extend(identifiers.into_iter().map(|id| (id.into(), slug.clone())));
        self
    }

    /// Maps one more identifier onto an already added package.
    #[must_use]
    pub fn alias(mut self, identifier: impl Into<String>, slug: impl Into<String>) -> Self {
        self.entries.push((identifier.into(), slug.into()));
        self
    }

    /// Compiles the registry.
    ///
    /// Later registrations of the same exact identifier win.
    ///
    /// # Errors
    ///
    /// Returns an error if an identifier names an unknown package slug or a
    /// wildcard pattern cannot be compiled.
    pub fn build(self) -> Result<PackageRegistry, ConfigError> {
        let mut exact = HashMap::with_capacity(self.entries.len());
        let mut patterns = Vec::new();

        for (identifier, slug) in self.entries {
            let idx = self
                .packages
                .iter()
                .position(|p| p.slug() == slug)
                .ok_or_else(|| ConfigError::ValidationError {
                    message: format!(
                        "footprint '{identifier}' refers to unknown package '{slug}'"
                    ),
                })?;

            if is_pattern(&identifier) {
                let regex = compile_glob(&identifier)?;
                patterns.push((regex, idx));
            }
            exact.insert(identifier, idx);
        }

        Ok(PackageRegistry {
            packages: self.packages,
            exact,
            patterns,
        })
    }
}

fn is_pattern(identifier: &str) -> bool {
    identifier.contains(['*', '?'])
}

/// Compiles a glob pattern into an anchored regex.
fn compile_glob(glob: &str) -> Result<Regex, ConfigError> {
    let mut regex = String::with_capacity(glob.len() * 2 + 2);
    regex.push('^');
    for c in glob.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '.' | '+' | '^' | '$' | '(' | ')' | '[' | ']' | '{' | '}' | '|' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex.push('$');

    Regex::new(&regex).map_err(|e| ConfigError::ValidationError {
        message: format!("invalid footprint pattern '{glob}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packages::catalog::{DIP_SLUG, TO220_SLUG, TO92_SLUG};

    fn registry() -> PackageRegistry {
        PackageRegistry::builtin().expect("built-in registry")
    }

    #[test]
    fn exact_lookup() {
        let reg = registry();
        let pkg = reg.resolve("Package_DIP:DIP-8_W7.62mm").unwrap();
        assert_eq!(pkg.slug(), DIP_SLUG);
        assert_eq!(
            reg.resolve("Package_TO_SOT_THT:TO-92_Inline").unwrap().slug(),
            TO92_SLUG
        );
        assert_eq!(
            reg.resolve("digikey-footprints:TO-220-3").unwrap().slug(),
            TO220_SLUG
        );
    }

    #[test]
    fn pattern_text_is_also_an_exact_key() {
        let reg = registry();
        assert_eq!(reg.resolve("DIP*W7.62mm*").unwrap().slug(), DIP_SLUG);
    }

    #[test]
    fn wildcard_lookup() {
        let reg = registry();
        assert_eq!(reg.resolve("DIP-8_W7.62mm_Socket").unwrap().slug(), DIP_SLUG);
        assert_eq!(
            reg.resolve("Package_DIP:DIP-64_W7.62mm_SMDSocket").unwrap().slug(),
            DIP_SLUG
        );
    }

    #[test]
    fn wildcard_is_anchored_and_literal() {
        let reg = registry();
        // The '.' in the pattern must not match any character
        assert!(reg.resolve("DIP-8_W7x62mm").is_none());
        assert!(reg.resolve("CDIP-8_W7.62mm").is_none());
    }

    #[test]
    fn unregistered_is_none() {
        let reg = registry();
        assert!(reg.resolve("Package_SO:SOIC-8_3.9x4.9mm_P1.27mm").is_none());
        assert!(reg.resolve("").is_none());
    }

    #[test]
    fn first_matching_pattern_wins() {
        let reg = RegistryBuilder::new()
            .family(Package::new("A", "a"), ["X*"])
            .family(Package::new("B", "b"), ["XY*"])
            .build()
            .unwrap();
        assert_eq!(reg.resolve("XYZ").unwrap().slug(), "A");
    }

    #[test]
    fn alias_maps_onto_existing_package() {
        let reg = PackageRegistry::builtin_builder()
            .alias("MyLib:NE555_DIP", DIP_SLUG)
            .alias("MyLib:TO92_*", TO92_SLUG)
            .build()
            .unwrap();
        assert_eq!(reg.resolve("MyLib:NE555_DIP").unwrap().slug(), DIP_SLUG);
        assert_eq!(reg.resolve("MyLib:TO92_Bent").unwrap().slug(), TO92_SLUG);
    }

    #[test]
    fn alias_to_unknown_slug_rejected() {
        let result = PackageRegistry::builtin_builder()
            .alias("MyLib:QFN-32", "QFN")
            .build();
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn package_by_slug() {
        let reg = registry();
        assert_eq!(reg.packages().len(), 3);
        assert!(reg.package(TO220_SLUG).is_some());
        assert!(reg.package("QFN").is_none());
        assert!(!reg.is_empty());
    }
}

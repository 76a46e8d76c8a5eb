//! Component resolution: from a library entry to zero or more [`Part`]s.
//!
//! For each entry the resolver follows `extends` to find the pins, picks
//! footprint candidates, looks them up in the [`PackageRegistry`], and groups
//! the sorted, label-normalised pins for every package that matched. Entries
//! that are simply out of scope (no footprint, unregistered footprint, no
//! pins, only placeholder labels) resolve to no parts without an error.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{error_chain, PartError};
use crate::kicad::{Symbol, SymbolLib};
use crate::label;
use crate::packages::{Package, PackageRegistry, Pin};
use crate::part::{Part, Provenance};

/// Resolves library entries against a package registry.
#[derive(Debug, Clone)]
pub struct ComponentResolver<'a> {
    registry: &'a PackageRegistry,
    provenance: Provenance,
}

/// Outcome of resolving every entry of a library.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Parts produced, in library order.
    pub parts: Vec<Part>,

    /// Entries that failed, one error each.
    pub failures: Vec<PartError>,

    /// Entries that produced no part without failing.
    pub skipped: usize,
}

impl BatchReport {
    /// Folds another report into this one.
    pub fn merge(&mut self, other: Self) {
        self.parts.extend(other.parts);
        self.failures.extend(other.failures);
        self.skipped += other.skipped;
    }
}

impl<'a> ComponentResolver<'a> {
    /// Creates a resolver stamping parts with the given provenance.
    #[must_use]
    pub const fn new(registry: &'a PackageRegistry, provenance: Provenance) -> Self {
        Self {
            registry,
            provenance,
        }
    }

    /// Resolves one entry of `library` into parts, one per distinct package.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The entry extends a name that is not in `library`
    /// - A pin number is not a positive integer
    /// - Two units give the same pin number different names
    /// - The pins violate a matched package's grouping rules
    pub fn resolve(
        &self,
        component: &Symbol,
        library: &SymbolLib,
    ) -> Result<Vec<Part>, PartError> {
        let (pin_source, record) = effective_record(component, library)?;

        let packages = self.matched_packages(&record);
        if packages.is_empty() {
            debug!(part = %component.name, "No registered footprint");
            return Ok(Vec::new());
        }

        let raw_pins = extract_pins(pin_source, &component.name)?;
        if raw_pins.is_empty() {
            debug!(part = %component.name, "No pins");
            return Ok(Vec::new());
        }

        if !label::has_meaningful_labels(raw_pins.iter().map(|p| p.name.as_str())) {
            debug!(part = %component.name, "No meaningful pin labels");
            return Ok(Vec::new());
        }

        let mut pins: Vec<Pin> = raw_pins
            .into_iter()
            .map(|p| Pin::new(p.number, label::normalize(&p.name)))
            .collect();
        pins.sort_by_key(|p| p.number);

        let distinguish = packages.len() > 1;
        packages
            .into_iter()
            .map(|package| -> Result<Part, PartError> {
                let pin_groups = package
                    .group_pins(&pins)
                    .map_err(|source| PartError::Malformed {
                        part: component.name.clone(),
                        package: package.slug().to_string(),
                        source,
                    })?;

                let part_id = if distinguish {
                    format!("{}_{}", component.name, package.slug())
                } else {
                    component.name.clone()
                };

                Ok(Part {
                    part_id,
                    name: component.name.clone(),
                    description: record.description().map(ToOwned::to_owned),
                    package_description: package.describe().to_string(),
                    package: package.slug().to_string(),
                    pin_groups,
                    provenance: self.provenance.clone(),
                })
            })
            .collect()
    }

    /// Resolves every entry of a library, isolating per-entry failures.
    pub fn resolve_library(&self, library: &SymbolLib) -> BatchReport {
        let mut report = BatchReport::default();

        for component in library.iter() {
            match self.resolve(component, library) {
                Ok(parts) if parts.is_empty() => report.skipped += 1,
                Ok(parts) => report.parts.extend(parts),
                Err(e) => {
                    warn!(part = %e.part(), error = %error_chain(&e), "Skipping part");
                    report.failures.push(e);
                }
            }
        }

        report
    }

    /// Returns the distinct packages matched by the entry's footprint candidates.
    fn matched_packages(&self, record: &Symbol) -> Vec<&'a Package> {
        let mut packages: Vec<&'a Package> = Vec::new();

        for candidate in footprint_candidates(record) {
            match self.registry.resolve(candidate) {
                Some(pkg) if packages.iter().all(|p| p.slug() != pkg.slug()) => {
                    packages.push(pkg);
                }
                Some(_) => {}
                None => {
                    debug!(part = %record.name, footprint = candidate, "Unregistered footprint");
                }
            }
        }

        packages
    }
}

/// Returns the entry's footprint candidates.
///
/// The `Footprint` property, when set, is the only candidate; otherwise each
/// `ki_fp_filters` token is one.
#[must_use]
pub fn footprint_candidates(record: &Symbol) -> Vec<&str> {
    record
        .footprint()
        .map_or_else(|| record.footprint_filters().collect(), |fp| vec![fp])
}

/// Finds the entry carrying the pins and builds the property view.
///
/// A derived entry takes its pins from the parent; its properties are the
/// parent's overlaid with its own.
fn effective_record<'l>(
    component: &'l Symbol,
    library: &'l SymbolLib,
) -> Result<(&'l Symbol, Symbol), PartError> {
    let Some(parent_name) = component.extends.as_deref() else {
        return Ok((component, properties_only(component)));
    };

    let parent = library
        .get(parent_name)
        .ok_or_else(|| PartError::DanglingReference {
            part: component.name.clone(),
            parent: parent_name.to_string(),
        })?;

    let mut record = properties_only(parent);
    record.name.clone_from(&component.name);
    record.properties.extend(
        component
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone())),
    );

    Ok((parent, record))
}

fn properties_only(symbol: &Symbol) -> Symbol {
    Symbol {
        name: symbol.name.clone(),
        extends: None,
        properties: symbol.properties.clone(),
        units: Vec::new(),
    }
}

/// A pin with its number parsed, before label rewriting.
struct NumberedPin {
    number: u32,
    name: String,
}

/// Pools the pins of every pin-bearing unit.
fn extract_pins(source: &Symbol, part: &str) -> Result<Vec<NumberedPin>, PartError> {
    let mut pins = Vec::new();
    let mut names: HashMap<u32, &str> = HashMap::new();

    for unit in source.pin_units() {
        for raw in &unit.pins {
            let number = raw
                .number
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or_else(|| PartError::InvalidPinNumber {
                    part: part.to_string(),
                    number: raw.number.clone(),
                })?;

            match names.get(&number) {
                Some(&first) if first != raw.name => {
                    return Err(PartError::ConflictingPin {
                        part: part.to_string(),
                        number,
                        first: first.to_string(),
                        second: raw.name.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    names.insert(number, &raw.name);
                }
            }

            pins.push(NumberedPin {
                number,
                name: raw.name.clone(),
            });
        }
    }

    Ok(pins)
}

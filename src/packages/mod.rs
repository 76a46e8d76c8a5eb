//! Physical package families and pin grouping.
//!
//! A [`Package`] describes how a footprint family numbers its pins and splits
//! them across physical edges. Grouping is positional: the sorted pin list is
//! cut into equal contiguous slices, one per group name, so it relies on the
//! package's numbering convention (a DIP numbers all of one row before
//! starting the other).

pub mod catalog;
pub mod registry;

pub use catalog::{builtin_packages, dip, to220, to92};
pub use registry::{PackageRegistry, RegistryBuilder};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::GroupingError;

/// A single physical contact of a component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// Pin number (1-based).
    pub number: u32,

    /// Display name of the pin.
    pub name: String,
}

impl Pin {
    /// Creates a new pin.
    #[must_use]
    pub fn new(number: u32, name: impl Into<String>) -> Self {
        Self {
            number,
            name: name.into(),
        }
    }
}

/// An ordered run of pins on one edge or region of a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinGroup {
    /// Group name, or `None` when the package has no sub-groups.
    pub name: Option<String>,

    /// Pins in ascending number order.
    pub pins: Vec<Pin>,
}

/// A registered footprint family with its description and grouping rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    slug: String,
    description: String,
    group_names: Vec<String>,
    max_pins: Option<usize>,
}

impl Package {
    /// Creates a package with no sub-groups and no pin limit.
    ///
    /// The description is dedented and trimmed, so it may be written as an
    /// indented multi-line literal.
    #[must_use]
    pub fn new(slug: impl Into<String>, description: &str) -> Self {
        Self {
            slug: slug.into(),
            description: dedent(description),
            group_names: Vec::new(),
            max_pins: None,
        }
    }

    /// Sets the ordered group names pins are split across.
    #[must_use]
    pub fn with_groups<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_names = names.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the maximum number of pins the package can carry.
    #[must_use]
    pub const fn with_max_pins(mut self, max_pins: usize) -> Self {
        self.max_pins = Some(max_pins);
        self
    }

    /// Returns the package identifier (e.g. `DIP`).
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Returns the prose description of the package.
    #[must_use]
    pub fn describe(&self) -> &str {
        &self.description
    }

    /// Returns the group names, in the order pins are assigned to them.
    #[must_use]
    pub fn group_names(&self) -> &[String] {
        &self.group_names
    }

    /// Returns the maximum pin count, if the package has one.
    #[must_use]
    pub const fn max_pins(&self) -> Option<usize> {
        self.max_pins
    }

    /// Splits sorted pins into this package's groups.
    ///
    /// With no group names, a single anonymous group holds every pin in the
    /// order given. Otherwise the pins are cut into `group_names.len()` equal
    /// contiguous slices, assigned to the names in order. The caller sorts
    /// the pins by number beforehand.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Two pins share a number
    /// - There are more pins than the package maximum
    /// - The pin count is not a multiple of the group count
    pub fn group_pins(&self, pins: &[Pin]) -> Result<Vec<PinGroup>, GroupingError> {
        let mut seen = HashSet::with_capacity(pins.len());
        if let Some(pin) = pins.iter().find(|p| !seen.insert(p.number)) {
            return Err(GroupingError::DuplicatePinNumber { number: pin.number });
        }

        if let Some(max) = self.max_pins {
            if pins.len() > max {
                return Err(GroupingError::TooManyPins {
                    count: pins.len(),
                    max,
                });
            }
        }

        if self.group_names.is_empty() {
            return Ok(vec![PinGroup {
                name: None,
                pins: pins.to_vec(),
            }]);
        }

        let groups = self.group_names.len();
        if pins.len() % groups != 0 {
            return Err(GroupingError::UnevenGroups {
                count: pins.len(),
                groups,
            });
        }

        let group_size = pins.len() / groups;
        Ok(self
            .group_names
            .iter()
            .enumerate()
            .map(|(i, name)| PinGroup {
                name: Some(name.clone()),
                pins: pins[i * group_size..(i + 1) * group_size].to_vec(),
            })
            .collect())
    }
}

/// Removes common leading indentation and surrounding blank lines.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(indent..).unwrap_or("").trim_end())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

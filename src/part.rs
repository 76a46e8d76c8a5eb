//! The document-ready record for one component and package.

use serde::Serialize;

use crate::packages::PinGroup;

/// Where a component record came from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    /// Human-readable name of the source repository.
    pub source_name: String,

    /// URL of the source repository.
    pub source_url: String,

    /// Revision of the source the record was read at.
    pub source_revision: String,
}

impl Provenance {
    /// Creates a provenance record.
    #[must_use]
    pub fn new(
        source_name: impl Into<String>,
        source_url: impl Into<String>,
        source_revision: impl Into<String>,
    ) -> Self {
        Self {
            source_name: source_name.into(),
            source_url: source_url.into(),
            source_revision: source_revision.into(),
        }
    }
}

/// A fully resolved component, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    /// Identifier, also the document file stem.
    pub part_id: String,

    /// Library entry name.
    pub name: String,

    /// Component description, if the library gives one.
    pub description: Option<String>,

    /// Prose description of the physical package.
    pub package_description: String,

    /// Slug of the resolved package.
    pub package: String,

    /// Pins grouped by package edge, labels normalised.
    pub pin_groups: Vec<PinGroup>,

    /// Source of the record.
    pub provenance: Provenance,
}

impl Part {
    /// Returns the total number of pins across all groups.
    #[must_use]
    pub fn pin_count(&self) -> usize {
        self.pin_groups.iter().map(|g| g.pins.len()).sum()
    }
}

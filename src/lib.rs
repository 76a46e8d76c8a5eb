//! pinout-docs: text pinout documents from KiCad symbol libraries
//!
//! This library reads KiCad symbol libraries, works out which physical
//! package each component comes in, and produces one plain document per
//! component and package listing its pins the way they sit on the part.
//!
//! # Architecture
//!
//! - **Packages**: A registry maps footprint identifiers (exact or wildcard)
//!   to package families. Each family splits a sorted pin list into named
//!   groups, one per physical edge.
//! - **Labels**: KiCad markup in pin names (`~{RESET}`, `V_{CC}`) is rewritten
//!   to plain text.
//! - **Resolution**: Each library entry, with `extends` followed, becomes zero
//!   or more parts. Failures stay local to the entry.
//! - **Output**: Parts are rendered through a template and written one file
//!   each.
//!
//! # Modules
//!
//! - [`analyze`] — Census reports over whole libraries
//! - [`catalog`] — Symbol repositories and library discovery
//! - [`config`] — Configuration loading and validation
//! - [`error`] — Error types
//! - [`kicad`] — `.kicad_sym` reader
//! - [`label`] — Pin label normalisation
//! - [`packages`] — Package families, grouping and the footprint registry
//! - [`part`] — Resolved part records
//! - [`render`] — Document rendering
//! - [`resolver`] — Library entry to part resolution

pub mod analyze;
pub mod catalog;
pub mod config;
pub mod error;
pub mod kicad;
pub mod label;
pub mod packages;
pub mod part;
pub mod render;
pub mod resolver;

pub use packages::{Package, PackageRegistry, Pin, PinGroup};
pub use part::{Part, Provenance};
pub use resolver::{BatchReport, ComponentResolver};

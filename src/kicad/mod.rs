//! KiCad symbol library (`.kicad_sym`) reading.
//!
//! Only the parts of a symbol needed for pinout documents are kept: the entry
//! name, its `extends` parent, its properties, and the name and number of
//! every pin in each sub-symbol. Graphics are skipped.
//!
//! # File Format
//!
//! ```text
//! (kicad_symbol_lib (version 20231120) (generator kicad_symbol_editor)
//!   (symbol "NE555P"
//!     (property "Footprint" "Package_DIP:DIP-8_W7.62mm" (at 0 0 0) ...)
//!     (property "ki_fp_filters" "DIP*W7.62mm*" ...)
//!     (symbol "NE555P_0_1" (rectangle ...))
//!     (symbol "NE555P_1_1"
//!       (pin power_in line (at 0 10.16 270) (length 2.54)
//!         (name "VCC" (effects ...)) (number "8" (effects ...)))
//!       ...))
//!   (symbol "LM555xN" (extends "NE555P") (property ...)))
//! ```
//!
//! Sub-symbols are named `<entry>_<unit>_<body style>`. Unit 0 holds items
//! shared by all units; body style 2 is the alternate (De Morgan) drawing.

pub mod error;
pub mod reader;
pub mod sexpr;

pub use error::{KicadError, KicadResult};

use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

/// File extension of KiCad symbol libraries.
pub const SYMBOL_LIB_EXTENSION: &str = "kicad_sym";

/// Property holding the assigned footprint.
pub const FOOTPRINT_PROPERTY: &str = "Footprint";

/// Property holding whitespace-separated footprint filter patterns.
pub const FP_FILTERS_PROPERTY: &str = "ki_fp_filters";

/// Description property (KiCad 6 and 7).
pub const LEGACY_DESCRIPTION_PROPERTY: &str = "ki_description";

/// Description property (KiCad 8 and later).
pub const DESCRIPTION_PROPERTY: &str = "Description";

/// A pin as written in the library; the number is still text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawPin {
    /// Pin name, with markup (e.g. `~{RESET}`).
    pub name: String,

    /// Pin number text (e.g. `"1"`, `"A3"`).
    pub number: String,

    /// Electrical type (`input`, `power_in`, ...), if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electrical_type: Option<String>,
}

impl RawPin {
    /// Creates a new pin.
    #[must_use]
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
            electrical_type: None,
        }
    }
}

/// A sub-symbol: one unit / body style of a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Unit {
    /// Sub-symbol name, e.g. `NE555P_1_1`.
    pub name: String,

    /// Unit number (0 = shared by all units).
    pub unit: u32,

    /// Body style (0 = all styles, 1 = normal, 2 = De Morgan).
    pub body_style: u32,

    /// Pins declared in this sub-symbol.
    pub pins: Vec<RawPin>,
}

impl Unit {
    /// Creates a unit, taking unit and body style from the `_<unit>_<style>` suffix.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let (unit, body_style) = reader::unit_and_style(&name);
        Self {
            name,
            unit,
            body_style,
            pins: Vec::new(),
        }
    }

    /// Adds a pin to the unit.
    #[must_use]
    pub fn with_pin(mut self, pin: RawPin) -> Self {
        self.pins.push(pin);
        self
    }

    /// Returns true for an alternate body style drawing.
    #[must_use]
    pub const fn is_alternate_style(&self) -> bool {
        self.body_style > 1
    }

    /// Returns true if the unit declares any pins.
    #[must_use]
    pub fn has_pins(&self) -> bool {
        !self.pins.is_empty()
    }
}

/// A library entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Entry name.
    pub name: String,

    /// Name of the entry this one derives from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Properties in declaration order.
    pub properties: IndexMap<String, String>,

    /// Sub-symbols in declaration order.
    pub units: Vec<Unit>,
}

impl Symbol {
    /// Creates an empty symbol.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Sets the parent entry name.
    #[must_use]
    pub fn extending(mut self, parent: impl Into<String>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Sets a property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Adds a sub-symbol.
    #[must_use]
    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.units.push(unit);
        self
    }

    /// Gets a property value.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns the assigned footprint, if set and non-empty.
    #[must_use]
    pub fn footprint(&self) -> Option<&str> {
        self.property(FOOTPRINT_PROPERTY)
            .map(str::trim)
            .filter(|fp| !fp.is_empty())
    }

    /// Returns the footprint filter patterns.
    pub fn footprint_filters(&self) -> impl Iterator<Item = &str> {
        self.property(FP_FILTERS_PROPERTY)
            .unwrap_or_default()
            .split_whitespace()
    }

    /// Returns the description, from either property spelling.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.property(LEGACY_DESCRIPTION_PROPERTY)
            .or_else(|| self.property(DESCRIPTION_PROPERTY))
            .filter(|d| !d.trim().is_empty())
    }

    /// Returns the sub-symbols that carry the component's physical pins.
    ///
    /// Alternate body styles repeat the same pins and are skipped.
    pub fn pin_units(&self) -> impl Iterator<Item = &Unit> {
        self.units
            .iter()
            .filter(|u| !u.is_alternate_style() && u.has_pins())
    }
}

/// A parsed symbol library.
#[derive(Debug, Default)]
pub struct SymbolLib {
    /// Library file path (if loaded from file).
    pub filepath: Option<String>,
    /// Entries in file order.
    pub symbols: Vec<Symbol>,
}

impl SymbolLib {
    /// Creates a new empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a `.kicad_sym` file from the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn open(path: impl AsRef<Path>) -> KicadResult<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| KicadError::file_read(path, e))?;

        let mut lib = Self::parse(&content)?;
        lib.filepath = Some(path.display().to_string());
        Ok(lib)
    }

    /// Parses library text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid symbol library.
    pub fn parse(content: &str) -> KicadResult<Self> {
        let root = sexpr::parse(content)?;
        Ok(Self {
            filepath: None,
            symbols: reader::read_library(&root)?,
        })
    }

    /// Gets an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.symbols.iter().find(|s| s.name == name)
    }

    /// Returns an iterator over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    /// Returns the entry names in file order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.symbols.iter().map(|s| s.name.as_str()).collect()
    }

    /// Returns the number of entries in the library.
    #[must_use]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns true if the library contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Adds an entry to the library.
    pub fn add_symbol(&mut self, symbol: Symbol) {
        self.symbols.push(symbol);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn footprint_ignores_blank() {
        let symbol = Symbol::new("X").with_property(FOOTPRINT_PROPERTY, "  ");
        assert_eq!(symbol.footprint(), None);

        let symbol = Symbol::new("X").with_property(FOOTPRINT_PROPERTY, "Lib:FP");
        assert_eq!(symbol.footprint(), Some("Lib:FP"));
    }

    #[test]
    fn filters_split_on_whitespace() {
        let symbol =
            Symbol::new("X").with_property(FP_FILTERS_PROPERTY, "DIP*W7.62mm*  SOIC*\tTO?92*");
        let filters: Vec<&str> = symbol.footprint_filters().collect();
        assert_eq!(filters, vec!["DIP*W7.62mm*", "SOIC*", "TO?92*"]);
        assert_eq!(Symbol::new("Y").footprint_filters().count(), 0);
    }

    #[test]
    fn description_prefers_legacy_key() {
        let symbol = Symbol::new("X")
            .with_property(DESCRIPTION_PROPERTY, "new")
            .with_property(LEGACY_DESCRIPTION_PROPERTY, "old");
        assert_eq!(symbol.description(), Some("old"));
        assert_eq!(
            Symbol::new("Y")
                .with_property(DESCRIPTION_PROPERTY, "timer")
                .description(),
            Some("timer")
        );
    }

    #[test]
    fn pin_units_skip_graphics_and_de_morgan() {
        let symbol = Symbol::new("G")
            .with_unit(Unit::new("G_0_1"))
            .with_unit(Unit::new("G_1_1").with_pin(RawPin::new("1", "A")))
            .with_unit(Unit::new("G_1_2").with_pin(RawPin::new("1", "A")))
            .with_unit(Unit::new("G_2_1").with_pin(RawPin::new("2", "B")));

        let names: Vec<&str> = symbol.pin_units().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["G_1_1", "G_2_1"]);
    }

    #[test]
    fn deeply_nested_library_is_an_error() {
        let content = format!(
            "(kicad_symbol_lib {}{})",
            "(".repeat(200_000),
            ")".repeat(200_000)
        );
        assert!(matches!(
            SymbolLib::parse(&content),
            Err(KicadError::ParseError { .. })
        ));
    }
}

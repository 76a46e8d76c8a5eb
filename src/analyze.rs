//! Census reports over symbol libraries.
//!
//! These reports show how libraries actually record footprints, units and
//! inheritance, which is what decides which footprint identifiers are worth
//! registering.

use std::io::{self, Write};

use clap::ValueEnum;
use indexmap::IndexMap;

use crate::kicad::{Symbol, SymbolLib};

/// Shown for an entry without a `Footprint` property.
const NO_VALUE: &str = "(none)";

/// Available reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    /// Number of entries per `Footprint` value.
    Footprints,
    /// Entries that declare pins, with their footprint.
    NamedPins,
    /// Entries with more than one pin-bearing unit.
    MultiUnit,
    /// Entries that extend another, with their own properties.
    Derived,
    /// `Footprint` against `ki_fp_filters` for every entry.
    Filters,
}

/// Report output formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned columns.
    #[default]
    Text,
    /// Array of objects.
    Json,
    /// Comma-separated values with a header row.
    Csv,
}

/// A report as named columns and string cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Column headers.
    pub columns: Vec<&'static str>,
    /// Rows, one cell per column.
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Writes the table in the given format.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to `out` fails.
    pub fn write<W: Write>(&self, format: OutputFormat, mut out: W) -> io::Result<()> {
        match format {
            OutputFormat::Text => self.write_text(&mut out),
            OutputFormat::Json => {
                let records: Vec<IndexMap<&str, &str>> = self
                    .rows
                    .iter()
                    .map(|row| {
                        self.columns
                            .iter()
                            .copied()
                            .zip(row.iter().map(String::as_str))
                            .collect()
                    })
                    .collect();
                serde_json::to_writer_pretty(&mut out, &records)?;
                writeln!(out)
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(out);
                writer.write_record(&self.columns)?;
                for row in &self.rows {
                    writer.write_record(row)?;
                }
                writer.flush()
            }
        }
    }

    fn write_text<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut widths: Vec<usize> = self.columns.iter().map(|c| c.len()).collect();
        for row in &self.rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        writeln!(out, "{}", pad_row(self.columns.iter().copied(), &widths))?;
        for row in &self.rows {
            writeln!(out, "{}", pad_row(row.iter().map(String::as_str), &widths))?;
        }
        Ok(())
    }
}

fn pad_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}

/// Accumulates report data across libraries.
#[derive(Debug, Default)]
pub struct Census {
    footprints: IndexMap<String, usize>,
    named_pins: Vec<Vec<String>>,
    multi_unit: Vec<Vec<String>>,
    derived: Vec<Vec<String>>,
    filters: Vec<Vec<String>>,
}

impl Census {
    /// Creates an empty census.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records every entry of a library.
    pub fn add_library(&mut self, library: &str, lib: &SymbolLib) {
        for symbol in lib.iter() {
            self.add_symbol(library, symbol);
        }
    }

    fn add_symbol(&mut self, library: &str, symbol: &Symbol) {
        let footprint = symbol.footprint().unwrap_or(NO_VALUE).to_string();
        *self.footprints.entry(footprint.clone()).or_default() += 1;

        let pin_units = symbol.pin_units().count();
        if pin_units > 0 {
            self.named_pins.push(vec![
                library.to_string(),
                symbol.name.clone(),
                footprint.clone(),
            ]);
        }
        if pin_units > 1 {
            self.multi_unit.push(vec![
                library.to_string(),
                symbol.name.clone(),
                pin_units.to_string(),
            ]);
        }

        if let Some(parent) = &symbol.extends {
            let properties: Vec<String> = symbol
                .properties
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect();
            self.derived.push(vec![
                library.to_string(),
                symbol.name.clone(),
                parent.clone(),
                properties.join("; "),
            ]);
        }

        self.filters.push(vec![
            library.to_string(),
            symbol.name.clone(),
            footprint,
            symbol.footprint_filters().collect::<Vec<_>>().join(" "),
        ]);
    }

    /// Builds one report from the accumulated data.
    #[must_use]
    pub fn report(&self, kind: ReportKind) -> Table {
        match kind {
            ReportKind::Footprints => {
                let mut counts: Vec<(&String, &usize)> = self.footprints.iter().collect();
                counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
                Table {
                    columns: vec!["footprint", "count"],
                    rows: counts
                        .into_iter()
                        .map(|(fp, n)| vec![fp.clone(), n.to_string()])
                        .collect(),
                }
            }
            ReportKind::NamedPins => Table {
                columns: vec!["library", "part", "footprint"],
                rows: self.named_pins.clone(),
            },
            ReportKind::MultiUnit => Table {
                columns: vec!["library", "part", "pin_units"],
                rows: self.multi_unit.clone(),
            },
            ReportKind::Derived => Table {
                columns: vec!["library", "part", "extends", "properties"],
                rows: self.derived.clone(),
            },
            ReportKind::Filters => Table {
                columns: vec!["library", "part", "footprint", "ki_fp_filters"],
                rows: self.filters.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kicad::{RawPin, Unit, FOOTPRINT_PROPERTY, FP_FILTERS_PROPERTY};

    fn census() -> Census {
        let mut lib = SymbolLib::new();
        lib.add_symbol(
            Symbol::new("NE555P")
                .with_property(FOOTPRINT_PROPERTY, "Package_DIP:DIP-8_W7.62mm")
                .with_property(FP_FILTERS_PROPERTY, "DIP*W7.62mm*")
                .with_unit(Unit::new("NE555P_1_1").with_pin(RawPin::new("1", "GND"))),
        );
        lib.add_symbol(
            Symbol::new("ICM7555xP")
                .extending("NE555P")
                .with_property(FOOTPRINT_PROPERTY, "Package_DIP:DIP-8_W7.62mm"),
        );
        lib.add_symbol(
            Symbol::new("74HC00")
                .with_unit(Unit::new("74HC00_1_1").with_pin(RawPin::new("1", "A")))
                .with_unit(Unit::new("74HC00_5_0").with_pin(RawPin::new("14", "VCC"))),
        );

        let mut census = Census::new();
        census.add_library("Timer", &lib);
        census
    }

    #[test]
    fn footprints_counted_and_ordered() {
        let table = census().report(ReportKind::Footprints);
        assert_eq!(
            table.rows,
            vec![
                vec!["Package_DIP:DIP-8_W7.62mm".to_string(), "2".to_string()],
                vec![NO_VALUE.to_string(), "1".to_string()],
            ]
        );
    }

    #[test]
    fn unit_and_inheritance_reports() {
        let census = census();

        let named = census.report(ReportKind::NamedPins);
        assert_eq!(named.rows.len(), 2);

        let multi = census.report(ReportKind::MultiUnit);
        assert_eq!(multi.rows, vec![vec!["Timer", "74HC00", "2"]]);

        let derived = census.report(ReportKind::Derived);
        assert_eq!(derived.rows[0][2], "NE555P");
        assert_eq!(derived.rows[0][3], "Footprint=Package_DIP:DIP-8_W7.62mm");

        let filters = census.report(ReportKind::Filters);
        assert_eq!(filters.rows.len(), 3);
        assert_eq!(filters.rows[0][3], "DIP*W7.62mm*");
    }

    #[test]
    fn text_output_aligned() {
        let mut out = Vec::new();
        census()
            .report(ReportKind::MultiUnit)
            .write(OutputFormat::Text, &mut out)
            .unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "library  part    pin_units\nTimer    74HC00  2\n"
        );
    }

    #[test]
    fn csv_output_has_header() {
        let mut out = Vec::new();
        census()
            .report(ReportKind::Footprints)
            .write(OutputFormat::Csv, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("footprint,count\n"));
        assert!(text.contains("Package_DIP:DIP-8_W7.62mm,2\n"));
    }

    #[test]
    fn json_output_keeps_column_order() {
        let mut out = Vec::new();
        census()
            .report(ReportKind::Derived)
            .write(OutputFormat::Json, &mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        let library = text.find("\"library\"").unwrap();
        let extends = text.find("\"extends\"").unwrap();
        assert!(library < extends);

        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed[0]["part"], "ICM7555xP");
    }
}

//! Conversion from parsed S-expressions to library records.

use super::error::{KicadError, KicadResult};
use super::sexpr::Sexpr;
use super::{RawPin, Symbol, Unit};

/// Root expression of a symbol library.
const LIBRARY_HEAD: &str = "kicad_symbol_lib";

/// Reads every top-level `(symbol ...)` entry of a library.
///
/// # Errors
///
/// Returns an error if the root is not `kicad_symbol_lib` or an entry has no
/// name.
pub fn read_library(root: &Sexpr) -> KicadResult<Vec<Symbol>> {
    match root.head() {
        Some(LIBRARY_HEAD) => {}
        Some(other) => return Err(KicadError::wrong_file_type(LIBRARY_HEAD, other)),
        None => return Err(KicadError::wrong_file_type(LIBRARY_HEAD, "<no root list>")),
    }

    root.children("symbol").map(read_symbol).collect()
}

/// Reads one library entry.
///
/// # Errors
///
/// Returns an error if the entry or one of its sub-symbols has no name.
pub fn read_symbol(entry: &Sexpr) -> KicadResult<Symbol> {
    let name = entry
        .text_at(1)
        .ok_or_else(|| KicadError::invalid_symbol("symbol without a name"))?;

    let mut symbol = Symbol::new(name);

    for item in entry.as_list().unwrap_or_default().iter().skip(2) {
        match item.head() {
            Some("extends") => {
                symbol.extends = item.text_at(1).map(ToOwned::to_owned);
            }
            Some("property") => {
                if let (Some(key), Some(value)) = (item.text_at(1), item.text_at(2)) {
                    symbol.properties.insert(key.to_string(), value.to_string());
                }
            }
            Some("symbol") => symbol.units.push(read_unit(item, name)?),
            _ => {}
        }
    }

    Ok(symbol)
}

fn read_unit(section: &Sexpr, parent: &str) -> KicadResult<Unit> {
    let name = section.text_at(1).ok_or_else(|| {
        KicadError::invalid_symbol(format!("sub-symbol of '{parent}' without a name"))
    })?;

    let mut unit = Unit::new(name);
    unit.pins = section.children("pin").filter_map(read_pin).collect();
    Ok(unit)
}

/// Reads `(pin <type> <style> ... (name "N" ...) (number "1" ...))`.
///
/// Pins without a number are dropped.
fn read_pin(pin: &Sexpr) -> Option<RawPin> {
    let number = pin.child("number")?.text_at(1)?.trim();
    if number.is_empty() {
        return None;
    }

    let name = pin
        .child("name")
        .and_then(|n| n.text_at(1))
        .unwrap_or_default();

    let electrical_type = match pin.as_list()?.get(1) {
        Some(Sexpr::Symbol(kind)) => Some(kind.clone()),
        _ => None,
    };

    Some(RawPin {
        name: name.to_string(),
        number: number.to_string(),
        electrical_type,
    })
}

/// Splits the trailing `_<unit>_<style>` off a sub-symbol name.
///
/// Names without a numeric suffix yield `(0, 0)`.
#[must_use]
pub fn unit_and_style(name: &str) -> (u32, u32) {
    let mut parts = name.rsplitn(3, '_');
    let style = parts.next().and_then(|s| s.parse().ok());
    let unit = parts.next().and_then(|s| s.parse().ok());

    match (unit, style) {
        (Some(unit), Some(style)) => (unit, style),
        _ => (0, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kicad::sexpr::parse;

    const LIB: &str = r#"(kicad_symbol_lib (version 20231120) (generator kicad_symbol_editor)
        (symbol "NE555P" (pin_names (offset 1.016)) (in_bom yes) (on_board yes)
            (property "Reference" "U" (at -10.16 8.89 0) (effects (font (size 1.27 1.27))))
            (property "Footprint" "Package_DIP:DIP-8_W7.62mm" (at 0 0 0)
                (effects (font (size 1.27 1.27)) hide))
            (property "ki_fp_filters" "DIP*W7.62mm*" (at 0 0 0))
            (symbol "NE555P_0_0"
                (rectangle (start -8.89 -7.62) (end 8.89 7.62)
                    (stroke (width 0.254) (type default)) (fill (type background)))
                (pin power_in line (at 0 -10.16 90) (length 2.54)
                    (name "GND" (effects (font (size 1.27 1.27))))
                    (number "1" (effects (font (size 1.27 1.27)))))
            )
            (symbol "NE555P_0_1"
                (pin input line (at -12.7 5.08 0) (length 2.54)
                    (name "~{TR}" (effects (font (size 1.27 1.27))))
                    (number "2" (effects (font (size 1.27 1.27)))))
                (pin no_connect line (at 0 0 0) (length 2.54) hide
                    (name "" (effects (font (size 1.27 1.27))))
                    (number "" (effects (font (size 1.27 1.27)))))
            )
        )
        (symbol "LM555xN" (extends "NE555P")
            (property "Footprint" "" (at 0 0 0))
        )
    )"#;

    #[test]
    fn reads_entries_properties_and_pins() {
        let symbols = read_library(&parse(LIB).unwrap()).unwrap();
        assert_eq!(symbols.len(), 2);

        let ne555 = &symbols[0];
        assert_eq!(ne555.name, "NE555P");
        assert_eq!(ne555.extends, None);
        assert_eq!(ne555.footprint(), Some("Package_DIP:DIP-8_W7.62mm"));
        assert_eq!(ne555.property("ki_fp_filters"), Some("DIP*W7.62mm*"));
        assert_eq!(ne555.units.len(), 2);

        let pins: Vec<(&str, &str)> = ne555
            .units
            .iter()
            .flat_map(|u| &u.pins)
            .map(|p| (p.number.as_str(), p.name.as_str()))
            .collect();
        assert_eq!(pins, vec![("1", "GND"), ("2", "~{TR}")]);
        assert_eq!(
            ne555.units[0].pins[0].electrical_type.as_deref(),
            Some("power_in")
        );
    }

    #[test]
    fn reads_extends() {
        let symbols = read_library(&parse(LIB).unwrap()).unwrap();
        let derived = &symbols[1];
        assert_eq!(derived.extends.as_deref(), Some("NE555P"));
        assert!(derived.units.is_empty());
        assert_eq!(derived.footprint(), None);
    }

    #[test]
    fn rejects_other_documents() {
        let err = read_library(&parse("(kicad_pcb (version 1))").unwrap()).unwrap_err();
        assert!(matches!(err, KicadError::WrongFileType { .. }));
    }

    #[test]
    fn rejects_nameless_symbol() {
        let err = read_library(&parse("(kicad_symbol_lib (symbol))").unwrap()).unwrap_err();
        assert!(matches!(err, KicadError::InvalidSymbol { .. }));
    }

    #[test]
    fn unit_suffix_parsing() {
        assert_eq!(unit_and_style("NE555P_1_1"), (1, 1));
        assert_eq!(unit_and_style("74HC00_5_0"), (5, 0));
        assert_eq!(unit_and_style("Some_Long_Name_2_2"), (2, 2));
        assert_eq!(unit_and_style("Odd"), (0, 0));
        assert_eq!(unit_and_style("Odd_x_1"), (0, 0));
    }
}

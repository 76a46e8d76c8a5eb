//! Integration tests for pin label normalisation.

use pinout_docs::label::{has_meaningful_labels, is_meaningful, normalize};

// =============================================================================
// Markup Rewriting
// =============================================================================

#[test]
fn slashes_are_spaced() {
    assert_eq!(normalize("SDA/PB2"), "SDA / PB2");
    assert_eq!(normalize("SDA/PB2/MISO"), "SDA / PB2 / MISO");
    // Already spaced
    assert_eq!(normalize("SDA / PB2 / MISO"), "SDA / PB2 / MISO");
}

#[test]
fn inverted_signals() {
    assert_eq!(normalize("~{RESET}"), "RESET (active low)");
    assert_eq!(normalize("A B ~{RESET} C"), "A B RESET (active low) C");
    assert_eq!(
        normalize("~{ONE} ~{TWO}"),
        "ONE (active low) TWO (active low)"
    );
}

#[test]
fn subscripts_and_superscripts() {
    assert_eq!(normalize("V_{cc}"), "V_cc");
    assert_eq!(normalize("V_{cc} V_{dd}"), "V_cc V_dd");
    assert_eq!(normalize("V^{+}"), "V_+");
    assert_eq!(normalize("V^{+} V^{a}"), "V_+ V_a");
}

#[test]
fn combined_markup() {
    assert_eq!(normalize("~{RESET}/PB5"), "RESET (active low) / PB5");
    assert_eq!(normalize("~{CS}/V_{REF}"), "CS (active low) / V_REF");
}

#[test]
fn plain_labels_untouched() {
    for label in ["GND", "VCC", "PB0", "~", "NC", "", "OUT-", "A/", "/B"] {
        assert_eq!(normalize(label), label);
    }
}

#[test]
fn normalisation_is_idempotent() {
    let samples = [
        "SDA/PB2/MISO",
        "~{RESET}/PB5",
        "V_{cc}/V^{+}",
        "a//b",
        "x / y/z",
        "~{WR}/~{RD}",
    ];
    for raw in samples {
        let once = normalize(raw);
        assert_eq!(normalize(&once), once, "not idempotent for {raw:?}");
    }
}

// =============================================================================
// Meaningful Label Filter
// =============================================================================

#[test]
fn placeholders_are_not_meaningful() {
    assert!(!is_meaningful("~"));
    assert!(!is_meaningful("NC"));
    assert!(!is_meaningful(""));
    assert!(is_meaningful("GND"));
    assert!(is_meaningful("nc"));
}

#[test]
fn one_real_label_is_enough() {
    assert!(has_meaningful_labels(["~", "NC", "VCC"]));
    assert!(!has_meaningful_labels(["~", "NC", ""]));
    assert!(!has_meaningful_labels(std::iter::empty::<&str>()));
}

//! Built-in package families and the footprints registered for them.
//!
//! Keys are KiCad footprint identifiers (`Library:Footprint`) as they appear in
//! a symbol's `Footprint` property, plus a few `ki_fp_filters` style wildcard
//! patterns.

use super::Package;

/// Slug of the dual in-line package family.
pub const DIP_SLUG: &str = "DIP";

/// Slug of the TO-220 power package family.
pub const TO220_SLUG: &str = "TO-220";

/// Slug of the TO-92 small transistor package family.
pub const TO92_SLUG: &str = "TO-92";

/// Footprints (and filter patterns) of through-hole dual in-line packages.
pub const DIP_FOOTPRINTS: &[&str] = &[
    "Package_DIP:DIP-12_W7.62mm",
    "Package_DIP:DIP-14_W7.62mm",
    "Package_DIP:DIP-16_W10.16mm",
    "Package_DIP:DIP-16_W7.62mm",
    "Package_DIP:DIP-18_W7.62mm",
    "Package_DIP:DIP-20_W7.62mm",
    "Package_DIP:DIP-20_W7.62mm_LongPads",
    "Package_DIP:DIP-22_W7.62mm",
    "Package_DIP:DIP-24_W15.24mm",
    "Package_DIP:DIP-24_W7.62mm",
    "Package_DIP:DIP-28_W15.24mm",
    "Package_DIP:DIP-28_W7.62mm",
    "Package_DIP:DIP-32_W15.24mm",
    "Package_DIP:DIP-40_W15.24mm",
    "Package_DIP:DIP-4_W10.16mm",
    "Package_DIP:DIP-4_W7.62mm",
    "Package_DIP:DIP-5-6_W7.62mm",
    "Package_DIP:DIP-6_W7.62mm",
    "Package_DIP:DIP-8-N6_W7.62mm",
    "Package_DIP:DIP-8-N7_W7.62mm",
    "Package_DIP:DIP-8_W10.16mm",
    "Package_DIP:DIP-8_W7.62mm",
    "Package_DIP:DIP-8_W7.62mm_LongPads",
    "digikey-footprints:DIP-8_W7.62mm",
    "digikey-footprints:DIP-14_W3mm",
    "digikey-footprints:DIP-16_W7.62mm",
    "digikey-footprints:DIP-6_W7.62mm",
    "digikey-footprints:DIP-28_W7.62mm",
    "digikey-footprints:DIP-20_W7.62mm",
    "digikey-footprints:DIP-18_W7.62mm",
    "digikey-footprints:DIP-4_W7.62mm",
    "digikey-footprints:DIP-40_W15.24mm",
    "digikey-footprints:DIP-10_W10.16mm",
    "DIP*W7.62mm*",
];

/// Footprints of three-lead TO-220 packages.
pub const TO220_FOOTPRINTS: &[&str] = &[
    "Package_TO_SOT_THT:TO-220-3_Vertical",
    "digikey-footprints:TO-220-3",
];

/// Footprints of three-lead TO-92 packages.
pub const TO92_FOOTPRINTS: &[&str] = &[
    "Package_TO_SOT_THT:TO-92_Inline",
    "digikey-footprints:TO-92-3",
    "digikey-footprints:TO-92-3_Formed_Leads",
];

/// Dual in-line package: two parallel rows, numbered counter-clockwise.
#[must_use]
pub fn dip() -> Package {
    Package::new(
        DIP_SLUG,
        "
        This package has two parallel rows of pins extending down from opposite edges of the chip.

        There should be a semicircular notch that you can feel in the middle of one of the package's shorter bare edges. With the pins facing downward and the chip oriented so notch is on the side of the chip furthest from you, Pin 1 will be in the far left corner of the chip.

        Pins are numbered counter-clockwise. Numbers increase from the far left corner to the near left corner. They then continue on the right side, increasing from the near right corner to the far right corner. Thus the highest number pin is to the right of pin 1.
        ",
    )
    .with_groups([
        "Left side (numbering starts at far end)",
        "Right side (numbering starts at near end)",
    ])
}

/// TO-220: three leads on one edge, metal tab (sometimes pin 4) on the other.
#[must_use]
pub fn to220() -> Package {
    Package::new(
        TO220_SLUG,
        "
        This package has 3 pins on one edge, and a metal tab with a hole in the center on the opposite edge. The metal tab serves as a heat sink and can be soldered to a larger heat sink or attached with an M3 screw.

        With the pins pointing towards you and the part flat on the table, tab side down, the pins are numbered 1, 2, 3 from left to right.

        The metal tab may be designated as pin 4. It is typically electrically connected to the center pin.
        ",
    )
    .with_max_pins(4)
}

/// TO-92: D-shaped body with three leads.
#[must_use]
pub fn to92() -> Package {
    Package::new(
        TO92_SLUG,
        "
        This small package has three pins protruding from one end. The body of the part has a curved side and a flat side, forming a D-shaped cross section. With the flat side facing up and the three pins pointing toward you, the pins are numbered 1, 2, 3 from left to right.
        ",
    )
    .with_max_pins(3)
}

/// Returns every built-in package with the footprint identifiers mapped to it.
#[must_use]
pub fn builtin_packages() -> Vec<(Package, &'static [&'static str])> {
    vec![
        (to220(), TO220_FOOTPRINTS),
        (to92(), TO92_FOOTPRINTS),
        (dip(), DIP_FOOTPRINTS),
    ]
}

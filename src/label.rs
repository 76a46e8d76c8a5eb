//! Pin label rewriting.
//!
//! KiCad pin names carry inline markup: `~{X}` draws an overbar (active-low
//! signal), `_{X}` and `^{X}` are sub- and superscripts, and `/` separates
//! alternate functions. [`normalize`] turns that markup into plain prose.

use std::sync::LazyLock;

use regex::Regex;

/// Literal pin name KiCad uses for an unnamed pin.
pub const UNCONNECTED: &str = "~";

/// Literal pin name used for a no-connection pin.
pub const NO_CONNECT: &str = "NC";

static INVERTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"~\{([^}]+?)\}").expect("valid inversion regex"));

static SUBSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\{([^}]+?)\}").expect("valid subscript regex"));

static SUPERSCRIPT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\^\{([^}]+?)\}").expect("valid superscript regex"));

/// Rewrites a raw pin label into readable text.
///
/// Rules are applied in order, each on the output of the previous one:
///
/// 1. `~{X}` becomes `X (active low)`
/// 2. `_{X}` becomes `_X`
/// 3. `^{X}` becomes `_X`
/// 4. A `/` between two non-whitespace characters becomes ` / `
///
/// # Examples
///
/// ```
/// use pinout_docs::label::normalize;
///
/// assert_eq!(normalize("~{RESET}"), "RESET (active low)");
/// assert_eq!(normalize("SDA/PB2/MISO"), "SDA / PB2 / MISO");
/// assert_eq!(normalize("V_{cc}"), "V_cc");
/// ```
#[must_use]
pub fn normalize(raw: &str) -> String {
    let text = INVERTED.replace_all(raw, "$1 (active low)");
    let text = SUBSCRIPT.replace_all(&text, "_$1");
    let text = SUPERSCRIPT.replace_all(&text, "_$1");
    space_slashes(&text)
}

/// Surrounds each `/` that touches non-whitespace on both sides with spaces.
fn space_slashes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 8);

    for (i, &c) in chars.iter().enumerate() {
        let tight = c == '/'
            && i > 0
            && !chars[i - 1].is_whitespace()
            && chars.get(i + 1).is_some_and(|next| !next.is_whitespace());

        if tight {
            out.push_str(" / ");
        } else {
            out.push(c);
        }
    }

    out
}

/// Returns true if a raw pin name carries information worth documenting.
#[must_use]
pub fn is_meaningful(raw: &str) -> bool {
    !(raw.is_empty() || raw == UNCONNECTED || raw == NO_CONNECT)
}

/// Returns true if at least one raw pin name is meaningful.
pub fn has_meaningful_labels<'a, I>(names: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    names.into_iter().any(is_meaningful)
}

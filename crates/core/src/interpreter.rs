//! Recovers the match percentage from free-text model output.
//!
//! The marker text and the threshold are a compatibility contract: identical
//! model output must always classify identically.

use crate::models::{MatchAssessment, Suitability};

pub const MATCH_MARKER: &str = "JD Match:";
pub const SUITABILITY_THRESHOLD: f64 = 60.0;

/// Line boundaries recognised when cutting out the marker line.
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0b}' | '\u{0c}' | '\u{1c}' | '\u{1d}' | '\u{1e}' | '\u{85}' | '\u{2028}'
            | '\u{2029}'
    )
}

/// First code point of every block of ten decimal digits (general category Nd).
const DECIMAL_DIGIT_ZEROS: &[u32] = &[
    0x0030, 0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66,
    0x0CE6, 0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946,
    0x19D0, 0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0,
    0xA9F0, 0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x10D30, 0x11066, 0x110F0, 0x11136, 0x111D0,
    0x112F0, 0x11450, 0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11950, 0x11C50, 0x11D50,
    0x11DA0, 0x11F50, 0x16A60, 0x16AC0, 0x16B50, 0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6,
    0x1E140, 0x1E2F0, 0x1E4F0, 0x1E950, 0x1FBF0,
];

/// ASCII form of a decimal digit from any script, e.g. `'٧'` and `'７'` give `'7'`.
fn decimal_digit(c: char) -> Option<char> {
    let code = u32::from(c);
    DECIMAL_DIGIT_ZEROS
        .iter()
        .find_map(|zero| code.checked_sub(*zero).filter(|offset| *offset < 10))
        .and_then(|value| char::from_digit(value, 10))
}

/// Returns the percentage following the first `JD Match:` marker, or 0 when
/// the marker is missing or no digits survive.
///
/// Only the text between the marker's colon and the next colon on that line
/// is considered. Decimal digits of any script are kept and every other
/// character is dropped, so `72.5%` reads as 725 and `７５%` as 75.
pub fn parse_match_percentage(output: &str) -> f64 {
    let Some(index) = output.find(MATCH_MARKER) else {
        return 0.0;
    };

    let line = output[index..].split(is_line_break).next().unwrap_or_default();
    let fragment = line.split(':').nth(1).unwrap_or_default();
    let fragment = fragment.trim().replace('%', "");

    let digits: String = fragment.chars().filter_map(decimal_digit).collect();
    if digits.is_empty() {
        return 0.0;
    }

    digits.parse::<f64>().unwrap_or(0.0)
}

pub fn classify(match_percentage: f64) -> Suitability {
    if match_percentage >= SUITABILITY_THRESHOLD {
        Suitability::Suitable
    } else {
        Suitability::NotSuitable
    }
}

pub fn interpret(output: &str) -> MatchAssessment {
    let match_percentage = parse_match_percentage(output);
    MatchAssessment {
        match_percentage,
        suitability: classify(match_percentage),
    }
}

//! Affiliation label formatting.

use crate::config::LabelStyle;
use compact_str::{CompactString, ToCompactString};

const NUMERALS: &[(usize, &str)] = &[
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Formats a 1-based affiliation position as a label.
///
/// # Examples
///
/// ```
/// use author_arranger::config::LabelStyle;
/// use author_arranger::label::format_label;
///
/// assert_eq!(format_label(3, LabelStyle::Numbers), "3");
/// assert_eq!(format_label(28, LabelStyle::LettersUppercase), "AB");
/// assert_eq!(format_label(14, LabelStyle::NumeralsLowercase), "xiv");
/// ```
pub fn format_label(position: usize, style: LabelStyle) -> CompactString {
    match style {
        LabelStyle::Numbers => position.to_compact_string(),
        LabelStyle::LettersLowercase => CompactString::from(to_letters(position).to_lowercase()),
        LabelStyle::LettersUppercase => to_letters(position),
        LabelStyle::NumeralsLowercase => CompactString::from(to_numerals(position).to_lowercase()),
        LabelStyle::NumeralsUppercase => to_numerals(position),
    }
}

/// Bijective base-26: 1 → A, 26 → Z, 27 → AA.
fn to_letters(mut position: usize) -> CompactString {
    let mut letters = Vec::new();
    while position > 0 {
        position -= 1;
        letters.push(char::from(b'A' + (position % 26) as u8));
        position /= 26;
    }
    letters.into_iter().rev().collect()
}

fn to_numerals(mut position: usize) -> CompactString {
    let mut numerals = CompactString::default();
    for (value, symbol) in NUMERALS {
        while position >= *value {
            numerals.push_str(symbol);
            position -= value;
        }
    }
    numerals
}

use crate::regex::Regex;
use std::sync::LazyLock;

// Unicode White_Space spelled out, since `regex-lite` only matches ASCII with `\s`.
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\s\x{85}\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}]+")
        .unwrap()
});

/// Collapses runs of whitespace into a single space and trims both ends.
///
/// # Arguments
///
/// * `value` - The raw cell text
pub fn normalize_spaces(value: &str) -> String {
    WHITESPACE_REGEX.replace_all(value, " ").trim().to_string()
}

/// Returns the normalized text of a cell, treating missing cells and
/// unmapped columns as empty.
///
/// # Arguments
///
/// * `row` - The spreadsheet row
/// * `column` - The mapped column, if any
pub fn cell_text(row: &[Option<String>], column: Option<usize>) -> String {
    column
        .and_then(|column| row.get(column))
        .and_then(|cell| cell.as_deref())
        .map(normalize_spaces)
        .unwrap_or_default()
}

/// Returns the first character of `text` in upper case, or an empty string.
///
/// Always at most one character, even where the full uppercase mapping is longer.
pub fn initial(text: &str) -> String {
    text.chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .map(String::from)
        .unwrap_or_default()
}

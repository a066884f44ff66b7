//! Per-field text formatting.
//!
//! A formatted field carries its own trailing punctuation and spacing, so a
//! display name is just the concatenation of its formatted fields, trimmed.

use crate::config::FieldSpec;
use crate::utils::{cell_text, initial, normalize_spaces};

/// Formats a single cell value according to its field options.
///
/// Empty values and unmapped or disabled fields produce an empty string. Otherwise
/// whitespace is collapsed, the value is optionally abbreviated to its first
/// character, a period and a comma are appended when requested (the comma only
/// when this is not the last non-empty field of the group), and a trailing space
/// is added unless an abbreviation asked for it to be removed.
///
/// # Arguments
///
/// * `raw` - The cell value, if any
/// * `spec` - Formatting options for the field
/// * `is_last_non_empty` - Whether no later field in the group has text
///
/// # Examples
///
/// ```
/// use author_arranger::config::FieldSpec;
/// use author_arranger::format::format_field;
///
/// let first = FieldSpec::new("First", 0)
///     .with_column(0)
///     .with_abbreviate(true)
///     .with_period(true)
///     .with_remove_space(true);
/// assert_eq!(format_field(Some("john"), &first, true), "J.");
/// ```
pub fn format_field(raw: Option<&str>, spec: &FieldSpec, is_last_non_empty: bool) -> String {
    if !spec.is_active() {
        return String::new();
    }

    let value = match raw {
        Some(raw) => normalize_spaces(raw),
        None => return String::new(),
    };
    if value.is_empty() {
        return String::new();
    }

    let mut text = if spec.abbreviate {
        initial(&value)
    } else {
        value
    };

    if spec.add_period {
        text.push('.');
    }
    if spec.add_comma && !is_last_non_empty {
        text.push(',');
    }
    if !(spec.abbreviate && spec.remove_space) {
        text.push(' ');
    }

    text
}

/// Formats every field of a group from one row and joins them into display text.
///
/// Fields are taken in the order given; callers pass them sorted by display index.
pub fn format_fields(row: &[Option<String>], fields: &[&FieldSpec]) -> String {
    let values: Vec<String> = fields
        .iter()
        .map(|field| {
            if field.is_active() {
                cell_text(row, field.column)
            } else {
                String::new()
            }
        })
        .collect();

    let last_non_empty = values.iter().rposition(|value| !value.is_empty());

    values
        .iter()
        .zip(fields)
        .enumerate()
        .map(|(position, (value, field))| {
            format_field(Some(value.as_str()), field, Some(position) == last_non_empty)
        })
        .collect::<String>()
        .trim()
        .to_string()
}

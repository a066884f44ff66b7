//! Error types for arrangement operations.
//!
//! Configuration problems and broken author/affiliation links are kept apart:
//! the first means the field mappings and the template are out of sync, the
//! second means the grouping stage produced ids that do not line up with the
//! entities built from them.

use std::fmt;
use thiserror::Error;

/// Field name constants for the spreadsheet template.
pub mod fields {
    pub const TITLE: &str = "Title";
    pub const FIRST: &str = "First";
    pub const MIDDLE: &str = "Middle";
    pub const LAST: &str = "Last";
    pub const DEGREE: &str = "Degree";
    pub const OTHER: &str = "Other";
    pub const EMAIL: &str = "Email";
    pub const DEPARTMENT: &str = "Department";
    pub const DIVISION: &str = "Division";
    pub const INSTITUTE: &str = "Institute";
    pub const STREET: &str = "Street";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const POSTAL_CODE: &str = "Postal Code";
    pub const COUNTRY: &str = "Country";
    pub const AFFILIATIONS: &str = "Affiliations";
}

/// The field group a configuration problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    Author,
    Affiliation,
    Email,
}

impl FieldGroup {
    /// Convert the group to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldGroup::Author => "author",
            FieldGroup::Affiliation => "affiliation",
            FieldGroup::Email => "email",
        }
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for arrangement operations.
pub type Result<T> = std::result::Result<T, ArrangeError>;

/// Top-level error type for arrangement operations.
#[derive(Error, Debug)]
pub enum ArrangeError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Internal consistency failure: {0}")]
    MalformedGroupLink(#[from] GroupLinkError),

    #[error("Invalid author order for {len} authors: {reason}")]
    InvalidAuthorOrder { len: usize, reason: String },

    #[cfg(feature = "csv")]
    #[error("Unable to read worksheet: {0}")]
    Worksheet(String),
}

/// Field mappings that cannot be used to arrange a sheet.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("the {group} fields have no field named \"{name}\"")]
    MissingField { group: FieldGroup, name: String },

    #[error("the {group} fields contain \"{name}\" more than once")]
    DuplicateField { group: FieldGroup, name: String },

    #[error("the {group} separator is \"other\" but no custom separator is set")]
    EmptyCustomSeparator { group: FieldGroup },

    #[error("row order is not a permutation of {rows} rows: {reason}")]
    InvalidRowOrder { rows: usize, reason: String },
}

/// Author/affiliation links that do not resolve.
///
/// These indicate a defect in grouping or building, never bad user input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GroupLinkError {
    #[error("author at row {author_row_id} references missing affiliation row {affiliation_row_id}")]
    MissingAffiliation {
        author_row_id: usize,
        affiliation_row_id: usize,
    },

    #[error("affiliation at row {affiliation_row_id} references missing author row {author_row_id}")]
    MissingAuthor {
        affiliation_row_id: usize,
        author_row_id: usize,
    },

    #[error("{ids} group id pairs were given for {rows} rows")]
    RowIdsLength { rows: usize, ids: usize },

    #[error("group id {row_id} is outside of the {rows} input rows")]
    RowOutOfRange { row_id: usize, rows: usize },
}

#[cfg(feature = "csv")]
impl From<csv::Error> for ArrangeError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(position) => {
                ArrangeError::Worksheet(format!("line {}: {}", position.line(), err))
            }
            None => ArrangeError::Worksheet(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = ArrangeError::from(ConfigError::MissingField {
            group: FieldGroup::Author,
            name: fields::LAST.to_string(),
        });

        let display = format!("{}", error);
        assert!(display.contains("Invalid configuration"));
        assert!(display.contains("author fields"));
        assert!(display.contains("\"Last\""));
    }

    #[test]
    fn test_group_link_error_display() {
        let error = ArrangeError::from(GroupLinkError::MissingAffiliation {
            author_row_id: 3,
            affiliation_row_id: 9,
        });

        assert_eq!(
            format!("{}", error),
            "Internal consistency failure: author at row 3 references missing affiliation row 9"
        );
    }

    #[test]
    fn test_separator_error_display() {
        let error = ConfigError::EmptyCustomSeparator {
            group: FieldGroup::Affiliation,
        };
        assert_eq!(
            format!("{}", error),
            "the affiliation separator is \"other\" but no custom separator is set"
        );
    }

    #[test]
    fn test_field_group_display() {
        assert_eq!(format!("{}", FieldGroup::Author), "author");
        assert_eq!(format!("{}", FieldGroup::Affiliation), "affiliation");
        assert_eq!(format!("{}", FieldGroup::Email), "email");
    }

    #[cfg(feature = "csv")]
    #[test]
    fn test_csv_error_conversion() {
        let csv_content = "a,b\n1,2,3";
        let mut reader = csv::Reader::from_reader(csv_content.as_bytes());
        let result = reader.records().next();

        if let Some(Err(csv_err)) = result {
            let error: ArrangeError = csv_err.into();
            assert!(matches!(error, ArrangeError::Worksheet(_)));
        }
    }
}

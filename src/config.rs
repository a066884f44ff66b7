//! Field mappings and layout configuration.
//!
//! This module defines the template headers, the per-field formatting options
//! and the author/affiliation/email group settings the arranger is driven by.
//! All types deserialize from the same camelCase JSON the web form produces.

use crate::error::{ConfigError, FieldGroup, fields};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Column headers of the spreadsheet template, in template order.
pub const DEFAULT_HEADERS: &[&str] = &[
    fields::TITLE,
    fields::FIRST,
    fields::MIDDLE,
    fields::LAST,
    fields::DEGREE,
    fields::OTHER,
    fields::EMAIL,
    fields::DEPARTMENT,
    fields::DIVISION,
    fields::INSTITUTE,
    fields::STREET,
    fields::CITY,
    fields::STATE,
    fields::POSTAL_CODE,
    fields::COUNTRY,
];

/// Fields whose values identify an author.
pub const AUTHOR_IDENTITY_FIELDS: &[&str] = &[
    fields::TITLE,
    fields::FIRST,
    fields::MIDDLE,
    fields::LAST,
    fields::DEGREE,
    fields::OTHER,
];

/// Fields whose values identify an affiliation in the detailed template.
pub const DETAILED_AFFILIATION_FIELDS: &[&str] = &[
    fields::DEPARTMENT,
    fields::DIVISION,
    fields::INSTITUTE,
    fields::STREET,
    fields::CITY,
    fields::STATE,
    fields::POSTAL_CODE,
    fields::COUNTRY,
];

/// Fields whose values identify an affiliation when a sheet keeps the whole
/// affiliation in one column.
pub const COMBINED_AFFILIATION_FIELDS: &[&str] = &[fields::AFFILIATIONS];

/// Formatting options for one spreadsheet column.
///
/// A field with no `column`, or one that is `disabled`, contributes no text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldSpec {
    /// Template field name, unique within its group
    pub name: String,
    /// Zero-based column of the sheet holding this field
    pub column: Option<usize>,
    /// Display order within the group
    pub index: usize,
    /// Keep only the first character
    pub abbreviate: bool,
    /// Append a period
    pub add_period: bool,
    /// Append a comma unless this is the last non-empty field
    pub add_comma: bool,
    /// Drop the trailing space after an abbreviation
    pub remove_space: bool,
    /// Exclude the field from formatted output
    pub disabled: bool,
}

impl FieldSpec {
    /// Creates an unmapped field with no formatting options.
    pub fn new(name: &str, index: usize) -> Self {
        Self {
            name: name.to_string(),
            index,
            ..Default::default()
        }
    }

    pub fn with_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_abbreviate(mut self, abbreviate: bool) -> Self {
        self.abbreviate = abbreviate;
        self
    }

    pub fn with_period(mut self, add_period: bool) -> Self {
        self.add_period = add_period;
        self
    }

    pub fn with_comma(mut self, add_comma: bool) -> Self {
        self.add_comma = add_comma;
        self
    }

    pub fn with_remove_space(mut self, remove_space: bool) -> Self {
        self.remove_space = remove_space;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Whether this field can contribute text.
    pub fn is_active(&self) -> bool {
        self.column.is_some() && !self.disabled
    }
}

/// Text placed between consecutive authors or affiliations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separator {
    #[default]
    Comma,
    Semicolon,
    Newline,
    Other,
}

impl Separator {
    /// Resolves the separator text, using `custom` for [`Separator::Other`].
    pub fn resolve<'a>(&self, custom: &'a str) -> &'a str {
        match self {
            Separator::Comma => ",",
            Separator::Semicolon => ";",
            Separator::Newline => "\n",
            Separator::Other => custom,
        }
    }
}

/// Where affiliation labels are drawn relative to the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelPosition {
    #[default]
    Superscript,
    Subscript,
    Inline,
}

/// How an affiliation's position is written as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LabelStyle {
    #[default]
    Numbers,
    LettersLowercase,
    LettersUppercase,
    NumeralsLowercase,
    NumeralsUppercase,
}

/// Which columns identify an affiliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliationSchema {
    /// Department through Country, one column each
    Detailed,
    /// A single `Affiliations` column
    Combined,
}

impl AffiliationSchema {
    /// Names of the identifying fields for this schema.
    pub fn identity_fields(&self) -> &'static [&'static str] {
        match self {
            AffiliationSchema::Detailed => DETAILED_AFFILIATION_FIELDS,
            AffiliationSchema::Combined => COMBINED_AFFILIATION_FIELDS,
        }
    }
}

/// Author byline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorConfig {
    pub fields: Vec<FieldSpec>,
    pub separator: Separator,
    pub custom_separator: String,
    pub label_position: LabelPosition,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            fields: vec![
                FieldSpec::new(fields::TITLE, 0).with_period(true),
                FieldSpec::new(fields::FIRST, 1),
                FieldSpec::new(fields::MIDDLE, 2),
                FieldSpec::new(fields::LAST, 3),
                FieldSpec::new(fields::DEGREE, 4),
                FieldSpec::new(fields::OTHER, 5),
            ],
            separator: Separator::Comma,
            custom_separator: String::new(),
            label_position: LabelPosition::Superscript,
        }
    }
}

impl AuthorConfig {
    /// Fields in display order.
    pub fn sorted_fields(&self) -> Vec<&FieldSpec> {
        sorted_by_index(&self.fields)
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Columns of the author-identifying fields, in identity order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if an identifying field is not configured.
    pub fn identity_columns(&self) -> Result<Vec<Option<usize>>, ConfigError> {
        identity_columns(&self.fields, AUTHOR_IDENTITY_FIELDS, FieldGroup::Author)
    }

    /// The separator text placed between authors.
    pub fn separator_text(&self) -> &str {
        self.separator.resolve(&self.custom_separator)
    }
}

/// Affiliation list settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AffiliationConfig {
    pub fields: Vec<FieldSpec>,
    pub separator: Separator,
    pub custom_separator: String,
    pub label_position: LabelPosition,
    pub label_style: LabelStyle,
}

impl Default for AffiliationConfig {
    fn default() -> Self {
        let fields = DETAILED_AFFILIATION_FIELDS
            .iter()
            .enumerate()
            .map(|(index, name)| FieldSpec::new(name, index).with_comma(*name != fields::COUNTRY))
            .collect();

        Self {
            fields,
            separator: Separator::Comma,
            custom_separator: String::new(),
            label_position: LabelPosition::Superscript,
            label_style: LabelStyle::Numbers,
        }
    }
}

impl AffiliationConfig {
    /// Configuration for sheets with a single `Affiliations` column.
    pub fn combined() -> Self {
        Self {
            fields: vec![FieldSpec::new(fields::AFFILIATIONS, 0)],
            ..Default::default()
        }
    }

    /// Fields in display order.
    pub fn sorted_fields(&self) -> Vec<&FieldSpec> {
        sorted_by_index(&self.fields)
    }

    /// Finds a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// The identity schema implied by the configured field names.
    pub fn schema(&self) -> AffiliationSchema {
        if self.field(fields::AFFILIATIONS).is_some() {
            AffiliationSchema::Combined
        } else {
            AffiliationSchema::Detailed
        }
    }

    /// Columns of the affiliation-identifying fields, in identity order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] if an identifying field is not configured.
    pub fn identity_columns(&self) -> Result<Vec<Option<usize>>, ConfigError> {
        identity_columns(
            &self.fields,
            self.schema().identity_fields(),
            FieldGroup::Affiliation,
        )
    }

    /// Whether any affiliation field is mapped to a column.
    pub fn has_mapped_columns(&self) -> bool {
        self.fields.iter().any(|field| field.column.is_some())
    }

    /// The separator text placed between affiliations.
    pub fn separator_text(&self) -> &str {
        self.separator.resolve(&self.custom_separator)
    }
}

/// Email column settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailConfig {
    pub fields: Vec<FieldSpec>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            fields: vec![FieldSpec::new(fields::EMAIL, 0)],
        }
    }
}

impl EmailConfig {
    /// The column holding email addresses, if mapped.
    pub fn column(&self) -> Option<usize> {
        self.fields
            .iter()
            .find(|field| field.name == fields::EMAIL)
            .and_then(|field| field.column)
    }
}

/// Complete arranger configuration.
///
/// # Examples
///
/// ```
/// use author_arranger::config::ArrangeConfig;
///
/// let mut config = ArrangeConfig::new();
/// let all_known = config.map_headers(&["First", "Last", "Email", "Institute"]);
///
/// assert!(all_known);
/// assert_eq!(config.author.field("Last").unwrap().column, Some(1));
/// assert_eq!(config.email.column(), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArrangeConfig {
    pub author: AuthorConfig,
    pub affiliation: AffiliationConfig,
    pub email: EmailConfig,
}

impl ArrangeConfig {
    /// Creates the template configuration with every column unmapped.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps each header that names a template field onto that field's column.
    ///
    /// Returns `false` if the sheet has headers that match no configured field;
    /// those columns must be mapped by hand.
    pub fn map_headers<S: AsRef<str>>(&mut self, headers: &[S]) -> bool {
        let mut all_known = true;

        for (column, header) in headers.iter().enumerate() {
            let header = header.as_ref().trim();
            match self.field_mut(header) {
                Some(field) => field.column = Some(column),
                None => {
                    log::warn!("column {column} (\"{header}\") matches no template field");
                    all_known = false;
                }
            }
        }

        all_known
    }

    /// Sets the column of the field named `name` in any group.
    pub fn set_column(&mut self, name: &str, column: Option<usize>) -> &mut Self {
        match self.field_mut(name) {
            Some(field) => field.column = column,
            None => log::warn!("no field named \"{name}\" to map to column {column:?}"),
        }
        self
    }

    /// Sets the author separator.
    pub fn set_author_separator(&mut self, separator: Separator) -> &mut Self {
        self.author.separator = separator;
        self
    }

    /// Sets the affiliation separator.
    pub fn set_affiliation_separator(&mut self, separator: Separator) -> &mut Self {
        self.affiliation.separator = separator;
        self
    }

    /// Sets the label style used for affiliation labels.
    pub fn set_label_style(&mut self, style: LabelStyle) -> &mut Self {
        self.affiliation.label_style = style;
        self
    }

    /// Sets where labels are drawn in the byline and the affiliation list.
    pub fn set_label_position(&mut self, position: LabelPosition) -> &mut Self {
        self.author.label_position = position;
        self.affiliation.label_position = position;
        self
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut FieldSpec> {
        self.author
            .fields
            .iter_mut()
            .chain(self.affiliation.fields.iter_mut())
            .chain(self.email.fields.iter_mut())
            .find(|field| field.name == name)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_unique(&self.author.fields, FieldGroup::Author)?;
        check_unique(&self.affiliation.fields, FieldGroup::Affiliation)?;
        check_unique(&self.email.fields, FieldGroup::Email)?;

        self.author.identity_columns()?;
        self.affiliation.identity_columns()?;

        if self.author.separator == Separator::Other && self.author.custom_separator.is_empty() {
            return Err(ConfigError::EmptyCustomSeparator {
                group: FieldGroup::Author,
            });
        }
        if self.affiliation.separator == Separator::Other
            && self.affiliation.custom_separator.is_empty()
        {
            return Err(ConfigError::EmptyCustomSeparator {
                group: FieldGroup::Affiliation,
            });
        }

        Ok(())
    }
}

fn sorted_by_index(fields: &[FieldSpec]) -> Vec<&FieldSpec> {
    fields.iter().sorted_by_key(|field| field.index).collect()
}

fn identity_columns(
    fields: &[FieldSpec],
    names: &[&str],
    group: FieldGroup,
) -> Result<Vec<Option<usize>>, ConfigError> {
    names
        .iter()
        .map(|name| {
            fields
                .iter()
                .find(|field| field.name == *name)
                .map(|field| field.column)
                .ok_or_else(|| ConfigError::MissingField {
                    group,
                    name: name.to_string(),
                })
        })
        .collect()
}

fn check_unique(fields: &[FieldSpec], group: FieldGroup) -> Result<(), ConfigError> {
    match fields.iter().map(|field| &field.name).duplicates().next() {
        Some(name) => Err(ConfigError::DuplicateField {
            group,
            name: name.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[test]
    fn test_config_new() {
        let config = ArrangeConfig::new();
        assert_eq!(config.author.fields.len(), 6);
        assert_eq!(config.affiliation.fields.len(), 8);
        assert_eq!(config.email.column(), None);
        assert!(config.author.fields.iter().all(|field| field.column.is_none()));
        assert!(config.author.field(fields::TITLE).unwrap().add_period);
        assert!(config.affiliation.field(fields::CITY).unwrap().add_comma);
        assert!(!config.affiliation.field(fields::COUNTRY).unwrap().add_comma);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_map_headers_template() {
        let mut config = ArrangeConfig::new();
        assert!(config.map_headers(DEFAULT_HEADERS));

        assert_eq!(config.author.field(fields::TITLE).unwrap().column, Some(0));
        assert_eq!(config.author.field(fields::OTHER).unwrap().column, Some(5));
        assert_eq!(config.email.column(), Some(6));
        assert_eq!(
            config.affiliation.field(fields::DEPARTMENT).unwrap().column,
            Some(7)
        );
        assert_eq!(
            config.affiliation.field(fields::COUNTRY).unwrap().column,
            Some(14)
        );
    }

    #[test]
    fn test_map_headers_unknown_column() {
        let mut config = ArrangeConfig::new();
        assert!(!config.map_headers(&["First", "Nickname", "Last"]));
        assert_eq!(config.author.field(fields::FIRST).unwrap().column, Some(0));
        assert_eq!(config.author.field(fields::LAST).unwrap().column, Some(2));
    }

    #[test]
    fn test_sorted_fields_follow_index() {
        let mut config = AuthorConfig::default();
        config.fields[3].index = 0;
        config.fields[0].index = 3;

        let names: Vec<_> = config
            .sorted_fields()
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(
            names,
            ["Last", "First", "Middle", "Title", "Degree", "Other"]
        );
    }

    #[rstest]
    #[case(Separator::Comma, "", ",")]
    #[case(Separator::Semicolon, "", ";")]
    #[case(Separator::Newline, "", "\n")]
    #[case(Separator::Other, " and ", " and ")]
    fn test_separator_resolve(
        #[case] separator: Separator,
        #[case] custom: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(separator.resolve(custom), expected);
    }

    #[test]
    fn test_affiliation_schema() {
        assert_eq!(
            AffiliationConfig::default().schema(),
            AffiliationSchema::Detailed
        );

        let combined = AffiliationConfig::combined();
        assert_eq!(combined.schema(), AffiliationSchema::Combined);
        assert_eq!(combined.identity_columns().unwrap(), vec![None]);
    }

    #[test]
    fn test_identity_columns_missing_field() {
        let mut config = AuthorConfig::default();
        config.fields.retain(|field| field.name != fields::MIDDLE);

        assert_eq!(
            config.identity_columns(),
            Err(ConfigError::MissingField {
                group: FieldGroup::Author,
                name: "Middle".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_duplicate_field() {
        let mut config = ArrangeConfig::new();
        config.affiliation.fields.push(FieldSpec::new(fields::CITY, 8));

        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateField {
                group: FieldGroup::Affiliation,
                name: "City".to_string(),
            })
        );
    }

    #[test]
    fn test_validate_custom_separator() {
        let mut config = ArrangeConfig::new();
        config.set_author_separator(Separator::Other);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyCustomSeparator {
                group: FieldGroup::Author
            })
        ));

        config.author.custom_separator = " & ".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_configuration_chaining() {
        let mut config = ArrangeConfig::new();
        config
            .set_column(fields::FIRST, Some(1))
            .set_column(fields::EMAIL, Some(4))
            .set_label_style(LabelStyle::NumeralsLowercase)
            .set_label_position(LabelPosition::Inline)
            .set_affiliation_separator(Separator::Newline);

        assert_eq!(config.author.field(fields::FIRST).unwrap().column, Some(1));
        assert_eq!(config.email.column(), Some(4));
        assert_eq!(config.affiliation.label_style, LabelStyle::NumeralsLowercase);
        assert_eq!(config.author.label_position, LabelPosition::Inline);
        assert_eq!(config.affiliation.separator, Separator::Newline);
    }

    #[test]
    fn test_deserialize_form_json() {
        let json = r#"{
            "author": {
                "fields": [
                    {"name": "First", "column": 0, "index": 0, "abbreviate": true, "addPeriod": true, "removeSpace": true},
                    {"name": "Last", "column": 1, "index": 1}
                ],
                "separator": "other",
                "customSeparator": " and ",
                "labelPosition": "subscript"
            },
            "affiliation": {
                "fields": [{"name": "Affiliations", "column": 2, "index": 0}],
                "labelStyle": "letters-lowercase",
                "labelPosition": "inline"
            },
            "email": {"fields": [{"name": "Email", "column": null, "index": 0}]}
        }"#;

        let config: ArrangeConfig = serde_json::from_str(json).unwrap();
        let first = config.author.field(fields::FIRST).unwrap();
        assert!(first.abbreviate && first.add_period && first.remove_space);
        assert!(!first.add_comma);
        assert_eq!(config.author.separator_text(), " and ");
        assert_eq!(config.author.label_position, LabelPosition::Subscript);
        assert_eq!(config.affiliation.schema(), AffiliationSchema::Combined);
        assert_eq!(config.affiliation.label_style, LabelStyle::LettersLowercase);
        assert_eq!(config.affiliation.separator, Separator::Comma);
        assert_eq!(config.email.column(), None);
    }

    #[test]
    fn test_label_style_serialization() {
        let json = serde_json::to_string(&LabelStyle::NumeralsUppercase).unwrap();
        assert_eq!(json, "\"numerals-uppercase\"");
    }
}

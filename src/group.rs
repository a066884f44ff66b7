//! Row grouping.
//!
//! Sheets commonly leave the author cells blank on the rows that follow an
//! author, listing one extra affiliation per row. Grouping decodes that
//! convention: every row gets the row id of the author it belongs to and the
//! row id of the first row carrying the same affiliation.

use crate::Row;
use crate::config::{AffiliationConfig, AuthorConfig};
use crate::error::ConfigError;
use crate::utils::cell_text;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Group identifiers assigned to one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowIds {
    /// Row where the row's author group starts
    pub author_row_id: usize,
    /// First row with an identical affiliation
    pub affiliation_row_id: usize,
}

impl RowIds {
    pub fn new(author_row_id: usize, affiliation_row_id: usize) -> Self {
        Self {
            author_row_id,
            affiliation_row_id,
        }
    }
}

/// The normalized values of a row at a set of identifying columns.
///
/// Unmapped columns and missing cells read as empty strings, so two rows
/// compare equal exactly when every identifying value matches after
/// whitespace normalization.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdentityKey(Vec<String>);

impl IdentityKey {
    /// Extracts the identifying values of `row`.
    pub fn from_row(row: &[Option<String>], columns: &[Option<usize>]) -> Self {
        Self(columns.iter().map(|column| cell_text(row, *column)).collect())
    }

    /// Whether every identifying value is empty.
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(String::is_empty)
    }

    pub fn values(&self) -> &[String] {
        &self.0
    }
}

/// Assigns author and affiliation group ids to every row.
///
/// A row whose author values are all blank continues the previous row's author;
/// any other row starts a new author group identified by its own index. A row's
/// affiliation id is the index of the first row with an identical affiliation.
/// The output has one entry per input row, in input order.
///
/// # Errors
///
/// Returns [`ConfigError::MissingField`] if an identifying field is missing from
/// either field group.
///
/// # Examples
///
/// ```
/// use author_arranger::config::ArrangeConfig;
/// use author_arranger::group::{group_rows, RowIds};
///
/// let mut config = ArrangeConfig::new();
/// config.map_headers(&["Last", "City"]);
///
/// let rows: Vec<Vec<Option<String>>> = [["Curie", "Paris"], ["", "Warsaw"], ["Bohr", "Paris"]]
///     .iter()
///     .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
///     .collect();
///
/// let ids = group_rows(&rows, &config.author, &config.affiliation).unwrap();
/// assert_eq!(ids, vec![RowIds::new(0, 0), RowIds::new(0, 1), RowIds::new(2, 0)]);
/// ```
pub fn group_rows(
    rows: &[Row],
    author: &AuthorConfig,
    affiliation: &AffiliationConfig,
) -> Result<Vec<RowIds>, ConfigError> {
    let author_columns = author.identity_columns()?;
    let affiliation_columns = affiliation.identity_columns()?;

    let mut first_affiliation_rows: HashMap<IdentityKey, usize> = HashMap::new();
    let mut previous_author: Option<usize> = None;
    let mut row_ids = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let author_key = IdentityKey::from_row(row, &author_columns);
        let author_row_id = match previous_author {
            Some(previous) if author_key.is_blank() => previous,
            _ => index,
        };
        previous_author = Some(author_row_id);

        let affiliation_key = IdentityKey::from_row(row, &affiliation_columns);
        let affiliation_row_id = *first_affiliation_rows
            .entry(affiliation_key)
            .or_insert(index);

        log::trace!("row {index}: author group {author_row_id}, affiliation group {affiliation_row_id}");
        row_ids.push(RowIds::new(author_row_id, affiliation_row_id));
    }

    Ok(row_ids)
}

//! Arrange spreadsheet author and affiliation records into a labeled byline.
//!
//! `author_arranger` takes the rows of an author sheet (one author per anchor row,
//! with blank-author continuation rows for additional affiliations), groups and
//! deduplicates them, and produces an ordered byline of author names with
//! affiliation labels plus the matching, deduplicated affiliation list.
//!
//! # Features
//!
//! - `csv` - Load worksheets from CSV exports (enabled by default)
//! - `regex` - Use the `regex` engine for text normalization (enabled by default)
//! - `lite` - Use `regex-lite` instead, for small wasm builds
//!
//! ```toml
//! [dependencies]
//! author-arranger = { version = "0.1", default-features = false, features = ["lite"] }
//! ```
//!
//! # Key Characteristics
//!
//! - **Merged-cell grouping**: rows whose author cells are blank continue the
//!   previous author, so one author can list several affiliations
//! - **Deduplication**: identical affiliations collapse to one entry, and authors
//!   with identical fields are flagged as duplicates
//! - **Stable labels**: numbers, letters or roman numerals, renumbered whenever
//!   authors are reordered or removed
//! - **Renderer agnostic**: output is a small tree of tagged text nodes
//!
//! # Basic Usage
//!
//! ```rust
//! use author_arranger::{Arranger, config::ArrangeConfig};
//!
//! fn row(cells: &[&str]) -> Vec<Option<String>> {
//!     cells.iter().map(|cell| Some(cell.to_string())).collect()
//! }
//!
//! let mut config = ArrangeConfig::new();
//! config.map_headers(&["First", "Last", "Institute"]);
//!
//! let rows = vec![
//!     row(&["Ada", "Lovelace", "University of London"]),
//!     row(&["", "", "Analytical Society"]),
//!     row(&["Charles", "Babbage", "University of London"]),
//! ];
//!
//! let arrangement = Arranger::with_config(config).arrange(&rows).unwrap();
//! assert_eq!(arrangement.authors.len(), 2);
//! assert_eq!(arrangement.affiliations.len(), 2);
//! assert_eq!(arrangement.authors[0].affiliation_ids, vec![1, 2]);
//! assert_eq!(arrangement.authors[1].affiliation_ids, vec![1]);
//! ```
//!
//! # Re-arrangement
//!
//! ```rust
//! use author_arranger::{Arranger, config::ArrangeConfig};
//!
//! # fn row(cells: &[&str]) -> Vec<Option<String>> {
//! #     cells.iter().map(|cell| Some(cell.to_string())).collect()
//! # }
//! let mut config = ArrangeConfig::new();
//! config.map_headers(&["First", "Last", "Institute"]);
//!
//! let rows = vec![
//!     row(&["Ada", "Lovelace", "University of London"]),
//!     row(&["Charles", "Babbage", "Royal Society"]),
//! ];
//!
//! let mut arrangement = Arranger::with_config(config).arrange(&rows).unwrap();
//! arrangement.move_author(1, 0).unwrap();
//!
//! assert_eq!(arrangement.authors[0].name, "Charles Babbage");
//! assert_eq!(arrangement.affiliations[0].name, "Royal Society");
//! assert_eq!(arrangement.affiliations[0].id, Some(1));
//! ```
//!
//! # Error Handling
//!
//! Operations return [`Result`], which wraps [`ArrangeError`]. Configuration errors
//! mean the field mappings do not match the template; group link errors are
//! internal consistency failures and abort the arrangement.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub mod arranger;
pub mod build;
pub mod config;
pub mod email;
pub mod error;
pub mod format;
pub mod group;
pub mod label;
pub mod markup;
pub mod rearrange;
pub mod worksheet;

// Reexports
pub use arranger::{Arrangement, Arranger};
pub use config::ArrangeConfig;
pub use error::{ArrangeError, ConfigError, GroupLinkError, Result};
pub use group::RowIds;
pub use markup::MarkupElement;
pub use worksheet::Worksheet;

mod regex;
mod utils;

/// One spreadsheet row; missing cells are `None`.
pub type Row = Vec<Option<String>>;

/// Display name used when an author group has no author text.
pub const NO_AUTHOR_PLACEHOLDER: &str = "(No author data provided)";

/// Display name used when an affiliation group has no affiliation text.
pub const NO_AFFILIATION_PLACEHOLDER: &str = "(No affiliation data provided)";

/// An author built from one author group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// 1-based position among non-removed authors, `None` while removed
    pub id: Option<usize>,
    /// Row where this author's identifying fields first appear
    pub row_id: usize,
    /// Formatted display name
    pub name: String,
    /// Current labels of the linked affiliations, in link order
    pub affiliation_ids: Vec<usize>,
    /// Rows identifying the linked affiliations, in link order
    pub affiliation_row_ids: Vec<usize>,
    /// Shares all identifying fields with another non-removed author
    pub duplicate: bool,
    /// Excluded from the byline by the user
    pub removed: bool,
    /// Cell values keyed by field name, with whitespace runs collapsed and trimmed
    pub fields: BTreeMap<String, String>,
}

impl Author {
    /// Field values used for duplicate detection (everything except Email).
    pub fn identity_fields(&self) -> impl Iterator<Item = (&String, &String)> {
        self.fields
            .iter()
            .filter(|(name, _)| name.as_str() != error::fields::EMAIL)
    }

    /// Whether both authors have identical fields, ignoring Email.
    pub fn same_fields(&self, other: &Author) -> bool {
        self.identity_fields().eq(other.identity_fields())
    }

    /// Returns the value of a field, or an empty string.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }
}

/// A deduplicated affiliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Affiliation {
    /// 1-based label position among non-removed affiliations, `None` while removed
    pub id: Option<usize>,
    /// First row with this affiliation's identifying fields
    pub row_id: usize,
    /// Formatted display name
    pub name: String,
    /// Rows of the authors referencing this affiliation
    pub author_row_ids: BTreeSet<usize>,
    /// No referencing author is currently shown
    pub removed: bool,
}

/// Arranges `rows` with `config` in sheet order.
///
/// Shorthand for [`Arranger::with_config`] followed by [`Arranger::arrange`].
pub fn arrange(rows: &[Row], config: &ArrangeConfig) -> Result<Arrangement> {
    Arranger::with_config(config.clone()).arrange(rows)
}

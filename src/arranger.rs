//! The arrangement pipeline.
//!
//! [`Arranger`] runs grouping, building, re-arrangement and markup generation over a
//! sheet and returns an [`Arrangement`]. An arrangement can then be edited by
//! moving, reordering, removing and restoring authors; every edit recomputes ids,
//! labels, duplicate flags, markup and emails.

use crate::build::build_authors;
use crate::config::ArrangeConfig;
use crate::email::extract_emails;
use crate::error::{ConfigError, Result};
use crate::group::{RowIds, group_rows};
use crate::markup::{MarkupElement, Tag, generate_markup};
use crate::rearrange::{self, check_permutation};
use crate::{Affiliation, Author, Row};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// Arranges sheets with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Arranger {
    config: ArrangeConfig,
    row_order: Option<Vec<usize>>,
}

impl Arranger {
    /// Creates an arranger with the template configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arranger with the given configuration.
    #[must_use]
    pub fn with_config(config: ArrangeConfig) -> Self {
        Self {
            config,
            row_order: None,
        }
    }

    /// Replaces the configuration.
    pub fn set_config(&mut self, config: ArrangeConfig) -> &mut Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ArrangeConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ArrangeConfig {
        &mut self.config
    }

    /// Sets the order rows are read in, or `None` for sheet order.
    ///
    /// Position `i` of the order names the sheet row read `i`th. Row ids in the
    /// resulting arrangement refer to positions in this order.
    pub fn set_row_order(&mut self, order: Option<Vec<usize>>) -> &mut Self {
        self.row_order = order;
        self
    }

    /// Arranges `rows`, which must not include the header row.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangeError::InvalidConfiguration`](crate::ArrangeError::InvalidConfiguration)
    /// if the configuration does not validate or the row order is not a permutation
    /// of the rows, and
    /// [`ArrangeError::MalformedGroupLink`](crate::ArrangeError::MalformedGroupLink)
    /// if grouped rows fail to link up.
    pub fn arrange(&self, rows: &[Row]) -> Result<Arrangement> {
        self.config.validate()?;
        let rows = self.ordered_rows(rows)?;

        let row_ids = group_rows(&rows, &self.config.author, &self.config.affiliation)?;
        let built = build_authors(
            &rows,
            &row_ids,
            &self.config.author,
            &self.config.affiliation,
            self.config.email.column(),
        )?;

        let mut arrangement = Arrangement {
            row_ids,
            authors: built.authors,
            affiliations: built.affiliations,
            duplicate_authors: false,
            markup: MarkupElement::new(Tag::Div),
            emails: Vec::new(),
            config: self.config.clone(),
        };
        arrangement.refresh()?;

        log::debug!(
            "arranged {} rows into {} authors and {} affiliations",
            rows.len(),
            arrangement.authors.len(),
            arrangement.affiliations.len()
        );
        Ok(arrangement)
    }

    fn ordered_rows<'a>(&self, rows: &'a [Row]) -> Result<Cow<'a, [Row]>> {
        let Some(order) = &self.row_order else {
            return Ok(Cow::Borrowed(rows));
        };

        check_permutation(order, rows.len()).map_err(|reason| ConfigError::InvalidRowOrder {
            rows: rows.len(),
            reason,
        })?;
        Ok(Cow::Owned(
            order.iter().map(|&position| rows[position].clone()).collect(),
        ))
    }
}

/// The arranged authors and affiliations of one sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrangement {
    /// Group ids of every row, in reading order
    pub row_ids: Vec<RowIds>,
    /// Authors in byline order, removed ones included
    pub authors: Vec<Author>,
    /// Affiliations in label order, removed ones last
    pub affiliations: Vec<Affiliation>,
    /// Whether any shown author is flagged as a duplicate
    pub duplicate_authors: bool,
    pub markup: MarkupElement,
    pub emails: Vec<String>,
    /// Configuration the arrangement was built with
    pub config: ArrangeConfig,
}

impl Arrangement {
    /// Moves the author at position `from` to position `to`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangeError::InvalidAuthorOrder`](crate::ArrangeError::InvalidAuthorOrder)
    /// if either position is out of range.
    ///
    /// Returns [`ArrangeError::MalformedGroupLink`](crate::ArrangeError::MalformedGroupLink)
    /// if the authors and affiliations do not link up; the arrangement is left untouched.
    pub fn move_author(&mut self, from: usize, to: usize) -> Result<()> {
        self.edit(|authors| rearrange::move_author(authors, from, to))
    }

    /// Reorders the authors so that position `i` holds the author previously at `order[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangeError::InvalidAuthorOrder`](crate::ArrangeError::InvalidAuthorOrder)
    /// if `order` is not a permutation of the author positions.
    ///
    /// Returns [`ArrangeError::MalformedGroupLink`](crate::ArrangeError::MalformedGroupLink)
    /// if the authors and affiliations do not link up; the arrangement is left untouched.
    pub fn reorder(&mut self, order: &[usize]) -> Result<()> {
        self.edit(|authors| rearrange::reorder_authors(authors, order))
    }

    /// Removes the author at `position` from the byline.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangeError::InvalidAuthorOrder`](crate::ArrangeError::InvalidAuthorOrder)
    /// if `position` is out of range.
    ///
    /// Returns [`ArrangeError::MalformedGroupLink`](crate::ArrangeError::MalformedGroupLink)
    /// if the authors and affiliations do not link up; the arrangement is left untouched.
    pub fn remove_author(&mut self, position: usize) -> Result<()> {
        self.set_removed(position, true)
    }

    /// Restores a removed author at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangeError::InvalidAuthorOrder`](crate::ArrangeError::InvalidAuthorOrder)
    /// if `position` is out of range.
    ///
    /// Returns [`ArrangeError::MalformedGroupLink`](crate::ArrangeError::MalformedGroupLink)
    /// if the authors and affiliations do not link up; the arrangement is left untouched.
    pub fn restore_author(&mut self, position: usize) -> Result<()> {
        self.set_removed(position, false)
    }

    /// Sets whether the author at `position` is removed.
    ///
    /// # Errors
    ///
    /// Returns [`ArrangeError::InvalidAuthorOrder`](crate::ArrangeError::InvalidAuthorOrder)
    /// if `position` is out of range.
    ///
    /// Returns [`ArrangeError::MalformedGroupLink`](crate::ArrangeError::MalformedGroupLink)
    /// if the authors and affiliations do not link up; the arrangement is left untouched.
    pub fn set_removed(&mut self, position: usize, removed: bool) -> Result<()> {
        self.edit(|authors| rearrange::set_removed(authors, position, removed))
    }

    /// Authors still shown in the byline.
    pub fn shown_authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.iter().filter(|author| !author.removed)
    }

    /// Affiliations still referenced by a shown author.
    pub fn shown_affiliations(&self) -> impl Iterator<Item = &Affiliation> {
        self.affiliations
            .iter()
            .filter(|affiliation| !affiliation.removed)
    }

    fn edit<F>(&mut self, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Vec<Author>) -> Result<()>,
    {
        rearrange::check_links(&self.authors, &self.affiliations)?;
        apply(&mut self.authors)?;
        self.refresh()
    }

    fn refresh(&mut self) -> Result<()> {
        let duplicates = rearrange::rearrange(&mut self.authors, &mut self.affiliations)?;
        self.duplicate_authors = duplicates > 0;
        self.markup = generate_markup(
            &self.authors,
            &self.affiliations,
            &self.config.author,
            &self.config.affiliation,
        );
        self.emails = extract_emails(&self.authors);
        Ok(())
    }
}

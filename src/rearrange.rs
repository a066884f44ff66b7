//! Re-arrangement after manual reordering or removal.
//!
//! The author list order is the byline order. After every change the authors are
//! renumbered, affiliations are shown or hidden depending on whether a shown author
//! still references them, shown affiliations are sorted by their first shown author
//! and relabeled 1..N, and duplicate flags are recomputed.

use crate::build::mark_duplicates;
use crate::error::{ArrangeError, GroupLinkError};
use crate::{Affiliation, Author, Result};
use itertools::Itertools;
use std::collections::HashMap;

/// Renumbers authors and affiliations and recomputes liveness, order and duplicates.
///
/// Returns the number of authors flagged as duplicates.
///
/// # Errors
///
/// Returns [`GroupLinkError`] if an author references an affiliation row that has no
/// affiliation, or an affiliation references an author row that has no author.
pub fn rearrange(
    authors: &mut [Author],
    affiliations: &mut [Affiliation],
) -> std::result::Result<usize, GroupLinkError> {
    check_links(authors, affiliations)?;

    let mut shown = 0;
    for author in authors.iter_mut() {
        author.id = (!author.removed).then(|| {
            shown += 1;
            shown
        });
    }

    let shown_ids: HashMap<usize, usize> = authors
        .iter()
        .filter_map(|author| author.id.map(|id| (author.row_id, id)))
        .collect();

    // Each affiliation is ordered by its first shown author; hidden ones go last.
    let first_author = |affiliation: &Affiliation| {
        affiliation
            .author_row_ids
            .iter()
            .filter_map(|row_id| shown_ids.get(row_id).copied())
            .min()
    };

    for affiliation in affiliations.iter_mut() {
        affiliation.removed = first_author(&*affiliation).is_none();
    }
    affiliations.sort_by_key(|affiliation| (affiliation.removed, first_author(affiliation)));

    let mut shown = 0;
    for affiliation in affiliations.iter_mut() {
        affiliation.id = (!affiliation.removed).then(|| {
            shown += 1;
            shown
        });
    }

    let labels: HashMap<usize, Option<usize>> = affiliations
        .iter()
        .map(|affiliation| (affiliation.row_id, affiliation.id))
        .collect();
    for author in authors.iter_mut() {
        author.affiliation_ids = author
            .affiliation_row_ids
            .iter()
            .filter_map(|row_id| labels.get(row_id).copied().flatten())
            .collect();
    }

    Ok(mark_duplicates(authors))
}

/// Moves the author at `from` to position `to`, shifting the authors in between.
///
/// # Errors
///
/// Returns [`ArrangeError::InvalidAuthorOrder`] if either position is out of range.
pub fn move_author(authors: &mut Vec<Author>, from: usize, to: usize) -> Result<()> {
    let len = authors.len();
    if from >= len || to >= len {
        return Err(ArrangeError::InvalidAuthorOrder {
            len,
            reason: format!("cannot move position {from} to {to}"),
        });
    }

    let author = authors.remove(from);
    authors.insert(to, author);
    Ok(())
}

/// Reorders authors so that position `i` holds the author previously at `order[i]`.
///
/// # Errors
///
/// Returns [`ArrangeError::InvalidAuthorOrder`] if `order` is not a permutation of
/// the current positions.
pub fn reorder_authors(authors: &mut Vec<Author>, order: &[usize]) -> Result<()> {
    check_permutation(order, authors.len()).map_err(|reason| {
        ArrangeError::InvalidAuthorOrder {
            len: authors.len(),
            reason,
        }
    })?;

    let mut previous: Vec<Option<Author>> = authors.drain(..).map(Some).collect();
    authors.extend(order.iter().filter_map(|&position| previous[position].take()));
    Ok(())
}

/// Marks the author at `position` as removed or restored.
///
/// # Errors
///
/// Returns [`ArrangeError::InvalidAuthorOrder`] if `position` is out of range.
pub fn set_removed(authors: &mut [Author], position: usize, removed: bool) -> Result<()> {
    let len = authors.len();
    let author = authors
        .get_mut(position)
        .ok_or_else(|| ArrangeError::InvalidAuthorOrder {
            len,
            reason: format!("no author at position {position}"),
        })?;
    author.removed = removed;
    Ok(())
}

/// Checks that `order` lists every index below `len` exactly once.
pub(crate) fn check_permutation(order: &[usize], len: usize) -> std::result::Result<(), String> {
    if order.len() != len {
        return Err(format!("expected {len} positions, got {}", order.len()));
    }
    if let Some(position) = order.iter().find(|&&position| position >= len) {
        return Err(format!("position {position} is out of range"));
    }
    if let Some(position) = order.iter().duplicates().next() {
        return Err(format!("position {position} is listed twice"));
    }
    Ok(())
}

/// Checks that every author/affiliation link resolves in both directions.
pub(crate) fn check_links(
    authors: &[Author],
    affiliations: &[Affiliation],
) -> std::result::Result<(), GroupLinkError> {
    for author in authors {
        if let Some(&affiliation_row_id) = author
            .affiliation_row_ids
            .iter()
            .find(|&&row_id| !affiliations.iter().any(|a| a.row_id == row_id))
        {
            return Err(GroupLinkError::MissingAffiliation {
                author_row_id: author.row_id,
                affiliation_row_id,
            });
        }
    }

    for affiliation in affiliations {
        if let Some(&author_row_id) = affiliation
            .author_row_ids
            .iter()
            .find(|&&row_id| !authors.iter().any(|a| a.row_id == row_id))
        {
            return Err(GroupLinkError::MissingAuthor {
                affiliation_row_id: affiliation.row_id,
                author_row_id,
            });
        }
    }

    Ok(())
}

//! Author and affiliation construction.
//!
//! Turns grouped rows into [`Author`] and [`Affiliation`] entities, linking each
//! author to the affiliations of its rows and flagging duplicate authors.

use crate::config::{AffiliationConfig, AuthorConfig, FieldSpec};
use crate::error::{GroupLinkError, fields};
use crate::format::format_fields;
use crate::group::RowIds;
use crate::utils::cell_text;
use crate::{Affiliation, Author, NO_AFFILIATION_PLACEHOLDER, NO_AUTHOR_PLACEHOLDER, Row};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Authors and affiliations built from one sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Built {
    pub authors: Vec<Author>,
    pub affiliations: Vec<Affiliation>,
}

/// Builds one author per author group and one affiliation per affiliation group.
///
/// Entities are created in first-encounter order and numbered from 1. An author is
/// linked to each affiliation of its rows once, in row order. Duplicate flags are
/// computed over the finished list.
///
/// # Arguments
///
/// * `rows` - The sheet rows, in arrangement order
/// * `row_ids` - Group ids from [`group_rows`](crate::group::group_rows), one per row
/// * `author` - Author field settings
/// * `affiliation` - Affiliation field settings
/// * `email_column` - Column holding author emails, if mapped
///
/// # Errors
///
/// Returns a [`GroupLinkError`] when `row_ids` does not line up with `rows`.
pub fn build_authors(
    rows: &[Row],
    row_ids: &[RowIds],
    author: &AuthorConfig,
    affiliation: &AffiliationConfig,
    email_column: Option<usize>,
) -> Result<Built, GroupLinkError> {
    if rows.len() != row_ids.len() {
        return Err(GroupLinkError::RowIdsLength {
            rows: rows.len(),
            ids: row_ids.len(),
        });
    }

    let author_fields = author.sorted_fields();
    let affiliation_fields = affiliation.sorted_fields();

    let mut built = Built::default();
    let mut author_index: HashMap<usize, usize> = HashMap::new();
    let mut affiliation_index: HashMap<usize, usize> = HashMap::new();

    for ids in row_ids {
        let author_row = row_at(rows, ids.author_row_id)?;
        let affiliation_row = row_at(rows, ids.affiliation_row_id)?;

        let author_position = *author_index.entry(ids.author_row_id).or_insert_with(|| {
            built.authors.push(new_author(
                built.authors.len() + 1,
                ids.author_row_id,
                author_row,
                author,
                &author_fields,
                email_column,
            ));
            built.authors.len() - 1
        });

        let affiliation_position = *affiliation_index
            .entry(ids.affiliation_row_id)
            .or_insert_with(|| {
                let name = format_fields(affiliation_row, &affiliation_fields);
                built.affiliations.push(Affiliation {
                    id: Some(built.affiliations.len() + 1),
                    row_id: ids.affiliation_row_id,
                    name: placeholder_if_empty(name, NO_AFFILIATION_PLACEHOLDER),
                    author_row_ids: BTreeSet::new(),
                    removed: false,
                });
                built.affiliations.len() - 1
            });

        let linked = &mut built.affiliations[affiliation_position];
        linked.author_row_ids.insert(ids.author_row_id);

        let owner = &mut built.authors[author_position];
        if !owner.affiliation_row_ids.contains(&linked.row_id) {
            owner.affiliation_row_ids.push(linked.row_id);
            owner.affiliation_ids.extend(linked.id);
        }
    }

    let duplicates = mark_duplicates(&mut built.authors);
    log::debug!(
        "built {} authors and {} affiliations from {} rows ({} duplicate authors)",
        built.authors.len(),
        built.affiliations.len(),
        rows.len(),
        duplicates
    );

    Ok(built)
}

/// Recomputes duplicate flags over the non-removed authors.
///
/// Two authors are duplicates when all of their fields except Email are equal;
/// both are flagged. Removed authors are never flagged. Returns the number of
/// flagged authors.
pub fn mark_duplicates(authors: &mut [Author]) -> usize {
    let mut flags = vec![false; authors.len()];

    for (i, first) in authors.iter().enumerate() {
        if first.removed {
            continue;
        }
        for (j, second) in authors.iter().enumerate().skip(i + 1) {
            if !second.removed && first.same_fields(second) {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }

    for (author, flag) in authors.iter_mut().zip(&flags) {
        author.duplicate = *flag;
    }

    let count = flags.iter().filter(|flag| **flag).count();
    if count > 0 {
        log::warn!("{count} authors share identical fields");
    }
    count
}

fn row_at(rows: &[Row], row_id: usize) -> Result<&Row, GroupLinkError> {
    rows.get(row_id).ok_or(GroupLinkError::RowOutOfRange {
        row_id,
        rows: rows.len(),
    })
}

fn new_author(
    id: usize,
    row_id: usize,
    row: &Row,
    config: &AuthorConfig,
    sorted_fields: &[&FieldSpec],
    email_column: Option<usize>,
) -> Author {
    let name = format_fields(row, sorted_fields);

    let mut values: BTreeMap<String, String> = config
        .fields
        .iter()
        .map(|field| (field.name.clone(), cell_text(row, field.column)))
        .collect();
    if email_column.is_some() {
        values.insert(fields::EMAIL.to_string(), cell_text(row, email_column));
    }

    Author {
        id: Some(id),
        row_id,
        name: placeholder_if_empty(name, NO_AUTHOR_PLACEHOLDER),
        affiliation_ids: Vec::new(),
        affiliation_row_ids: Vec::new(),
        duplicate: false,
        removed: false,
        fields: values,
    }
}

fn placeholder_if_empty(name: String, placeholder: &str) -> String {
    if name.is_empty() {
        placeholder.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrangeConfig;
    use crate::group::group_rows;
    use pretty_assertions::assert_eq;

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter()
            .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
            .collect()
    }

    fn build(config: &ArrangeConfig, data: &[Row]) -> Built {
        let ids = group_rows(data, &config.author, &config.affiliation).unwrap();
        build_authors(
            data,
            &ids,
            &config.author,
            &config.affiliation,
            config.email.column(),
        )
        .unwrap()
    }

    fn config(headers: &[&str]) -> ArrangeConfig {
        let mut config = ArrangeConfig::new();
        config.map_headers(headers);
        config
    }

    #[test]
    fn test_build_links_affiliations() {
        let config = config(&["Title", "First", "Last", "Email", "Institute", "City"]);
        let data = rows(&[
            &["Dr", "Marie", "Curie", "marie@example.org", "Sorbonne", "Paris"],
            &["", "", "", "", "Radium Institute", "Paris"],
            &["", "Pierre", "Curie", "", "Sorbonne", "Paris"],
        ]);

        let built = build(&config, &data);
        assert_eq!(built.authors.len(), 2);
        assert_eq!(built.affiliations.len(), 2);

        let marie = &built.authors[0];
        assert_eq!(marie.id, Some(1));
        assert_eq!(marie.row_id, 0);
        assert_eq!(marie.name, "Dr. Marie Curie");
        assert_eq!(marie.affiliation_ids, vec![1, 2]);
        assert_eq!(marie.affiliation_row_ids, vec![0, 1]);
        assert_eq!(marie.field("Email"), "marie@example.org");
        assert_eq!(marie.field("Middle"), "");

        let pierre = &built.authors[1];
        assert_eq!(pierre.id, Some(2));
        assert_eq!(pierre.row_id, 2);
        assert_eq!(pierre.name, "Pierre Curie");
        assert_eq!(pierre.affiliation_ids, vec![1]);

        assert_eq!(built.affiliations[0].name, "Sorbonne, Paris");
        assert_eq!(
            built.affiliations[0].author_row_ids,
            BTreeSet::from([0, 2])
        );
        assert_eq!(built.affiliations[1].name, "Radium Institute, Paris");
        assert_eq!(built.affiliations[1].id, Some(2));
    }

    #[test]
    fn test_fields_hold_collapsed_values() {
        let config = config(&["First", "Last", "Email"]);
        let data = vec![vec![
            Some("  Mary\u{A0} Ann ".to_string()),
            Some("Smith\t".to_string()),
            Some(" mary@example.org ".to_string()),
        ]];

        let built = build(&config, &data);
        let mary = &built.authors[0];
        assert_eq!(mary.field("First"), "Mary Ann");
        assert_eq!(mary.field("Last"), "Smith");
        assert_eq!(mary.field("Email"), "mary@example.org");
        assert_eq!(mary.name, "Mary Ann Smith");
    }

    #[test]
    fn test_repeated_affiliation_linked_once() {
        let config = config(&["Last", "Institute"]);
        let data = rows(&[&["Curie", "Sorbonne"], &["", "Sorbonne"], &["", "ETH"]]);

        let built = build(&config, &data);
        assert_eq!(built.authors[0].affiliation_row_ids, vec![0, 2]);
        assert_eq!(built.authors[0].affiliation_ids, vec![1, 2]);
    }

    #[test]
    fn test_identical_affiliations_collapse() {
        let config = config(&["Last", "Department", "Institute"]);
        let data = rows(&[
            &["Curie", "Physics", "Sorbonne"],
            &["Bohr", "Physics", "Sorbonne"],
        ]);

        let built = build(&config, &data);
        assert_eq!(built.affiliations.len(), 1);
        assert_eq!(built.authors[0].affiliation_ids, vec![1]);
        assert_eq!(built.authors[1].affiliation_ids, vec![1]);
    }

    #[test]
    fn test_placeholders() {
        let config = config(&["Last", "Institute"]);
        let data = rows(&[&["", ""], &["Bohr", ""]]);

        let built = build(&config, &data);
        assert_eq!(built.authors[0].name, NO_AUTHOR_PLACEHOLDER);
        assert_eq!(built.affiliations.len(), 1);
        assert_eq!(built.affiliations[0].name, NO_AFFILIATION_PLACEHOLDER);
    }

    #[test]
    fn test_duplicate_authors_flagged() {
        let config = config(&["First", "Last", "Email", "Institute"]);
        let data = rows(&[
            &["Niels", "Bohr", "niels@example.org", "Copenhagen"],
            &["Lise", "Meitner", "", "Berlin"],
            &["Niels", "Bohr", "bohr@example.org", "Princeton"],
        ]);

        let built = build(&config, &data);
        let flags: Vec<_> = built.authors.iter().map(|a| a.duplicate).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[test]
    fn test_mark_duplicates_skips_removed() {
        let config = config(&["First", "Last"]);
        let data = rows(&[&["Niels", "Bohr"], &["Niels", "Bohr"]]);

        let mut built = build(&config, &data);
        assert!(built.authors.iter().all(|a| a.duplicate));

        built.authors[1].removed = true;
        assert_eq!(mark_duplicates(&mut built.authors), 0);
        assert!(built.authors.iter().all(|a| !a.duplicate));
    }

    #[test]
    fn test_row_ids_length_mismatch() {
        let config = ArrangeConfig::new();
        let data = rows(&[&["a"], &["b"]]);
        let result = build_authors(
            &data,
            &[RowIds::new(0, 0)],
            &config.author,
            &config.affiliation,
            None,
        );
        assert_eq!(
            result,
            Err(GroupLinkError::RowIdsLength { rows: 2, ids: 1 })
        );
    }

    #[test]
    fn test_row_id_out_of_range() {
        let config = ArrangeConfig::new();
        let data = rows(&[&["a"]]);
        let result = build_authors(
            &data,
            &[RowIds::new(0, 4)],
            &config.author,
            &config.affiliation,
            None,
        );
        assert_eq!(
            result,
            Err(GroupLinkError::RowOutOfRange { row_id: 4, rows: 1 })
        );
    }
}

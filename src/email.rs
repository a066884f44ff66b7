//! Email list extraction.

use crate::Author;
use crate::error::fields;

/// Returns a `"First Last <email>"` entry for every shown author with an email.
///
/// Authors without a first or last name fall back to their formatted name.
///
/// # Examples
///
/// ```
/// use author_arranger::{arrange, config::ArrangeConfig, email::extract_emails};
///
/// let mut config = ArrangeConfig::new();
/// config.map_headers(&["First", "Last", "Email"]);
/// let rows = vec![vec![
///     Some("Lise".to_string()),
///     Some("Meitner".to_string()),
///     Some("lise@example.org".to_string()),
/// ]];
///
/// let arrangement = arrange(&rows, &config).unwrap();
/// assert_eq!(
///     extract_emails(&arrangement.authors),
///     vec!["Lise Meitner <lise@example.org>"]
/// );
/// ```
pub fn extract_emails(authors: &[Author]) -> Vec<String> {
    authors
        .iter()
        .filter(|author| !author.removed && !author.field(fields::EMAIL).is_empty())
        .map(|author| {
            let full_name = format!(
                "{} {}",
                author.field(fields::FIRST),
                author.field(fields::LAST)
            );
            let display = match full_name.trim() {
                "" => author.name.as_str(),
                trimmed => trimmed,
            };
            format!("{display} <{}>", author.field(fields::EMAIL))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ArrangeConfig;
    use crate::{Row, arrange};
    use pretty_assertions::assert_eq;

    fn rows(data: &[&[&str]]) -> Vec<Row> {
        data.iter()
            .map(|row| row.iter().map(|cell| Some(cell.to_string())).collect())
            .collect()
    }

    fn config() -> ArrangeConfig {
        let mut config = ArrangeConfig::new();
        config.map_headers(&["Title", "First", "Last", "Email"]);
        config
    }

    #[test]
    fn test_extract_emails() {
        let data = rows(&[
            &["Dr", "Marie", "Curie", "marie@example.org"],
            &["", "Pierre", "Curie", ""],
            &["Prof", "", "Bohr", "bohr@example.org"],
        ]);

        let arrangement = arrange(&data, &config()).unwrap();
        assert_eq!(
            extract_emails(&arrangement.authors),
            vec![
                "Marie Curie <marie@example.org>",
                "Bohr <bohr@example.org>",
            ]
        );
        assert_eq!(arrangement.emails, extract_emails(&arrangement.authors));
    }

    #[test]
    fn test_name_fallback() {
        let data = rows(&[&["Dr", "", "", "anon@example.org"]]);

        let arrangement = arrange(&data, &config()).unwrap();
        assert_eq!(arrangement.emails, vec!["Dr. <anon@example.org>"]);
    }

    #[test]
    fn test_removed_authors_skipped() {
        let data = rows(&[
            &["", "Marie", "Curie", "marie@example.org"],
            &["", "Niels", "Bohr", "niels@example.org"],
        ]);

        let mut arrangement = arrange(&data, &config()).unwrap();
        arrangement.remove_author(0).unwrap();
        assert_eq!(arrangement.emails, vec!["Niels Bohr <niels@example.org>"]);
    }

    #[test]
    fn test_unmapped_email_column() {
        let mut config = ArrangeConfig::new();
        config.map_headers(&["First", "Last"]);
        let data = rows(&[&["Marie", "Curie", "marie@example.org"]]);

        let arrangement = arrange(&data, &config).unwrap();
        assert!(arrangement.emails.is_empty());
    }
}

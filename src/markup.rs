//! Byline and affiliation list markup.
//!
//! The output is a renderer-neutral tree: a `div` holding an author paragraph and
//! an affiliation paragraph, each a flat run of `span`, `sup`, `sub` and `br` nodes.

use crate::config::{AffiliationConfig, AuthorConfig, LabelPosition, Separator};
use crate::label::format_label;
use crate::{Affiliation, Author};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Class attribute value marking a duplicate author.
pub const DUPLICATE_CLASS: &str = "bg-warning";

/// Tag names a renderer must support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Div,
    P,
    Span,
    Sup,
    Sub,
    Br,
}

impl Tag {
    /// Convert the tag to its element name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Div => "div",
            Tag::P => "p",
            Tag::Span => "span",
            Tag::Sup => "sup",
            Tag::Sub => "sub",
            Tag::Br => "br",
        }
    }

    /// The tag used for labels drawn at `position`.
    pub fn for_label(position: LabelPosition) -> Self {
        match position {
            LabelPosition::Inline => Tag::Span,
            LabelPosition::Superscript => Tag::Sup,
            LabelPosition::Subscript => Tag::Sub,
        }
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tagged node with optional text, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkupElement {
    pub tag_name: Tag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Option<String>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MarkupElement>,
}

impl MarkupElement {
    /// Creates an empty element.
    pub fn new(tag_name: Tag) -> Self {
        Self {
            tag_name,
            text: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Creates an element holding `text`.
    pub fn with_text(tag_name: Tag, text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(tag_name)
        }
    }

    /// Sets an attribute; `None` values are declared but not rendered.
    pub fn attribute(mut self, name: &str, value: Option<&str>) -> Self {
        self.attributes
            .insert(name.to_string(), value.map(String::from));
        self
    }

    /// Concatenated text of this element and its descendants, in document order.
    ///
    /// Line breaks read as nothing; the separator text already carries the newline.
    pub fn text_content(&self) -> String {
        let mut content = self.text.clone().unwrap_or_default();
        for child in &self.children {
            content.push_str(&child.text_content());
        }
        content
    }
}

/// Builds the byline and affiliation list for the shown authors and affiliations.
///
/// Removed entries are skipped. Authors appear in list order, each followed by the
/// labels of its affiliations; affiliations appear in list order, each preceded by
/// its label. When no affiliation column is mapped, labels are left out and the
/// affiliation paragraph stays empty.
///
/// # Examples
///
/// ```
/// use author_arranger::{arrange, config::ArrangeConfig};
///
/// let mut config = ArrangeConfig::new();
/// config.map_headers(&["Last", "Institute"]);
/// let rows = vec![
///     vec![Some("Curie".to_string()), Some("Sorbonne".to_string())],
///     vec![Some("Bohr".to_string()), Some("Copenhagen".to_string())],
/// ];
///
/// let markup = arrange(&rows, &config).unwrap().markup;
/// assert_eq!(markup.children[0].text_content(), "Curie1, Bohr2");
/// assert_eq!(markup.children[1].text_content(), "1Sorbonne, 2Copenhagen");
/// ```
pub fn generate_markup(
    authors: &[Author],
    affiliations: &[Affiliation],
    author_config: &AuthorConfig,
    affiliation_config: &AffiliationConfig,
) -> MarkupElement {
    let labeled = affiliation_config.has_mapped_columns();
    let style = affiliation_config.label_style;

    let mut byline = MarkupElement::new(Tag::P);
    let shown_authors = authors.iter().filter(|author| !author.removed).collect_vec();
    for (position, author) in shown_authors.iter().enumerate() {
        let mut name = author.name.trim().to_string();
        if author_config.label_position == LabelPosition::Inline {
            name.push(' ');
        }

        byline.children.push(
            MarkupElement::with_text(Tag::Span, name)
                .attribute("class", author.duplicate.then_some(DUPLICATE_CLASS)),
        );

        if labeled {
            let labels = author
                .affiliation_ids
                .iter()
                .map(|id| format_label(*id, style))
                .join(",");
            byline.children.push(MarkupElement::with_text(
                Tag::for_label(author_config.label_position),
                labels,
            ));
        }

        if position + 1 < shown_authors.len() {
            push_separator(
                &mut byline,
                author_config.separator,
                author_config.separator_text(),
            );
        }
    }

    let mut list = MarkupElement::new(Tag::P);
    if labeled {
        let shown_affiliations = affiliations
            .iter()
            .filter_map(|affiliation| affiliation.id.map(|id| (id, affiliation)))
            .filter(|(_, affiliation)| !affiliation.removed)
            .collect_vec();

        for (position, (id, affiliation)) in shown_affiliations.iter().enumerate() {
            let mut label = format_label(*id, style).to_string();
            if affiliation_config.label_position == LabelPosition::Inline {
                label.push(' ');
            }

            list.children.push(MarkupElement::with_text(
                Tag::for_label(affiliation_config.label_position),
                label,
            ));
            list.children.push(MarkupElement::with_text(
                Tag::Span,
                affiliation.name.trim(),
            ));

            if position + 1 < shown_affiliations.len() {
                push_separator(
                    &mut list,
                    affiliation_config.separator,
                    affiliation_config.separator_text(),
                );
            }
        }
    }

    let mut root = MarkupElement::new(Tag::Div);
    root.children.push(byline);
    root.children.push(list);
    root
}

fn push_separator(paragraph: &mut MarkupElement, separator: Separator, text: &str) {
    paragraph
        .children
        .push(MarkupElement::with_text(Tag::Span, format!("{text} ")));
    if separator == Separator::Newline {
        paragraph.children.push(MarkupElement::new(Tag::Br));
    }
}

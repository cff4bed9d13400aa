//! Builds ready-to-resolve records from links stored on the active object.
//!
//! Notes, attributes and the Internet tab carry URLs stored by the user.
//! Each extractor turns them into [`TemplateRecord`]s tagged by their
//! source. Attribute links pass through the resolver unchanged; note and
//! Internet links are still filled in when they carry placeholders.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, trace};

use crate::catalog::{SourceTag, TemplateRecord};
use crate::entity::{EntityKeys, NavType};
use crate::pattern::placeholder_names;

/// Matches http:// and https:// URLs up to whitespace, quotes or angle brackets.
#[allow(clippy::expect_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'\]]+"#).expect("URL regex is valid") // Static pattern, safe to panic
});

/// Title of URLs found in note text.
pub const PARSED_NOTE_TITLE: &str = "None Link (parsed)";
/// Title of note links pointing at another object in the database.
pub const INTERNAL_NOTE_TITLE: &str = "Note Link (internal)";
/// Title of note links pointing outside the database.
pub const EXTERNAL_NOTE_TITLE: &str = "Note Link (external)";
/// Title of Internet references without a type.
pub const UNTITLED_INTERNET_TITLE: &str = "No title";

/// Link source marking a reference to another database object.
const INTERNAL_LINK_SOURCE: &str = "gramps";

/// A structured link embedded in a note.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NoteLink {
    pub source: String,
    pub obj_type: String,
    pub sub_type: String,
    /// Object handle for internal links, the URL otherwise.
    pub handle: String,
}

impl NoteLink {
    fn is_internal(&self) -> bool {
        self.source == INTERNAL_LINK_SOURCE
    }

    fn is_complete(&self) -> bool {
        [&self.source, &self.obj_type, &self.sub_type, &self.handle]
            .iter()
            .all(|part| !part.is_empty())
    }
}

/// A name/value attribute of the active object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An entry of the object's Internet tab.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct InternetRef {
    pub path: String,
    #[serde(default)]
    pub url_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Finds every URL in `text`, trailing punctuation removed, in order of appearance.
#[must_use]
pub fn find_urls(text: &str) -> Vec<&str> {
    URL_PATTERN
        .find_iter(text)
        .map(|m| clean_url_trailing(m.as_str()))
        .inspect(|url| trace!(url = %url, "found URL candidate"))
        .collect()
}

/// Returns the first URL in `text`.
#[must_use]
pub fn first_url(text: &str) -> Option<&str> {
    URL_PATTERN
        .find(text)
        .map(|m| clean_url_trailing(m.as_str()))
}

/// Strips sentence punctuation captured at the end of a URL.
///
/// A closing parenthesis or bracket survives when the URL holds a matching
/// opener, as in Wikipedia article links.
fn clean_url_trailing(url: &str) -> &str {
    let mut result = url;

    while let Some(last) = result.chars().last() {
        match last {
            '.' | ',' | ';' | ':' | '!' | '?' => {
                result = &result[..result.len() - 1];
            }
            ')' | ']' => {
                let open = if last == ')' { '(' } else { '[' };
                let open_count = result.chars().filter(|&c| c == open).count();
                let close_count = result.chars().filter(|&c| c == last).count();
                if close_count > open_count {
                    result = &result[..result.len() - 1];
                } else {
                    break;
                }
            }
            _ => break,
        }
    }

    result
}

fn literal_record(nav_type: NavType, tag: SourceTag, title: &str, url: &str) -> TemplateRecord {
    TemplateRecord::new(nav_type, tag, title.trim(), url)
}

/// Collects links from one note.
///
/// URLs written in the text come first, deduplicated and skipping any that
/// an external structured link already covers. Structured links follow:
/// internal ones become `gramps://type/subtype/handle` URLs, external ones
/// use the handle as the URL. Links with an empty member are ignored.
#[tracing::instrument(
    skip(text, note_links),
    fields(text_len = text.len(), links = note_links.len())
)]
#[must_use]
pub fn links_from_note(
    nav_type: NavType,
    text: &str,
    note_links: &[NoteLink],
) -> Vec<TemplateRecord> {
    let mut seen: HashSet<&str> = note_links
        .iter()
        .filter(|link| !link.is_internal())
        .map(|link| clean_url_trailing(link.handle.trim()))
        .collect();

    let mut records = Vec::new();
    for url in find_urls(text) {
        if seen.insert(url) {
            records.push(literal_record(nav_type, SourceTag::Note, PARSED_NOTE_TITLE, url));
        }
    }

    for link in note_links {
        if !link.is_complete() {
            debug!(?link, "Ignoring incomplete note link");
            continue;
        }
        let record = if link.is_internal() {
            let url = format!(
                "{}://{}/{}/{}",
                link.source, link.obj_type, link.sub_type, link.handle
            );
            literal_record(nav_type, SourceTag::Note, INTERNAL_NOTE_TITLE, &url)
        } else {
            literal_record(nav_type, SourceTag::Note, EXTERNAL_NOTE_TITLE, &link.handle)
        };
        records.push(record);
    }

    records
}

/// Collects the first URL of each attribute value, titled by the attribute name.
#[must_use]
pub fn links_from_attributes(nav_type: NavType, attributes: &[Attribute]) -> Vec<TemplateRecord> {
    attributes
        .iter()
        .filter_map(|attr| {
            first_url(&attr.value)
                .map(|url| literal_record(nav_type, SourceTag::Attribute, &attr.name, url))
        })
        .collect()
}

/// Collects the first URL of each Internet reference.
///
/// The reference type becomes the title and the description the comment.
#[must_use]
pub fn links_from_internet(nav_type: NavType, refs: &[InternetRef]) -> Vec<TemplateRecord> {
    refs.iter()
        .filter_map(|reference| {
            let url = first_url(&reference.path)?;
            let title = reference
                .url_type
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .unwrap_or(UNTITLED_INTERNET_TITLE);
            let mut record = literal_record(nav_type, SourceTag::Internet, title, url);
            record.comment = reference.description.clone().filter(|d| !d.is_empty());
            Some(record)
        })
        .collect()
}

/// Selects the attribute-derived keys a template actually references.
#[must_use]
pub fn matching_attribute_keys(attribute_keys: &EntityKeys, template: &str) -> EntityKeys {
    let names: HashSet<&str> = placeholder_names(template).into_iter().collect();
    attribute_keys
        .iter()
        .filter(|(key, _)| names.contains(key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn note_link(source: &str, obj_type: &str, sub_type: &str, handle: &str) -> NoteLink {
        NoteLink {
            source: source.to_string(),
            obj_type: obj_type.to_string(),
            sub_type: sub_type.to_string(),
            handle: handle.to_string(),
        }
    }

    // ==================== URL discovery ====================

    #[test]
    fn test_find_urls_strips_trailing_punctuation() {
        let urls = find_urls("See https://a.org/x. Also (http://b.org/y), done!");
        assert_eq!(urls, vec!["https://a.org/x", "http://b.org/y"]);
    }

    #[test]
    fn test_clean_keeps_balanced_parens() {
        assert_eq!(
            clean_url_trailing("https://en.wikipedia.org/wiki/Rust_(language)"),
            "https://en.wikipedia.org/wiki/Rust_(language)"
        );
        assert_eq!(clean_url_trailing("https://a.org/x);"), "https://a.org/x");
    }

    #[test]
    fn test_first_url_none_without_scheme() {
        assert_eq!(first_url("www.example.com"), None);
        assert_eq!(first_url("id https://a.org/1 https://b.org/2"), Some("https://a.org/1"));
    }

    // ==================== Notes ====================

    #[test]
    fn test_note_parsed_links_deduplicated() {
        let records = links_from_note(
            NavType::People,
            "https://a.org/x and again https://a.org/x.",
            &[],
        );
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, PARSED_NOTE_TITLE);
        assert_eq!(records[0].tag, SourceTag::Note);
        assert!(records[0].enabled);
    }

    #[test]
    fn test_note_parsed_link_skipped_when_external_link_exists() {
        let links = [note_link("www", "x", "y", "https://a.org/x")];
        let records = links_from_note(NavType::People, "https://a.org/x", &links);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, EXTERNAL_NOTE_TITLE);
        assert_eq!(records[0].url, "https://a.org/x");
    }

    #[test]
    fn test_note_internal_link_url() {
        let links = [note_link("gramps", "Person", "handle", "abc123")];
        let records = links_from_note(NavType::Families, "", &links);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].url, "gramps://Person/handle/abc123");
        assert_eq!(records[0].title, INTERNAL_NOTE_TITLE);
        assert_eq!(records[0].nav_type, NavType::Families);
    }

    #[test]
    fn test_note_incomplete_link_ignored() {
        let links = [note_link("gramps", "", "handle", "abc123")];
        assert!(links_from_note(NavType::People, "", &links).is_empty());
    }

    // ==================== Attributes ====================

    #[test]
    fn test_attribute_links_use_first_url_and_name() {
        let attrs = [
            Attribute {
                name: " Profile ".to_string(),
                value: "see https://a.org/p, https://b.org".to_string(),
            },
            Attribute {
                name: "Nickname".to_string(),
                value: "Jack".to_string(),
            },
        ];
        let records = links_from_attributes(NavType::People, &attrs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Profile");
        assert_eq!(records[0].url, "https://a.org/p");
        assert_eq!(records[0].tag, SourceTag::Attribute);
    }

    // ==================== Internet tab ====================

    #[test]
    fn test_internet_links_title_and_comment() {
        let refs = [
            InternetRef {
                path: "https://archive.org/item".to_string(),
                url_type: Some("Web Home".to_string()),
                description: Some("Family page".to_string()),
            },
            InternetRef {
                path: "http://b.org".to_string(),
                ..InternetRef::default()
            },
            InternetRef {
                path: "not a url".to_string(),
                ..InternetRef::default()
            },
        ];
        let records = links_from_internet(NavType::Sources, &refs);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].title, "Web Home");
        assert_eq!(records[0].comment.as_deref(), Some("Family page"));
        assert_eq!(records[1].title, UNTITLED_INTERNET_TITLE);
        assert_eq!(records[1].comment, None);
        assert!(records.iter().all(|r| r.tag == SourceTag::Internet));
    }

    // ==================== Attribute keys ====================

    #[test]
    fn test_matching_attribute_keys_selects_referenced_names() {
        let mut attribute_keys = EntityKeys::new();
        attribute_keys.insert("geni_id".to_string(), "6000".to_string());
        attribute_keys.insert("wikitree_id".to_string(), "Smith-1".to_string());

        let matched =
            matching_attribute_keys(&attribute_keys, "https://geni.com/people/%(geni_id)s");
        assert_eq!(matched.len(), 1);
        assert_eq!(matched.get("geni_id").map(String::as_str), Some("6000"));
    }
}

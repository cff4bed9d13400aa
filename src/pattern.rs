//! Placeholder analysis and substitution for `%(key)s` URL templates.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Matches `%(name)s` placeholders. Names cannot contain parentheses.
#[allow(clippy::expect_used)]
static PLACEHOLDER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%\(([^()]*)\)s").expect("placeholder regex is valid") // Static pattern, safe to panic
});

/// Classification of a template's placeholders against a key mapping.
///
/// Every placeholder occurrence in the template lands in exactly one of the
/// three lists, in left-to-right order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternKeys {
    /// Keys present with a non-empty value, paired with that value.
    #[serde(rename = "replaced_keys")]
    pub replaced: Vec<(String, String)>,
    /// Keys absent from the mapping.
    #[serde(rename = "not_found_keys")]
    pub not_found: Vec<String>,
    /// Keys present with an empty value.
    #[serde(rename = "empty_keys")]
    pub empty: Vec<String>,
}

impl PatternKeys {
    /// Number of placeholders that received a value.
    #[must_use]
    pub fn replaced_count(&self) -> usize {
        self.replaced.len()
    }

    /// Number of placeholder occurrences across all three lists.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.replaced.len() + self.not_found.len() + self.empty.len()
    }

    /// Returns true when the given key was replaced with a value.
    #[must_use]
    pub fn is_replaced(&self, key: &str) -> bool {
        self.replaced.iter().any(|(name, _)| name == key)
    }

    /// Serializes the classification for tooltip display.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if a value cannot be encoded.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Returns the placeholder names of a template, one entry per occurrence.
#[must_use]
pub fn placeholder_names(template: &str) -> Vec<&str> {
    PLACEHOLDER_PATTERN
        .captures_iter(template)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
        .collect()
}

/// Classifies every placeholder of `template` against `data`.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use websearch_core::pattern::classify;
///
/// let mut data = BTreeMap::new();
/// data.insert("surname".to_string(), "Smith".to_string());
/// data.insert("given".to_string(), String::new());
///
/// let keys = classify("https://example.com/?g=%(given)s&s=%(surname)s&y=%(birth_year)s", &data);
/// assert_eq!(keys.replaced, vec![("surname".to_string(), "Smith".to_string())]);
/// assert_eq!(keys.empty, vec!["given".to_string()]);
/// assert_eq!(keys.not_found, vec!["birth_year".to_string()]);
/// ```
#[must_use]
pub fn classify(template: &str, data: &BTreeMap<String, String>) -> PatternKeys {
    let mut keys = PatternKeys::default();
    for name in placeholder_names(template) {
        match data.get(name) {
            None => keys.not_found.push(name.to_string()),
            Some(value) if value.is_empty() => keys.empty.push(name.to_string()),
            Some(value) => keys.replaced.push((name.to_string(), value.clone())),
        }
    }
    trace!(
        replaced = keys.replaced.len(),
        not_found = keys.not_found.len(),
        empty = keys.empty.len(),
        "classified template placeholders"
    );
    keys
}

/// Replaces every `%(name)s` whose name is in `data` with its value.
///
/// Unknown placeholders are left verbatim; substitution never fails.
#[must_use]
pub fn substitute(template: &str, data: &BTreeMap<String, String>) -> String {
    PLACEHOLDER_PATTERN
        .replace_all(template, |caps: &Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            match data.get(name) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

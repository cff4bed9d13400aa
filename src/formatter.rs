//! Compacts resolved URLs into a shorter display form.
//!
//! # Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use websearch_core::formatter::{CompactnessLevel, FormatOptions, format_url};
//! use websearch_core::pattern::classify;
//!
//! let mut data = BTreeMap::new();
//! data.insert("given".to_string(), "John".to_string());
//! data.insert("surname".to_string(), "Smith".to_string());
//! let keys = classify("https://example.com/search?given=%(given)s&surname=%(surname)s", &data);
//!
//! let options = FormatOptions {
//!     compactness: CompactnessLevel::CompactWithAttributes,
//!     prefix_replacement: ".".to_string(),
//!     ..FormatOptions::default()
//! };
//! let url = "https://example.com/search?given=John&surname=Smith";
//! let display = format_url(url, &keys, &options);
//! assert_eq!(display, ".example.com/search...given=John...surname=Smith");
//! ```

use crate::pattern::PatternKeys;

/// URL prefixes removed from display URLs, tried in this order.
pub const URL_PREFIXES_TO_TRIM: [&str; 4] = ["https://www.", "http://www.", "https://", "http://"];

/// Default separator placed before each traced variable value.
pub const DEFAULT_TRACE_SEPARATOR: &str = "...";

/// How aggressively a URL is shortened for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompactnessLevel {
    /// Prefix and query string removed, no variable trace.
    Shortest,
    /// Prefix and query string removed, replaced values traced.
    #[default]
    CompactNoAttributes,
    /// Prefix and query string removed, `key=value` pairs traced.
    CompactWithAttributes,
    /// Prefix removed only.
    Long,
}

impl CompactnessLevel {
    /// Returns the stable label used in the settings file.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shortest => "shortest",
            Self::CompactNoAttributes => "compact_no_attributes",
            Self::CompactWithAttributes => "compact_with_attributes",
            Self::Long => "long",
        }
    }

    /// Parses a settings label.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "shortest" => Some(Self::Shortest),
            "compact_no_attributes" => Some(Self::CompactNoAttributes),
            "compact_with_attributes" => Some(Self::CompactWithAttributes),
            "long" => Some(Self::Long),
            _ => None,
        }
    }
}

/// Display options for [`format_url`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// When false the URL is displayed unchanged.
    pub show_short_url: bool,
    pub compactness: CompactnessLevel,
    /// Text substituted for the first matching entry of [`URL_PREFIXES_TO_TRIM`].
    pub prefix_replacement: String,
    /// Text placed before each traced variable.
    pub trace_separator: String,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            show_short_url: true,
            compactness: CompactnessLevel::default(),
            prefix_replacement: String::new(),
            trace_separator: DEFAULT_TRACE_SEPARATOR.to_string(),
        }
    }
}

/// Produces the display form of `url` according to `options`.
#[must_use]
pub fn format_url(url: &str, keys: &PatternKeys, options: &FormatOptions) -> String {
    if !options.show_short_url {
        return url.to_string();
    }

    let trimmed = trim_url_prefix(url, &options.prefix_replacement);
    match options.compactness {
        CompactnessLevel::Long => trimmed,
        CompactnessLevel::Shortest => remove_query(&trimmed).to_string(),
        CompactnessLevel::CompactNoAttributes => {
            append_trace(remove_query(&trimmed), keys, &options.trace_separator, false)
        }
        CompactnessLevel::CompactWithAttributes => {
            append_trace(remove_query(&trimmed), keys, &options.trace_separator, true)
        }
    }
}

/// Replaces the first matching scheme/`www.` prefix with `replacement`.
#[must_use]
pub fn trim_url_prefix(url: &str, replacement: &str) -> String {
    URL_PREFIXES_TO_TRIM
        .iter()
        .find_map(|prefix| url.strip_prefix(prefix))
        .map_or_else(|| url.to_string(), |rest| format!("{replacement}{rest}"))
}

/// Drops everything from the first `?`.
#[must_use]
pub fn remove_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(head, _)| head)
}

fn append_trace(url: &str, keys: &PatternKeys, separator: &str, with_names: bool) -> String {
    if keys.replaced.is_empty() {
        return url.to_string();
    }
    let mut out = String::from(url);
    for (key, value) in &keys.replaced {
        out.push_str(separator);
        if with_names {
            out.push_str(key);
            out.push('=');
        }
        out.push_str(value);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const LEVELS: [CompactnessLevel; 4] = [
        CompactnessLevel::Shortest,
        CompactnessLevel::CompactNoAttributes,
        CompactnessLevel::CompactWithAttributes,
        CompactnessLevel::Long,
    ];

    fn replaced(pairs: &[(&str, &str)]) -> PatternKeys {
        PatternKeys {
            replaced: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..PatternKeys::default()
        }
    }

    fn options(level: CompactnessLevel) -> FormatOptions {
        FormatOptions {
            compactness: level,
            ..FormatOptions::default()
        }
    }

    #[test]
    fn test_disabled_short_url_returns_input_for_every_level() {
        let url = "https://www.example.com/a?b=c";
        let keys = replaced(&[("b", "c")]);
        for level in LEVELS {
            let opts = FormatOptions {
                show_short_url: false,
                ..options(level)
            };
            assert_eq!(format_url(url, &keys, &opts), url);
        }
    }

    #[test]
    fn test_shortest_strips_prefix_and_query() {
        let out = format_url(
            "https://www.example.com/search?q=1",
            &replaced(&[("q", "1")]),
            &options(CompactnessLevel::Shortest),
        );
        assert_eq!(out, "example.com/search");
    }

    #[test]
    fn test_compact_no_attributes_traces_values() {
        let out = format_url(
            "http://example.com/s?g=John&s=Smith",
            &replaced(&[("given", "John"), ("surname", "Smith")]),
            &options(CompactnessLevel::CompactNoAttributes),
        );
        assert_eq!(out, "example.com/s...John...Smith");
    }

    #[test]
    fn test_compact_trace_single_value_starts_with_separator() {
        let out = format_url(
            "https://example.com/s?g=John",
            &replaced(&[("given", "John")]),
            &options(CompactnessLevel::CompactWithAttributes),
        );
        assert_eq!(out, "example.com/s...given=John");
    }

    #[test]
    fn test_compact_without_replacements_has_no_trace() {
        let out = format_url(
            "https://example.com/s?g=",
            &PatternKeys::default(),
            &options(CompactnessLevel::CompactNoAttributes),
        );
        assert_eq!(out, "example.com/s");
    }

    #[test]
    fn test_long_keeps_query() {
        let out = format_url(
            "http://www.example.com/s?g=John",
            &replaced(&[("given", "John")]),
            &options(CompactnessLevel::Long),
        );
        assert_eq!(out, "example.com/s?g=John");
    }

    #[test]
    fn test_prefix_is_first_match_not_longest() {
        // "https://" is listed after "https://www." so www. hosts lose both parts.
        assert_eq!(trim_url_prefix("https://www.a.org", ">"), ">a.org");
        assert_eq!(trim_url_prefix("https://wwwa.org", ">"), ">wwwa.org");
        assert_eq!(trim_url_prefix("ftp://a.org", ">"), "ftp://a.org");
    }

    #[test]
    fn test_prefix_trim_is_idempotent() {
        let once = trim_url_prefix("https://www.example.com/x", "");
        let twice = trim_url_prefix(&once, "");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_custom_separator() {
        let opts = FormatOptions {
            trace_separator: " | ".to_string(),
            ..options(CompactnessLevel::CompactNoAttributes)
        };
        let out = format_url("https://a.org/?x=1", &replaced(&[("x", "1")]), &opts);
        assert_eq!(out, "a.org/ | 1");
    }

    #[test]
    fn test_remove_query_splits_on_first_question_mark() {
        assert_eq!(remove_query("a.org/p?x=1?y=2"), "a.org/p");
        assert_eq!(remove_query("a.org/p"), "a.org/p");
    }

    #[test]
    fn test_compactness_labels() {
        for level in LEVELS {
            assert_eq!(CompactnessLevel::parse(level.as_str()), Some(level));
        }
        assert_eq!(CompactnessLevel::parse("tiny"), None);
    }
}

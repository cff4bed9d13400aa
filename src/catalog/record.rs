//! Template records and their locale/source tags.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::entity::NavType;

/// Label controlling icon, sort order and grouping of a link.
///
/// Regional catalogs carry their upper-cased region code; the remaining
/// variants are reserved tags for non-regional sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceTag {
    /// Globally useful sites (`common-links.csv`).
    Common,
    /// Fixed URLs without placeholders.
    Static,
    /// Links found in object attributes.
    Attribute,
    /// Cross-reference catalogs.
    Cross,
    /// Links found in notes.
    Note,
    /// Links from the object's Internet tab.
    Internet,
    /// Links identified by an attribute-supplied identifier.
    Uid,
    /// Region code such as `UA` or `GB`.
    Locale(String),
}

impl SourceTag {
    /// Parses a catalog-derived tag. Unknown values become regional codes.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let upper = value.trim().to_uppercase();
        match upper.as_str() {
            "COMMON" => Self::Common,
            "STATIC" => Self::Static,
            "ATTRIBUTE" | "ATTR" => Self::Attribute,
            "CROSS" => Self::Cross,
            "NOTE" => Self::Note,
            "INTERNET" => Self::Internet,
            "UID" => Self::Uid,
            _ => Self::Locale(upper),
        }
    }

    /// Returns the tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Common => "COMMON",
            Self::Static => "STATIC",
            Self::Attribute => "ATTRIBUTE",
            Self::Cross => "CROSS",
            Self::Note => "NOTE",
            Self::Internet => "INTERNET",
            Self::Uid => "UID",
            Self::Locale(code) => code,
        }
    }

    /// True for sources whose URL is already final and bypasses substitution.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Static | Self::Attribute)
    }

    /// Deterministic sort key; reserved tags sort ahead of region codes.
    #[must_use]
    pub fn sort_key(&self) -> String {
        let fixed = match self {
            Self::Common => "00",
            Self::Uid => "01",
            Self::Static => "02",
            Self::Cross => "03",
            Self::Attribute => "04",
            Self::Internet => "05",
            Self::Note => "06",
            Self::Locale(code) => return code.clone(),
        };
        fixed.to_string()
    }

    /// Text shown in place of an icon; empty for tags that always have one.
    #[must_use]
    pub fn locale_text(&self) -> &str {
        match self {
            Self::Common | Self::Uid | Self::Static | Self::Cross | Self::Attribute => "",
            other => other.as_str(),
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SourceTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One catalog entry describing a candidate link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateRecord {
    /// Navigation type this record applies to (already expanded from `*`/lists).
    pub nav_type: NavType,
    pub tag: SourceTag,
    pub title: String,
    pub enabled: bool,
    /// URL template with zero or more `%(key)s` placeholders.
    pub url: String,
    pub comment: Option<String>,
    /// True when the record comes from the user's catalog directory.
    pub is_custom: bool,
}

impl TemplateRecord {
    /// Creates an enabled, built-in record.
    #[must_use]
    pub fn new(
        nav_type: NavType,
        tag: SourceTag,
        title: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            nav_type,
            tag,
            title: title.into(),
            enabled: true,
            url: url.into(),
            comment: None,
            is_custom: false,
        }
    }

    /// Sets the comment.
    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Returns true for the truthy spellings of the `Is enabled` column.
#[must_use]
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "y"
    )
}

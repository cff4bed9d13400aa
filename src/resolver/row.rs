//! Display rows produced by the resolver.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::catalog::SourceTag;
use crate::entity::NavType;
use crate::pattern::PatternKeys;

/// File extension of flag images inside the flags directory.
const FLAG_EXTENSION: &str = "png";

/// How many of a template's placeholders received a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeysCoverage {
    /// Every placeholder was replaced, including templates with none.
    All,
    Partial,
    None,
}

impl KeysCoverage {
    #[must_use]
    pub fn from_counts(replaced: usize, total: usize) -> Self {
        if replaced == total {
            Self::All
        } else if replaced == 0 {
            Self::None
        } else {
            Self::Partial
        }
    }

    /// Colour used to render the key counter.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::All => "green",
            Self::Partial => "orange",
            Self::None => "red",
        }
    }
}

/// Icon drawn in the locale column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "lowercase")]
pub enum LocaleIcon {
    Earth,
    Pin,
    Cross,
    Uid,
    Chain,
    /// Flag image for a regional tag.
    Flag(PathBuf),
}

impl LocaleIcon {
    /// Icon name for the built-in icons, or the flag file path.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::Earth => "earth".to_string(),
            Self::Pin => "pin".to_string(),
            Self::Cross => "cross".to_string(),
            Self::Uid => "uid".to_string(),
            Self::Chain => "chain".to_string(),
            Self::Flag(path) => path.display().to_string(),
        }
    }
}

/// Settings controlling icon selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconOptions {
    /// Directory holding `<code>.png` flag images.
    pub flags_dir: Option<PathBuf>,
    pub show_flag_icons: bool,
    /// Mark rows that come from user catalogs.
    pub show_user_data_icon: bool,
}

impl Default for IconOptions {
    fn default() -> Self {
        Self {
            flags_dir: None,
            show_flag_icons: true,
            show_user_data_icon: false,
        }
    }
}

impl IconOptions {
    /// Picks the locale icon for a tag.
    ///
    /// Reserved tags map to fixed icons. Regional tags use a flag file when
    /// flag icons are enabled and the file exists; otherwise the row has no
    /// icon and shows its locale text instead.
    #[must_use]
    pub fn locale_icon(&self, tag: &SourceTag) -> Option<LocaleIcon> {
        match tag {
            SourceTag::Common => Some(LocaleIcon::Earth),
            SourceTag::Static => Some(LocaleIcon::Pin),
            SourceTag::Cross => Some(LocaleIcon::Cross),
            SourceTag::Uid => Some(LocaleIcon::Uid),
            SourceTag::Attribute => Some(LocaleIcon::Chain),
            SourceTag::Note | SourceTag::Internet => None,
            SourceTag::Locale(code) => {
                if !self.show_flag_icons || code.is_empty() {
                    return None;
                }
                let dir = self.flags_dir.as_deref()?;
                flag_path(dir, code).map(LocaleIcon::Flag)
            }
        }
    }
}

fn flag_path(dir: &Path, code: &str) -> Option<PathBuf> {
    let path = dir.join(format!("{}.{FLAG_EXTENSION}", code.to_lowercase()));
    match path.try_exists() {
        Ok(true) => Some(path),
        Ok(false) => None,
        Err(error) => {
            debug!(path = %path.display(), error = %error, "Flag icon lookup failed");
            None
        }
    }
}

/// One resolved link, ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLinkRow {
    pub nav_type: NavType,
    pub object_id: String,
    /// Tag after UID reclassification.
    pub tag: SourceTag,
    pub title: String,
    pub final_url: String,
    pub display_url: String,
    pub comment: Option<String>,
    pub url_template: String,
    pub keys: PatternKeys,
    pub keys_json: String,
    pub replaced_keys_count: usize,
    pub total_keys_count: usize,
    pub coverage: KeysCoverage,
    pub sort_key: String,
    pub content_hash: String,
    pub visited: bool,
    pub saved: bool,
    /// Shown with the user-data icon; false when that icon is disabled.
    pub user_data: bool,
    pub category_icon: &'static str,
    pub locale_icon: Option<LocaleIcon>,
    /// Shown when there is no locale icon.
    pub locale_text: String,
    /// Whether the replaced/total counter means anything for this row.
    pub display_keys_count: bool,
}

impl ResolvedLinkRow {
    /// Hover text: title, replaced and empty keys, and the comment.
    #[must_use]
    pub fn tooltip(&self) -> String {
        let mut text = format!("Title: {}", self.title);

        if !self.keys.replaced.is_empty() {
            let replaced: Vec<String> = self
                .keys
                .replaced
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect();
            let _ = write!(text, "\nReplaced: {}", replaced.join(", "));
        }
        if !self.keys.empty.is_empty() {
            let _ = write!(text, "\nEmpty: {}", self.keys.empty.join(", "));
        }
        if let Some(comment) = self.comment.as_deref().filter(|c| !c.is_empty()) {
            let _ = write!(text, "\nComment: {comment}");
        }

        text
    }
}

/// Orders rows by `(sort_key, title)`; equal rows keep their input order.
pub fn sort_rows(rows: &mut [ResolvedLinkRow]) {
    rows.sort_by(|a, b| a.sort_key.cmp(&b.sort_key).then_with(|| a.title.cmp(&b.title)));
}

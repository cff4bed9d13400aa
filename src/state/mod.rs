//! Cross-session link state kept in append-only line files.
//!
//! Four files live in one state directory:
//!
//! - `visited_links.txt` / `saved_links.txt` - content hashes of opened and
//!   saved links (see [`content_hash`])
//! - `hidden_links.txt` - literal [`HiddenLinkKey`] strings
//! - `skipped_domain_suggestions.txt` - raw domains the user dismissed
//!
//! Appends are idempotent: a value is written only when it is not already
//! present, so each distinct value appears at most once across restarts.
//! There is no locking; the store assumes a single writer process.

mod error;

pub use error::StateError;

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::entity::NavType;

/// Number of hex characters kept from the SHA-256 digest.
pub const CONTENT_HASH_LEN: usize = 16;

/// One of the four state files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateFile {
    Visited,
    Saved,
    Hidden,
    SkippedDomains,
}

impl StateFile {
    /// File name inside the state directory.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Visited => "visited_links.txt",
            Self::Saved => "saved_links.txt",
            Self::Hidden => "hidden_links.txt",
            Self::SkippedDomains => "skipped_domain_suggestions.txt",
        }
    }
}

/// Short digest identifying a resolved link for one object.
///
/// Computed over `"{final_url}|{object_id}"`; the same URL opened for two
/// different objects yields two different hashes.
#[must_use]
pub fn content_hash(final_url: &str, object_id: &str) -> String {
    let digest = Sha256::digest(format!("{final_url}|{object_id}").as_bytes());
    let mut out = String::with_capacity(CONTENT_HASH_LEN);
    for byte in digest.iter().take(CONTENT_HASH_LEN / 2) {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Literal key used to hide a template, either for one object or for all objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HiddenLinkKey {
    /// `template|objectId|navType`
    Object {
        template: String,
        object_id: String,
        nav_type: NavType,
    },
    /// `template|navType`
    Global { template: String, nav_type: NavType },
}

impl HiddenLinkKey {
    /// Key hiding `template` only for `object_id`.
    #[must_use]
    pub fn for_object(template: &str, object_id: &str, nav_type: NavType) -> Self {
        Self::Object {
            template: template.to_string(),
            object_id: object_id.to_string(),
            nav_type,
        }
    }

    /// Key hiding `template` for every object of `nav_type`.
    #[must_use]
    pub fn global(template: &str, nav_type: NavType) -> Self {
        Self::Global {
            template: template.to_string(),
            nav_type,
        }
    }

    /// The line stored in the hidden-links file.
    #[must_use]
    pub fn as_line(&self) -> String {
        match self {
            Self::Object {
                template,
                object_id,
                nav_type,
            } => format!("{template}|{object_id}|{nav_type}"),
            Self::Global { template, nav_type } => format!("{template}|{nav_type}"),
        }
    }
}

/// File-backed link state rooted at one directory.
#[derive(Debug, Clone)]
pub struct StateStore {
    dir: PathBuf,
}

impl StateStore {
    /// Creates a store for `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the state files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a state file.
    #[must_use]
    pub fn path(&self, file: StateFile) -> PathBuf {
        self.dir.join(file.file_name())
    }

    /// Returns true if `value` is a line of `file` (both sides trimmed).
    ///
    /// A missing or unreadable file counts as not containing the value.
    #[must_use]
    pub fn has(&self, value: &str, file: StateFile) -> bool {
        let needle = value.trim();
        self.read_lines(file).iter().any(|line| line == needle)
    }

    /// Appends `value` to `file` unless it is already present.
    ///
    /// Returns `Ok(true)` when a line was written and `Ok(false)` when the
    /// value was already recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the value spans several lines or the file
    /// cannot be written.
    pub fn append(&self, value: &str, file: StateFile) -> Result<bool, StateError> {
        let value = value.trim();
        if value.contains(['\n', '\r']) {
            return Err(StateError::MultiLineValue {
                value: value.to_string(),
            });
        }
        if self.has(value, file) {
            debug!(file = file.file_name(), "value already recorded");
            return Ok(false);
        }

        fs::create_dir_all(&self.dir).map_err(|e| StateError::create_dir(&self.dir, e))?;
        let path = self.path(file);
        let mut handle = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| StateError::append(&path, e))?;
        writeln!(handle, "{value}").map_err(|e| StateError::append(&path, e))?;
        debug!(file = file.file_name(), "value recorded");
        Ok(true)
    }

    /// Marks a resolved link as visited for `object_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the visited file cannot be written.
    pub fn record_visit(&self, final_url: &str, object_id: &str) -> Result<bool, StateError> {
        self.append(&content_hash(final_url, object_id), StateFile::Visited)
    }

    /// Marks a resolved link as saved for `object_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the saved file cannot be written.
    pub fn record_save(&self, final_url: &str, object_id: &str) -> Result<bool, StateError> {
        self.append(&content_hash(final_url, object_id), StateFile::Saved)
    }

    /// Hides `template` for one object.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the hidden-links file cannot be written.
    pub fn hide_for_object(
        &self,
        template: &str,
        object_id: &str,
        nav_type: NavType,
    ) -> Result<bool, StateError> {
        let key = HiddenLinkKey::for_object(template, object_id, nav_type);
        self.append(&key.as_line(), StateFile::Hidden)
    }

    /// Hides `template` for every object of `nav_type`.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the hidden-links file cannot be written.
    pub fn hide_for_all(&self, template: &str, nav_type: NavType) -> Result<bool, StateError> {
        self.append(&HiddenLinkKey::global(template, nav_type).as_line(), StateFile::Hidden)
    }

    /// Records a dismissed site suggestion domain.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] when the skipped-domains file cannot be written.
    pub fn skip_domain(&self, domain: &str) -> Result<bool, StateError> {
        self.append(domain, StateFile::SkippedDomains)
    }

    /// Returns true if the link was visited for `object_id`.
    #[must_use]
    pub fn is_visited(&self, final_url: &str, object_id: &str) -> bool {
        self.has(&content_hash(final_url, object_id), StateFile::Visited)
    }

    /// Returns true if the link was saved for `object_id`.
    #[must_use]
    pub fn is_saved(&self, final_url: &str, object_id: &str) -> bool {
        self.has(&content_hash(final_url, object_id), StateFile::Saved)
    }

    /// Returns true if `template` is hidden for `object_id`, either by an
    /// object-scoped key or by a global key for `nav_type`.
    #[must_use]
    pub fn is_hidden(&self, template: &str, object_id: &str, nav_type: NavType) -> bool {
        let lines = self.read_lines(StateFile::Hidden);
        let object_key = HiddenLinkKey::for_object(template, object_id, nav_type).as_line();
        let global_key = HiddenLinkKey::global(template, nav_type).as_line();
        lines
            .iter()
            .any(|line| *line == object_key.trim() || *line == global_key.trim())
    }

    /// Domains the user dismissed from site suggestions.
    #[must_use]
    pub fn skipped_domains(&self) -> BTreeSet<String> {
        self.read_lines(StateFile::SkippedDomains)
            .into_iter()
            .filter(|line| !line.is_empty())
            .collect()
    }

    fn read_lines(&self, file: StateFile) -> Vec<String> {
        let path = self.path(file);
        match fs::read_to_string(&path) {
            Ok(content) => content.lines().map(|line| line.trim().to_string()).collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "state file unreadable, treating as empty"
                );
                Vec::new()
            }
        }
    }
}

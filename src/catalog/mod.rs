//! Template registry: loads URL-template catalogs from CSV files.
//!
//! Catalogs live in two directories. The built-in directory ships with the
//! application; the user directory holds overrides and additions. Files are
//! matched by name, and a user file replaces the built-in file of the same
//! name entirely.
//!
//! Each catalog is a CSV table with a header row. Columns are looked up by
//! name, so their order does not matter:
//!
//! | Column            | Meaning                                         |
//! |-------------------|-------------------------------------------------|
//! | `Navigation type` | `People`, `Places`, ..., `*`, or a comma list   |
//! | `Category`        | Link title                                      |
//! | `Is enabled`      | `1`/`true`/`yes`/`y` enables the row            |
//! | `URL`             | Template with `%(key)s` placeholders            |
//! | `Comment`         | Optional free text                              |
//!
//! Every row of a file shares one tag derived from the file name:
//! `uk-links.csv` yields `UK`, `common-links.csv` yields `COMMON`.

mod error;
mod record;

pub use error::CatalogError;
pub use record::{SourceTag, TemplateRecord, is_truthy};

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::entity::NavType;

/// File name extension of catalog files.
pub const CATALOG_EXTENSION: &str = "csv";

const COL_NAV_TYPE: &str = "navigation type";
const COL_TITLE: &str = "category";
const COL_ENABLED: &str = "is enabled";
const COL_URL: &str = "url";
const COL_COMMENT: &str = "comment";

/// Records loaded from the selected catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogSet {
    pub records: Vec<TemplateRecord>,
    /// True when a `COMMON` catalog was among the loaded files.
    pub include_global: bool,
}

/// Tags and template hosts found in the selected catalogs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainScan {
    /// Regional tags, excluding `COMMON`.
    pub locales: BTreeSet<String>,
    pub domains: BTreeSet<String>,
    pub include_global: bool,
}

/// Outcome of parsing one catalog source.
#[derive(Debug, Default)]
pub struct ParsedCatalog {
    pub records: Vec<TemplateRecord>,
    /// Human-readable reasons for every skipped row.
    pub skipped: Vec<String>,
}

/// A catalog file chosen by the directory merge.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CatalogFile {
    path: PathBuf,
    is_custom: bool,
}

/// Loads catalogs from a built-in and an optional user directory.
#[derive(Debug, Clone)]
pub struct CatalogLoader {
    builtin_dir: PathBuf,
    user_dir: Option<PathBuf>,
}

impl CatalogLoader {
    /// Creates a loader reading only the built-in directory.
    #[must_use]
    pub fn new(builtin_dir: impl Into<PathBuf>) -> Self {
        Self {
            builtin_dir: builtin_dir.into(),
            user_dir: None,
        }
    }

    /// Adds a user directory whose files override built-in files of the same name.
    #[must_use]
    pub fn with_user_dir(mut self, user_dir: impl Into<PathBuf>) -> Self {
        self.user_dir = Some(user_dir.into());
        self
    }

    #[must_use]
    pub fn builtin_dir(&self) -> &Path {
        &self.builtin_dir
    }

    #[must_use]
    pub fn user_dir(&self) -> Option<&Path> {
        self.user_dir.as_deref()
    }

    /// Lists every catalog file name known in either directory, sorted.
    #[must_use]
    pub fn available_catalogs(&self) -> Vec<String> {
        self.merged_files().into_keys().collect()
    }

    /// Loads and expands the records of the selected catalog files.
    ///
    /// Files that are selected but exist in neither directory, files that
    /// cannot be read, and malformed rows are logged and skipped.
    #[instrument(skip(self, selected), fields(selected = selected.len()))]
    pub fn load(&self, selected: &[String]) -> CatalogSet {
        let mut set = CatalogSet::default();

        for (name, file) in self.selected_files(selected) {
            let tag = catalog_tag(&name);
            if tag == SourceTag::Common {
                set.include_global = true;
            }

            match read_catalog(&file.path, tag, file.is_custom) {
                Ok(parsed) => {
                    for reason in &parsed.skipped {
                        warn!(catalog = %name, reason = %reason, "Skipped catalog row");
                    }
                    debug!(
                        catalog = %name,
                        records = parsed.records.len(),
                        skipped = parsed.skipped.len(),
                        custom = file.is_custom,
                        "Loaded catalog"
                    );
                    set.records.extend(parsed.records);
                }
                Err(error) => {
                    warn!(catalog = %name, error = %error, "Skipping unreadable catalog");
                }
            }
        }

        info!(
            records = set.records.len(),
            include_global = set.include_global,
            "Catalogs loaded"
        );
        set
    }

    /// Collects regional tags and template hosts of the selected catalogs.
    #[instrument(skip(self, selected), fields(selected = selected.len()))]
    pub fn scan_domains(&self, selected: &[String]) -> DomainScan {
        let mut scan = DomainScan::default();

        for (name, file) in self.selected_files(selected) {
            let tag = catalog_tag(&name);
            if tag == SourceTag::Common {
                scan.include_global = true;
            } else {
                scan.locales.insert(tag.as_str().to_string());
            }

            match read_catalog_urls(&file.path) {
                Ok(urls) => {
                    scan.domains.extend(
                        urls.iter()
                            .map(String::as_str)
                            .filter_map(template_domain),
                    );
                }
                Err(error) => {
                    warn!(catalog = %name, error = %error, "Skipping unreadable catalog");
                }
            }
        }

        debug!(
            locales = scan.locales.len(),
            domains = scan.domains.len(),
            "Scanned catalog domains"
        );
        scan
    }

    fn selected_files(&self, selected: &[String]) -> Vec<(String, CatalogFile)> {
        let wanted: BTreeSet<&str> = selected.iter().map(|name| name.trim()).collect();
        let mut merged = self.merged_files();

        for name in &wanted {
            if !merged.contains_key(*name) {
                warn!(catalog = %name, "Selected catalog not found in any directory");
            }
        }

        merged.retain(|name, _| wanted.contains(name.as_str()));
        merged.into_iter().collect()
    }

    /// Built-in files first, user files second; a user file replaces the
    /// built-in entry of the same name.
    fn merged_files(&self) -> BTreeMap<String, CatalogFile> {
        let mut merged = BTreeMap::new();

        for (dir, is_custom) in [
            (Some(self.builtin_dir.as_path()), false),
            (self.user_dir.as_deref(), true),
        ] {
            let Some(dir) = dir else { continue };
            match list_catalog_files(dir) {
                Ok(files) => {
                    for (name, path) in files {
                        merged.insert(name, CatalogFile { path, is_custom });
                    }
                }
                Err(error) => {
                    debug!(error = %error, "Catalog directory unavailable");
                }
            }
        }

        merged
    }
}

/// Returns the tag shared by every row of a catalog file.
///
/// The file stem loses its `-links` marker and is upper-cased.
#[must_use]
pub fn catalog_tag(file_name: &str) -> SourceTag {
    let stem = Path::new(file_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(file_name);
    SourceTag::parse(&stem.replace("-links", ""))
}

/// Expands a `Navigation type` cell into concrete navigation types.
///
/// `*` yields every type; otherwise the cell is a comma list and
/// unrecognized members are dropped.
#[must_use]
pub fn expand_nav_types(raw: &str) -> Vec<NavType> {
    let raw = raw.trim();
    if raw == "*" {
        return NavType::ALL.to_vec();
    }
    raw.split(',')
        .filter_map(|part| part.trim().parse().ok())
        .collect()
}

/// Extracts the host of a template URL.
///
/// Templates often carry placeholders in the host, so URL parsing falls
/// back to the third `/`-separated segment, or the raw value when it has no
/// `//` at all. Empty URLs have no domain.
#[must_use]
pub fn template_domain(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }

    if let Some(host) = Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .filter(|host| !host.is_empty())
    {
        return Some(host);
    }

    if url.contains("//") {
        url.split('/')
            .nth(2)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
    } else {
        Some(url.to_string())
    }
}

/// Reads one catalog file.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be opened or its header row
/// cannot be read. Individual bad rows are reported in
/// [`ParsedCatalog::skipped`] instead.
pub fn read_catalog(
    path: &Path,
    tag: SourceTag,
    is_custom: bool,
) -> Result<ParsedCatalog, CatalogError> {
    let file = File::open(path).map_err(|e| CatalogError::open(path, e))?;
    parse_catalog(BufReader::new(file), tag, is_custom).map_err(|e| CatalogError::header(path, e))
}

/// Parses catalog CSV text from any reader.
///
/// # Errors
///
/// Returns the CSV error if the header row cannot be read.
pub fn parse_catalog<R: Read>(
    reader: R,
    tag: SourceTag,
    is_custom: bool,
) -> Result<ParsedCatalog, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let header_map = build_header_map(&headers);
    let mut parsed = ParsedCatalog::default();

    for (row_idx, result) in rdr.records().enumerate() {
        let row_num = row_idx + 2; // +2 for 1-indexed and header row

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                parsed.skipped.push(format!("row {row_num}: CSV parse error: {e}"));
                continue;
            }
        };

        let nav_raw = get_field(&record, &header_map, COL_NAV_TYPE);
        let title = get_field(&record, &header_map, COL_TITLE);
        let enabled = get_field(&record, &header_map, COL_ENABLED);
        let url = get_field(&record, &header_map, COL_URL);

        let (Some(nav_raw), Some(title), Some(enabled), Some(url)) = (nav_raw, title, enabled, url)
        else {
            parsed
                .skipped
                .push(format!("row {row_num}: missing required field"));
            continue;
        };

        let comment = get_field(&record, &header_map, COL_COMMENT);
        let enabled = is_truthy(&enabled);

        let nav_types = expand_nav_types(&nav_raw);
        if nav_types.is_empty() {
            parsed
                .skipped
                .push(format!("row {row_num}: no known navigation type in '{nav_raw}'"));
            continue;
        }

        for nav_type in nav_types {
            parsed.records.push(TemplateRecord {
                nav_type,
                tag: tag.clone(),
                title: title.clone(),
                enabled,
                url: url.clone(),
                comment: comment.clone(),
                is_custom,
            });
        }
    }

    Ok(parsed)
}

/// Reads the `URL` cell of every row of one catalog file.
///
/// Unlike [`read_catalog`], rows are not validated: a row missing its
/// title or naming an unknown navigation type still contributes its URL.
///
/// # Errors
///
/// Returns [`CatalogError`] if the file cannot be opened or its header row
/// cannot be read.
pub fn read_catalog_urls(path: &Path) -> Result<Vec<String>, CatalogError> {
    let file = File::open(path).map_err(|e| CatalogError::open(path, e))?;
    parse_catalog_urls(BufReader::new(file)).map_err(|e| CatalogError::header(path, e))
}

/// Collects the non-empty `URL` cells from catalog CSV text.
///
/// # Errors
///
/// Returns the CSV error if the header row cannot be read.
pub fn parse_catalog_urls<R: Read>(reader: R) -> Result<Vec<String>, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let header_map = build_header_map(&rdr.headers()?.clone());
    let urls = rdr
        .records()
        .filter_map(Result::ok)
        .filter_map(|record| get_field(&record, &header_map, COL_URL))
        .collect();
    Ok(urls)
}

/// Maps lower-cased header names to column indexes.
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect()
}

/// Returns a non-empty trimmed cell by column name.
fn get_field(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<String> {
    header_map
        .get(name)
        .and_then(|&idx| record.get(idx))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Lists `*.csv` files in `dir` keyed by file name.
fn list_catalog_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::list_dir(dir, e))?;
    let mut files = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::list_dir(dir, e))?;
        let path = entry.path();
        if !path.is_file()
            || path.extension().and_then(|ext| ext.to_str()) != Some(CATALOG_EXTENSION)
        {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            files.push((name.to_string(), path.clone()));
        }
    }

    Ok(files)
}

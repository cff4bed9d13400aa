//! User settings loaded from `config.toml`.
//!
//! The file holds one `key = value` pair per line. Strings are double-quoted,
//! lists are written as `["a", "b"]`, booleans as `true`/`false`, and `#`
//! starts a comment outside of strings. Keys that are not set keep their
//! defaults.

use std::env;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::entity::MiddleNameHandling;
use crate::formatter::{CompactnessLevel, DEFAULT_TRACE_SEPARATOR, FormatOptions};
use crate::resolver::IconOptions;

/// Directory name used under the XDG config home.
pub const APP_DIR_NAME: &str = "websearch";

/// Catalog enabled when no configuration exists.
pub const DEFAULT_ENABLED_FILE: &str = "common-links.csv";

/// Effective settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Catalog file names to load.
    pub enabled_files: Vec<String>,
    pub middle_name_handling: MiddleNameHandling,
    pub url_prefix_replacement: String,
    pub show_short_url: bool,
    pub url_compactness_level: CompactnessLevel,
    pub show_flag_icons: bool,
    /// Also emit links found in object attributes.
    pub show_attribute_links: bool,
    pub show_user_data_icon: bool,
    pub trace_separator: String,
    /// Built-in catalog directory.
    pub catalog_dir: Option<PathBuf>,
    /// User catalog directory overriding built-in files.
    pub user_catalog_dir: Option<PathBuf>,
    pub state_dir: Option<PathBuf>,
    pub flags_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled_files: vec![DEFAULT_ENABLED_FILE.to_string()],
            middle_name_handling: MiddleNameHandling::default(),
            url_prefix_replacement: String::new(),
            show_short_url: true,
            url_compactness_level: CompactnessLevel::default(),
            show_flag_icons: true,
            show_attribute_links: false,
            show_user_data_icon: false,
            trace_separator: DEFAULT_TRACE_SEPARATOR.to_string(),
            catalog_dir: None,
            user_catalog_dir: None,
            state_dir: None,
            flags_dir: None,
        }
    }
}

impl Settings {
    /// Validates values that parse but make no sense.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending key.
    pub fn validate(&self) -> Result<()> {
        for name in &self.enabled_files {
            if name.is_empty() || name.contains(['/', '\\', '"', ',']) {
                bail!(
                    "Invalid config value for `enabled_files`: '{name}'. Expected a catalog file name"
                );
            }
        }
        if self.trace_separator.contains(['\n', '\r']) {
            bail!("Invalid config value for `trace_separator`: must be a single line");
        }

        // String values are written back unescaped by `to_config_string`.
        for (key, value) in [
            ("url_prefix_replacement", self.url_prefix_replacement.as_str()),
            ("trace_separator", self.trace_separator.as_str()),
        ] {
            if value.contains('"') {
                bail!("Invalid config value for `{key}`: must not contain '\"'");
            }
        }
        for (key, value) in [
            ("catalog_dir", &self.catalog_dir),
            ("user_catalog_dir", &self.user_catalog_dir),
            ("state_dir", &self.state_dir),
            ("flags_dir", &self.flags_dir),
        ] {
            if value
                .as_ref()
                .is_some_and(|path| path.to_string_lossy().contains('"'))
            {
                bail!("Invalid config value for `{key}`: must not contain '\"'");
            }
        }
        Ok(())
    }

    /// Display options for the URL formatter.
    #[must_use]
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            show_short_url: self.show_short_url,
            compactness: self.url_compactness_level,
            prefix_replacement: self.url_prefix_replacement.clone(),
            trace_separator: self.trace_separator.clone(),
        }
    }

    /// Icon options for row assembly.
    #[must_use]
    pub fn icon_options(&self) -> IconOptions {
        IconOptions {
            flags_dir: self.flags_dir.clone(),
            show_flag_icons: self.show_flag_icons,
            show_user_data_icon: self.show_user_data_icon,
        }
    }

    /// Renders the settings in config file syntax.
    #[must_use]
    pub fn to_config_string(&self) -> String {
        let files: Vec<String> = self
            .enabled_files
            .iter()
            .map(|name| format!("\"{name}\""))
            .collect();

        let mut out = String::new();
        let _ = writeln!(out, "enabled_files = [{}]", files.join(", "));
        let _ = writeln!(
            out,
            "middle_name_handling = \"{}\"",
            self.middle_name_handling.as_str()
        );
        let _ = writeln!(out, "url_prefix_replacement = \"{}\"", self.url_prefix_replacement);
        let _ = writeln!(out, "show_short_url = {}", self.show_short_url);
        let _ = writeln!(
            out,
            "url_compactness_level = \"{}\"",
            self.url_compactness_level.as_str()
        );
        let _ = writeln!(out, "show_flag_icons = {}", self.show_flag_icons);
        let _ = writeln!(out, "show_attribute_links = {}", self.show_attribute_links);
        let _ = writeln!(out, "show_user_data_icon = {}", self.show_user_data_icon);
        let _ = writeln!(out, "trace_separator = \"{}\"", self.trace_separator);
        for (key, value) in [
            ("catalog_dir", &self.catalog_dir),
            ("user_catalog_dir", &self.user_catalog_dir),
            ("state_dir", &self.state_dir),
            ("flags_dir", &self.flags_dir),
        ] {
            if let Some(path) = value {
                let _ = writeln!(out, "{key} = \"{}\"", path.display());
            }
        }
        out
    }
}

/// Loaded settings metadata.
#[derive(Debug, Clone)]
pub struct LoadedSettings {
    /// Resolved config path if a base directory is known.
    pub path: Option<PathBuf>,
    pub settings: Settings,
    /// Indicates whether settings were read from disk.
    pub loaded_from_file: bool,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/websearch/config.toml`
/// 2. `$HOME/.config/websearch/config.toml`
#[must_use]
pub fn resolve_default_config_path() -> Option<PathBuf> {
    config_path_from(
        env_var_non_empty_os("XDG_CONFIG_HOME"),
        env_var_non_empty_os("HOME"),
    )
}

fn config_path_from(xdg_config_home: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(xdg_config_home) = xdg_config_home {
        return Some(
            PathBuf::from(xdg_config_home)
                .join(APP_DIR_NAME)
                .join("config.toml"),
        );
    }

    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(APP_DIR_NAME)
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads settings from the default path, falling back to defaults when the
/// file does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_default_settings() -> Result<LoadedSettings> {
    load_settings_at(resolve_default_config_path())
}

/// Loads settings from an explicit path, or defaults when it does not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_settings_at(path: Option<PathBuf>) -> Result<LoadedSettings> {
    let Some(path_ref) = path.as_deref() else {
        return Ok(LoadedSettings {
            path,
            settings: Settings::default(),
            loaded_from_file: false,
        });
    };

    if !path_ref.exists() {
        debug!(path = %path_ref.display(), "No config file, using defaults");
        return Ok(LoadedSettings {
            path,
            settings: Settings::default(),
            loaded_from_file: false,
        });
    }

    let settings = load_settings_file(path_ref)?;
    debug!(path = %path_ref.display(), "Loaded config file");
    Ok(LoadedSettings {
        path,
        settings,
        loaded_from_file: true,
    })
}

fn load_settings_file(path: &Path) -> Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
    parse_settings_str(&raw)
        .with_context(|| format!("Failed to parse config file '{}'", path.display()))
}

/// Parses config file text on top of the defaults.
///
/// # Errors
///
/// Returns an error for malformed lines, unknown keys and invalid values,
/// naming the key and line.
pub fn parse_settings_str(raw: &str) -> Result<Settings> {
    let mut cfg = Settings::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            bail!("Invalid config syntax on line {line_no}: expected key = value");
        };

        let key = raw_key.trim();
        let value = raw_value.trim();
        let invalid = || format!("Invalid `{key}` value on line {line_no}");

        match key {
            "enabled_files" => {
                cfg.enabled_files = parse_string_list(value).with_context(invalid)?;
            }
            "middle_name_handling" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.middle_name_handling = MiddleNameHandling::parse(&parsed).with_context(|| {
                    format!(
                        "Invalid `{key}` value '{parsed}' on line {line_no}: expected one of: leave alone, separate, remove"
                    )
                })?;
            }
            "url_prefix_replacement" => {
                cfg.url_prefix_replacement = parse_string_literal(value).with_context(invalid)?;
            }
            "show_short_url" => {
                cfg.show_short_url = parse_boolean(value).with_context(invalid)?;
            }
            "url_compactness_level" => {
                let parsed = parse_string_literal(value).with_context(invalid)?;
                cfg.url_compactness_level = CompactnessLevel::parse(&parsed).with_context(|| {
                    format!(
                        "Invalid `{key}` value '{parsed}' on line {line_no}: expected one of: shortest, compact_no_attributes, compact_with_attributes, long"
                    )
                })?;
            }
            "show_flag_icons" => {
                cfg.show_flag_icons = parse_boolean(value).with_context(invalid)?;
            }
            "show_attribute_links" => {
                cfg.show_attribute_links = parse_boolean(value).with_context(invalid)?;
            }
            "show_user_data_icon" => {
                cfg.show_user_data_icon = parse_boolean(value).with_context(invalid)?;
            }
            "trace_separator" => {
                cfg.trace_separator = parse_string_literal(value).with_context(invalid)?;
            }
            "catalog_dir" => {
                cfg.catalog_dir = Some(parse_path(value).with_context(invalid)?);
            }
            "user_catalog_dir" => {
                cfg.user_catalog_dir = Some(parse_path(value).with_context(invalid)?);
            }
            "state_dir" => {
                cfg.state_dir = Some(parse_path(value).with_context(invalid)?);
            }
            "flags_dir" => {
                cfg.flags_dir = Some(parse_path(value).with_context(invalid)?);
            }
            unknown => {
                bail!("Unknown configuration key: '{unknown}' on line {line_no}");
            }
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn parse_string_literal(raw_value: &str) -> Result<String> {
    let raw_value = raw_value.trim();
    if raw_value.len() < 2 || !raw_value.starts_with('"') || !raw_value.ends_with('"') {
        bail!("Expected double-quoted string");
    }
    Ok(raw_value[1..raw_value.len() - 1].to_string())
}

fn parse_path(raw_value: &str) -> Result<PathBuf> {
    let parsed = parse_string_literal(raw_value)?;
    if parsed.is_empty() {
        bail!("Expected non-empty path");
    }
    Ok(PathBuf::from(parsed))
}

fn parse_string_list(raw_value: &str) -> Result<Vec<String>> {
    let Some(inner) = raw_value
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    else {
        bail!("Expected list of double-quoted strings");
    };

    inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(parse_string_literal)
        .collect()
}

fn parse_boolean(raw_value: &str) -> Result<bool> {
    match raw_value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => bail!("Expected 'true' or 'false'"),
    }
}

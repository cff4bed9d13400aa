//! WebSearch Core Library
//!
//! Turns catalogs of genealogy search-site URL templates into ready-to-open
//! links for one person, place, source or family.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`catalog`] - Template registry loading CSV catalogs from built-in and user directories
//! - [`entity`] - Navigation types and the entity key vocabulary
//! - [`pattern`] - `%(key)s` placeholder classification and substitution
//! - [`formatter`] - Compact display form of resolved URLs
//! - [`state`] - Visited, saved, hidden and skipped-domain state files
//! - [`resolver`] - Per-template resolution pipeline and row assembly
//! - [`extract`] - Links stored in notes, attributes and the Internet tab
//! - [`suggest`] - AI site suggestion prompt and reply parsing
//! - [`config`] - User settings file

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod entity;
pub mod extract;
pub mod formatter;
pub mod pattern;
pub mod resolver;
pub mod state;
pub mod suggest;

// Re-export commonly used types
pub use catalog::{CatalogLoader, CatalogSet, DomainScan, SourceTag, TemplateRecord};
pub use config::Settings;
pub use entity::{EntityKeys, MiddleNameHandling, NavType};
pub use formatter::{CompactnessLevel, FormatOptions, format_url};
pub use pattern::{PatternKeys, classify, substitute};
pub use resolver::{
    EntityContext, IconOptions, LinkResolver, ResolveError, ResolveOutcome, ResolvedLinkRow,
    sort_rows,
};
pub use state::{StateError, StateStore, content_hash};

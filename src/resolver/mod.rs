//! Link resolution pipeline turning template records into display rows.
//!
//! Each record passes through a fixed sequence of steps and ends either
//! emitted as a [`ResolvedLinkRow`] or dropped:
//!
//! 1. Navigation type and enabled filter
//! 2. Hidden-link filter (object-scoped or global key)
//! 3. Literal pass-through for `STATIC` and `ATTRIBUTE`
//! 4. Attribute key augmentation
//! 5. Placeholder classification
//! 6. Safe substitution
//! 7. UID reclassification ([`reclassify_tag`])
//! 8. Display formatting, skipped for literal rows
//! 9. Visited/saved lookup and row assembly
//!
//! # Example
//!
//! ```no_run
//! use websearch_core::catalog::CatalogLoader;
//! use websearch_core::entity::{EntityKeys, NavType};
//! use websearch_core::formatter::FormatOptions;
//! use websearch_core::resolver::{EntityContext, IconOptions, LinkResolver, sort_rows};
//! use websearch_core::state::StateStore;
//!
//! let catalogs = CatalogLoader::new("/usr/share/websearch/csv");
//! let set = catalogs.load(&["common-links.csv".to_string()]);
//!
//! let resolver = LinkResolver::new(
//!     StateStore::new("/tmp/websearch"),
//!     FormatOptions::default(),
//!     IconOptions::default(),
//! );
//! let mut keys = EntityKeys::new();
//! keys.insert("surname".to_string(), "Smith".to_string());
//! let ctx = EntityContext::new(NavType::People, "I0001", keys);
//!
//! let mut rows = resolver.resolve_all(&set.records, &ctx);
//! sort_rows(&mut rows);
//! ```

mod error;
mod row;

pub use error::ResolveError;
pub use row::{IconOptions, KeysCoverage, LocaleIcon, ResolvedLinkRow, sort_rows};

use tracing::{debug, info, trace, warn};

use crate::catalog::{SourceTag, TemplateRecord};
use crate::entity::{EntityKeys, NavType};
use crate::extract::matching_attribute_keys;
use crate::formatter::{FormatOptions, format_url};
use crate::pattern::{PatternKeys, classify, substitute};
use crate::state::{StateStore, content_hash};

/// The active object links are resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityContext {
    pub nav_type: NavType,
    /// Stable object handle used in hashes and hidden-link keys.
    pub object_id: String,
    pub keys: EntityKeys,
    /// Identifier-like keys taken from the object's attributes.
    pub attribute_keys: EntityKeys,
}

impl EntityContext {
    #[must_use]
    pub fn new(nav_type: NavType, object_id: impl Into<String>, keys: EntityKeys) -> Self {
        Self {
            nav_type,
            object_id: object_id.into(),
            keys,
            attribute_keys: EntityKeys::new(),
        }
    }

    /// Sets the attribute-derived keys.
    #[must_use]
    pub fn with_attribute_keys(mut self, attribute_keys: EntityKeys) -> Self {
        self.attribute_keys = attribute_keys;
        self
    }
}

/// Why a record produced no row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Record targets another navigation type.
    NavTypeMismatch,
    Disabled,
    /// Hidden for this object or for every object.
    Hidden,
    /// A UID template where no identifier was substituted.
    UidWithoutValue,
}

/// Terminal state of one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveOutcome {
    Emitted(Box<ResolvedLinkRow>),
    Dropped(DropReason),
}

/// Result of the substitution steps, before state lookup.
struct Substituted {
    final_url: String,
    keys: PatternKeys,
    tag: SourceTag,
}

/// Decides the tag after classification.
///
/// A tag becomes `UID` when any replaced key came from the attribute-derived
/// keys. Returns `None` when the resulting tag is `UID` and nothing was
/// replaced, meaning the row must be dropped.
#[must_use]
pub fn reclassify_tag(
    tag: &SourceTag,
    keys: &PatternKeys,
    matched_attribute_keys: &EntityKeys,
) -> Option<SourceTag> {
    let uses_attribute_key = matched_attribute_keys
        .keys()
        .any(|key| keys.is_replaced(key));

    let tag = if uses_attribute_key {
        SourceTag::Uid
    } else {
        tag.clone()
    };

    if tag == SourceTag::Uid && keys.replaced.is_empty() {
        None
    } else {
        Some(tag)
    }
}

/// Resolves template records for one entity.
#[derive(Debug, Clone)]
pub struct LinkResolver {
    store: StateStore,
    format: FormatOptions,
    icons: IconOptions,
}

impl LinkResolver {
    #[must_use]
    pub fn new(store: StateStore, format: FormatOptions, icons: IconOptions) -> Self {
        Self {
            store,
            format,
            icons,
        }
    }

    /// State store consulted for hidden, visited and saved links.
    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Resolves every record, in order, skipping dropped and failing ones.
    ///
    /// A record that fails is logged and dropped; the remaining records are
    /// still resolved.
    #[tracing::instrument(
        skip(self, records, ctx),
        fields(records = records.len(), nav_type = %ctx.nav_type, object_id = %ctx.object_id)
    )]
    pub fn resolve_all(
        &self,
        records: &[TemplateRecord],
        ctx: &EntityContext,
    ) -> Vec<ResolvedLinkRow> {
        let mut rows = Vec::new();
        let mut dropped: usize = 0;
        let mut failed: usize = 0;

        for record in records {
            match self.resolve_one(record, ctx) {
                Ok(ResolveOutcome::Emitted(row)) => rows.push(*row),
                Ok(ResolveOutcome::Dropped(reason)) => {
                    trace!(title = %record.title, ?reason, "Record dropped");
                    dropped += 1;
                }
                Err(error) => {
                    warn!(
                        title = %record.title,
                        url = %record.url,
                        error = %error,
                        "Template failed, skipping"
                    );
                    failed += 1;
                }
            }
        }

        info!(emitted = rows.len(), dropped, failed, "Links resolved");
        rows
    }

    /// Runs the full pipeline for one record.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the record cannot be turned into a row;
    /// filter decisions are reported as [`ResolveOutcome::Dropped`] instead.
    pub fn resolve_one(
        &self,
        record: &TemplateRecord,
        ctx: &EntityContext,
    ) -> Result<ResolveOutcome, ResolveError> {
        if record.nav_type != ctx.nav_type {
            return Ok(ResolveOutcome::Dropped(DropReason::NavTypeMismatch));
        }
        if !record.enabled {
            return Ok(ResolveOutcome::Dropped(DropReason::Disabled));
        }
        if record.url.trim().is_empty() {
            return Err(ResolveError::empty_template(&record.title));
        }
        if self
            .store
            .is_hidden(&record.url, &ctx.object_id, ctx.nav_type)
        {
            return Ok(ResolveOutcome::Dropped(DropReason::Hidden));
        }

        let Some(substituted) = Self::substitute_record(record, ctx) else {
            return Ok(ResolveOutcome::Dropped(DropReason::UidWithoutValue));
        };

        let row = self.assemble_row(record, ctx, substituted)?;
        debug!(title = %row.title, tag = %row.tag, url = %row.final_url, "Record emitted");
        Ok(ResolveOutcome::Emitted(Box::new(row)))
    }

    fn substitute_record(record: &TemplateRecord, ctx: &EntityContext) -> Option<Substituted> {
        if record.tag.is_literal() {
            return Some(Substituted {
                final_url: record.url.clone(),
                keys: PatternKeys::default(),
                tag: record.tag.clone(),
            });
        }

        let matched = matching_attribute_keys(&ctx.attribute_keys, &record.url);
        let mut merged = ctx.keys.clone();
        merged.extend(matched.iter().map(|(k, v)| (k.clone(), v.clone())));

        let keys = classify(&record.url, &merged);
        let final_url = substitute(&record.url, &merged);
        let tag = reclassify_tag(&record.tag, &keys, &matched)?;

        Some(Substituted {
            final_url,
            keys,
            tag,
        })
    }

    fn assemble_row(
        &self,
        record: &TemplateRecord,
        ctx: &EntityContext,
        substituted: Substituted,
    ) -> Result<ResolvedLinkRow, ResolveError> {
        let Substituted {
            final_url,
            keys,
            tag,
        } = substituted;

        let keys_json = keys
            .to_json()
            .map_err(|e| ResolveError::classification(&record.title, e))?;
        let raw_display = record.tag.is_literal();
        let display_url = if raw_display {
            final_url.clone()
        } else {
            format_url(&final_url, &keys, &self.format)
        };
        let hash = content_hash(&final_url, &ctx.object_id);
        let replaced_keys_count = keys.replaced_count();
        let total_keys_count = keys.total_count();

        Ok(ResolvedLinkRow {
            nav_type: ctx.nav_type,
            object_id: ctx.object_id.clone(),
            title: record.title.clone(),
            display_url,
            comment: record.comment.clone(),
            url_template: record.url.clone(),
            keys_json,
            replaced_keys_count,
            total_keys_count,
            coverage: KeysCoverage::from_counts(replaced_keys_count, total_keys_count),
            sort_key: tag.sort_key(),
            visited: self.store.is_visited(&final_url, &ctx.object_id),
            saved: self.store.is_saved(&final_url, &ctx.object_id),
            content_hash: hash,
            user_data: self.icons.show_user_data_icon && record.is_custom,
            category_icon: ctx.nav_type.category_icon(),
            locale_icon: self.icons.locale_icon(&tag),
            locale_text: tag.locale_text().to_string(),
            display_keys_count: !raw_display,
            final_url,
            keys,
            tag,
        })
    }
}

//! Error types for per-template resolution.
//!
//! A failing template never aborts a batch: [`super::LinkResolver::resolve_all`]
//! logs the error and drops that row only.

use thiserror::Error;

/// Errors that can occur while resolving a single template.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The record has no URL template to resolve
    #[error("template '{title}' has an empty URL")]
    EmptyTemplate {
        /// Title of the offending record
        title: String,
    },

    /// The placeholder classification could not be serialized
    #[error("cannot serialize key classification for '{title}': {source}")]
    Classification {
        /// Title of the offending record
        title: String,
        /// Underlying serializer error
        #[source]
        source: serde_json::Error,
    },
}

impl ResolveError {
    /// Creates an `EmptyTemplate` error.
    #[must_use]
    pub fn empty_template(title: &str) -> Self {
        Self::EmptyTemplate {
            title: title.to_string(),
        }
    }

    /// Creates a `Classification` error.
    #[must_use]
    pub fn classification(title: &str, source: serde_json::Error) -> Self {
        Self::Classification {
            title: title.to_string(),
            source,
        }
    }
}

//! Prompt building and response parsing for AI site suggestions.
//!
//! The network call itself lives outside this crate. Callers send the
//! [`Prompt`] to a chat model of their choice and hand the raw reply to
//! [`parse_suggestions`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::DomainScan;

/// Number of sites the model is asked for.
pub const REQUESTED_SITE_COUNT: usize = 10;

const SYSTEM_MESSAGE: &str = "You assist in finding resources for genealogical research. \
Your response must be strictly formatted as a JSON array of objects with only two keys: \
'domain' and 'url'. Do not include any additional text, explanations, or comments.";

/// System and user messages for one suggestion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// A site proposed by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSuggestion {
    pub domain: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Builds the prompt asking for sites outside the catalogs and skip list.
///
/// Excluded domains are the catalog domains plus every skipped domain.
#[must_use]
pub fn build_prompt(scan: &DomainScan, skipped: &BTreeSet<String>) -> Prompt {
    let excluded: BTreeSet<&str> = scan
        .domains
        .iter()
        .chain(skipped.iter())
        .map(String::as_str)
        .collect();

    let (locale_text, locales) = if scan.locales.is_empty() {
        ("only globally used", "none".to_string())
    } else {
        let text = if scan.include_global {
            "both regional and globally used"
        } else {
            "regional"
        };
        let joined: Vec<&str> = scan.locales.iter().map(String::as_str).collect();
        (text, joined.join(", "))
    };

    let excluded = if excluded.is_empty() {
        "none".to_string()
    } else {
        excluded.into_iter().collect::<Vec<_>>().join(", ")
    };

    let user = format!(
        "I am looking for additional genealogical research websites for {locale_text} resources. \
         Relevant locales: {locales}. \
         Exclude the following domains: {excluded}. \
         Provide exactly {REQUESTED_SITE_COUNT} relevant websites formatted as a JSON array of objects \
         with keys 'domain' and 'url'. \
         Example response: [{{\"domain\": \"example.com\", \"url\": \"https://example.com\"}}]. \
         If no relevant websites are found, return an empty array [] without any explanations."
    );

    Prompt {
        system: SYSTEM_MESSAGE.to_string(),
        user,
    }
}

/// Parses the model reply into suggestions.
///
/// Entries missing a domain or URL and entries for skipped domains are
/// dropped. A reply that is not a JSON array yields no suggestions.
#[must_use]
pub fn parse_suggestions(raw: &str, skipped: &BTreeSet<String>) -> Vec<SiteSuggestion> {
    let entries: Vec<RawSuggestion> = match serde_json::from_str(raw.trim()) {
        Ok(entries) => entries,
        Err(error) => {
            warn!(error = %error, "Site suggestion reply is not a JSON array");
            return Vec::new();
        }
    };

    let total = entries.len();
    let suggestions: Vec<SiteSuggestion> = entries
        .into_iter()
        .filter_map(|entry| {
            let domain = entry.domain?.trim().to_string();
            let url = entry.url?.trim().to_string();
            (!domain.is_empty() && !url.is_empty()).then_some(SiteSuggestion { domain, url })
        })
        .filter(|site| !skipped.contains(&site.domain))
        .collect();

    debug!(total, kept = suggestions.len(), "Parsed site suggestions");
    suggestions
}

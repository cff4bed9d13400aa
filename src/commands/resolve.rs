//! Resolve command: fills catalog templates for one object and prints rows.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use websearch_core::catalog::TemplateRecord;
use websearch_core::config::Settings;
use websearch_core::entity::{EntityKeys, NavType};
use websearch_core::extract::{
    Attribute, InternetRef, NoteLink, links_from_attributes, links_from_internet, links_from_note,
};
use websearch_core::resolver::{EntityContext, LinkResolver, ResolvedLinkRow, sort_rows};

use super::{catalog_loader, selected_catalogs, state_store};
use crate::cli::ResolveArgs;

/// Links stored on the object itself.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ObjectLinks {
    notes: Vec<NoteInput>,
    attributes: Vec<Attribute>,
    internet: Vec<InternetRef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NoteInput {
    text: String,
    links: Vec<NoteLink>,
}

impl ObjectLinks {
    fn into_records(self, nav_type: NavType, include_attributes: bool) -> Vec<TemplateRecord> {
        let mut records = Vec::new();
        if include_attributes {
            records.extend(links_from_attributes(nav_type, &self.attributes));
        }
        for note in &self.notes {
            records.extend(links_from_note(nav_type, &note.text, &note.links));
        }
        records.extend(links_from_internet(nav_type, &self.internet));
        records
    }
}

pub fn run_resolve_command(args: &ResolveArgs, settings: &Settings) -> Result<()> {
    let loader = catalog_loader(&args.catalog, settings)?;
    let store = state_store(args.catalog.state_dir.as_deref(), settings)?;

    let mut records = loader.load(&selected_catalogs(&args.catalog, settings)).records;

    let mut keys = read_keys(args.keys.as_deref())?;
    if let Some(name) = &args.given_name {
        settings.middle_name_handling.apply(&mut keys, None, name);
    }
    let attribute_keys = read_keys(args.attribute_keys.as_deref())?;

    if let Some(path) = &args.object_links {
        let links = read_object_links(path)?;
        records.extend(links.into_records(args.nav_type, settings.show_attribute_links));
    }
    debug!(records = records.len(), "Records ready for resolution");

    let mut icons = settings.icon_options();
    if let Some(dir) = &args.flags_dir {
        icons.flags_dir = Some(dir.clone());
    }

    let resolver = LinkResolver::new(store, settings.format_options(), icons);
    let ctx = EntityContext::new(args.nav_type, args.object_id.clone(), keys)
        .with_attribute_keys(attribute_keys);

    let mut rows = resolver.resolve_all(&records, &ctx);
    sort_rows(&mut rows);
    info!(rows = rows.len(), "Resolution complete");

    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&rows).context("Failed to serialize rows")?
        );
    } else {
        for row in &rows {
            println!("{}", text_line(row));
        }
    }

    Ok(())
}

fn read_keys(path: Option<&Path>) -> Result<EntityKeys> {
    let Some(path) = path else {
        return Ok(EntityKeys::new());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read keys file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Keys file '{}' is not a JSON object of strings", path.display()))
}

fn read_object_links(path: &Path) -> Result<ObjectLinks> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read object links file '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse object links file '{}'", path.display()))
}

/// Tab-separated row: tag, key counter, state marks, title, display URL.
fn text_line(row: &ResolvedLinkRow) -> String {
    let counter = if row.display_keys_count {
        format!("{}/{}", row.replaced_keys_count, row.total_keys_count)
    } else {
        "-".to_string()
    };
    let marks = format!(
        "{}{}{}",
        if row.visited { 'V' } else { '.' },
        if row.saved { 'S' } else { '.' },
        if row.user_data { 'U' } else { '.' },
    );
    format!(
        "{}\t{}\t{}\t{}\t{}",
        row.tag, counter, marks, row.title, row.display_url
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use websearch_core::catalog::SourceTag;

    #[test]
    fn test_object_links_parse_with_missing_sections() {
        let links: ObjectLinks = serde_json::from_str(
            r#"{"notes": [{"text": "see https://a.org/x"}],
                "internet": [{"path": "https://b.org"}]}"#,
        )
        .unwrap();
        let records = links.into_records(NavType::People, false);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].tag, SourceTag::Note);
        assert_eq!(records[1].tag, SourceTag::Internet);
    }

    #[test]
    fn test_object_links_attributes_follow_setting() {
        let raw = r#"{"attributes": [{"name": "Profile", "value": "https://a.org/p"}]}"#;
        let links: ObjectLinks = serde_json::from_str(raw).unwrap();
        assert!(links.into_records(NavType::People, false).is_empty());

        let links: ObjectLinks = serde_json::from_str(raw).unwrap();
        assert_eq!(links.into_records(NavType::People, true).len(), 1);
    }
}

//! Site suggestion commands.

use std::fs;

use anyhow::{Context, Result};

use websearch_core::config::Settings;
use websearch_core::suggest::{build_prompt, parse_suggestions};

use super::{catalog_loader, selected_catalogs, state_store};
use crate::cli::{CatalogArgs, SuggestParseArgs};

pub fn run_suggest_prompt_command(args: &CatalogArgs, settings: &Settings) -> Result<()> {
    let loader = catalog_loader(args, settings)?;
    let store = state_store(args.state_dir.as_deref(), settings)?;

    let scan = loader.scan_domains(&selected_catalogs(args, settings));
    let prompt = build_prompt(&scan, &store.skipped_domains());

    println!("[system]\n{}\n\n[user]\n{}", prompt.system, prompt.user);
    Ok(())
}

pub fn run_suggest_parse_command(args: &SuggestParseArgs, settings: &Settings) -> Result<()> {
    let store = state_store(args.state_dir.as_deref(), settings)?;
    let raw = fs::read_to_string(&args.reply)
        .with_context(|| format!("Failed to read reply file '{}'", args.reply.display()))?;

    for site in parse_suggestions(&raw, &store.skipped_domains()) {
        println!("{}\t{}", site.domain, site.url);
    }
    Ok(())
}

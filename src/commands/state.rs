//! Link state commands: visit, save, hide and skip-domain.

use anyhow::{Context, Result};
use tracing::info;

use websearch_core::config::Settings;
use websearch_core::state::content_hash;

use super::state_store;
use crate::cli::{HideArgs, LinkStateArgs, SkipDomainArgs};

fn report(added: bool, what: &str, value: &str) {
    if added {
        info!(value = %value, "Recorded {what}");
    } else {
        info!(value = %value, "Already recorded as {what}");
    }
}

pub fn run_visit_command(args: &LinkStateArgs, settings: &Settings) -> Result<()> {
    let store = state_store(args.state_dir.as_deref(), settings)?;
    let added = store
        .record_visit(&args.url, &args.object_id)
        .context("Failed to record visited link")?;
    let hash = content_hash(&args.url, &args.object_id);
    report(added, "visited", &hash);
    println!("{hash}");
    Ok(())
}

pub fn run_save_command(args: &LinkStateArgs, settings: &Settings) -> Result<()> {
    let store = state_store(args.state_dir.as_deref(), settings)?;
    let added = store
        .record_save(&args.url, &args.object_id)
        .context("Failed to record saved link")?;
    let hash = content_hash(&args.url, &args.object_id);
    report(added, "saved", &hash);
    println!("{hash}");
    Ok(())
}

pub fn run_hide_command(args: &HideArgs, settings: &Settings) -> Result<()> {
    let store = state_store(args.state_dir.as_deref(), settings)?;
    let added = match &args.object_id {
        Some(object_id) => store.hide_for_object(&args.template, object_id, args.nav_type),
        None => store.hide_for_all(&args.template, args.nav_type),
    }
    .context("Failed to record hidden link")?;
    report(added, "hidden", &args.template);
    Ok(())
}

pub fn run_skip_domain_command(args: &SkipDomainArgs, settings: &Settings) -> Result<()> {
    let store = state_store(args.state_dir.as_deref(), settings)?;
    let added = store
        .skip_domain(&args.domain)
        .context("Failed to record skipped domain")?;
    report(added, "skipped domain", &args.domain);
    Ok(())
}

//! CLI command handlers.

mod catalogs;
mod config;
mod resolve;
mod state;
mod suggest;

pub use catalogs::{run_catalogs_command, run_domains_command};
pub use config::run_config_show_command;
pub use resolve::run_resolve_command;
pub use state::{run_hide_command, run_save_command, run_skip_domain_command, run_visit_command};
pub use suggest::{run_suggest_parse_command, run_suggest_prompt_command};

use std::path::Path;

use anyhow::{Result, bail};

use websearch_core::catalog::CatalogLoader;
use websearch_core::config::Settings;
use websearch_core::state::StateStore;

use crate::cli::CatalogArgs;

/// Builds the catalog loader from CLI overrides and settings.
fn catalog_loader(args: &CatalogArgs, settings: &Settings) -> Result<CatalogLoader> {
    let Some(builtin) = args.catalog_dir.as_ref().or(settings.catalog_dir.as_ref()) else {
        bail!("No catalog directory: pass --catalog-dir or set `catalog_dir` in the config file");
    };

    let loader = CatalogLoader::new(builtin);
    Ok(
        match args.user_catalog_dir.as_ref().or(settings.user_catalog_dir.as_ref()) {
            Some(user) => loader.with_user_dir(user),
            None => loader,
        },
    )
}

/// Catalog files selected on the command line, or the configured list.
fn selected_catalogs(args: &CatalogArgs, settings: &Settings) -> Vec<String> {
    if args.catalogs.is_empty() {
        settings.enabled_files.clone()
    } else {
        args.catalogs.clone()
    }
}

/// Opens the state store from a CLI override or settings.
fn state_store(state_dir: Option<&Path>, settings: &Settings) -> Result<StateStore> {
    let Some(dir) = state_dir.or(settings.state_dir.as_deref()) else {
        bail!("No state directory: pass --state-dir or set `state_dir` in the config file");
    };
    Ok(StateStore::new(dir))
}

//! Catalog listing commands.

use anyhow::Result;

use websearch_core::config::Settings;

use super::{catalog_loader, selected_catalogs};
use crate::cli::CatalogArgs;

pub fn run_catalogs_command(args: &CatalogArgs, settings: &Settings) -> Result<()> {
    let loader = catalog_loader(args, settings)?;
    let selected = selected_catalogs(args, settings);

    for name in loader.available_catalogs() {
        let marker = if selected.contains(&name) { '*' } else { ' ' };
        println!("{marker} {name}");
    }
    Ok(())
}

pub fn run_domains_command(args: &CatalogArgs, settings: &Settings) -> Result<()> {
    let loader = catalog_loader(args, settings)?;
    let scan = loader.scan_domains(&selected_catalogs(args, settings));

    println!("include_global = {}", scan.include_global);
    println!(
        "locales = {}",
        scan.locales.iter().cloned().collect::<Vec<_>>().join(", ")
    );
    for domain in &scan.domains {
        println!("{domain}");
    }
    Ok(())
}

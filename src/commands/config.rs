//! Config command handlers: show effective configuration.

use anyhow::Result;

use websearch_core::config::LoadedSettings;

pub fn run_config_show_command(loaded: &LoadedSettings) -> Result<()> {
    let resolved_path = loaded.path.as_ref().map_or_else(
        || "<unresolved>".to_string(),
        |path| path.display().to_string(),
    );
    println!("# config_path = {resolved_path}");
    println!(
        "# config_file = {}",
        if loaded.loaded_from_file {
            "loaded"
        } else {
            "not found (using defaults)"
        }
    );
    print!("{}", loaded.settings.to_config_string());
    Ok(())
}

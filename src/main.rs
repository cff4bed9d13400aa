//! CLI entry point for the websearch tool.

use anyhow::{Result, bail};
use clap::Parser;
use tracing::debug;

use websearch_core::config::{LoadedSettings, load_default_settings, load_settings_at};

mod cli;
mod commands;

use cli::{Cli, Command, ConfigCommand};

fn no_color_env_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|value| !value.is_empty())
}

fn init_tracing(verbose: u8, quiet: bool) {
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(!no_color_env_requested())
        .with_env_filter(filter)
        .try_init();
}

fn load_settings(cli: &Cli) -> Result<LoadedSettings> {
    match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }
            load_settings_at(Some(path.clone()))
        }
        None => load_default_settings(),
    }
}

fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    debug!(?cli, "CLI arguments parsed");

    let loaded = load_settings(&cli)?;
    let settings = &loaded.settings;

    match &cli.command {
        Command::Resolve(args) => commands::run_resolve_command(args, settings),
        Command::Domains(args) => commands::run_domains_command(args, settings),
        Command::Catalogs(args) => commands::run_catalogs_command(args, settings),
        Command::Visit(args) => commands::run_visit_command(args, settings),
        Command::Save(args) => commands::run_save_command(args, settings),
        Command::Hide(args) => commands::run_hide_command(args, settings),
        Command::SkipDomain(args) => commands::run_skip_domain_command(args, settings),
        Command::SuggestPrompt(args) => commands::run_suggest_prompt_command(args, settings),
        Command::SuggestParse(args) => commands::run_suggest_parse_command(args, settings),
        Command::Config { command } => match command {
            ConfigCommand::Show => commands::run_config_show_command(&loaded),
        },
    }
}

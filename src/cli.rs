//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use websearch_core::entity::NavType;

/// Resolve genealogy web search links for a record.
///
/// Websearch fills catalog URL templates with the keys of one person, place,
/// source or family and reports which links are ready to open.
#[derive(Parser, Debug)]
#[command(name = "websearch")]
#[command(author, version, about)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve catalog templates for one object
    Resolve(ResolveArgs),
    /// List regional tags and template domains of the enabled catalogs
    Domains(CatalogArgs),
    /// List catalog files known in the catalog directories
    Catalogs(CatalogArgs),
    /// Mark a resolved link as visited
    Visit(LinkStateArgs),
    /// Mark a resolved link as saved
    Save(LinkStateArgs),
    /// Hide a template for one object or for every object
    Hide(HideArgs),
    /// Dismiss a suggested domain
    SkipDomain(SkipDomainArgs),
    /// Print the site suggestion prompt for the enabled catalogs
    SuggestPrompt(CatalogArgs),
    /// Parse a site suggestion reply and print the usable entries
    SuggestParse(SuggestParseArgs),
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,
}

/// Catalog directory and selection overrides.
#[derive(Args, Debug, Clone, Default)]
pub struct CatalogArgs {
    /// Built-in catalog directory
    #[arg(long, value_name = "DIR")]
    pub catalog_dir: Option<PathBuf>,

    /// User catalog directory; files here replace built-in files of the same name
    #[arg(long, value_name = "DIR")]
    pub user_catalog_dir: Option<PathBuf>,

    /// Catalog file to load (repeatable); defaults to the configured list
    #[arg(long = "catalog", value_name = "FILE")]
    pub catalogs: Vec<String>,

    /// Directory holding link state files
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[command(flatten)]
    pub catalog: CatalogArgs,

    /// Navigation type of the object (People, Places, Sources, Families, ...)
    #[arg(long, value_name = "TYPE")]
    pub nav_type: NavType,

    /// Object handle
    #[arg(long, value_name = "ID")]
    pub object_id: String,

    /// JSON object with the entity keys
    #[arg(long, value_name = "FILE")]
    pub keys: Option<PathBuf>,

    /// JSON object with identifier keys taken from attributes
    #[arg(long, value_name = "FILE")]
    pub attribute_keys: Option<PathBuf>,

    /// JSON file with note, attribute and Internet links of the object
    #[arg(long, value_name = "FILE")]
    pub object_links: Option<PathBuf>,

    /// Full given name, split into `given`/`middle` per the configured handling
    #[arg(long, value_name = "NAME")]
    pub given_name: Option<String>,

    /// Directory holding `<code>.png` flag icons
    #[arg(long, value_name = "DIR")]
    pub flags_dir: Option<PathBuf>,

    /// Print rows as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct LinkStateArgs {
    /// Final URL of the link
    #[arg(long)]
    pub url: String,

    /// Object handle the link was resolved for
    #[arg(long, value_name = "ID")]
    pub object_id: String,

    /// Directory holding link state files
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct HideArgs {
    /// URL template as written in the catalog
    #[arg(long)]
    pub template: String,

    /// Navigation type the template is hidden for
    #[arg(long, value_name = "TYPE")]
    pub nav_type: NavType,

    /// Hide only for this object; hides for every object when omitted
    #[arg(long, value_name = "ID")]
    pub object_id: Option<String>,

    /// Directory holding link state files
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SkipDomainArgs {
    /// Domain to stop suggesting
    pub domain: String,

    /// Directory holding link state files
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SuggestParseArgs {
    /// File holding the model reply
    #[arg(value_name = "FILE")]
    pub reply: PathBuf,

    /// Directory holding link state files
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_subcommand() {
        let result = Cli::try_parse_from(["websearch"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let cli = Cli::try_parse_from(["websearch", "-vv", "catalogs"]).unwrap();
        assert_eq!(cli.verbose, 2);

        let cli = Cli::try_parse_from(["websearch", "catalogs", "--verbose"]).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_cli_quiet_flag_sets_quiet() {
        let cli = Cli::try_parse_from(["websearch", "-q", "config", "show"]).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Cli::try_parse_from(["websearch", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let err = Cli::try_parse_from(["websearch", "--invalid-flag"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    // ==================== Resolve ====================

    #[test]
    fn test_resolve_args() {
        let cli = Cli::try_parse_from([
            "websearch",
            "resolve",
            "--nav-type",
            "Person",
            "--object-id",
            "I0001",
            "--catalog",
            "common-links.csv",
            "--catalog",
            "ua-links.csv",
            "--json",
        ])
        .unwrap();
        let Command::Resolve(args) = cli.command else {
            panic!("expected resolve command");
        };
        assert_eq!(args.nav_type, NavType::People);
        assert_eq!(args.object_id, "I0001");
        assert_eq!(args.catalog.catalogs, vec!["common-links.csv", "ua-links.csv"]);
        assert!(args.json);
        assert!(args.keys.is_none());
    }

    #[test]
    fn test_resolve_rejects_unknown_nav_type() {
        let err = Cli::try_parse_from([
            "websearch",
            "resolve",
            "--nav-type",
            "Spaceships",
            "--object-id",
            "I1",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    // ==================== State commands ====================

    #[test]
    fn test_hide_without_object_is_global() {
        let cli = Cli::try_parse_from([
            "websearch",
            "hide",
            "--template",
            "https://a.org/%(surname)s",
            "--nav-type",
            "People",
        ])
        .unwrap();
        let Command::Hide(args) = cli.command else {
            panic!("expected hide command");
        };
        assert!(args.object_id.is_none());
    }

    #[test]
    fn test_skip_domain_positional() {
        let cli = Cli::try_parse_from(["websearch", "skip-domain", "example.org"]).unwrap();
        let Command::SkipDomain(args) = cli.command else {
            panic!("expected skip-domain command");
        };
        assert_eq!(args.domain, "example.org");
    }
}

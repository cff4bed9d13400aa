//! End-to-end CLI tests for the websearch binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const HEADER: &str = "Navigation type,Category,Is enabled,URL,Comment\n";

/// Catalog, state and config directories isolated from the real user.
struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        for dir in ["csv", "user", "state", "xdg"] {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        fs::write(
            root.path().join("csv/common-links.csv"),
            format!(
                "{HEADER}People,FamilySearch,1,https://www.familysearch.org/search?given=%(given)s&surname=%(surname)s,\n\
                 Places,Maps,1,https://maps.example.org/?q=%(place)s,\n"
            ),
        )
        .unwrap();
        fs::write(
            root.path().join("csv/ua-links.csv"),
            format!("{HEADER}People,Archive UA,1,https://archive.ua/?s=%(surname)s,\n"),
        )
        .unwrap();
        Self { root }
    }

    fn path(&self, rel: &str) -> std::path::PathBuf {
        self.root.path().join(rel)
    }

    fn write(&self, rel: &str, contents: &str) -> std::path::PathBuf {
        let path = self.path(rel);
        fs::write(&path, contents).unwrap();
        path
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("websearch").unwrap();
        cmd.env("XDG_CONFIG_HOME", self.path("xdg"))
            .env("HOME", self.root.path())
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    fn catalog_args(&self, cmd: &mut Command) {
        cmd.arg("--catalog-dir")
            .arg(self.path("csv"))
            .arg("--user-catalog-dir")
            .arg(self.path("user"))
            .arg("--state-dir")
            .arg(self.path("state"))
            .args(["--catalog", "common-links.csv", "--catalog", "ua-links.csv"]);
    }
}

fn read_state(dir: &Path, file: &str) -> String {
    fs::read_to_string(dir.join(file)).unwrap_or_default()
}

// ==================== Basics ====================

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    let mut cmd = Command::cargo_bin("websearch").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resolve genealogy web search links"));
}

/// Test that a subcommand is required.
#[test]
fn test_binary_without_subcommand_fails() {
    let mut cmd = Command::cargo_bin("websearch").unwrap();
    cmd.assert().failure().stderr(predicate::str::contains("Usage"));
}

/// Test that an unknown navigation type is rejected by argument parsing.
#[test]
fn test_resolve_rejects_unknown_nav_type() {
    let ws = Workspace::new();
    let mut cmd = ws.cmd();
    cmd.args(["resolve", "--nav-type", "Planets", "--object-id", "I1"]);
    ws.catalog_args(&mut cmd);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown navigation type"));
}

/// Test that commands needing a catalog directory fail without one.
#[test]
fn test_catalogs_without_directory_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("catalogs")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No catalog directory"));
}

// ==================== Catalogs ====================

/// Test that catalogs are listed with the selected ones marked.
#[test]
fn test_catalogs_lists_and_marks_selection() {
    let ws = Workspace::new();
    ws.write("user/pl-links.csv", HEADER);

    ws.cmd()
        .arg("catalogs")
        .arg("--catalog-dir")
        .arg(ws.path("csv"))
        .arg("--user-catalog-dir")
        .arg(ws.path("user"))
        .args(["--catalog", "ua-links.csv"])
        .assert()
        .success()
        .stdout("  common-links.csv\n  pl-links.csv\n* ua-links.csv\n");
}

/// Test that domains lists locales and template hosts.
#[test]
fn test_domains_reports_locales_and_hosts() {
    let ws = Workspace::new();
    let mut cmd = ws.cmd();
    cmd.arg("domains");
    ws.catalog_args(&mut cmd);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("include_global = true"))
        .stdout(predicate::str::contains("locales = UA"))
        .stdout(predicate::str::contains("archive.ua"))
        .stdout(predicate::str::contains("maps.example.org"));
}

// ==================== Resolve ====================

/// Test that resolve prints sorted text rows with the key counter.
#[test]
fn test_resolve_text_output() {
    let ws = Workspace::new();
    let keys = ws.write("keys.json", r#"{"given": "John", "surname": "Smith"}"#);

    let mut cmd = ws.cmd();
    cmd.args(["resolve", "--nav-type", "People", "--object-id", "I0001", "--keys"])
        .arg(&keys);
    ws.catalog_args(&mut cmd);
    cmd.assert().success().stdout(
        "COMMON\t2/2\t...\tFamilySearch\tfamilysearch.org/search...John...Smith\n\
         UA\t1/1\t...\tArchive UA\tarchive.ua/...Smith\n",
    );
}

/// Test that --json prints rows only on stdout.
#[test]
fn test_resolve_json_output_is_parseable() {
    let ws = Workspace::new();
    let keys = ws.write("keys.json", r#"{"place": "Kyiv"}"#);

    let mut cmd = ws.cmd();
    cmd.args(["resolve", "--nav-type", "Place", "--object-id", "P1", "--json", "--keys"])
        .arg(&keys);
    ws.catalog_args(&mut cmd);
    let output = cmd.assert().success().get_output().stdout.clone();

    let rows: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["final_url"], "https://maps.example.org/?q=Kyiv");
    assert_eq!(rows[0]["coverage"], "all");
    assert_eq!(rows[0]["tag"], "COMMON");
}

/// Test that note and Internet links of the object are appended.
#[test]
fn test_resolve_includes_object_links() {
    let ws = Workspace::new();
    let links = ws.write(
        "links.json",
        r#"{"notes": [{"text": "Census at https://census.example.org/r/12."}],
            "internet": [{"path": "https://blog.example.org/smith", "description": "Family blog"}]}"#,
    );

    let mut cmd = ws.cmd();
    cmd.args(["resolve", "--nav-type", "People", "--object-id", "I0001", "--object-links"])
        .arg(&links);
    ws.catalog_args(&mut cmd);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("census.example.org/r/12\n"))
        .stdout(predicate::str::contains("INTERNET\t0/0\t...\tNo title\tblog.example.org/smith"));
}

/// Test that a visited link is marked on the next resolve.
#[test]
fn test_visit_marks_resolved_row() {
    let ws = Workspace::new();
    let keys = ws.write("keys.json", r#"{"surname": "Smith"}"#);

    ws.cmd()
        .args(["visit", "--url", "https://archive.ua/?s=Smith", "--object-id", "I0001"])
        .arg("--state-dir")
        .arg(ws.path("state"))
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[0-9a-f]{16}\n$").unwrap());

    let mut cmd = ws.cmd();
    cmd.args(["resolve", "--nav-type", "People", "--object-id", "I0001", "--keys"])
        .arg(&keys);
    ws.catalog_args(&mut cmd);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("UA\t1/1\tV..\tArchive UA"));
}

/// Test that hiding a template removes it from later results.
#[test]
fn test_hide_removes_template_for_object() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["hide", "--template", "https://archive.ua/?s=%(surname)s"])
        .args(["--nav-type", "People", "--object-id", "I0001"])
        .arg("--state-dir")
        .arg(ws.path("state"))
        .assert()
        .success();

    let mut cmd = ws.cmd();
    cmd.args(["resolve", "--nav-type", "People", "--object-id", "I0001"]);
    ws.catalog_args(&mut cmd);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Archive UA").not());

    let mut cmd = ws.cmd();
    cmd.args(["resolve", "--nav-type", "People", "--object-id", "I0002"]);
    ws.catalog_args(&mut cmd);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Archive UA"));
}

// ==================== State ====================

/// Test that save and skip-domain append one line each, without duplicates.
#[test]
fn test_save_and_skip_domain_are_idempotent() {
    let ws = Workspace::new();
    for _ in 0..2 {
        ws.cmd()
            .args(["save", "--url", "https://a.org/x", "--object-id", "I1"])
            .arg("--state-dir")
            .arg(ws.path("state"))
            .assert()
            .success();
        ws.cmd()
            .args(["skip-domain", "example.com"])
            .arg("--state-dir")
            .arg(ws.path("state"))
            .assert()
            .success();
    }

    let state = ws.path("state");
    assert_eq!(read_state(&state, "saved_links.txt").lines().count(), 1);
    assert_eq!(read_state(&state, "skipped_domain_suggestions.txt"), "example.com\n");
}

// ==================== Suggestions ====================

/// Test that the prompt excludes catalog and skipped domains.
#[test]
fn test_suggest_prompt_lists_exclusions() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["skip-domain", "skipped.example.net"])
        .arg("--state-dir")
        .arg(ws.path("state"))
        .assert()
        .success();

    let mut cmd = ws.cmd();
    cmd.arg("suggest-prompt");
    ws.catalog_args(&mut cmd);
    cmd.assert()
        .success()
        .stdout(predicate::str::starts_with("[system]\n"))
        .stdout(predicate::str::contains("both regional and globally used"))
        .stdout(predicate::str::contains("skipped.example.net"))
        .stdout(predicate::str::contains("archive.ua"));
}

/// Test that skipped domains are filtered from a reply.
#[test]
fn test_suggest_parse_filters_skipped() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["skip-domain", "old.example.com"])
        .arg("--state-dir")
        .arg(ws.path("state"))
        .assert()
        .success();
    let reply = ws.write(
        "reply.json",
        r#"[{"domain": "old.example.com", "url": "https://old.example.com"},
            {"domain": "new.example.com", "url": "https://new.example.com"},
            {"domain": "nourl.example.com"}]"#,
    );

    ws.cmd()
        .arg("suggest-parse")
        .arg(&reply)
        .arg("--state-dir")
        .arg(ws.path("state"))
        .assert()
        .success()
        .stdout("new.example.com\thttps://new.example.com\n");
}

// ==================== Config ====================

/// Test that config show reports defaults when no file exists.
#[test]
fn test_config_show_defaults() {
    let ws = Workspace::new();
    ws.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not found (using defaults)"))
        .stdout(predicate::str::contains("show_short_url = true"));
}

/// Test that --config loads the given file and its directories drive commands.
#[test]
fn test_config_file_supplies_directories() {
    let ws = Workspace::new();
    let config = ws.write(
        "websearch.toml",
        &format!(
            "# test config\n\
             catalog_dir = \"{}\"\n\
             state_dir = \"{}\"\n\
             enabled_files = [\"ua-links.csv\"]\n\
             url_compactness_level = \"long\"\n",
            ws.path("csv").display(),
            ws.path("state").display()
        ),
    );

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# config_file = loaded"))
        .stdout(predicate::str::contains("url_compactness_level = \"long\""));

    ws.cmd()
        .arg("--config")
        .arg(&config)
        .args(["resolve", "--nav-type", "People", "--object-id", "I1"])
        .assert()
        .success()
        .stdout("UA\t0/1\t...\tArchive UA\tarchive.ua/?s=%(surname)s\n");
}

/// Test that a missing explicit config file is an error.
#[test]
fn test_missing_config_file_fails() {
    let ws = Workspace::new();
    ws.cmd()
        .arg("--config")
        .arg(ws.path("missing.toml"))
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

/// Test that an unknown config key names the offending line.
#[test]
fn test_unknown_config_key_fails() {
    let ws = Workspace::new();
    let config = ws.write("bad.toml", "show_short_url = true\nbogus = 1\n");
    ws.cmd()
        .arg("--config")
        .arg(&config)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"));
}

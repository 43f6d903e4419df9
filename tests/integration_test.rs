#![allow(deprecated)] // assert_cmd::Command::cargo_bin is deprecated but replacement requires nightly

use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn asset_replace_cmd() -> assert_cmd::Command {
	assert_cmd::Command::cargo_bin("asset-replace").unwrap()
}

const CONFIG: &str = r#"
[[replacers]]
type = "html"
rules = [{ from = "old/", to = "new/" }]

[[replacers]]
type = "css"
rules = [{ from = "old/", to = "new/" }]
"#;

fn write_site(root: &Path) {
	fs::write(root.join(".asset-replace.toml"), CONFIG).unwrap();
	fs::create_dir_all(root.join("css")).unwrap();
	fs::write(root.join("a.html"), r#"<img src="old/logo.png">"#).unwrap();
	fs::write(root.join("css/b.css"), ".x { background: url(old/bg.png) }").unwrap();
	fs::write(root.join("notes.txt"), "old/ stays").unwrap();
}

// ============================================================================
// CLI flag tests
// ============================================================================

#[test]
fn test_help_flag() {
	asset_replace_cmd()
		.arg("--help")
		.assert()
		.success()
		.stdout(predicate::str::contains("Rewrite asset URLs"));
}

#[test]
fn test_version_flag() {
	asset_replace_cmd()
		.arg("--version")
		.assert()
		.success()
		.stdout(predicate::str::contains("asset-replace"));
}

// ============================================================================
// --init tests
// ============================================================================

#[test]
fn test_init_creates_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".asset-replace.toml");

	asset_replace_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("Created"));

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("[[replacers]]"));
	assert!(content.contains("parse-inline = true"));
}

#[test]
fn test_init_fails_if_exists() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".asset-replace.toml");
	fs::write(&config_path, "# existing").unwrap();

	asset_replace_cmd()
		.arg("--init")
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_overwrites() {
	let temp_dir = tempfile::tempdir().unwrap();
	let config_path = temp_dir.path().join(".asset-replace.toml");
	fs::write(&config_path, "# existing").unwrap();

	asset_replace_cmd()
		.args(["--init", "--force"])
		.current_dir(temp_dir.path())
		.assert()
		.success();

	let content = fs::read_to_string(&config_path).unwrap();
	assert!(content.contains("[[replacers]]"));
}

// ============================================================================
// config subcommand tests
// ============================================================================

#[test]
fn test_config_validate_valid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	write_site(temp_dir.path());

	asset_replace_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("valid"))
		.stdout(predicate::str::contains("2 replacers"));
}

#[test]
fn test_config_validate_invalid_config() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".asset-replace.toml"),
		"invalid toml [[[",
	)
	.unwrap();

	asset_replace_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_config_validate_bad_pattern() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".asset-replace.toml"),
		r#"
[[replacers]]
type = "js"
files = { regex = "[unclosed" }
rules = [{ from = "a", to = "b" }]
"#,
	)
	.unwrap();

	asset_replace_cmd()
		.args(["config", "validate"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Invalid regex pattern"));
}

#[test]
fn test_config_show_displays_merged_tags() {
	let temp_dir = tempfile::tempdir().unwrap();
	fs::write(
		temp_dir.path().join(".asset-replace.toml"),
		r#"
[[replacers]]
type = "html"
path = true
rules = [{ from = "old/", to = "new/" }]
"#,
	)
	.unwrap();

	asset_replace_cmd()
		.args(["config", "show"])
		.current_dir(temp_dir.path())
		.assert()
		.success()
		.stdout(predicate::str::contains("type: html"))
		.stdout(predicate::str::contains("tag: img [src, srcset]"))
		.stdout(predicate::str::contains("tag: style (content)"))
		.stdout(predicate::str::contains("substitution:"));
}

// ============================================================================
// Rewrite tests
// ============================================================================

#[test]
fn test_rewrites_html_and_css() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write_site(root);

	asset_replace_cmd()
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("rewrote a.html"))
		.stdout(predicate::str::contains("rewrote css/b.css"))
		.stdout(predicate::str::contains("notes.txt").not());

	assert_eq!(
		fs::read_to_string(root.join("a.html")).unwrap(),
		r#"<img src="new/logo.png">"#
	);
	assert_eq!(
		fs::read_to_string(root.join("css/b.css")).unwrap(),
		".x { background: url(new/bg.png) }"
	);
	assert_eq!(
		fs::read_to_string(root.join("notes.txt")).unwrap(),
		"old/ stays"
	);
}

#[test]
fn test_second_run_changes_nothing() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write_site(root);

	asset_replace_cmd().current_dir(root).assert().success();

	asset_replace_cmd()
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("rewrote").not());
}

#[test]
fn test_dry_run_leaves_files() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	write_site(root);

	asset_replace_cmd()
		.arg("--dry-run")
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::contains("would rewrite a.html"));

	assert_eq!(
		fs::read_to_string(root.join("a.html")).unwrap(),
		r#"<img src="old/logo.png">"#
	);
}

#[test]
fn test_explicit_config_and_dir() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	let site = root.join("site");
	fs::create_dir_all(&site).unwrap();
	fs::write(site.join("notes.txt"), "api v1 and v1").unwrap();
	fs::write(
		root.join("custom.toml"),
		r#"
[[replacers]]
type = "custom"
files = "*.txt"
replacer = "s/v1/v2/g"
"#,
	)
	.unwrap();

	asset_replace_cmd()
		.args(["--config", "custom.toml", "site"])
		.current_dir(root)
		.assert()
		.success();

	assert_eq!(
		fs::read_to_string(site.join("notes.txt")).unwrap(),
		"api v2 and v2"
	);
}

#[test]
fn test_missing_explicit_config_fails() {
	let temp_dir = tempfile::tempdir().unwrap();

	asset_replace_cmd()
		.args(["--config", "missing.toml"])
		.current_dir(temp_dir.path())
		.assert()
		.failure()
		.stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_without_config_nothing_changes() {
	let temp_dir = tempfile::tempdir().unwrap();
	let root = temp_dir.path();
	fs::write(root.join("a.html"), r#"<img src="old/logo.png">"#).unwrap();

	asset_replace_cmd()
		.current_dir(root)
		.assert()
		.success()
		.stdout(predicate::str::is_empty());

	assert_eq!(
		fs::read_to_string(root.join("a.html")).unwrap(),
		r#"<img src="old/logo.png">"#
	);
}

use crate::config::parser::parse_config_file;
use crate::config::types::LoadedConfig;
use crate::error::{AssetReplaceError, Result};
use log::debug;
use std::path::Path;

/// File name looked up when no explicit config path is given.
pub const CONFIG_FILE_NAME: &str = ".asset-replace.toml";

/// Find the nearest config file, starting at `start_dir` and walking up
/// the directory tree. The first file found wins; configs are not merged.
pub fn discover_config(start_dir: &Path) -> Result<Option<LoadedConfig>> {
	let mut current_dir = Some(start_dir);

	while let Some(dir) = current_dir {
		let config_path = dir.join(CONFIG_FILE_NAME);

		if config_path.is_file() {
			debug!("Found config at {}", config_path.display());
			let config = parse_config_file(&config_path)?;
			return Ok(Some(LoadedConfig {
				config,
				path: config_path,
			}));
		}

		current_dir = dir.parent();
	}

	Ok(None)
}

/// Load an explicitly named config file.
pub fn load_config_file(path: &Path) -> Result<LoadedConfig> {
	if !path.is_file() {
		return Err(AssetReplaceError::ConfigNotFound {
			path: path.to_path_buf(),
		});
	}

	Ok(LoadedConfig {
		config: parse_config_file(path)?,
		path: path.to_path_buf(),
	})
}

/// Resolve the effective config: the explicit path if given, otherwise the
/// nearest discovered file, otherwise defaults (which rewrite nothing).
pub fn resolve_config(start_dir: &Path, explicit: Option<&Path>) -> Result<Option<LoadedConfig>> {
	match explicit {
		Some(path) => load_config_file(path).map(Some),
		None => discover_config(start_dir),
	}
}

/// Template written by `--init`.
pub fn generate_init_template() -> String {
	r#"# asset-replace configuration
#
# Replacers run in declaration order. Each one targets the files of its
# `type` (html, css, js) unless `files` narrows it down; `custom` replacers
# without `files` see every file.

# Files considered at all (globs, or { regex = "..." }).
files = ["**/*"]

# Rewrite inline <script>/<style> content with the js/css replacers.
parse-inline = true

# [file-type]
# html = ["*.{html,htm,phtml,xhtml,tpl}"]
# css = ["*.{css,styl,less,sass,scss}"]
# js = ["*.{js,coffee,ts,dart}"]

[[replacers]]
type = "html"
# Rewrite img/source/link/script/style/object/embed references only.
path = true
rules = [{ from = "/static/", to = "/cdn/static/" }]

[[replacers]]
type = "css"
rules = [{ from = "/static/", to = "/cdn/static/" }]
"#
	.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::parser::parse_config_str;

	#[test]
	fn test_discover_config_walks_up() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("site/pages");
		std::fs::create_dir_all(&nested).unwrap();
		std::fs::write(
			temp_dir.path().join(CONFIG_FILE_NAME),
			"parse-inline = false\n",
		)
		.unwrap();

		let loaded = discover_config(&nested).unwrap().unwrap();
		assert_eq!(loaded.path, temp_dir.path().join(CONFIG_FILE_NAME));
		assert!(!loaded.config.parse_inline);
	}

	#[test]
	fn test_nearest_config_wins() {
		let temp_dir = tempfile::tempdir().unwrap();
		let nested = temp_dir.path().join("site");
		std::fs::create_dir_all(&nested).unwrap();
		std::fs::write(
			temp_dir.path().join(CONFIG_FILE_NAME),
			"parse-inline = false\n",
		)
		.unwrap();
		std::fs::write(nested.join(CONFIG_FILE_NAME), "parse-inline = true\n").unwrap();

		let loaded = discover_config(&nested).unwrap().unwrap();
		assert_eq!(loaded.path, nested.join(CONFIG_FILE_NAME));
		assert!(loaded.config.parse_inline);
	}

	#[test]
	fn test_load_missing_config_file() {
		let temp_dir = tempfile::tempdir().unwrap();
		let missing = temp_dir.path().join("nope.toml");

		match load_config_file(&missing).unwrap_err() {
			AssetReplaceError::ConfigNotFound { path } => assert_eq!(path, missing),
			other => panic!("Expected ConfigNotFound error, got {other:?}"),
		}
	}

	#[test]
	fn test_init_template_is_valid() {
		let config =
			parse_config_str(&generate_init_template(), Path::new("template.toml")).unwrap();
		assert_eq!(config.replacers.len(), 2);
		assert!(config.parse_inline);
	}
}

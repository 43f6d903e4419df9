use log::warn;
use serde::Deserialize;
use std::path::PathBuf;

/// Top-level configuration from a `.asset-replace.toml` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
	/// Files the processor considers at all.
	#[serde(default = "default_files")]
	pub files: PatternList,

	/// Overrides for the html/css/js file type patterns.
	#[serde(default)]
	pub file_type: FileTypeConfig,

	/// Rewrite inline `<script>`/`<style>` content in HTML files.
	#[serde(default = "default_parse_inline")]
	pub parse_inline: bool,

	/// Replacement rules, applied in declaration order.
	#[serde(default)]
	pub replacers: Vec<ReplacerConfig>,
}

impl Default for Config {
	fn default() -> Self {
		Config {
			files: default_files(),
			file_type: FileTypeConfig::default(),
			parse_inline: default_parse_inline(),
			replacers: Vec::new(),
		}
	}
}

fn default_files() -> PatternList {
	PatternList::One(PatternSpec::Glob("**/*".to_string()))
}

fn default_parse_inline() -> bool {
	true
}

/// A single path pattern: a glob string or `{ regex = "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternSpec {
	Glob(String),
	Regex { regex: String },
}

/// One pattern or an array of patterns.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum PatternList {
	One(PatternSpec),
	Many(Vec<PatternSpec>),
}

impl PatternList {
	/// Build a list of glob patterns.
	pub fn globs<I, S>(globs: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		PatternList::Many(
			globs
				.into_iter()
				.map(|g| PatternSpec::Glob(g.into()))
				.collect(),
		)
	}

	pub fn specs(&self) -> &[PatternSpec] {
		match self {
			PatternList::One(spec) => std::slice::from_ref(spec),
			PatternList::Many(specs) => specs,
		}
	}
}

/// Per-type pattern overrides. Unset keys keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileTypeConfig {
	pub html: Option<PatternList>,
	pub css: Option<PatternList>,
	pub js: Option<PatternList>,
}

/// Coarse file category a replacer belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
	Html,
	Css,
	Js,
	Custom,
}

impl RuleType {
	pub fn as_str(&self) -> &'static str {
		match self {
			RuleType::Html => "html",
			RuleType::Css => "css",
			RuleType::Js => "js",
			RuleType::Custom => "custom",
		}
	}
}

impl std::fmt::Display for RuleType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A replacement rule as written in the config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReplacerConfig {
	/// The file type this rule targets.
	#[serde(rename = "type")]
	pub rule_type: RuleType,

	/// Restricts the rule to matching files instead of the type's files.
	pub files: Option<PatternList>,

	/// Tag definitions and substitutions. `None` and an empty list differ:
	/// a declared list always selects rule-based rewriting.
	pub rules: Option<Vec<RewriteRuleConfig>>,

	/// Enable the default path-bearing tag definitions (html only).
	#[serde(default)]
	pub path: bool,

	/// Custom replacer as a sed-like substitution: "s/pattern/replacement/g".
	pub replacer: Option<String>,
}

/// One entry of a replacer's `rules` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RewriteRuleConfig {
	/// HTML tag whose attributes (or content, when `attrs` is unset) carry URLs.
	pub tag: Option<String>,

	/// Attributes of `tag` holding URLs.
	pub attrs: Option<Vec<String>>,

	/// Text to replace. Literal unless `regex` is set.
	pub from: Option<String>,

	/// Replacement text. Supports `$1` captures when `regex` is set.
	pub to: Option<String>,

	#[serde(default)]
	pub regex: bool,
}

/// A loaded configuration with its source path for debugging/display.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
	/// The parsed configuration.
	pub config: Config,

	/// The path this config was loaded from.
	pub path: PathBuf,
}

impl ReplacerConfig {
	/// Validate options that cannot be expressed by the schema alone.
	pub fn validate(&self, index: usize) -> Result<(), crate::error::AssetReplaceError> {
		if self.path && self.rule_type != RuleType::Html {
			warn!(
				"Replacer #{index}: `path` only applies to html, ignored for {}",
				self.rule_type
			);
		}

		if self.rule_type == RuleType::Custom && self.rules.is_none() && self.replacer.is_none() {
			return Err(crate::error::AssetReplaceError::InvalidRule {
				index,
				reason: "custom replacers need `rules` or `replacer`".to_string(),
			});
		}

		if let Some(ref rules) = self.rules {
			for rule in rules {
				if rule.from.is_some() != rule.to.is_some() {
					return Err(crate::error::AssetReplaceError::InvalidRule {
						index,
						reason: "`from` and `to` must be set together".to_string(),
					});
				}
				if rule.tag.is_none() && rule.from.is_none() {
					return Err(crate::error::AssetReplaceError::InvalidRule {
						index,
						reason: "rule entries need a `tag` or `from`/`to`".to_string(),
					});
				}
			}
		}

		Ok(())
	}
}

impl Config {
	/// Validate all replacers in this config.
	pub fn validate(&self) -> Result<(), crate::error::AssetReplaceError> {
		for (index, replacer) in self.replacers.iter().enumerate() {
			replacer.validate(index)?;
		}
		Ok(())
	}
}

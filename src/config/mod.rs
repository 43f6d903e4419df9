//! Configuration loading and parsing for asset-replace.
//!
//! This module handles:
//! - TOML config file parsing and validation
//! - Discovery of the nearest `.asset-replace.toml`

pub mod discover;
pub mod parser;
pub mod types;

pub use discover::{
	CONFIG_FILE_NAME, discover_config, generate_init_template, load_config_file,
	resolve_config,
};
pub use parser::{parse_config_file, parse_config_str};
pub use types::{
	Config, FileTypeConfig, LoadedConfig, PatternList, PatternSpec, ReplacerConfig,
	RewriteRuleConfig, RuleType,
};

use std::path::PathBuf;

/// Library-level structured errors for asset-replace.
///
/// Use `thiserror` for structured errors that library consumers can match on.
/// The CLI binary wraps these with `anyhow` for rich context chains.
#[derive(Debug, thiserror::Error)]
pub enum AssetReplaceError {
	#[error("Config file not found: {path}")]
	ConfigNotFound { path: PathBuf },

	#[error("Failed to read config file: {path}")]
	ConfigReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to parse config file: {path}")]
	ConfigParseError {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("Invalid glob pattern: {pattern}")]
	InvalidGlob {
		pattern: String,
		#[source]
		source: globset::Error,
	},

	#[error("Invalid regex pattern: {pattern}")]
	InvalidRegex {
		pattern: String,
		#[source]
		source: regex::Error,
	},

	#[error("Invalid substitution `{input}`: {reason}")]
	InvalidSubstitution { input: String, reason: String },

	#[error("Invalid replacer #{index}: {reason}")]
	InvalidRule { index: usize, reason: String },

	#[error("Replacer failed on {path}: {message}")]
	ReplacerFailed { path: String, message: String },

	#[error("Failed to read asset: {path}")]
	FileReadError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("Failed to write asset: {path}")]
	FileWriteError {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// Result type alias using AssetReplaceError.
pub type Result<T> = std::result::Result<T, AssetReplaceError>;

use crate::config::types::{PatternList, PatternSpec};
use crate::error::{AssetReplaceError, Result};
use crate::file::{AssetFile, base_name};
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;

/// A compiled path pattern.
#[derive(Debug, Clone)]
pub enum Pattern {
	/// A glob. Globs without a `/` also match against the base name.
	Glob {
		matcher: GlobMatcher,
		match_base: bool,
	},

	/// A regular expression tested against the full path.
	Regex(Regex),
}

impl Pattern {
	/// Compile a glob pattern.
	pub fn glob(pattern: &str) -> Result<Self> {
		// `*` must not cross directories; only `**` does.
		let glob = GlobBuilder::new(pattern)
			.literal_separator(true)
			.build()
			.map_err(|source| AssetReplaceError::InvalidGlob {
				pattern: pattern.to_string(),
				source,
			})?;

		Ok(Pattern::Glob {
			matcher: glob.compile_matcher(),
			match_base: !pattern.contains('/'),
		})
	}

	/// Compile a regex pattern.
	pub fn regex(pattern: &str) -> Result<Self> {
		compile_regex(pattern).map(Pattern::Regex)
	}

	pub fn from_spec(spec: &PatternSpec) -> Result<Self> {
		match spec {
			PatternSpec::Glob(glob) => Pattern::glob(glob),
			PatternSpec::Regex { regex } => Pattern::regex(regex),
		}
	}

	/// Check if `path` matches this pattern.
	pub fn is_match(&self, path: &str) -> bool {
		match self {
			Pattern::Glob {
				matcher,
				match_base,
			} => matcher.is_match(path) || (*match_base && matcher.is_match(base_name(path))),
			Pattern::Regex(regex) => regex.is_match(path),
		}
	}
}

/// An ordered list of patterns; a path matches if any pattern does.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
	patterns: Vec<Pattern>,
}

impl PatternSet {
	pub fn new(patterns: Vec<Pattern>) -> Self {
		PatternSet { patterns }
	}

	/// Compile every pattern of a config list.
	pub fn from_list(list: &PatternList) -> Result<Self> {
		list.specs()
			.iter()
			.map(Pattern::from_spec)
			.collect::<Result<Vec<_>>>()
			.map(PatternSet::new)
	}

	/// Compile a list of glob strings.
	pub fn globs(globs: &[&str]) -> Result<Self> {
		globs
			.iter()
			.map(|g| Pattern::glob(g))
			.collect::<Result<Vec<_>>>()
			.map(PatternSet::new)
	}

	pub fn is_match(&self, path: &str) -> bool {
		self.patterns.iter().any(|p| p.is_match(path))
	}

	pub fn is_empty(&self) -> bool {
		self.patterns.is_empty()
	}

	pub fn len(&self) -> usize {
		self.patterns.len()
	}
}

/// Compile a regex pattern string.
pub(crate) fn compile_regex(pattern: &str) -> Result<Regex> {
	Regex::new(pattern).map_err(|source| AssetReplaceError::InvalidRegex {
		pattern: pattern.to_string(),
		source,
	})
}

/// Indices of every file in `files` whose path matches, in pool order.
pub fn select_files(patterns: &PatternSet, files: &[AssetFile]) -> Vec<usize> {
	files
		.iter()
		.enumerate()
		.filter(|(_, file)| patterns.is_match(&file.path))
		.map(|(index, _)| index)
		.collect()
}

/// Like [`select_files`], restricted to the `candidates` indices.
pub fn select_from(patterns: &PatternSet, files: &[AssetFile], candidates: &[usize]) -> Vec<usize> {
	candidates
		.iter()
		.copied()
		.filter(|&index| {
			files
				.get(index)
				.is_some_and(|file| patterns.is_match(&file.path))
		})
		.collect()
}

use crate::config::types::{FileTypeConfig, RuleType};
use crate::error::Result;
use crate::file::AssetFile;
use crate::rules::matcher::{PatternSet, select_from};

pub const DEFAULT_HTML_FILES: &[&str] = &["*.{html,htm,phtml,xhtml,tpl}"];
pub const DEFAULT_CSS_FILES: &[&str] = &["*.{css,styl,less,sass,scss}"];
pub const DEFAULT_JS_FILES: &[&str] = &["*.{js,coffee,ts,dart}"];

/// Patterns identifying the files of each known type.
#[derive(Debug, Clone)]
pub struct FileTypeMap {
	pub html: PatternSet,
	pub css: PatternSet,
	pub js: PatternSet,
}

impl FileTypeMap {
	pub fn defaults() -> Result<Self> {
		Ok(FileTypeMap {
			html: PatternSet::globs(DEFAULT_HTML_FILES)?,
			css: PatternSet::globs(DEFAULT_CSS_FILES)?,
			js: PatternSet::globs(DEFAULT_JS_FILES)?,
		})
	}

	/// Defaults with the configured entries replacing their type's list.
	pub fn from_config(config: &FileTypeConfig) -> Result<Self> {
		let mut map = FileTypeMap::defaults()?;
		if let Some(ref html) = config.html {
			map.html = PatternSet::from_list(html)?;
		}
		if let Some(ref css) = config.css {
			map.css = PatternSet::from_list(css)?;
		}
		if let Some(ref js) = config.js {
			map.js = PatternSet::from_list(js)?;
		}
		Ok(map)
	}

	/// Resolve every type to the matching `candidates`, in pool order.
	pub fn resolve(&self, files: &[AssetFile], candidates: &[usize]) -> ResolvedFileTypes {
		ResolvedFileTypes {
			html: select_from(&self.html, files, candidates),
			css: select_from(&self.css, files, candidates),
			js: select_from(&self.js, files, candidates),
		}
	}
}

/// Per-build resolution of each type to file indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFileTypes {
	pub html: Vec<usize>,
	pub css: Vec<usize>,
	pub js: Vec<usize>,
}

impl ResolvedFileTypes {
	/// The files of `rule_type`; `None` for types without an entry.
	pub fn get(&self, rule_type: RuleType) -> Option<&[usize]> {
		match rule_type {
			RuleType::Html => Some(self.html.as_slice()),
			RuleType::Css => Some(self.css.as_slice()),
			RuleType::Js => Some(self.js.as_slice()),
			RuleType::Custom => None,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::types::PatternList;

	fn pool() -> Vec<AssetFile> {
		[
			"index.html",
			"css/main.css",
			"js/app.js",
			"views/list.tpl",
			"img/logo.png",
			"src/theme.scss",
			"pages/about.htm",
		]
		.iter()
		.map(|p| AssetFile::new(*p, ""))
		.collect()
	}

	#[test]
	fn test_default_types_resolve() {
		let files = pool();
		let all: Vec<usize> = (0..files.len()).collect();
		let resolved = FileTypeMap::defaults().unwrap().resolve(&files, &all);

		assert_eq!(resolved.html, vec![0, 3, 6]);
		assert_eq!(resolved.css, vec![1, 5]);
		assert_eq!(resolved.js, vec![2]);
		assert!(resolved.get(RuleType::Custom).is_none());
	}

	#[test]
	fn test_override_replaces_only_that_type() {
		let files = pool();
		let all: Vec<usize> = (0..files.len()).collect();
		let config = FileTypeConfig {
			html: Some(PatternList::globs(["*.tpl"])),
			..Default::default()
		};
		let resolved = FileTypeMap::from_config(&config)
			.unwrap()
			.resolve(&files, &all);

		assert_eq!(resolved.html, vec![3]);
		assert_eq!(resolved.css, vec![1, 5]);
	}

	#[test]
	fn test_resolve_respects_candidates() {
		let files = pool();
		let resolved = FileTypeMap::defaults().unwrap().resolve(&files, &[1, 6]);

		assert_eq!(resolved.html, vec![6]);
		assert_eq!(resolved.css, vec![1]);
		assert!(resolved.js.is_empty());
	}
}

use crate::asset::{AssetRewriter, InlineContent, InlineHandler, RewriteOptions};
use crate::config::types::{ReplacerConfig, RuleType};
use crate::error::Result;
use crate::file::AssetFile;
use crate::rules::matcher::PatternSet;
use crate::rules::rewriter::{RewriteRule, Substitution, TagSelector};
use log::debug;
use std::fmt;
use std::sync::Arc;

/// Tags and attributes that carry paths in HTML, merged into html replacers
/// with `path` enabled. A tag without attributes has its content rewritten.
pub const DEFAULT_HTML_PATH_TAGS: &[(&str, &[&str])] = &[
	("img", &["src", "srcset"]),
	("source", &["src", "srcset"]),
	("link", &["href"]),
	("script", &["src"]),
	("style", &[]),
	("object", &["data"]),
	("embed", &["src"]),
];

/// A custom rewriting function.
///
/// For `custom` replacers `data` is the whole file content. When passed to
/// the html/css rewriters it is called once per extracted URL instead.
pub trait Replacer: Send + Sync {
	fn replace(&self, data: &str, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String>;
}

impl<F> Replacer for F
where
	F: Fn(&str, &AssetFile, &RewriteOptions<'_>) -> Result<String> + Send + Sync,
{
	fn replace(&self, data: &str, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String> {
		self(data, file, options)
	}
}

impl Replacer for Substitution {
	fn replace(&self, data: &str, _file: &AssetFile, _options: &RewriteOptions<'_>) -> Result<String> {
		Ok(self.apply(data))
	}
}

/// The rewriters with dedicated URL extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specialized {
	Html,
	Css,
}

/// How a replacer rewrites its files. Resolved once, when the replacer is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
	Specialized(Specialized),
	RuleBased,
	Custom,
	Noop,
}

impl Strategy {
	fn resolve(rule_type: RuleType, has_rules: bool, has_replacer: bool) -> Self {
		match rule_type {
			RuleType::Html => Strategy::Specialized(Specialized::Html),
			RuleType::Css => Strategy::Specialized(Specialized::Css),
			_ if has_rules => Strategy::RuleBased,
			_ if has_replacer => Strategy::Custom,
			_ => Strategy::Noop,
		}
	}
}

/// A replacement rule ready for dispatch.
#[derive(Clone)]
pub struct CompiledReplacer {
	rule_type: RuleType,
	files: Option<PatternSet>,
	rules: Option<Vec<RewriteRule>>,
	path: bool,
	replacer: Option<Arc<dyn Replacer>>,
	strategy: Strategy,
}

impl fmt::Debug for CompiledReplacer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CompiledReplacer")
			.field("rule_type", &self.rule_type)
			.field("files", &self.files)
			.field("rules", &self.rules)
			.field("path", &self.path)
			.field("replacer", &self.replacer.is_some())
			.field("strategy", &self.strategy)
			.finish()
	}
}

impl CompiledReplacer {
	pub fn new(rule_type: RuleType) -> Self {
		CompiledReplacer {
			rule_type,
			files: None,
			rules: None,
			path: false,
			replacer: None,
			strategy: Strategy::resolve(rule_type, false, false),
		}
	}

	pub fn with_files(mut self, files: PatternSet) -> Self {
		self.files = Some(files);
		self
	}

	pub fn with_rules(mut self, rules: Vec<RewriteRule>) -> Self {
		self.rules = Some(rules);
		self.resolve_strategy();
		self
	}

	pub fn with_path(mut self, path: bool) -> Self {
		self.path = path;
		self
	}

	pub fn with_replacer(mut self, replacer: impl Replacer + 'static) -> Self {
		self.replacer = Some(Arc::new(replacer));
		self.resolve_strategy();
		self
	}

	/// Compile a replacer from its config entry. `index` is used in errors.
	pub fn from_config(index: usize, config: &ReplacerConfig) -> Result<Self> {
		config.validate(index)?;

		let mut replacer = CompiledReplacer::new(config.rule_type).with_path(config.path);

		if let Some(ref files) = config.files {
			replacer = replacer.with_files(PatternSet::from_list(files)?);
		}

		if let Some(ref rules) = config.rules {
			let rules = rules
				.iter()
				.map(RewriteRule::from_config)
				.collect::<Result<Vec<_>>>()?;
			replacer = replacer.with_rules(rules);
		}

		if let Some(ref sed) = config.replacer {
			replacer = replacer.with_replacer(Substitution::parse(sed)?);
		}

		Ok(replacer)
	}

	fn resolve_strategy(&mut self) {
		self.strategy =
			Strategy::resolve(self.rule_type, self.rules.is_some(), self.replacer.is_some());
	}

	/// Merge [`DEFAULT_HTML_PATH_TAGS`] into the rules of html replacers with
	/// `path` enabled. User tag definitions win over defaults for the same tag.
	pub fn merge_default_path_tags(&mut self) -> Result<()> {
		if self.rule_type != RuleType::Html || !self.path {
			return Ok(());
		}

		let rules = self.rules.get_or_insert_with(Vec::new);
		let user_tags: Vec<String> = rules
			.iter()
			.filter_map(|rule| rule.tag.as_ref())
			.map(|selector| selector.tag.to_ascii_lowercase())
			.collect();

		for (tag, attrs) in DEFAULT_HTML_PATH_TAGS {
			if !user_tags.iter().any(|t| t == tag) {
				rules.push(RewriteRule::tag(TagSelector::new(tag, attrs)?));
			}
		}

		self.resolve_strategy();
		Ok(())
	}

	pub fn rule_type(&self) -> RuleType {
		self.rule_type
	}

	pub fn files(&self) -> Option<&PatternSet> {
		self.files.as_ref()
	}

	pub fn rules(&self) -> &[RewriteRule] {
		self.rules.as_deref().unwrap_or(&[])
	}

	pub fn path(&self) -> bool {
		self.path
	}

	pub fn strategy(&self) -> Strategy {
		self.strategy
	}

	/// Rewrite one file and return its new content.
	pub fn apply(
		&self,
		file: &AssetFile,
		rewriter: &dyn AssetRewriter,
		inline: Option<&dyn InlineHandler>,
	) -> Result<String> {
		let options = RewriteOptions {
			rules: self.rules(),
			inline,
			rule_type: self.rule_type,
			path: self.path,
			replacer: self.replacer.as_deref(),
		};

		match self.strategy {
			Strategy::Specialized(Specialized::Html) => rewriter.replace_html_url(file, &options),
			Strategy::Specialized(Specialized::Css) => rewriter.replace_css_url(file, &options),
			Strategy::RuleBased => rewriter.replace_by_rules(file, self.rules(), &options),
			Strategy::Custom => match self.replacer {
				Some(ref replacer) => replacer.replace(&file.data, file, &options),
				None => Ok(file.data.clone()),
			},
			Strategy::Noop => Ok(file.data.clone()),
		}
	}
}

/// Rewrites inline `<script>`/`<style>` content with every replacer
/// registered for the content's type.
pub struct InlineParser<'a> {
	replacers: &'a [CompiledReplacer],
	rewriter: &'a dyn AssetRewriter,
}

impl<'a> InlineParser<'a> {
	pub fn new(replacers: &'a [CompiledReplacer], rewriter: &'a dyn AssetRewriter) -> Self {
		InlineParser {
			replacers,
			rewriter,
		}
	}
}

impl InlineHandler for InlineParser<'_> {
	fn rewrite_inline(&self, inline: &InlineContent<'_>) -> Result<String> {
		let mut file = AssetFile::inline(inline.file, inline.data);

		for replacer in self
			.replacers
			.iter()
			.filter(|r| r.rule_type() == inline.kind)
		{
			file.data = replacer.apply(&file, self.rewriter, Some(self))?;
		}

		if file.data == inline.data {
			return Ok(inline.matched.to_string());
		}

		debug!("Rewrote inline {} in {}", inline.kind, inline.file.path);
		Ok(inline.with_content(&file.data))
	}
}

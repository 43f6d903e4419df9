//! URL rewriting for HTML, CSS and plain text assets.
//!
//! This module handles:
//! - The [`AssetRewriter`] contract the processor dispatches to
//! - Extraction of URL-bearing attributes, inline blocks and CSS references
//! - The inline content callback contract ([`InlineHandler`])
//!
//! [`UrlRewriter`] is the default implementation. It locates references with
//! regular expressions rather than a full parser, which is enough for the
//! well-formed markup build tools emit.

pub mod css;
pub mod html;

use crate::config::types::RuleType;
use crate::error::Result;
use crate::file::AssetFile;
use crate::rules::replacer::Replacer;
use crate::rules::rewriter::{RewriteRule, apply_substitutions};
use regex::{Captures, Match, Regex};

/// Options handed to every rewrite call.
#[derive(Clone, Copy)]
pub struct RewriteOptions<'a> {
	/// Tag definitions and substitutions of the replacer.
	pub rules: &'a [RewriteRule],

	/// Callback for inline script/style content, when inline parsing is enabled.
	pub inline: Option<&'a dyn InlineHandler>,

	pub rule_type: RuleType,

	/// Whether path-aware HTML parsing was requested.
	pub path: bool,

	/// Custom replacer of the rule.
	pub replacer: Option<&'a dyn Replacer>,
}

/// Inline `<script>` or `<style>` content found inside an HTML file.
#[derive(Debug, Clone, Copy)]
pub struct InlineContent<'a> {
	/// `Js` for scripts, `Css` for styles.
	pub kind: RuleType,

	/// The raw inline content.
	pub data: &'a str,

	/// The HTML file containing it.
	pub file: &'a AssetFile,

	/// The whole matched element, tags included.
	pub matched: &'a str,

	/// Byte offset of `data` within `matched`.
	pub offset: usize,
}

impl InlineContent<'_> {
	/// `matched` with the content at `offset` replaced by `content`.
	pub fn with_content(&self, content: &str) -> String {
		let end = self.offset + self.data.len();
		let mut out = String::with_capacity(self.matched.len() + content.len());
		out.push_str(&self.matched[..self.offset]);
		out.push_str(content);
		out.push_str(&self.matched[end..]);
		out
	}
}

/// Rewrites inline content. Returns `matched` with the content replaced.
pub trait InlineHandler {
	fn rewrite_inline(&self, inline: &InlineContent<'_>) -> Result<String>;
}

/// The rewriting functions the processor dispatches to.
pub trait AssetRewriter: Send + Sync {
	/// Rewrite URL-bearing attributes and content of an HTML file.
	fn replace_html_url(&self, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String>;

	/// Rewrite `url()` and `@import` references of a CSS file.
	fn replace_css_url(&self, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String>;

	/// Apply the substitutions of `rules` to the whole file.
	fn replace_by_rules(
		&self,
		file: &AssetFile,
		rules: &[RewriteRule],
		options: &RewriteOptions<'_>,
	) -> Result<String>;
}

/// Default [`AssetRewriter`].
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlRewriter;

impl AssetRewriter for UrlRewriter {
	fn replace_html_url(&self, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String> {
		html::replace_html_url(file, options)
	}

	fn replace_css_url(&self, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String> {
		css::replace_css_refs(&file.data, file, options)
	}

	fn replace_by_rules(
		&self,
		file: &AssetFile,
		rules: &[RewriteRule],
		_options: &RewriteOptions<'_>,
	) -> Result<String> {
		Ok(apply_substitutions(rules, &file.data))
	}
}

/// Rewrite a single URL: substitutions in order, then the custom replacer.
/// `data:` URIs and empty values are returned untouched.
pub fn rewrite_url(url: &str, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String> {
	let trimmed = url.trim();
	if trimmed.is_empty() || trimmed.get(..5).is_some_and(|s| s.eq_ignore_ascii_case("data:")) {
		return Ok(url.to_string());
	}

	let rewritten = apply_substitutions(options.rules, url);
	match options.replacer {
		Some(replacer) => replacer.replace(&rewritten, file, options),
		None => Ok(rewritten),
	}
}

/// `Regex::replace_all` with a fallible replacement.
pub(crate) fn try_replace_all<F>(re: &Regex, text: &str, mut replace: F) -> Result<String>
where
	F: FnMut(&Captures<'_>) -> Result<String>,
{
	let mut out = String::with_capacity(text.len());
	let mut last = 0;

	for caps in re.captures_iter(text) {
		let Some(whole) = caps.get(0) else {
			continue;
		};
		out.push_str(&text[last..whole.start()]);
		out.push_str(&replace(&caps)?);
		last = whole.end();
	}

	out.push_str(&text[last..]);
	Ok(out)
}

/// The first participating group among `groups`.
pub(crate) fn first_group<'t>(caps: &Captures<'t>, groups: &[usize]) -> Option<Match<'t>> {
	groups.iter().find_map(|&i| caps.get(i))
}

/// The whole match with `group` replaced by `replacement`.
pub(crate) fn splice(caps: &Captures<'_>, group: Match<'_>, replacement: &str) -> String {
	let whole = &caps[0];
	let offset = caps.get(0).map_or(0, |m| m.start());
	let start = group.start() - offset;
	let end = group.end() - offset;

	let mut out = String::with_capacity(whole.len() + replacement.len());
	out.push_str(&whole[..start]);
	out.push_str(replacement);
	out.push_str(&whole[end..]);
	out
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::rules::rewriter::Substitution;

	fn options(rules: &[RewriteRule]) -> RewriteOptions<'_> {
		RewriteOptions {
			rules,
			inline: None,
			rule_type: RuleType::Css,
			path: false,
			replacer: None,
		}
	}

	fn cdn(url: &str, _file: &AssetFile, _options: &RewriteOptions<'_>) -> Result<String> {
		Ok(format!("https://cdn.example.com/{}", url.trim_start_matches('/')))
	}

	#[test]
	fn test_rewrite_url_applies_substitutions_then_replacer() {
		let rules = vec![RewriteRule::substitution(
			Substitution::literal("old/", "new/").unwrap(),
		)];
		let file = AssetFile::new("a.css", "");
		let replacer = cdn;
		let mut opts = options(&rules);
		opts.replacer = Some(&replacer);

		assert_eq!(
			rewrite_url("/old/a.png", &file, &opts).unwrap(),
			"https://cdn.example.com/new/a.png"
		);
	}

	#[test]
	fn test_rewrite_url_skips_data_uris() {
		let rules = vec![RewriteRule::substitution(
			Substitution::literal("a", "b").unwrap(),
		)];
		let file = AssetFile::new("a.css", "");
		let uri = "DATA:image/png;base64,aaaa";

		assert_eq!(rewrite_url(uri, &file, &options(&rules)).unwrap(), uri);
	}

	#[test]
	fn test_replace_by_rules_rewrites_whole_text() {
		let rules = vec![RewriteRule::substitution(
			Substitution::literal("old/", "new/").unwrap(),
		)];
		let file = AssetFile::new("app.js", "import('old/a.js'); fetch('old/b.json')");

		let data = UrlRewriter
			.replace_by_rules(&file, &rules, &options(&rules))
			.unwrap();
		assert_eq!(data, "import('new/a.js'); fetch('new/b.json')");
	}

	#[test]
	fn test_try_replace_all_propagates_errors() {
		let re = Regex::new(r"\d").unwrap();
		let result = try_replace_all(&re, "a1b2", |caps| {
			if &caps[0] == "2" {
				Err(crate::error::AssetReplaceError::ReplacerFailed {
					path: "x".to_string(),
					message: "two".to_string(),
				})
			} else {
				Ok("#".to_string())
			}
		});
		assert!(result.is_err());

		let ok = try_replace_all(&re, "a1b2c", |_| Ok("#".to_string())).unwrap();
		assert_eq!(ok, "a#b#c");
	}
}

use crate::asset::css::replace_css_refs;
use crate::asset::{
	InlineContent, InlineHandler, RewriteOptions, first_group, rewrite_url, splice,
	try_replace_all,
};
use crate::config::types::RuleType;
use crate::error::Result;
use crate::file::AssetFile;
use crate::rules::rewriter::{TagSelector, apply_substitutions};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static SCRIPT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?is)<script\b([^>]*)>(.*?)</script\s*>").unwrap());

static STYLE_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"(?is)<style\b([^>]*)>(.*?)</style\s*>").unwrap());

static SRC_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\ssrc\s*=").unwrap());

/// Rewrite an HTML file.
///
/// Inline blocks go through `options.inline` first. Then, when the rules
/// define tags, only those tags' attributes (or content) are rewritten;
/// without tag definitions the substitutions apply to the whole document.
/// A `style` tag definition leaves content alone when `options.inline` is
/// set, since the handler already rewrote it.
pub fn replace_html_url(file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String> {
	let mut html = match options.inline {
		Some(handler) => replace_inline(&file.data, file, handler)?,
		None => file.data.clone(),
	};

	let selectors: Vec<&TagSelector> = options
		.rules
		.iter()
		.filter_map(|rule| rule.tag.as_ref())
		.collect();

	if selectors.is_empty() {
		return Ok(apply_substitutions(options.rules, &html));
	}

	for selector in selectors {
		if options.inline.is_some() && is_style(selector) {
			continue;
		}
		html = if selector.rewrites_content() {
			rewrite_content(&html, selector, file, options)?
		} else {
			rewrite_attrs(&html, selector, file, options)?
		};
	}

	Ok(html)
}

/// Hand inline scripts (without `src`) and styles to `handler`.
fn replace_inline(html: &str, file: &AssetFile, handler: &dyn InlineHandler) -> Result<String> {
	let html = try_replace_all(&SCRIPT_RE, html, |caps| {
		let attrs = caps.get(1).map_or("", |m| m.as_str());
		if SRC_ATTR_RE.is_match(attrs) {
			return Ok(caps[0].to_string());
		}
		match inline_content(caps, RuleType::Js, file) {
			Some(inline) => handler.rewrite_inline(&inline),
			None => Ok(caps[0].to_string()),
		}
	})?;

	try_replace_all(&STYLE_RE, &html, |caps| {
		match inline_content(caps, RuleType::Css, file) {
			Some(inline) => handler.rewrite_inline(&inline),
			None => Ok(caps[0].to_string()),
		}
	})
}

/// Content of an inline block (group 2), unless it is blank.
fn inline_content<'t>(
	caps: &Captures<'t>,
	kind: RuleType,
	file: &'t AssetFile,
) -> Option<InlineContent<'t>> {
	let element = caps.get(0)?;
	let content = caps.get(2)?;
	if content.as_str().trim().is_empty() {
		return None;
	}

	Some(InlineContent {
		kind,
		data: content.as_str(),
		file,
		matched: element.as_str(),
		offset: content.start() - element.start(),
	})
}

fn rewrite_attrs(
	html: &str,
	selector: &TagSelector,
	file: &AssetFile,
	options: &RewriteOptions<'_>,
) -> Result<String> {
	try_replace_all(selector.element(), html, |tag_caps| {
		let mut tag = tag_caps[0].to_string();

		for (name, pattern) in selector.attr_patterns() {
			tag = try_replace_all(pattern, &tag, |caps| match first_group(caps, &[1, 2, 3]) {
				Some(value) => {
					let rewritten = if name.eq_ignore_ascii_case("srcset") {
						rewrite_srcset(value.as_str(), file, options)?
					} else {
						rewrite_url(value.as_str(), file, options)?
					};
					Ok(splice(caps, value, &rewritten))
				}
				None => Ok(caps[0].to_string()),
			})?;
		}

		Ok(tag)
	})
}

/// `style` content holds CSS references; other tags get the substitutions.
fn rewrite_content(
	html: &str,
	selector: &TagSelector,
	file: &AssetFile,
	options: &RewriteOptions<'_>,
) -> Result<String> {
	let style = is_style(selector);

	try_replace_all(selector.element(), html, |caps| match caps.get(1) {
		Some(content) => {
			let rewritten = if style {
				replace_css_refs(content.as_str(), file, options)?
			} else {
				apply_substitutions(options.rules, content.as_str())
			};
			Ok(splice(caps, content, &rewritten))
		}
		None => Ok(caps[0].to_string()),
	})
}

fn is_style(selector: &TagSelector) -> bool {
	selector.rewrites_content() && selector.tag.eq_ignore_ascii_case("style")
}

/// Rewrite each candidate URL of a `srcset`, keeping the descriptors.
fn rewrite_srcset(value: &str, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String> {
	value
		.split(',')
		.map(|candidate| {
			let trimmed = candidate.trim_start();
			let lead = &candidate[..candidate.len() - trimmed.len()];
			let end = trimmed.find(char::is_whitespace).unwrap_or(trimmed.len());
			let (url, descriptor) = trimmed.split_at(end);
			Ok(format!(
				"{lead}{}{descriptor}",
				rewrite_url(url, file, options)?
			))
		})
		.collect::<Result<Vec<_>>>()
		.map(|parts| parts.join(","))
}

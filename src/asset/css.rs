use crate::asset::{RewriteOptions, first_group, rewrite_url, splice, try_replace_all};
use crate::error::Result;
use crate::file::AssetFile;
use regex::Regex;
use std::sync::LazyLock;

/// `url(...)` with double, single or no quotes.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'"()\s]+))\s*\)"#).unwrap()
});

/// `@import "..."` without `url()`.
static IMPORT_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r#"(?i)@import\s+(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Rewrite every CSS reference in `css`. Quoting is preserved.
pub fn replace_css_refs(css: &str, file: &AssetFile, options: &RewriteOptions<'_>) -> Result<String> {
	let css = try_replace_all(&URL_RE, css, |caps| match first_group(caps, &[1, 2, 3]) {
		Some(url) => Ok(splice(caps, url, &rewrite_url(url.as_str(), file, options)?)),
		None => Ok(caps[0].to_string()),
	})?;

	try_replace_all(&IMPORT_RE, &css, |caps| match first_group(caps, &[1, 2]) {
		Some(url) => Ok(splice(caps, url, &rewrite_url(url.as_str(), file, options)?)),
		None => Ok(caps[0].to_string()),
	})
}

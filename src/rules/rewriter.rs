use crate::config::types::RewriteRuleConfig;
use crate::error::{AssetReplaceError, Result};
use crate::rules::matcher::compile_regex;
use regex::Regex;

/// A text substitution: a regex pattern and its replacement.
#[derive(Debug, Clone)]
pub struct Substitution {
	/// The pattern to match.
	pub pattern: Regex,

	/// The replacement string, `$1`-style captures allowed.
	pub replacement: String,

	/// Whether to replace all occurrences (global flag).
	pub global: bool,
}

impl Substitution {
	/// Replace every literal occurrence of `from` with `to`.
	pub fn literal(from: &str, to: &str) -> Result<Self> {
		Ok(Substitution {
			pattern: compile_regex(&regex::escape(from))?,
			replacement: to.replace('$', "$$"),
			global: true,
		})
	}

	/// Replace every match of the regex `from` with `to`.
	pub fn regex(from: &str, to: &str) -> Result<Self> {
		Ok(Substitution {
			pattern: compile_regex(from)?,
			replacement: to.to_string(),
			global: true,
		})
	}

	/// Parse a substitution string in sed-like format: "s/pattern/replacement/" or "s/pattern/replacement/g"
	pub fn parse(input: &str) -> Result<Self> {
		let invalid = |reason: &str| AssetReplaceError::InvalidSubstitution {
			input: input.to_string(),
			reason: reason.to_string(),
		};

		let mut chars = input.chars();
		if chars.next() != Some('s') {
			return Err(invalid("substitution must start with 's'"));
		}

		// The character after 's' is the delimiter
		let delimiter = chars.next().ok_or_else(|| invalid("substitution too short"))?;

		let parts = split_by_delimiter(chars.as_str(), delimiter);

		if parts.len() < 2 {
			return Err(invalid("substitution must have pattern and replacement"));
		}

		let pattern_str = &parts[0];
		let replacement = parts[1].clone();
		let flags = if parts.len() > 2 { &parts[2] } else { "" };

		let global = flags.contains('g');

		let pattern = compile_regex(pattern_str)?;

		Ok(Substitution {
			pattern,
			replacement,
			global,
		})
	}

	/// Apply this substitution to a string.
	pub fn apply(&self, input: &str) -> String {
		if self.global {
			self.pattern
				.replace_all(input, &self.replacement)
				.to_string()
		} else {
			self.pattern.replace(input, &self.replacement).to_string()
		}
	}
}

/// Split a string by a delimiter, respecting backslash escapes.
fn split_by_delimiter(input: &str, delimiter: char) -> Vec<String> {
	let mut parts = Vec::new();
	let mut current = String::new();
	let mut chars = input.chars().peekable();
	let mut escape_next = false;

	while let Some(c) = chars.next() {
		if escape_next {
			current.push(c);
			escape_next = false;
		} else if c == '\\' {
			// Check if we're escaping the delimiter
			if chars.peek() == Some(&delimiter) {
				escape_next = true;
			} else {
				current.push(c);
			}
		} else if c == delimiter {
			parts.push(current);
			current = String::new();
		} else {
			current.push(c);
		}
	}

	parts.push(current);

	parts
}

/// HTML tag whose attributes, or content when no attributes are listed,
/// carry URLs.
#[derive(Debug, Clone)]
pub struct TagSelector {
	pub tag: String,
	pub attrs: Vec<String>,
	element: Regex,
	attr_patterns: Vec<Regex>,
}

impl TagSelector {
	pub fn new(tag: &str, attrs: &[&str]) -> Result<Self> {
		let name = regex::escape(tag);
		let element = if attrs.is_empty() {
			compile_regex(&format!(r"(?is)<{name}\b[^>]*>(.*?)</{name}\s*>"))?
		} else {
			compile_regex(&format!(r"(?is)<{name}\b[^>]*>"))?
		};

		let attr_patterns = attrs
			.iter()
			.map(|attr| {
				compile_regex(&format!(
					r#"(?is)\s{}\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#,
					regex::escape(attr)
				))
			})
			.collect::<Result<Vec<_>>>()?;

		Ok(TagSelector {
			tag: tag.to_string(),
			attrs: attrs.iter().map(|a| a.to_string()).collect(),
			element,
			attr_patterns,
		})
	}

	/// Matches the opening tag, or the whole element when rewriting content.
	pub fn element(&self) -> &Regex {
		&self.element
	}

	/// Attribute names paired with their value patterns.
	pub fn attr_patterns(&self) -> impl Iterator<Item = (&str, &Regex)> {
		self.attrs
			.iter()
			.map(String::as_str)
			.zip(self.attr_patterns.iter())
	}

	pub fn rewrites_content(&self) -> bool {
		self.attrs.is_empty()
	}
}

/// One compiled entry of a replacer's `rules` list.
#[derive(Debug, Clone, Default)]
pub struct RewriteRule {
	pub tag: Option<TagSelector>,
	pub substitution: Option<Substitution>,
}

impl RewriteRule {
	pub fn tag(selector: TagSelector) -> Self {
		RewriteRule {
			tag: Some(selector),
			substitution: None,
		}
	}

	pub fn substitution(substitution: Substitution) -> Self {
		RewriteRule {
			tag: None,
			substitution: Some(substitution),
		}
	}

	pub fn from_config(config: &RewriteRuleConfig) -> Result<Self> {
		let tag = match config.tag {
			Some(ref tag) => {
				let attrs: Vec<&str> = config
					.attrs
					.iter()
					.flatten()
					.map(String::as_str)
					.collect();
				Some(TagSelector::new(tag, &attrs)?)
			}
			None => None,
		};

		let substitution = match (&config.from, &config.to) {
			(Some(from), Some(to)) if config.regex => Some(Substitution::regex(from, to)?),
			(Some(from), Some(to)) => Some(Substitution::literal(from, to)?),
			_ => None,
		};

		Ok(RewriteRule { tag, substitution })
	}
}

/// Apply every substitution of `rules` to `input`, in order.
pub fn apply_substitutions(rules: &[RewriteRule], input: &str) -> String {
	rules
		.iter()
		.filter_map(|rule| rule.substitution.as_ref())
		.fold(input.to_string(), |text, sub| sub.apply(&text))
}

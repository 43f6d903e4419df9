//! Rule matching and dispatch for asset-replace.
//!
//! This module handles:
//! - Glob and regex path matching, and file set selection
//! - Substitutions and HTML tag definitions
//! - Replacement rules and their rewriting strategy

pub mod matcher;
pub mod replacer;
pub mod rewriter;

pub use matcher::{Pattern, PatternSet, select_files, select_from};
pub use replacer::{
	CompiledReplacer, DEFAULT_HTML_PATH_TAGS, InlineParser, Replacer, Specialized, Strategy,
};
pub use rewriter::{RewriteRule, Substitution, TagSelector, apply_substitutions};

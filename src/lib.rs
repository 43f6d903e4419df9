//! asset-replace - build processor that rewrites asset references in HTML, CSS and JS.
//!
//! This library provides the core functionality for asset-replace, including:
//! - Configuration file parsing and discovery
//! - Glob/regex path matching and file set selection
//! - Replacement rule dispatch to html, css, rule-based or custom rewriters
//! - A processor implementing the host pipeline's two lifecycle hooks
//!
//! # Example
//!
//! ```no_run
//! use asset_replace::config::parse_config_str;
//! use asset_replace::processor::{AssetReplaceProcessor, Pipeline, ProcessContext};
//! use asset_replace::AssetFile;
//! use std::path::Path;
//!
//! let config = parse_config_str(
//!     r#"
//! [[replacers]]
//! type = "css"
//! rules = [{ from = "old/", to = "new/" }]
//! "#,
//!     Path::new("inline.toml"),
//! )
//! .unwrap();
//!
//! let mut processor = AssetReplaceProcessor::from_config(&config).unwrap();
//! let files = vec![AssetFile::new("main.css", "a { background: url(old/bg.png) }")];
//! let mut pipeline = Pipeline::new(files, ProcessContext::default());
//!
//! let report = pipeline.run(&mut processor).unwrap();
//! assert_eq!(report.changed, vec![0]);
//! ```

pub mod asset;
pub mod config;
pub mod error;
pub mod file;
pub mod loader;
pub mod processor;
pub mod rules;

pub use error::{AssetReplaceError, Result};
pub use file::AssetFile;

//! Build pipeline integration for asset-replace.
//!
//! This module handles:
//! - The host contract ([`Processor`]) with its two lifecycle hooks
//! - The asset replace processor and its single-execution guard
//! - File type resolution per build
//! - A minimal in-process host ([`Pipeline`])

pub mod asset_replace;
pub mod file_type;
pub mod pipeline;

pub use asset_replace::{AssetReplaceProcessor, BuildState, ProcessorOptions};
pub use file_type::{FileTypeMap, ResolvedFileTypes};
pub use pipeline::{BuildReport, Pipeline};

use crate::error::Result;
use crate::file::AssetFile;
use std::path::PathBuf;

/// Build environment passed through the hooks. Processors do not interpret it.
#[derive(Debug, Clone, Default)]
pub struct ProcessContext {
	/// Directory the file pool was loaded from, if any.
	pub root: Option<PathBuf>,
}

/// A processor run by the host pipeline.
///
/// The host calls [`Processor::before_all`] once per build with the whole
/// pool, then [`Processor::process`] once for every returned index. The pool
/// must not be reordered between the two calls. Returning `Ok(())` from
/// `process` signals completion.
pub trait Processor {
	fn name(&self) -> &str;

	/// Select the files the host should iterate over.
	fn before_all(&mut self, ctx: &ProcessContext, files: &[AssetFile]) -> Result<Vec<usize>>;

	/// Process the file at `index`; may mutate any file of the pool.
	fn process(&mut self, index: usize, files: &mut [AssetFile], ctx: &ProcessContext)
	-> Result<()>;
}

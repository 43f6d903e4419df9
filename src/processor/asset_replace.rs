use crate::asset::{AssetRewriter, InlineHandler, UrlRewriter};
use crate::config::types::Config;
use crate::error::Result;
use crate::file::AssetFile;
use crate::processor::file_type::{FileTypeMap, ResolvedFileTypes};
use crate::processor::{ProcessContext, Processor};
use crate::rules::matcher::{PatternSet, select_files, select_from};
use crate::rules::replacer::{CompiledReplacer, InlineParser};
use log::{debug, info, warn};

/// Construction options for [`AssetReplaceProcessor`].
#[derive(Debug, Clone)]
pub struct ProcessorOptions {
	/// Files the processor considers at all.
	pub files: PatternSet,

	pub file_type: FileTypeMap,

	/// Replacers in declaration order.
	pub replacers: Vec<CompiledReplacer>,

	/// Rewrite inline script/style content of HTML files.
	pub parse_inline: bool,
}

impl ProcessorOptions {
	/// Options matching every file, with default file types and no replacers.
	pub fn new() -> Result<Self> {
		Ok(ProcessorOptions {
			files: PatternSet::globs(&["**/*"])?,
			file_type: FileTypeMap::defaults()?,
			replacers: Vec::new(),
			parse_inline: true,
		})
	}

	/// Compile a parsed config.
	pub fn from_config(config: &Config) -> Result<Self> {
		let replacers = config
			.replacers
			.iter()
			.enumerate()
			.map(|(index, replacer)| CompiledReplacer::from_config(index, replacer))
			.collect::<Result<Vec<_>>>()?;

		Ok(ProcessorOptions {
			files: PatternSet::from_list(&config.files)?,
			file_type: FileTypeMap::from_config(&config.file_type)?,
			replacers,
			parse_inline: config.parse_inline,
		})
	}

	pub fn with_replacer(mut self, replacer: CompiledReplacer) -> Self {
		self.replacers.push(replacer);
		self
	}

	pub fn with_parse_inline(mut self, parse_inline: bool) -> Self {
		self.parse_inline = parse_inline;
		self
	}
}

/// Where the processor is within the current build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
	/// No build selected yet.
	Idle,
	/// `before_all` ran; the rewrite pass is pending.
	Selected,
	/// The rewrite pass ran; further `process` calls are no-ops.
	Processed,
}

/// Rewrites asset references across the whole build in a single pass.
///
/// The host may call [`Processor::process`] once per selected file; only the
/// first call of a build does work, covering every selected file.
pub struct AssetReplaceProcessor {
	files: PatternSet,
	file_type: FileTypeMap,
	replacers: Vec<CompiledReplacer>,
	parse_inline: bool,
	rewriter: Box<dyn AssetRewriter>,
	candidates: Vec<usize>,
	resolved: ResolvedFileTypes,
	state: BuildState,
}

impl AssetReplaceProcessor {
	pub const NAME: &'static str = "AssetReplaceProcessor";

	/// Build the processor. Html replacers with `path` enabled get the
	/// default path tag definitions merged in here.
	pub fn new(options: ProcessorOptions) -> Result<Self> {
		let mut replacers = options.replacers;
		for replacer in &mut replacers {
			replacer.merge_default_path_tags()?;
		}

		Ok(AssetReplaceProcessor {
			files: options.files,
			file_type: options.file_type,
			replacers,
			parse_inline: options.parse_inline,
			rewriter: Box::new(UrlRewriter),
			candidates: Vec::new(),
			resolved: ResolvedFileTypes::default(),
			state: BuildState::Idle,
		})
	}

	pub fn from_config(config: &Config) -> Result<Self> {
		AssetReplaceProcessor::new(ProcessorOptions::from_config(config)?)
	}

	/// Replace the default [`UrlRewriter`].
	pub fn with_rewriter(mut self, rewriter: impl AssetRewriter + 'static) -> Self {
		self.rewriter = Box::new(rewriter);
		self
	}

	pub fn replacers(&self) -> &[CompiledReplacer] {
		&self.replacers
	}

	pub fn state(&self) -> BuildState {
		self.state
	}

	/// Files captured by the last `before_all`.
	pub fn candidates(&self) -> &[usize] {
		&self.candidates
	}

	pub fn resolved_file_types(&self) -> &ResolvedFileTypes {
		&self.resolved
	}

	/// Files a replacer applies to: its own `files` patterns over the
	/// candidates, else its type's files, else every candidate.
	fn target_files(&self, replacer: &CompiledReplacer, files: &[AssetFile]) -> Vec<usize> {
		if let Some(patterns) = replacer.files() {
			return select_from(patterns, files, &self.candidates);
		}

		match self.resolved.get(replacer.rule_type()) {
			Some(found) => found.to_vec(),
			None => self.candidates.clone(),
		}
	}

	fn rewrite_all(&self, files: &mut [AssetFile]) -> Result<()> {
		let parser = InlineParser::new(&self.replacers, self.rewriter.as_ref());
		let inline: Option<&dyn InlineHandler> = if self.parse_inline {
			Some(&parser)
		} else {
			None
		};

		let mut rewritten = 0;
		for (index, replacer) in self.replacers.iter().enumerate() {
			let targets = self.target_files(replacer, files);
			if targets.is_empty() {
				if replacer.files().is_some() {
					warn!("Replacer #{index} ({}) matched no files", replacer.rule_type());
				}
				continue;
			}

			debug!(
				"Replacer #{index} ({}, {:?}) on {} files",
				replacer.rule_type(),
				replacer.strategy(),
				targets.len()
			);

			for target in targets {
				let Some(file) = files.get(target) else {
					continue;
				};
				let data = replacer.apply(file, self.rewriter.as_ref(), inline)?;
				if data != file.data {
					debug!("Rewrote {}", file.path);
					rewritten += 1;
				}
				files[target].data = data;
			}
		}

		info!(
			"{}: {} rewrites across {} files",
			Self::NAME,
			rewritten,
			self.candidates.len()
		);
		Ok(())
	}
}

impl Processor for AssetReplaceProcessor {
	fn name(&self) -> &str {
		Self::NAME
	}

	fn before_all(&mut self, ctx: &ProcessContext, files: &[AssetFile]) -> Result<Vec<usize>> {
		self.candidates = select_files(&self.files, files);
		self.resolved = self.file_type.resolve(files, &self.candidates);
		self.state = BuildState::Selected;

		debug!(
			"Selected {} of {} files (html: {}, css: {}, js: {}){}",
			self.candidates.len(),
			files.len(),
			self.resolved.html.len(),
			self.resolved.css.len(),
			self.resolved.js.len(),
			ctx.root
				.as_ref()
				.map(|root| format!(" in {}", root.display()))
				.unwrap_or_default()
		);

		Ok(self.candidates.clone())
	}

	fn process(
		&mut self,
		index: usize,
		files: &mut [AssetFile],
		_ctx: &ProcessContext,
	) -> Result<()> {
		match self.state {
			BuildState::Processed => Ok(()),
			BuildState::Idle => {
				warn!("{}: process({index}) called before before_all", Self::NAME);
				Ok(())
			}
			BuildState::Selected => {
				self.state = BuildState::Processed;
				self.rewrite_all(files)
			}
		}
	}
}

use crate::error::Result;
use crate::file::AssetFile;
use crate::processor::{ProcessContext, Processor};
use log::{debug, info};

/// Outcome of running one processor over the pool.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
	/// Files the processor selected for iteration.
	pub selected: usize,

	/// Indices of files whose content changed, in pool order.
	pub changed: Vec<usize>,
}

/// A minimal host: owns the file pool and drives processors through
/// `before_all` and one `process` call per selected file.
#[derive(Debug, Default)]
pub struct Pipeline {
	files: Vec<AssetFile>,
	context: ProcessContext,
}

impl Pipeline {
	pub fn new(files: Vec<AssetFile>, context: ProcessContext) -> Self {
		Pipeline { files, context }
	}

	pub fn files(&self) -> &[AssetFile] {
		&self.files
	}

	pub fn into_files(self) -> Vec<AssetFile> {
		self.files
	}

	/// Run one processor over the pool.
	pub fn run(&mut self, processor: &mut dyn Processor) -> Result<BuildReport> {
		let before: Vec<String> = self.files.iter().map(|f| f.data.clone()).collect();

		let selected = processor.before_all(&self.context, &self.files)?;
		debug!("{} selected {} files", processor.name(), selected.len());

		for &index in &selected {
			processor.process(index, &mut self.files, &self.context)?;
		}

		let changed: Vec<usize> = self
			.files
			.iter()
			.zip(&before)
			.enumerate()
			.filter(|(_, (file, original))| file.data != **original)
			.map(|(index, _)| index)
			.collect();

		info!(
			"{}: {} of {} files changed",
			processor.name(),
			changed.len(),
			self.files.len()
		);

		Ok(BuildReport {
			selected: selected.len(),
			changed,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	/// Records every hook call and appends a marker per `process` call.
	#[derive(Default)]
	struct Recorder {
		before_all: usize,
		processed: Vec<usize>,
	}

	impl Processor for Recorder {
		fn name(&self) -> &str {
			"Recorder"
		}

		fn before_all(&mut self, _ctx: &ProcessContext, files: &[AssetFile]) -> Result<Vec<usize>> {
			self.before_all += 1;
			Ok((0..files.len()).filter(|i| i % 2 == 0).collect())
		}

		fn process(
			&mut self,
			index: usize,
			files: &mut [AssetFile],
			_ctx: &ProcessContext,
		) -> Result<()> {
			self.processed.push(index);
			files[index].data.push('*');
			Ok(())
		}
	}

	#[test]
	fn test_pipeline_drives_both_hooks() {
		let files = vec![
			AssetFile::new("a", "a"),
			AssetFile::new("b", "b"),
			AssetFile::new("c", "c"),
		];
		let mut pipeline = Pipeline::new(files, ProcessContext::default());
		let mut recorder = Recorder::default();

		let report = pipeline.run(&mut recorder).unwrap();

		assert_eq!(recorder.before_all, 1);
		assert_eq!(recorder.processed, vec![0, 2]);
		assert_eq!(
			report,
			BuildReport {
				selected: 2,
				changed: vec![0, 2]
			}
		);
		assert_eq!(pipeline.files()[1].data, "b");
		assert_eq!(pipeline.into_files()[2].data, "c*");
	}
}

use crate::error::{AssetReplaceError, Result};
use crate::file::AssetFile;
use jwalk::WalkDir;
use log::{debug, warn};
use std::path::Path;

/// Load every UTF-8 text file under `root` into a pool, sorted by path.
///
/// Hidden files and directories are skipped, and so are files that are not
/// valid UTF-8. Entries the walk cannot read are logged and skipped. Paths
/// are relative to `root` and use `/` separators.
pub fn load_assets(root: &Path) -> Result<Vec<AssetFile>> {
	let mut paths: Vec<_> = WalkDir::new(root)
		.skip_hidden(true)
		.into_iter()
		.filter_map(|entry| match entry {
			Ok(entry) => Some(entry),
			Err(e) => {
				warn!("Skipping unreadable entry under {}: {e}", root.display());
				None
			}
		})
		.filter(|e| e.file_type().is_file())
		.map(|e| e.path())
		.collect();
	paths.sort();

	let mut files = Vec::with_capacity(paths.len());
	for path in paths {
		let bytes = std::fs::read(&path).map_err(|source| AssetReplaceError::FileReadError {
			path: path.clone(),
			source,
		})?;

		let Ok(data) = String::from_utf8(bytes) else {
			debug!("Skipping non-text file {}", path.display());
			continue;
		};

		let Some(relative) = relative_path(root, &path) else {
			continue;
		};
		files.push(AssetFile::new(relative, data));
	}

	Ok(files)
}

/// Write the files at `indices` back under `root`.
pub fn write_assets(root: &Path, files: &[AssetFile], indices: &[usize]) -> Result<()> {
	for file in indices.iter().filter_map(|&i| files.get(i)) {
		let path = root.join(&file.path);
		std::fs::write(&path, &file.data)
			.map_err(|source| AssetReplaceError::FileWriteError { path, source })?;
	}
	Ok(())
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
	let relative = path.strip_prefix(root).ok()?;
	let parts: Vec<String> = relative
		.components()
		.map(|c| c.as_os_str().to_string_lossy().into_owned())
		.collect();
	Some(parts.join("/"))
}

/// One asset in the build: a pipeline-relative path and its text content.
///
/// Paths always use `/` as separator so patterns behave the same on every
/// platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
	/// Path relative to the build root.
	pub path: String,

	/// Current content. Processors rewrite this in place.
	pub data: String,

	/// Set for the temporary file wrapping inline `<script>`/`<style>` content.
	pub inline: bool,
}

impl AssetFile {
	pub fn new(path: impl Into<String>, data: impl Into<String>) -> Self {
		AssetFile {
			path: path.into(),
			data: data.into(),
			inline: false,
		}
	}

	/// A file wrapping inline content found inside `owner`.
	pub fn inline(owner: &AssetFile, data: impl Into<String>) -> Self {
		AssetFile {
			path: owner.path.clone(),
			data: data.into(),
			inline: true,
		}
	}

	/// The final path segment.
	pub fn base_name(&self) -> &str {
		base_name(&self.path)
	}
}

/// The final `/`-separated segment of `path`.
pub fn base_name(path: &str) -> &str {
	path.rsplit('/').next().unwrap_or(path)
}

use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use crate::StringResult;
use crate::TagtreeError;
use crate::TagtreeResult;

/// Suffix appended to a partial name when the bare name is not a file.
pub const DEFAULT_PARTIAL_SUFFIX: &str = ".mustache";

/// A strategy turning a partial name into template text.
pub trait PartialResolver {
	fn resolve(&self, name: &str) -> TagtreeResult<StringResult<'static>>;
}

impl<F> PartialResolver for F
where
	F: Fn(&str) -> TagtreeResult<StringResult<'static>>,
{
	fn resolve(&self, name: &str) -> TagtreeResult<StringResult<'static>> {
		self(name)
	}
}

/// Loads partials from files: `<dir>/<name>`, then `<dir>/<name><suffix>`,
/// for each search directory in order.
#[derive(Debug, Clone)]
pub struct FilePartials {
	/// Directories searched in order. When empty, names are used as given,
	/// relative to the working directory.
	pub paths: Vec<PathBuf>,
	pub suffix: String,
}

impl Default for FilePartials {
	fn default() -> Self {
		Self {
			paths: Vec::new(),
			suffix: DEFAULT_PARTIAL_SUFFIX.to_string(),
		}
	}
}

impl FilePartials {
	fn candidates(&self, name: &str) -> Vec<PathBuf> {
		let with_suffix = format!("{name}{}", self.suffix);
		if self.paths.is_empty() {
			return vec![PathBuf::from(name), PathBuf::from(with_suffix)];
		}

		self.paths
			.iter()
			.flat_map(|dir| [dir.join(name), dir.join(&with_suffix)])
			.collect()
	}

	fn read(path: &Path) -> TagtreeResult<Option<Vec<u8>>> {
		match std::fs::read(path) {
			Ok(content) => Ok(Some(content)),
			Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::IsADirectory) => Ok(None),
			Err(e) => Err(e.into()),
		}
	}
}

impl PartialResolver for FilePartials {
	fn resolve(&self, name: &str) -> TagtreeResult<StringResult<'static>> {
		for candidate in self.candidates(name) {
			if let Some(content) = Self::read(&candidate)? {
				tracing::debug!(name, path = %candidate.display(), "loaded partial");
				return Ok(StringResult::owned(content));
			}
		}

		Err(TagtreeError::PartialNotFound(name.to_string()))
	}
}

/// Resolves partials through an optional override strategy, then files.
///
/// Resolution never fails: a partial that cannot be found renders as the
/// empty string.
#[derive(Default)]
pub struct PartialLoader {
	custom: Option<Box<dyn PartialResolver>>,
	files: FilePartials,
}

impl PartialLoader {
	pub fn new(files: FilePartials) -> Self {
		Self {
			custom: None,
			files,
		}
	}

	/// Consult `custom` before the files.
	#[must_use]
	pub fn with_override(mut self, custom: impl PartialResolver + 'static) -> Self {
		self.custom = Some(Box::new(custom));
		self
	}

	pub fn files(&self) -> &FilePartials {
		&self.files
	}

	pub fn load(&self, name: &str) -> StringResult<'static> {
		if let Some(custom) = &self.custom {
			match custom.resolve(name) {
				Ok(content) => return content,
				Err(e) => tracing::debug!(name, error = %e, "partial override failed, trying files"),
			}
		}

		match self.files.resolve(name) {
			Ok(content) => content,
			Err(e) => {
				tracing::debug!(name, error = %e, "partial unavailable, rendering it empty");
				StringResult::empty()
			}
		}
	}
}

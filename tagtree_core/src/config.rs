use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::DEFAULT_PARTIAL_SUFFIX;
use crate::Extensions;
use crate::FilePartials;
use crate::TagtreeError;
use crate::TagtreeResult;

/// Default bound on section nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["tagtree.toml", ".tagtree.toml", ".config/tagtree.toml"];

/// Settings fixed for the duration of one render or extraction.
#[derive(Debug, Clone)]
pub struct Options {
	pub extensions: Extensions,
	/// Maximum number of nested sections.
	pub max_depth: usize,
	pub partials: FilePartials,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			extensions: Extensions::process_default(),
			max_depth: DEFAULT_MAX_DEPTH,
			partials: FilePartials::default(),
		}
	}
}

impl Options {
	#[must_use]
	pub fn with_extensions(mut self, extensions: Extensions) -> Self {
		self.extensions = extensions;
		self
	}

	/// Make undefined tags an error.
	#[must_use]
	pub fn strict(mut self) -> Self {
		self.extensions |= Extensions::ERROR_UNDEFINED;
		self
	}

	#[must_use]
	pub fn with_max_depth(mut self, max_depth: usize) -> Self {
		self.max_depth = max_depth;
		self
	}

	#[must_use]
	pub fn with_partials(mut self, partials: FilePartials) -> Self {
		self.partials = partials;
		self
	}
}

/// Configuration loaded from a `tagtree.toml` file.
///
/// ```toml
/// extensions = ["json_pointer", "object_iter", "equal", "compare"]
/// strict = false
/// max_depth = 256
///
/// [partials]
/// suffix = ".mustache"
/// paths = ["partials"]
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagtreeConfig {
	/// Enabled extensions, as names or as raw bits. When absent the process
	/// default applies.
	#[serde(default)]
	pub extensions: Option<Extensions>,
	/// When true, undefined tags abort rendering.
	#[serde(default)]
	pub strict: bool,
	/// Maximum section nesting. Defaults to 256.
	#[serde(default)]
	pub max_depth: Option<usize>,
	#[serde(default)]
	pub partials: PartialsConfig,
}

/// Where partials are loaded from.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PartialsConfig {
	/// Appended to a partial name that is not a file by itself.
	#[serde(default = "default_partial_suffix")]
	pub suffix: String,
	/// Directories searched for partials, relative to the project root. The
	/// project root itself is searched when empty.
	#[serde(default)]
	pub paths: Vec<PathBuf>,
}

impl Default for PartialsConfig {
	fn default() -> Self {
		Self {
			suffix: default_partial_suffix(),
			paths: Vec::new(),
		}
	}
}

fn default_partial_suffix() -> String {
	DEFAULT_PARTIAL_SUFFIX.to_string()
}

impl TagtreeConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no file exists.
	pub fn load(root: &Path) -> TagtreeResult<Option<TagtreeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	pub fn parse(content: &str) -> TagtreeResult<TagtreeConfig> {
		toml::from_str(content).map_err(|e| TagtreeError::ConfigParse(e.to_string()))
	}

	/// The per-call options described by this config, with partial paths
	/// made relative to `root`.
	pub fn options(&self, root: &Path) -> Options {
		let mut extensions = self
			.extensions
			.unwrap_or_else(Extensions::process_default);
		if self.strict {
			extensions |= Extensions::ERROR_UNDEFINED;
		}

		let paths = if self.partials.paths.is_empty() {
			vec![root.to_path_buf()]
		} else {
			self.partials.paths.iter().map(|path| root.join(path)).collect()
		};

		Options {
			extensions,
			max_depth: self.max_depth.unwrap_or(DEFAULT_MAX_DEPTH),
			partials: FilePartials {
				paths,
				suffix: self.partials.suffix.clone(),
			},
		}
	}
}

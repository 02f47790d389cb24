use crate::DataSource;
use crate::Extensions;
use crate::Selection;
use crate::StringResult;
use crate::TagtreeError;
use crate::TagtreeResult;
use crate::path::resolve;

/// Resolves tag names against a data source with a fixed set of extensions.
pub struct Selector<D> {
	source: D,
	extensions: Extensions,
}

impl<D: DataSource> Selector<D> {
	pub fn new(source: D, extensions: Extensions) -> Self {
		Self { source, extensions }
	}

	pub fn extensions(&self) -> Extensions {
		self.extensions
	}

	pub fn source_mut(&mut self) -> &mut D {
		&mut self.source
	}

	pub fn into_inner(self) -> D {
		self.source
	}

	/// Resolve `name`, leaving the data source on the selected value.
	pub fn select(&mut self, name: &str) -> TagtreeResult<Selection> {
		resolve(&mut self.source, name, self.extensions)
	}

	/// The value of `name`, or `None` when it is undefined or has no string
	/// form.
	pub fn get_optional(&mut self, name: &str) -> TagtreeResult<Option<StringResult<'_>>> {
		let selection = self.select(name)?;
		if !selection.is_found() {
			return Ok(None);
		}

		self.source.get(selection.is_object_iteration())
	}

	/// The value of `name`. Undefined values are empty, or an
	/// [`TagtreeError::UndefinedTag`] error with
	/// [`Extensions::ERROR_UNDEFINED`].
	pub fn get(&mut self, name: &str) -> TagtreeResult<StringResult<'_>> {
		let strict = self.extensions.contains(Extensions::ERROR_UNDEFINED);
		match self.get_optional(name)? {
			Some(value) => Ok(value),
			None if strict => Err(TagtreeError::UndefinedTag(name.to_string())),
			None => {
				tracing::trace!(name, "undefined tag renders empty");
				Ok(StringResult::empty())
			}
		}
	}
}

use std::cmp::Ordering;

use crate::StringResult;
use crate::TagtreeResult;

/// The capability contract a host data source implements so tag names can
/// be resolved against it.
///
/// A data source keeps an internal cursor. `select` positions it from the
/// current scope, `subselect` moves it further down from the last
/// selection, and `get` materializes the value under it. The cursor is only
/// meaningful after a successful selection.
pub trait DataSource {
	/// Select `key` in the current scope, searching enclosing scopes when the
	/// host supports it. `None` selects the current scope itself.
	fn select(&mut self, key: Option<&str>) -> bool;

	/// Select `key` inside the value selected last.
	fn subselect(&mut self, key: &str) -> bool;

	/// Compare the selected value with `value`.
	///
	/// Returns `None` when the data source cannot compare values. Any
	/// comparison then resolves as not found.
	fn compare(&mut self, _value: &str) -> Option<Ordering> {
		None
	}

	/// Materialize the selected value as a string.
	///
	/// With `object_iteration`, the selection was made through `*` and the
	/// value to produce is the name of the property currently iterated.
	/// Returns `Ok(None)` when the value cannot be represented as a string.
	fn get(&mut self, object_iteration: bool) -> TagtreeResult<Option<StringResult<'_>>>;

	/// Start iterating the selected value for a section.
	///
	/// With `object_iteration`, the properties of the selected object are
	/// enumerated instead of the value itself. Returns false when there is
	/// nothing to iterate, in which case the section is not rendered and no
	/// `leave` follows.
	fn enter(&mut self, object_iteration: bool) -> TagtreeResult<bool>;

	/// Move to the next iteration. Returns false when iteration is over.
	fn next(&mut self) -> TagtreeResult<bool>;

	/// Leave the scope opened by the last successful `enter`.
	fn leave(&mut self) -> TagtreeResult<()>;
}

impl<D: DataSource + ?Sized> DataSource for &mut D {
	fn select(&mut self, key: Option<&str>) -> bool {
		(**self).select(key)
	}

	fn subselect(&mut self, key: &str) -> bool {
		(**self).subselect(key)
	}

	fn compare(&mut self, value: &str) -> Option<Ordering> {
		(**self).compare(value)
	}

	fn get(&mut self, object_iteration: bool) -> TagtreeResult<Option<StringResult<'_>>> {
		(**self).get(object_iteration)
	}

	fn enter(&mut self, object_iteration: bool) -> TagtreeResult<bool> {
		(**self).enter(object_iteration)
	}

	fn next(&mut self) -> TagtreeResult<bool> {
		(**self).next()
	}

	fn leave(&mut self) -> TagtreeResult<()> {
		(**self).leave()
	}
}

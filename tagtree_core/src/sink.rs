use crate::StringResult;
use crate::TagtreeError;
use crate::TagtreeResult;

/// What a sink asks the scanner to do with the body of a section it was told
/// about through [`RenderSink::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnterOutcome {
	/// Render the body, then ask [`RenderSink::next`] whether to repeat it.
	Render,
	/// Render the body once, as an inverted section.
	Inverted,
	/// Skip the body. No `next` or `leave` follows.
	Skip,
}

impl EnterOutcome {
	/// The status value of this outcome: 1, -1 or 0.
	pub fn code(self) -> i32 {
		match self {
			Self::Render => 1,
			Self::Inverted => -1,
			Self::Skip => 0,
		}
	}

	/// Returns true when the scanner must call `leave` after the body.
	pub fn is_entered(self) -> bool {
		!matches!(self, Self::Skip)
	}
}

impl TryFrom<i32> for EnterOutcome {
	type Error = TagtreeError;

	/// Interpret a raw status. `-1` is the inverted outcome; other negative
	/// values are error codes.
	fn try_from(code: i32) -> Result<Self, Self::Error> {
		match code {
			0 => Ok(Self::Skip),
			-1 => Ok(Self::Inverted),
			code if code > 0 => Ok(Self::Render),
			code => {
				Err(TagtreeError::from_code(code).unwrap_or_else(|| {
					TagtreeError::InvalidInterface(format!("unexpected status {code}"))
				}))
			}
		}
	}
}

/// The callbacks a template scanner drives, in document order.
///
/// `put`, `enter`, `next`, `leave`, `partial` and `emit` are mandatory;
/// `start`, `get` and `stop` have no-op defaults.
pub trait RenderSink {
	/// Called once before any other callback.
	fn start(&mut self) -> TagtreeResult<()> {
		Ok(())
	}

	/// A value tag `name`. `escape` is false for `{{{name}}}` and `{{&name}}`.
	fn put(&mut self, name: &str, escape: bool) -> TagtreeResult<()>;

	/// A section opening tag. `expected` is true for `{{#name}}` and false for
	/// `{{^name}}`.
	fn enter(&mut self, name: &str, expected: bool) -> TagtreeResult<EnterOutcome>;

	/// Whether the body of the current section is rendered again.
	fn next(&mut self) -> TagtreeResult<bool>;

	/// A section closing tag, for a section whose `enter` was not skipped.
	fn leave(&mut self) -> TagtreeResult<()>;

	/// The text of partial `name`. Unknown partials resolve to the empty
	/// string.
	fn partial(&mut self, name: &str) -> TagtreeResult<StringResult<'static>>;

	/// Materialize the value of `name` directly, when the sink supports it.
	fn get(&mut self, _name: &str) -> TagtreeResult<Option<StringResult<'_>>> {
		Ok(None)
	}

	/// A run of template text.
	fn emit(&mut self, buffer: &[u8], escape: bool) -> TagtreeResult<()>;

	/// Called once at the end with the final status of the run.
	fn stop(&mut self, _status: &TagtreeResult<()>) {}
}

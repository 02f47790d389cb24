use std::io::Write;

use crate::DataSource;
use crate::Emitter;
use crate::EnterOutcome;
use crate::Event;
use crate::Extensions;
use crate::Options;
use crate::PartialLoader;
use crate::RenderSink;
use crate::Selector;
use crate::StringResult;
use crate::TagtreeError;
use crate::TagtreeResult;
use crate::drive;

/// A sink rendering a template against a data source.
pub struct Renderer<D: DataSource, W: Write> {
	selector: Selector<D>,
	emitter: Emitter<W>,
	partials: PartialLoader,
	/// One entry per entered section: whether the data source entered a
	/// scope for it and expects a matching `leave`.
	scopes: Vec<bool>,
}

impl<D: DataSource, W: Write> Renderer<D, W> {
	pub fn new(source: D, output: W, options: &Options) -> Self {
		Self {
			selector: Selector::new(source, options.extensions),
			emitter: Emitter::new(output),
			partials: PartialLoader::new(options.partials.clone()),
			scopes: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_partials(mut self, partials: PartialLoader) -> Self {
		self.partials = partials;
		self
	}

	#[must_use]
	pub fn with_emitter(mut self, emitter: Emitter<W>) -> Self {
		self.emitter = emitter;
		self
	}

	/// Flush and return the output.
	pub fn finish(mut self) -> TagtreeResult<W> {
		self.emitter.flush()?;
		Ok(self.emitter.into_inner())
	}
}

impl<D: DataSource, W: Write> RenderSink for Renderer<D, W> {
	fn put(&mut self, name: &str, escape: bool) -> TagtreeResult<()> {
		let value = self.selector.get(name)?;
		self.emitter.emit(&value, escape)
	}

	fn enter(&mut self, name: &str, expected: bool) -> TagtreeResult<EnterOutcome> {
		let selection = self.selector.select(name)?;
		let entered = selection.is_found()
			&& self
				.selector
				.source_mut()
				.enter(selection.is_object_iteration())?;

		if expected {
			if !entered {
				return Ok(EnterOutcome::Skip);
			}
			self.scopes.push(true);
			return Ok(EnterOutcome::Render);
		}

		if entered {
			self.selector.source_mut().leave()?;
			return Ok(EnterOutcome::Skip);
		}
		self.scopes.push(false);
		Ok(EnterOutcome::Inverted)
	}

	fn next(&mut self) -> TagtreeResult<bool> {
		match self.scopes.last() {
			Some(true) => self.selector.source_mut().next(),
			_ => Ok(false),
		}
	}

	fn leave(&mut self) -> TagtreeResult<()> {
		match self.scopes.pop() {
			Some(true) => self.selector.source_mut().leave(),
			Some(false) => Ok(()),
			None => Err(TagtreeError::Closing(String::new())),
		}
	}

	fn partial(&mut self, name: &str) -> TagtreeResult<StringResult<'static>> {
		if self
			.selector
			.extensions()
			.contains(Extensions::PARTIAL_DATA_FIRST)
		{
			if let Some(value) = self.selector.get_optional(name)? {
				return Ok(StringResult::owned(value.into_vec()));
			}
		}

		Ok(self.partials.load(name))
	}

	fn get(&mut self, name: &str) -> TagtreeResult<Option<StringResult<'_>>> {
		self.selector.get_optional(name)
	}

	fn emit(&mut self, buffer: &[u8], escape: bool) -> TagtreeResult<()> {
		self.emitter.emit(buffer, escape)
	}
}

/// Render the template described by `events` against `source` into
/// `output`.
pub fn render<D, W>(events: &[Event], source: D, output: W, options: &Options) -> TagtreeResult<W>
where
	D: DataSource,
	W: Write,
{
	let mut renderer = Renderer::new(source, output, options);
	drive(events, &mut renderer, options)?;
	renderer.finish()
}

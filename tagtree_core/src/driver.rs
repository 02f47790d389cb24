use serde::Deserialize;
use serde::Serialize;

use crate::EnterOutcome;
use crate::Extensions;
use crate::MAX_TAG_LENGTH;
use crate::Options;
use crate::PartialLoader;
use crate::RenderSink;
use crate::TagtreeError;
use crate::TagtreeResult;
use crate::Tree;
use crate::TreeBuilder;

/// One report of a template scanner, in document order.
///
/// An event script is the serialized form of what a scanner tells a sink.
/// It is read as a JSON array such as
/// `[{"event": "text", "text": "Hello "}, {"event": "value", "name": "who"}]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
	/// Template text between tags.
	Text {
		text: String,
		#[serde(default)]
		escape: bool,
	},
	/// A value tag.
	Value {
		name: String,
		#[serde(default = "default_true")]
		escape: bool,
	},
	/// A section opening tag; `expected` is false for inverted sections.
	Enter {
		name: String,
		#[serde(default = "default_true")]
		expected: bool,
	},
	/// A section closing tag.
	Leave { name: String },
	/// A partial tag.
	Partial { name: String },
}

fn default_true() -> bool {
	true
}

/// An entered section whose closing event has not been reached yet.
#[derive(Debug)]
struct Frame {
	/// Index of the first event of the body.
	body: usize,
	outcome: EnterOutcome,
}

/// Check the structure of `events` the way a scanner checks a template.
///
/// Returns, for each `Enter`, the index of its matching `Leave`.
fn match_sections(events: &[Event], options: &Options) -> TagtreeResult<Vec<Option<usize>>> {
	let mut matches = vec![None; events.len()];
	let mut open: Vec<(usize, &str)> = Vec::new();

	for (index, event) in events.iter().enumerate() {
		match event {
			Event::Text { .. } => {}
			Event::Value { name, .. } | Event::Partial { name } => {
				check_name(name, options.extensions)?;
			}
			Event::Enter { name, .. } => {
				check_name(name, options.extensions.without(Extensions::EMPTY_TAG))?;
				if open.len() == options.max_depth {
					return Err(TagtreeError::TooDeep(options.max_depth));
				}
				open.push((index, name.trim()));
			}
			Event::Leave { name } => {
				match open.pop() {
					Some((start, opened)) if opened == name.trim() => matches[start] = Some(index),
					_ => return Err(TagtreeError::Closing(name.clone())),
				}
			}
		}
	}

	if !open.is_empty() {
		return Err(TagtreeError::UnexpectedEnd);
	}

	Ok(matches)
}

fn check_name(name: &str, extensions: Extensions) -> TagtreeResult<()> {
	if name.len() > MAX_TAG_LENGTH {
		return Err(TagtreeError::TagTooLong);
	}
	if name.trim().is_empty() && !extensions.contains(Extensions::EMPTY_TAG) {
		return Err(TagtreeError::EmptyTag);
	}
	Ok(())
}

/// Replay `events` through `sink`, honouring the obligations of a scanner:
/// bounded nesting, matching closing tags, skipping and repeating section
/// bodies as the sink requests.
///
/// Partial texts are forwarded to the sink as unescaped text. `stop` is
/// always called with the final status.
pub fn drive<S>(events: &[Event], sink: &mut S, options: &Options) -> TagtreeResult<()>
where
	S: RenderSink + ?Sized,
{
	let result = sink.start().and_then(|()| replay(events, sink, options));
	sink.stop(&result);
	if let Err(e) = &result {
		tracing::debug!(error = %e, code = e.code(), "event replay failed");
	}

	result
}

fn replay<S>(events: &[Event], sink: &mut S, options: &Options) -> TagtreeResult<()>
where
	S: RenderSink + ?Sized,
{
	let matches = match_sections(events, options)?;
	let mut frames: Vec<Frame> = Vec::new();
	let mut index = 0;

	while let Some(event) = events.get(index) {
		match event {
			Event::Text { text, escape } => sink.emit(text.as_bytes(), *escape)?,
			Event::Value { name, escape } => {
				if !name.trim().is_empty() {
					sink.put(name.trim(), *escape)?;
				}
			}
			Event::Partial { name } => {
				if !name.trim().is_empty() {
					let content = sink.partial(name.trim())?;
					if !content.is_empty() {
						sink.emit(&content, false)?;
					}
				}
			}
			Event::Enter { name, expected } => {
				let outcome = sink.enter(name.trim(), *expected)?;
				tracing::trace!(name = name.trim(), ?outcome, "entered section");
				if outcome.is_entered() {
					frames.push(Frame {
						body: index + 1,
						outcome,
					});
				} else if let Some(end) = matches[index] {
					index = end;
				}
			}
			Event::Leave { .. } => {
				let Some(frame) = frames.last() else {
					return Err(TagtreeError::InvalidInterface(
						"section frame missing on leave".to_string(),
					));
				};
				if frame.outcome == EnterOutcome::Render && sink.next()? {
					index = frame.body;
					continue;
				}
				frames.pop();
				sink.leave()?;
			}
		}
		index += 1;
	}

	Ok(())
}

/// Record the structure of the template described by `events`.
///
/// The returned tree is in document order and owned by the caller.
pub fn extract(events: &[Event], options: &Options) -> TagtreeResult<Tree> {
	let mut builder = TreeBuilder::new(PartialLoader::new(options.partials.clone()));
	drive(events, &mut builder, options)?;
	Ok(builder.finish())
}

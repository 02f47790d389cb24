use std::io::Write;

use crate::TagtreeError;
use crate::TagtreeResult;

/// Replacement for a byte that must be escaped, or `None` when the byte is
/// written as is.
fn entity(byte: u8) -> Option<&'static [u8]> {
	match byte {
		b'<' => Some(b"&lt;"),
		b'>' => Some(b"&gt;"),
		b'&' => Some(b"&amp;"),
		b'"' => Some(b"&quot;"),
		_ => None,
	}
}

/// Forward `buffer` to `write`, escaping the HTML special characters when
/// `escape` is set.
///
/// Every maximal run of plain bytes is written in a single call and every
/// special byte is replaced by its entity in its own call. Each byte is
/// handled independently, so splitting a value into chunks and escaping
/// them one after the other gives the same output as escaping it whole.
pub fn escape_into<F>(buffer: &[u8], escape: bool, mut write: F) -> TagtreeResult<()>
where
	F: FnMut(&[u8]) -> TagtreeResult<()>,
{
	if !escape {
		return write(buffer);
	}

	let mut start = 0;
	for (index, byte) in buffer.iter().enumerate() {
		let Some(replacement) = entity(*byte) else {
			continue;
		};

		if index > start {
			write(&buffer[start..index])?;
		}
		write(replacement)?;
		start = index + 1;
	}

	if start < buffer.len() {
		write(&buffer[start..])?;
	}

	Ok(())
}

/// Escape `buffer` into a new vector.
pub fn escape_html(buffer: &[u8]) -> Vec<u8> {
	let mut output = Vec::with_capacity(buffer.len());
	for byte in buffer {
		match entity(*byte) {
			Some(replacement) => output.extend_from_slice(replacement),
			None => output.push(*byte),
		}
	}
	output
}

/// Overrides how the [`Emitter`] turns bytes and an escape flag into output.
pub type EmitOverride<W> = Box<dyn FnMut(&mut W, &[u8], bool) -> TagtreeResult<()>>;

/// Writes rendered bytes to an output, escaping where requested.
pub struct Emitter<W: Write> {
	output: W,
	custom: Option<EmitOverride<W>>,
}

impl<W: Write> Emitter<W> {
	pub fn new(output: W) -> Self {
		Self {
			output,
			custom: None,
		}
	}

	/// Hand every emitted run to `custom` instead of the built-in escaping.
	#[must_use]
	pub fn with_override(mut self, custom: EmitOverride<W>) -> Self {
		self.custom = Some(custom);
		self
	}

	pub fn emit(&mut self, buffer: &[u8], escape: bool) -> TagtreeResult<()> {
		if let Some(custom) = &mut self.custom {
			return custom(&mut self.output, buffer, escape);
		}

		let output = &mut self.output;
		escape_into(buffer, escape, |bytes| {
			output
				.write_all(bytes)
				.map_err(|e| TagtreeError::System(e.to_string()))
		})
	}

	pub fn flush(&mut self) -> TagtreeResult<()> {
		self.output
			.flush()
			.map_err(|e| TagtreeError::System(e.to_string()))
	}

	pub fn get_ref(&self) -> &W {
		&self.output
	}

	pub fn into_inner(self) -> W {
		self.output
	}
}

use std::borrow::Cow;
use std::fmt::Debug;

use derive_more::Deref;

/// How the bytes of a [`StringResult`] are released once the receiver is
/// done with them.
#[derive(Default)]
pub enum Release {
	/// Nothing to release.
	#[default]
	None,
	/// A plain callback receiving the released bytes.
	Plain(fn(&[u8])),
	/// A closure receiving the released bytes.
	Closure(Box<dyn FnOnce(&[u8])>),
}

impl Debug for Release {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::None => write!(f, "None"),
			Self::Plain(_) => write!(f, "Plain(..)"),
			Self::Closure(_) => write!(f, "Closure(..)"),
		}
	}
}

/// A string value handed over by a data source or partial loader together
/// with its release contract.
///
/// The release runs exactly once, when the value is dropped, whichever way
/// the consuming scope exits.
#[derive(Deref)]
pub struct StringResult<'a> {
	#[deref(forward)]
	value: Cow<'a, [u8]>,
	release: Release,
}

impl<'a> StringResult<'a> {
	/// The empty string, with nothing to release.
	pub fn empty() -> Self {
		Self::borrowed(b"")
	}

	pub fn borrowed(value: &'a [u8]) -> Self {
		Self {
			value: Cow::Borrowed(value),
			release: Release::None,
		}
	}

	pub fn owned(value: impl Into<Vec<u8>>) -> Self {
		Self {
			value: Cow::Owned(value.into()),
			release: Release::None,
		}
	}

	/// Build from a raw value and length. A `length` of zero means the value
	/// is NUL terminated: it ends at its first NUL byte, or at its end when it
	/// holds none.
	pub fn new(value: impl Into<Cow<'a, [u8]>>, length: usize, release: Release) -> Self {
		let mut value = value.into();
		let end = if length == 0 {
			value.iter().position(|byte| *byte == 0).unwrap_or(value.len())
		} else {
			length.min(value.len())
		};

		if end < value.len() {
			match &mut value {
				Cow::Borrowed(bytes) => {
					let full: &'a [u8] = *bytes;
					*bytes = &full[..end];
				}
				Cow::Owned(bytes) => bytes.truncate(end),
			}
		}

		Self { value, release }
	}

	/// Attach a release callback to a value with no release yet.
	#[must_use]
	pub fn with_release(mut self, release: Release) -> Self {
		debug_assert!(
			matches!(self.release, Release::None),
			"a release contract is already attached"
		);
		self.release = release;
		self
	}

	pub fn as_bytes(&self) -> &[u8] {
		&self.value
	}

	/// The value as text, replacing invalid UTF-8.
	pub fn to_string_lossy(&self) -> Cow<'_, str> {
		String::from_utf8_lossy(&self.value)
	}

	/// Copy the bytes out and release the value.
	pub fn into_vec(self) -> Vec<u8> {
		self.value.to_vec()
	}
}

impl Drop for StringResult<'_> {
	fn drop(&mut self) {
		match std::mem::take(&mut self.release) {
			Release::None => {}
			Release::Plain(callback) => callback(&self.value),
			Release::Closure(callback) => callback(&self.value),
		}
	}
}

impl Debug for StringResult<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StringResult")
			.field("value", &String::from_utf8_lossy(&self.value))
			.field("release", &self.release)
			.finish()
	}
}

impl PartialEq<[u8]> for StringResult<'_> {
	fn eq(&self, other: &[u8]) -> bool {
		self.value.as_ref() == other
	}
}

impl PartialEq<&str> for StringResult<'_> {
	fn eq(&self, other: &&str) -> bool {
		self.value.as_ref() == other.as_bytes()
	}
}

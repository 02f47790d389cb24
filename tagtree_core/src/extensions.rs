use std::fmt::Display;
use std::ops::BitOr;
use std::ops::BitOrAssign;
use std::str::FromStr;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering;

use serde::Deserialize;
use serde::Deserializer;

use crate::TagtreeError;

/// Bit set of the optional template extensions.
///
/// The numeric values are part of the compatibility surface and match the
/// values hosts pass across process boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extensions(u32);

impl Extensions {
	/// `{{name:value}}` style colon syntax.
	pub const COLON: Self = Self(1);
	/// Tolerate `{{}}`.
	pub const EMPTY_TAG: Self = Self(2);
	/// `{{.}}` selects the current scope. Always enabled.
	pub const SINGLE_DOT: Self = Self(4);
	/// `name=value` comparisons.
	pub const EQUAL: Self = Self(8);
	/// `<`, `<=`, `>` and `>=` comparisons.
	pub const COMPARE: Self = Self(16);
	/// `/a/b` JSON Pointer addressing.
	pub const JSON_POINTER: Self = Self(32);
	/// `*` enumerates the properties of the current scope.
	pub const OBJECT_ITER: Self = Self(64);
	/// Partials are always included. Always enabled.
	pub const INC_PARTIAL: Self = Self(128);
	/// A comparator in first position is a literal character.
	pub const ESC_FIRST_CMP: Self = Self(256);
	/// Look partial names up in the data before loading files.
	pub const PARTIAL_DATA_FIRST: Self = Self(512);
	/// Undefined tags abort rendering with an error.
	pub const ERROR_UNDEFINED: Self = Self(1024);

	pub const NONE: Self = Self(0);
	/// Every extension except [`Extensions::ERROR_UNDEFINED`].
	pub const ALL: Self = Self(1023);

	const ALWAYS: Self = Self(Self::SINGLE_DOT.0 | Self::INC_PARTIAL.0);

	const NAMES: [(&'static str, Self); 11] = [
		("colon", Self::COLON),
		("empty_tag", Self::EMPTY_TAG),
		("single_dot", Self::SINGLE_DOT),
		("equal", Self::EQUAL),
		("compare", Self::COMPARE),
		("json_pointer", Self::JSON_POINTER),
		("object_iter", Self::OBJECT_ITER),
		("inc_partial", Self::INC_PARTIAL),
		("esc_first_cmp", Self::ESC_FIRST_CMP),
		("partial_data_first", Self::PARTIAL_DATA_FIRST),
		("error_undefined", Self::ERROR_UNDEFINED),
	];

	/// Build from raw bits. The always-on extensions are added.
	pub const fn from_bits(bits: u32) -> Self {
		Self(bits | Self::ALWAYS.0)
	}

	pub const fn bits(self) -> u32 {
		self.0
	}

	pub const fn contains(self, other: Self) -> bool {
		self.0 & other.0 == other.0
	}

	/// Returns true when any bit of `other` is set.
	pub const fn intersects(self, other: Self) -> bool {
		self.0 & other.0 != 0
	}

	#[must_use]
	pub const fn with(self, other: Self) -> Self {
		Self(self.0 | other.0)
	}

	#[must_use]
	pub const fn without(self, other: Self) -> Self {
		Self::from_bits(self.0 & !other.0)
	}

	/// The default applied when a call does not provide its own set.
	pub fn process_default() -> Self {
		Self::from_bits(PROCESS_DEFAULT.load(Ordering::Relaxed))
	}

	/// Replace the process wide default. Calls already in progress keep the
	/// set they captured when they started.
	pub fn set_process_default(extensions: Self) {
		PROCESS_DEFAULT.store(extensions.0, Ordering::Relaxed);
	}

	/// Parse a list of extension names, e.g. `["json_pointer", "equal"]`.
	pub fn from_names<I, S>(names: I) -> Result<Self, TagtreeError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		names
			.into_iter()
			.try_fold(Self::from_bits(0), |acc, name| {
				Ok(acc | name.as_ref().parse::<Self>()?)
			})
	}

	/// Names of the extensions contained in this set.
	pub fn names(self) -> Vec<&'static str> {
		Self::NAMES
			.iter()
			.filter(|(_, flag)| self.contains(*flag))
			.map(|(name, _)| *name)
			.collect()
	}
}

static PROCESS_DEFAULT: AtomicU32 = AtomicU32::new(Extensions::ALL.0);

impl BitOr for Extensions {
	type Output = Self;

	fn bitor(self, rhs: Self) -> Self {
		self.with(rhs)
	}
}

impl BitOrAssign for Extensions {
	fn bitor_assign(&mut self, rhs: Self) {
		*self = self.with(rhs);
	}
}

impl FromStr for Extensions {
	type Err = TagtreeError;

	fn from_str(name: &str) -> Result<Self, Self::Err> {
		let normalized = name.trim().replace('-', "_").to_ascii_lowercase();
		match normalized.as_str() {
			"all" => return Ok(Self::ALL),
			"none" => return Ok(Self::from_bits(0)),
			_ => {}
		}

		Self::NAMES
			.iter()
			.find(|(candidate, _)| *candidate == normalized)
			.map(|(_, flag)| *flag)
			.ok_or_else(|| TagtreeError::UnknownExtension(name.to_string()))
	}
}

impl Display for Extensions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.names().join(","))
	}
}

impl<'de> Deserialize<'de> for Extensions {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		#[derive(Deserialize)]
		#[serde(untagged)]
		enum Raw {
			Bits(u32),
			Names(Vec<String>),
		}

		match Raw::deserialize(deserializer)? {
			Raw::Bits(bits) => Ok(Self::from_bits(bits)),
			Raw::Names(names) => Self::from_names(names).map_err(serde::de::Error::custom),
		}
	}
}

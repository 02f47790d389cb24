use std::cmp::Ordering;
use std::fmt::Display;

use crate::DataSource;
use crate::Extensions;
use crate::TagtreeError;
use crate::TagtreeResult;

/// Maximum length in bytes of a tag name.
pub const MAX_TAG_LENGTH: usize = 4096;

/// How the segments of a tag name are separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
	/// `a.b.c`, with `\.` and `\\` escapes.
	DottedPath,
	/// `/a/b/c`, with `~1` and `~0` escapes.
	JsonPointer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
	Eq,
	Lt,
	Le,
	Gt,
	Ge,
}

impl Comparator {
	/// Detect a comparator at the start of `chars`, returning it with the
	/// number of characters it spans.
	fn detect(chars: &[char], extensions: Extensions) -> Option<(Self, usize)> {
		let or_equal = chars.get(1) == Some(&'=');
		match chars.first()? {
			'=' if extensions.contains(Extensions::EQUAL) => Some((Self::Eq, 1)),
			'<' if extensions.contains(Extensions::COMPARE) => {
				Some(if or_equal { (Self::Le, 2) } else { (Self::Lt, 1) })
			}
			'>' if extensions.contains(Extensions::COMPARE) => {
				Some(if or_equal { (Self::Ge, 2) } else { (Self::Gt, 1) })
			}
			_ => None,
		}
	}

	/// Whether `ordering` (selected value compared to the comparand)
	/// satisfies this comparator.
	pub fn accepts(self, ordering: Ordering) -> bool {
		match self {
			Self::Eq => ordering.is_eq(),
			Self::Lt => ordering.is_lt(),
			Self::Le => ordering.is_le(),
			Self::Gt => ordering.is_gt(),
			Self::Ge => ordering.is_ge(),
		}
	}
}

impl Display for Comparator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let symbol = match self {
			Self::Eq => "=",
			Self::Lt => "<",
			Self::Le => "<=",
			Self::Gt => ">",
			Self::Ge => ">=",
		};
		write!(f, "{symbol}")
	}
}

/// The value a selection is compared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparand {
	/// The text after the comparator, without the negation marker.
	pub value: String,
	/// A leading `!` inverts the result of the comparison.
	pub negated: bool,
}

/// Outcome of resolving a tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
	NotFound,
	Found,
	/// Found through a terminal `*`: the properties of the selected object are
	/// to be enumerated.
	FoundViaObjectIteration,
}

impl Selection {
	pub fn is_found(self) -> bool {
		!matches!(self, Self::NotFound)
	}

	pub fn is_object_iteration(self) -> bool {
		matches!(self, Self::FoundViaObjectIteration)
	}
}

/// A tag name broken down into lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
	pub mode: AddressMode,
	/// Unescaped keys, in lookup order.
	pub segments: Vec<String>,
	pub comparator: Option<Comparator>,
	pub comparand: Option<Comparand>,
	/// The terminal segment is `*` and may enumerate properties.
	pub wildcard: bool,
	/// The name selects the current scope (`.`, or a bare comparison such as
	/// `=5`).
	pub current_scope: bool,
}

impl PathSpec {
	/// Break a raw tag name down according to the enabled `extensions`.
	pub fn parse(name: &str, extensions: Extensions) -> TagtreeResult<Self> {
		let name = name.trim();
		if name.is_empty() {
			return Err(TagtreeError::EmptyTag);
		}
		if name.len() > MAX_TAG_LENGTH {
			return Err(TagtreeError::TagTooLong);
		}

		// Without a leading slash, pointer addressing is off for this name only.
		let (mode, body) = match name.strip_prefix('/') {
			Some(rest) if extensions.contains(Extensions::JSON_POINTER) => {
				(AddressMode::JsonPointer, rest)
			}
			_ => (AddressMode::DottedPath, name),
		};

		let (path, comparison) =
			if extensions.intersects(Extensions::EQUAL.with(Extensions::COMPARE)) {
				split_comparison(body, mode, extensions)
			} else {
				(body.to_string(), None)
			};

		let (comparator, comparand) = match comparison {
			Some((comparator, text)) => {
				let (value, negated) = match text.strip_prefix('!') {
					Some(value) => (value.to_string(), true),
					None => (text, false),
				};
				(Some(comparator), Some(Comparand { value, negated }))
			}
			None => (None, None),
		};

		let current_scope = path == "." || (path.is_empty() && comparand.is_some());
		let segments = if current_scope {
			Vec::new()
		} else {
			split_segments(&path, mode)
		};

		let wildcard = comparand.is_none()
			&& extensions.contains(Extensions::OBJECT_ITER)
			&& segments.last().is_some_and(|key| key == "*");

		Ok(Self {
			mode,
			segments,
			comparator,
			comparand,
			wildcard,
			current_scope,
		})
	}

	/// Walk `source` along this path.
	///
	/// When the outcome is not [`Selection::NotFound`] the cursor of `source`
	/// is left on the resolved value.
	pub fn resolve<D: DataSource + ?Sized>(&self, source: &mut D) -> Selection {
		let mut selection = if self.current_scope {
			if source.select(None) {
				Selection::Found
			} else {
				Selection::NotFound
			}
		} else {
			self.select_segments(source)
		};

		if selection == Selection::Found {
			if let (Some(comparator), Some(comparand)) = (self.comparator, &self.comparand) {
				let passes = source
					.compare(&comparand.value)
					.is_some_and(|ordering| comparator.accepts(ordering) != comparand.negated);
				if !passes {
					selection = Selection::NotFound;
				}
			}
		}

		selection
	}

	fn select_segments<D: DataSource + ?Sized>(&self, source: &mut D) -> Selection {
		let Some((first, rest)) = self.segments.split_first() else {
			return Selection::NotFound;
		};

		if !source.select(Some(first.as_str())) {
			return if self.wildcard && rest.is_empty() && source.select(None) {
				Selection::FoundViaObjectIteration
			} else {
				Selection::NotFound
			};
		}

		for (index, key) in rest.iter().enumerate() {
			if source.subselect(key) {
				continue;
			}

			return if self.wildcard && index + 1 == rest.len() {
				Selection::FoundViaObjectIteration
			} else {
				Selection::NotFound
			};
		}

		Selection::Found
	}
}

/// Parse `name` and resolve it against `source`.
pub fn resolve<D: DataSource + ?Sized>(
	source: &mut D,
	name: &str,
	extensions: Extensions,
) -> TagtreeResult<Selection> {
	let spec = PathSpec::parse(name, extensions)?;
	let selection = spec.resolve(source);
	tracing::trace!(name, ?selection, "resolved tag");

	Ok(selection)
}

/// Split the comparison off `body`. Comparator characters preceded by the
/// escape character of `mode` are literal and the escape is dropped.
fn split_comparison(
	body: &str,
	mode: AddressMode,
	extensions: Extensions,
) -> (String, Option<(Comparator, String)>) {
	let chars: Vec<char> = body.chars().collect();
	let escape = match mode {
		AddressMode::JsonPointer => '~',
		AddressMode::DottedPath => '\\',
	};

	let mut path = String::with_capacity(body.len());
	let mut escaped = extensions.contains(Extensions::ESC_FIRST_CMP)
		&& Comparator::detect(&chars, extensions).is_some();
	let mut index = 0;

	while index < chars.len() {
		let ch = chars[index];
		if escaped {
			escaped = false;
		} else if let Some((comparator, length)) = Comparator::detect(&chars[index..], extensions) {
			let mut comparand: String = chars[index + length..].iter().collect();
			// `a!=5` negates like `a=!5`.
			if path.ends_with('!') {
				path.pop();
				comparand.insert(0, '!');
			}
			return (path, Some((comparator, comparand)));
		} else if ch == escape && Comparator::detect(&chars[index + 1..], extensions).is_some() {
			escaped = true;
			index += 1;
			continue;
		}

		path.push(ch);
		index += 1;
	}

	(path, None)
}

fn split_segments(path: &str, mode: AddressMode) -> Vec<String> {
	let chars: Vec<char> = path.chars().collect();
	let separator = match mode {
		AddressMode::JsonPointer => '/',
		AddressMode::DottedPath => '.',
	};

	let mut segments = Vec::new();
	let mut index = 0;

	while index < chars.len() {
		let mut key = String::new();
		while index < chars.len() && chars[index] != separator {
			let mut ch = chars[index];
			match (mode, ch, chars.get(index + 1)) {
				(AddressMode::DottedPath, '\\', Some(&(next @ ('.' | '\\')))) => {
					ch = next;
					index += 1;
				}
				(AddressMode::JsonPointer, '~', Some(&'1')) => {
					ch = '/';
					index += 1;
				}
				(AddressMode::JsonPointer, '~', Some(&'0')) => {
					index += 1;
				}
				_ => {}
			}
			key.push(ch);
			index += 1;
		}
		segments.push(key);

		while index < chars.len() && chars[index] == separator {
			index += 1;
		}
	}

	segments
}

use miette::Diagnostic;
use thiserror::Error;

/// Status code of a successful call.
pub const OK: i32 = 0;
/// Resource failure (allocation or I/O).
pub const ERROR_SYSTEM: i32 = -1;
pub const ERROR_UNEXPECTED_END: i32 = -2;
pub const ERROR_EMPTY_TAG: i32 = -3;
pub const ERROR_TAG_TOO_LONG: i32 = -4;
pub const ERROR_BAD_SEPARATORS: i32 = -5;
pub const ERROR_TOO_DEEP: i32 = -6;
pub const ERROR_CLOSING: i32 = -7;
pub const ERROR_BAD_UNESCAPE_TAG: i32 = -8;
pub const ERROR_INVALID_ITF: i32 = -9;
pub const ERROR_ITEM_NOT_FOUND: i32 = -10;
pub const ERROR_PARTIAL_NOT_FOUND: i32 = -11;
pub const ERROR_UNDEFINED_TAG: i32 = -12;

/// Base of the user error channel.
pub const ERROR_USER_BASE: i32 = -100;

/// Map a host specific code into the user error channel, or back.
///
/// The transform is involutive over all of `i32`, wrapping at the extremes:
/// `user_error_code(user_error_code(x)) == x`. Only non-negative host codes
/// map to error statuses.
pub const fn user_error_code(code: i32) -> i32 {
	ERROR_USER_BASE.wrapping_sub(code)
}

/// Returns true when `code` was produced by [`user_error_code`] from a
/// non-negative host code.
pub const fn is_user_error_code(code: i32) -> bool {
	code <= ERROR_USER_BASE
}

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TagtreeError {
	#[error(transparent)]
	#[diagnostic(code(tagtree::io_error))]
	Io(#[from] std::io::Error),

	#[error("system failure: {0}")]
	#[diagnostic(code(tagtree::system))]
	System(String),

	#[error("unexpected end of template")]
	#[diagnostic(code(tagtree::unexpected_end))]
	UnexpectedEnd,

	#[error("empty tag")]
	#[diagnostic(
		code(tagtree::empty_tag),
		help("enable the `empty_tag` extension to tolerate empty tags")
	)]
	EmptyTag,

	#[error("tag too long")]
	#[diagnostic(code(tagtree::tag_too_long))]
	TagTooLong,

	#[error("bad separators")]
	#[diagnostic(code(tagtree::bad_separators))]
	BadSeparators,

	#[error("sections nested deeper than {0} levels")]
	#[diagnostic(
		code(tagtree::too_deep),
		help("raise `max_depth` in tagtree.toml or flatten the template")
	)]
	TooDeep(usize),

	#[error("closing tag does not match an open section: `{0}`")]
	#[diagnostic(code(tagtree::closing))]
	Closing(String),

	#[error("bad unescape tag")]
	#[diagnostic(code(tagtree::bad_unescape_tag))]
	BadUnescapeTag,

	#[error("invalid interface: {0}")]
	#[diagnostic(code(tagtree::invalid_interface))]
	InvalidInterface(String),

	#[error("item not found: `{0}`")]
	#[diagnostic(code(tagtree::item_not_found))]
	ItemNotFound(String),

	#[error("partial not found: `{0}`")]
	#[diagnostic(
		code(tagtree::partial_not_found),
		help("partials are looked up as `<name>` and then `<name>.mustache`")
	)]
	PartialNotFound(String),

	#[error("undefined tag: `{0}`")]
	#[diagnostic(
		code(tagtree::undefined_tag),
		help("disable strict mode to render undefined tags as empty")
	)]
	UndefinedTag(String),

	#[error("user error {0}")]
	#[diagnostic(code(tagtree::user))]
	User(i32),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(tagtree::config_parse),
		help("check that tagtree.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("unknown extension: `{0}`")]
	#[diagnostic(
		code(tagtree::unknown_extension),
		help(
			"available extensions: colon, empty_tag, single_dot, equal, compare, json_pointer, \
			 object_iter, inc_partial, esc_first_cmp, partial_data_first, error_undefined"
		)
	)]
	UnknownExtension(String),
}

impl TagtreeError {
	/// The stable numeric code of this error.
	///
	/// Errors without a dedicated code (`Io`, `ConfigParse`,
	/// `UnknownExtension`) report [`ERROR_SYSTEM`]. User errors report their
	/// encoded value.
	pub fn code(&self) -> i32 {
		match self {
			Self::Io(_) | Self::System(_) | Self::ConfigParse(_) | Self::UnknownExtension(_) => {
				ERROR_SYSTEM
			}
			Self::UnexpectedEnd => ERROR_UNEXPECTED_END,
			Self::EmptyTag => ERROR_EMPTY_TAG,
			Self::TagTooLong => ERROR_TAG_TOO_LONG,
			Self::BadSeparators => ERROR_BAD_SEPARATORS,
			Self::TooDeep(_) => ERROR_TOO_DEEP,
			Self::Closing(_) => ERROR_CLOSING,
			Self::BadUnescapeTag => ERROR_BAD_UNESCAPE_TAG,
			Self::InvalidInterface(_) => ERROR_INVALID_ITF,
			Self::ItemNotFound(_) => ERROR_ITEM_NOT_FOUND,
			Self::PartialNotFound(_) => ERROR_PARTIAL_NOT_FOUND,
			Self::UndefinedTag(_) => ERROR_UNDEFINED_TAG,
			Self::User(code) => user_error_code(*code),
		}
	}

	/// Rebuild an error from a numeric code. Returns `None` for [`OK`] and
	/// for positive values, which are not errors.
	pub fn from_code(code: i32) -> Option<Self> {
		let error = match code {
			ERROR_SYSTEM => Self::System(String::from("reported by code")),
			ERROR_UNEXPECTED_END => Self::UnexpectedEnd,
			ERROR_EMPTY_TAG => Self::EmptyTag,
			ERROR_TAG_TOO_LONG => Self::TagTooLong,
			ERROR_BAD_SEPARATORS => Self::BadSeparators,
			ERROR_TOO_DEEP => Self::TooDeep(crate::DEFAULT_MAX_DEPTH),
			ERROR_CLOSING => Self::Closing(String::new()),
			ERROR_BAD_UNESCAPE_TAG => Self::BadUnescapeTag,
			ERROR_INVALID_ITF => Self::InvalidInterface(String::from("reported by code")),
			ERROR_ITEM_NOT_FOUND => Self::ItemNotFound(String::new()),
			ERROR_PARTIAL_NOT_FOUND => Self::PartialNotFound(String::new()),
			ERROR_UNDEFINED_TAG => Self::UndefinedTag(String::new()),
			code if is_user_error_code(code) => Self::User(user_error_code(code)),
			code if code < 0 => Self::InvalidInterface(format!("unknown status code {code}")),
			_ => return None,
		};

		Some(error)
	}

	/// Returns true for lookup failures, which are soft unless strict mode
	/// was requested.
	pub fn is_lookup(&self) -> bool {
		matches!(
			self,
			Self::ItemNotFound(_) | Self::PartialNotFound(_) | Self::UndefinedTag(_)
		)
	}
}

pub type TagtreeResult<T> = Result<T, TagtreeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

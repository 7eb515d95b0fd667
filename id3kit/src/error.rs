//! Contains the errors that can arise within id3kit
//!
//! The primary error is [`Id3Error`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.
//!
//! Errors fall into three broad groups, which can be checked with [`Id3Error::is_format_error`],
//! [`Id3Error::is_validation_error`], and [`Id3Error::is_io_error`]:
//!
//! * Format errors, where the data on disk is malformed
//! * Validation errors, raised by setters before any I/O happens
//! * I/O errors, propagated unchanged from the underlying stream

use crate::id3::TagType;
use crate::id3::v2::Id3v2Version;
pub use crate::util::text::TextEncodingError;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, Id3Error>`
pub type Result<T> = std::result::Result<T, Id3Error>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Tag data related errors
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Expected the data to be a different size than provided
	///
	/// This occurs when the size of an item is written as one value, but that size is either too
	/// big or small to be valid within the bounds of that item.
	SizeMismatch,
	/// Arises when a tag is expected, but isn't found
	FakeTag,
	/// Errors that occur while decoding a tag
	TagDecoding(TagDecodingError),
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Errors that arise while encoding text
	TextEncode(TextEncodingError),
	/// Errors that arise while reading/writing ID3v2 tags
	Id3v2(Id3v2Error),

	// User input
	/// A setter was given a value the format can't represent
	Validation(ValidationError),

	// Conversions for external errors
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Unable to convert bytes to a str
	StrFromUtf8(std::str::Utf8Error),
	/// Represents all cases of [`std::io::Error`].
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

/// The types of errors that can occur while interacting with ID3v2 tags
#[derive(Debug)]
#[non_exhaustive]
pub enum Id3v2ErrorKind {
	// Header
	/// Arises when an invalid ID3v2 version is found
	BadId3v2Version(u8, u8),
	/// Arises when a tag claims to have a size of 0
	EmptyTag,
	/// Arises when a size field has its high bit set in a synchsafe integer
	BadSynchsafeInteger,
	/// Arises when an extended header has an invalid size (must be >= 6 bytes and less than the total tag size)
	BadExtendedHeaderSize,
	/// Arises when a v2.4 footer doesn't match the header
	BadFooter,

	// Frame
	/// Arises when a frame ID contains invalid characters (must be within `'A'..'Z'` or `'0'..'9'`)
	/// or if the ID is too short/long.
	BadFrameId(Vec<u8>),
	/// Arises when a frame doesn't have enough data
	BadFrameLength,
	/// Arises when a frame with no content is parsed with [ParsingMode::Strict](crate::config::ParsingMode::Strict)
	EmptyFrame(String),
	/// Arises when reading/writing a compressed or encrypted frame with no data length indicator
	MissingDataLengthIndicator,
	/// Arises when a text encoding other than Latin-1 or UTF-16 appear in an ID3v2.2 tag
	V2InvalidTextEncoding,
	/// Arises when a frame is compressed in an ID3v2.2 tag
	///
	/// At the time the ID3v2.2 specification was written, a compression scheme wasn't decided.
	V2Compression,
	/// Arises when an invalid picture format is parsed. Only applicable to [`Id3v2Version::V2`]
	BadPictureFormat(String),

	// Compression
	#[cfg(feature = "id3v2_compression_support")]
	/// Arises when a compressed frame is unable to be decompressed
	Decompression(std::io::Error),
	#[cfg(not(feature = "id3v2_compression_support"))]
	/// Arises when a compressed frame is encountered, but support is disabled
	CompressedFrameEncountered,

	// Writing
	/// Arises when attempting to write an encrypted frame with an invalid encryption method symbol (must be >= 0x80)
	InvalidEncryptionMethodSymbol(u8),
	/// Arises when attempting to write an invalid frame (bad ID/content pairing)
	BadFrame(String, &'static str),
}

impl Display for Id3v2ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			// Header
			Self::BadId3v2Version(major, minor) => write!(
				f,
				"Found an invalid version (v{major}.{minor}), expected any major revision in: (2, \
				 3, 4)"
			),
			Self::EmptyTag => write!(f, "Tag claims to have a size of 0"),
			Self::BadSynchsafeInteger => {
				write!(f, "Found a synchsafe integer with its high bit set")
			},
			Self::BadExtendedHeaderSize => {
				write!(f, "Found an extended header with an invalid size")
			},
			Self::BadFooter => write!(f, "Found a footer that doesn't match the header"),

			// Frame
			Self::BadFrameId(frame_id) => write!(f, "Failed to parse a frame ID: 0x{frame_id:x?}"),
			Self::BadFrameLength => write!(
				f,
				"Frame isn't long enough to extract the necessary information"
			),
			Self::EmptyFrame(id) => write!(f, "Frame `{id}` is empty"),
			Self::MissingDataLengthIndicator => write!(
				f,
				"Encountered an encrypted frame without a data length indicator"
			),
			Self::V2InvalidTextEncoding => {
				write!(f, "ID3v2.2 only supports Latin-1 and UTF-16 encodings")
			},
			Self::V2Compression => write!(f, "Encountered a compressed ID3v2.2 tag"),
			Self::BadPictureFormat(format) => {
				write!(f, "Picture: Found unexpected format \"{format}\"")
			},

			// Compression
			#[cfg(feature = "id3v2_compression_support")]
			Self::Decompression(err) => write!(f, "Failed to decompress frame: {err}"),
			#[cfg(not(feature = "id3v2_compression_support"))]
			Self::CompressedFrameEncountered => write!(
				f,
				"Encountered a compressed ID3v2 frame, support is disabled"
			),

			// Writing
			Self::InvalidEncryptionMethodSymbol(symbol) => write!(
				f,
				"Attempted to write an encrypted frame with an invalid method symbol ({symbol})"
			),
			Self::BadFrame(frame_id, frame_value) => write!(
				f,
				"Attempted to write an invalid frame. ID: \"{frame_id}\", Value: \"{frame_value}\"",
			),
		}
	}
}

/// An error that arises while interacting with an ID3v2 tag
pub struct Id3v2Error {
	kind: Id3v2ErrorKind,
}

impl Id3v2Error {
	/// Create a new `Id3v2Error` from an [`Id3v2ErrorKind`]
	#[must_use]
	pub const fn new(kind: Id3v2ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`Id3v2ErrorKind`]
	pub fn kind(&self) -> &Id3v2ErrorKind {
		&self.kind
	}
}

impl Debug for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {:?}", self.kind)
	}
}

impl Display for Id3v2Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "ID3v2: {}", self.kind)
	}
}

/// The types of validation errors raised by setters
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationErrorKind {
	/// A fixed-width field was given a value that doesn't fit
	FieldTooLong {
		/// The field name
		field: &'static str,
		/// The maximum number of bytes the field can hold
		max: usize,
		/// The number of bytes provided
		len: usize,
	},
	/// A field was given characters its encoding can't represent
	UnrepresentableText(&'static str),
	/// A year that isn't exactly 4 digits
	InvalidYear(String),
	/// A track number outside of `1..=99`
	InvalidTrack(u8),
	/// A track number was used with an ID3v1.0 tag
	TrackUnsupported,
	/// A genre name not present in [`GENRES`](crate::id3::v1::GENRES)
	UnknownGenre(String),
	/// A picture type byte outside of the known enumeration
	UnknownPictureType(u8),
	/// A language code that isn't 3 ASCII letters
	InvalidLanguage([u8; 3]),
	/// A flag that doesn't exist in the tag's version
	IllegalFlag {
		/// The flag name
		flag: &'static str,
		/// The version of the tag
		version: Id3v2Version,
	},
}

impl Display for ValidationErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::FieldTooLong { field, max, len } => write!(
				f,
				"Field `{field}` can hold at most {max} bytes, got {len}"
			),
			Self::UnrepresentableText(field) => write!(
				f,
				"Field `{field}` contains characters that can't be encoded"
			),
			Self::InvalidYear(year) => {
				write!(f, "Expected a year of exactly 4 digits, got \"{year}\"")
			},
			Self::InvalidTrack(track) => {
				write!(f, "Expected a track number in 1..=99, got {track}")
			},
			Self::TrackUnsupported => write!(f, "ID3v1.0 tags can't hold a track number"),
			Self::UnknownGenre(genre) => write!(f, "Unknown genre \"{genre}\""),
			Self::UnknownPictureType(ty) => write!(f, "Unknown picture type {ty}"),
			Self::InvalidLanguage(lang) => write!(
				f,
				"Invalid frame language found: {lang:?} (expected 3 ascii characters)"
			),
			Self::IllegalFlag { flag, version } => {
				write!(f, "Flag `{flag}` is not available in {version:?} tags")
			},
		}
	}
}

/// An error that arises when a setter is given an invalid value
pub struct ValidationError {
	kind: ValidationErrorKind,
}

impl ValidationError {
	/// Create a new `ValidationError` from a [`ValidationErrorKind`]
	#[must_use]
	pub const fn new(kind: ValidationErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ValidationErrorKind`]
	pub fn kind(&self) -> &ValidationErrorKind {
		&self.kind
	}
}

impl Debug for ValidationError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Validation: {:?}", self.kind)
	}
}

impl Display for ValidationError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "Validation: {}", self.kind)
	}
}

/// An error that arises while decoding a tag
pub struct TagDecodingError {
	tag_type: TagType,
	description: &'static str,
}

impl TagDecodingError {
	/// Create a `TagDecodingError` from a [`TagType`] and description
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::error::TagDecodingError;
	/// use id3kit::id3::TagType;
	///
	/// let err = TagDecodingError::new(TagType::Id3v1, "Bad year");
	/// assert_eq!(err.tag_type(), TagType::Id3v1);
	/// ```
	#[must_use]
	pub const fn new(tag_type: TagType, description: &'static str) -> Self {
		Self {
			tag_type,
			description,
		}
	}

	/// Returns the associated [`TagType`]
	pub fn tag_type(&self) -> TagType {
		self.tag_type
	}

	/// Returns the error description
	pub fn description(&self) -> &str {
		self.description
	}
}

impl Debug for TagDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}: {:?}", self.tag_type, self.description)
	}
}

impl Display for TagDecodingError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}: {}", self.tag_type, self.description)
	}
}

/// Errors that could occur within id3kit
pub struct Id3Error {
	pub(crate) kind: ErrorKind,
}

impl Id3Error {
	/// Create an `Id3Error` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::error::{ErrorKind, Id3Error};
	///
	/// let fake_tag = Id3Error::new(ErrorKind::FakeTag);
	/// assert!(fake_tag.is_format_error());
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}

	/// Whether this error was caused by malformed tag data
	pub fn is_format_error(&self) -> bool {
		match &self.kind {
			ErrorKind::Id3v2(err) => !matches!(
				err.kind(),
				Id3v2ErrorKind::InvalidEncryptionMethodSymbol(_) | Id3v2ErrorKind::BadFrame(..)
			),
			ErrorKind::TooMuchData
			| ErrorKind::SizeMismatch
			| ErrorKind::FakeTag
			| ErrorKind::TagDecoding(_)
			| ErrorKind::TextDecode(_)
			| ErrorKind::StringFromUtf8(_)
			| ErrorKind::StrFromUtf8(_) => true,
			_ => false,
		}
	}

	/// Whether this error was raised by a setter rejecting its input
	pub fn is_validation_error(&self) -> bool {
		matches!(self.kind, ErrorKind::Validation(_))
	}

	/// Whether this error came from the underlying stream
	pub fn is_io_error(&self) -> bool {
		matches!(self.kind, ErrorKind::Io(_))
	}
}

impl std::error::Error for Id3Error {}

impl Debug for Id3Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<Id3v2Error> for Id3Error {
	fn from(input: Id3v2Error) -> Self {
		Self {
			kind: ErrorKind::Id3v2(input),
		}
	}
}

impl From<ValidationError> for Id3Error {
	fn from(input: ValidationError) -> Self {
		Self {
			kind: ErrorKind::Validation(input),
		}
	}
}

impl From<TagDecodingError> for Id3Error {
	fn from(input: TagDecodingError) -> Self {
		Self {
			kind: ErrorKind::TagDecoding(input),
		}
	}
}

impl From<TextEncodingError> for Id3Error {
	fn from(input: TextEncodingError) -> Self {
		Self {
			kind: ErrorKind::TextEncode(input),
		}
	}
}

impl From<std::io::Error> for Id3Error {
	fn from(input: std::io::Error) -> Self {
		Self {
			kind: ErrorKind::Io(input),
		}
	}
}

impl From<std::string::FromUtf8Error> for Id3Error {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self {
			kind: ErrorKind::StringFromUtf8(input),
		}
	}
}

impl From<std::str::Utf8Error> for Id3Error {
	fn from(input: std::str::Utf8Error) -> Self {
		Self {
			kind: ErrorKind::StrFromUtf8(input),
		}
	}
}

impl From<TryReserveError> for Id3Error {
	fn from(input: TryReserveError) -> Self {
		Self {
			kind: ErrorKind::Alloc(input),
		}
	}
}

impl From<std::convert::Infallible> for Id3Error {
	fn from(input: std::convert::Infallible) -> Self {
		Self {
			kind: ErrorKind::Infallible(input),
		}
	}
}

impl Display for Id3Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::StrFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::FakeTag => write!(f, "Reading: Expected a tag, found invalid data"),
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),
			ErrorKind::TextEncode(message) => write!(f, "Text encoding: {message}"),
			ErrorKind::Id3v2(ref id3v2_err) => write!(f, "{id3v2_err}"),
			ErrorKind::Validation(ref validation_err) => write!(f, "{validation_err}"),

			// Tags
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::SizeMismatch => write!(
				f,
				"Encountered an invalid item size, either too big or too small to be valid"
			),
			ErrorKind::TagDecoding(ref tag_decode_err) => write!(f, "{tag_decode_err}"),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}

use crate::config::{ParsingMode, WriteOptions};
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::macros::validation_err;
use crate::util::text::{TextEncoding, decode_text_list};

use byteorder::ReadBytesExt;

use std::borrow::Cow;
use std::io::Read;

/// The language used when a frame doesn't specify a valid one
pub const UNKNOWN_LANGUAGE: [u8; 3] = *b"UND";

/// An `ID3v2` frame with a language, description, and text
///
/// This is used for both comments (`COMM`) and unsynchronized lyrics (`USLT`).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CommentFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description and text
	pub encoding: TextEncoding,
	pub(crate) language: [u8; 3],
	/// Describes the content of the frame
	pub description: String,
	/// The text values
	pub content: Vec<String>,
}

impl CommentFrame {
	/// Create a new comment (`COMM`) frame
	///
	/// # Errors
	///
	/// * `language` is not 3 ASCII letters
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::TextEncoding;
	/// use id3kit::id3::v2::CommentFrame;
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let comment = CommentFrame::new(TextEncoding::UTF8, *b"eng", "", "Great song")?;
	///
	/// assert_eq!(comment.id().as_str(), "COMM");
	/// // Languages are stored uppercase
	/// assert_eq!(&comment.language(), b"ENG");
	/// assert_eq!(comment.text(), Some("Great song"));
	/// # Ok(()) }
	/// ```
	pub fn new(
		encoding: TextEncoding,
		language: [u8; 3],
		description: impl Into<String>,
		text: impl Into<String>,
	) -> Result<Self> {
		Self::with_id("COMM", encoding, language, description.into(), text.into())
	}

	/// Create a new unsynchronized lyrics (`USLT`) frame
	///
	/// # Errors
	///
	/// * `language` is not 3 ASCII letters
	pub fn new_lyrics(
		encoding: TextEncoding,
		language: [u8; 3],
		description: impl Into<String>,
		lyrics: impl Into<String>,
	) -> Result<Self> {
		Self::with_id("USLT", encoding, language, description.into(), lyrics.into())
	}

	fn with_id(
		id: &'static str,
		encoding: TextEncoding,
		language: [u8; 3],
		description: String,
		text: String,
	) -> Result<Self> {
		let mut frame = Self {
			header: FrameHeader::new(FrameId::Valid(Cow::Borrowed(id)), FrameFlags::default()),
			encoding,
			language: UNKNOWN_LANGUAGE,
			description,
			content: vec![text],
		};

		frame.set_language(language)?;
		Ok(frame)
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Get the flags for the frame
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Set the flags for the frame
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// The ISO-639-2 language code, uppercase
	pub fn language(&self) -> [u8; 3] {
		self.language
	}

	/// Set the language
	///
	/// The language is stored uppercase, and `XXX` becomes [`UNKNOWN_LANGUAGE`].
	///
	/// # Errors
	///
	/// * `language` is not 3 ASCII letters
	pub fn set_language(&mut self, language: [u8; 3]) -> Result<()> {
		if !language.iter().all(u8::is_ascii_alphabetic) {
			return Err(validation_err!(InvalidLanguage(language)));
		}

		self.language = normalize_language(language);
		Ok(())
	}

	/// The first text value
	pub fn text(&self) -> Option<&str> {
		self.content.first().map(String::as_str)
	}

	/// Read a [`CommentFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Not enough data
	/// * Unable to decode the text
	pub fn parse<R>(
		reader: &mut R,
		header: FrameHeader,
		version: Id3v2Version,
		parse_mode: ParsingMode,
	) -> Result<Self>
	where
		R: Read,
	{
		let encoding = verify_encoding(reader.read_u8()?, version, parse_mode)?;

		let mut language = [0; 3];
		reader.read_exact(&mut language)?;

		let mut values = decode_text_list(reader, encoding, [0, 0])?;
		let description = if values.is_empty() {
			String::new()
		} else {
			values.remove(0)
		};

		Ok(CommentFrame {
			header,
			encoding,
			language: normalize_language(language),
			description,
			content: values,
		})
	}

	/// Convert a [`CommentFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for_version(self.encoding, version);
		let lossy = write_options.lossy_text_encoding;

		let mut bytes = vec![encoding as u8];
		bytes.extend(self.language);
		bytes.extend(encoding.encode(&self.description, true, lossy)?);

		let last = self.content.len().saturating_sub(1);
		for (i, value) in self.content.iter().enumerate() {
			bytes.extend(encoding.encode(value, i != last, lossy)?);
		}

		Ok(bytes)
	}
}

fn normalize_language(language: [u8; 3]) -> [u8; 3] {
	let upper = language.map(|b| b.to_ascii_uppercase());
	if upper == *b"XXX" || !upper.iter().all(u8::is_ascii_alphabetic) {
		return UNKNOWN_LANGUAGE;
	}

	upper
}

#[cfg(test)]
mod tests {
	use super::{CommentFrame, UNKNOWN_LANGUAGE};
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
	use crate::util::text::TextEncoding;

	fn header() -> FrameHeader {
		FrameHeader::new(FrameId::new("COMM").unwrap(), FrameFlags::default())
	}

	#[test_log::test]
	fn description_and_text() {
		let frame = CommentFrame::parse(
			&mut &b"\x00engDesc\x00Some text"[..],
			header(),
			Id3v2Version::V3,
			ParsingMode::Strict,
		)
		.unwrap();

		assert_eq!(&frame.language(), b"ENG");
		assert_eq!(frame.description, "Desc");
		assert_eq!(frame.text(), Some("Some text"));
	}

	#[test_log::test]
	fn empty_description() {
		let frame = CommentFrame::parse(
			&mut &b"\x00eng\x00Some text"[..],
			header(),
			Id3v2Version::V4,
			ParsingMode::Strict,
		)
		.unwrap();

		assert_eq!(frame.description, "");
		assert_eq!(frame.content, vec![String::from("Some text")]);

		let written = frame
			.as_bytes(Id3v2Version::V4, WriteOptions::default())
			.unwrap();
		assert_eq!(written, b"\x00ENG\x00Some text");
	}

	#[test_log::test]
	fn unknown_languages() {
		for language in [b"xxx", b"\0\0\0", b"e1g"] {
			let mut data = vec![0];
			data.extend(language);
			data.extend(b"\0text");

			let frame = CommentFrame::parse(
				&mut &data[..],
				header(),
				Id3v2Version::V4,
				ParsingMode::Strict,
			)
			.unwrap();
			assert_eq!(frame.language(), UNKNOWN_LANGUAGE);
		}
	}

	#[test_log::test]
	fn set_language() {
		let mut frame = CommentFrame::new(TextEncoding::Latin1, *b"eng", "", "text").unwrap();

		assert!(frame.set_language(*b"e g").unwrap_err().is_validation_error());
		assert_eq!(&frame.language(), b"ENG");

		frame.set_language(*b"deu").unwrap();
		assert_eq!(&frame.language(), b"DEU");

		let lyrics = CommentFrame::new_lyrics(TextEncoding::UTF8, *b"jpn", "", "La la").unwrap();
		assert_eq!(lyrics.id().as_str(), "USLT");
	}
}

use crate::config::{ParsingMode, WriteOptions};
use crate::error::Result;
use crate::id3::v2::frame::content::{encoding_for_version, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::util::text::{TextEncoding, decode_text_list};

use byteorder::ReadBytesExt;

use std::io::Read;

/// An `ID3v2` text frame
///
/// A text frame can hold multiple values. In `ID3v2.4` they are separated by null terminators;
/// older taggers tend to write a single value.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TextInformationFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the text
	pub encoding: TextEncoding,
	/// The text values
	pub values: Vec<String>,
}

impl TextInformationFrame {
	/// Create a new [`TextInformationFrame`] with a single value
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::TextEncoding;
	/// use id3kit::id3::v2::{FrameId, TextInformationFrame};
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let frame = TextInformationFrame::new(FrameId::new("TIT2")?, TextEncoding::UTF8, "Title");
	/// assert_eq!(frame.value(), Some("Title"));
	/// # Ok(()) }
	/// ```
	pub fn new(id: FrameId, encoding: TextEncoding, value: impl Into<String>) -> Self {
		Self::with_values(id, encoding, vec![value.into()])
	}

	/// Create a new [`TextInformationFrame`] with multiple values
	pub fn with_values(id: FrameId, encoding: TextEncoding, values: Vec<String>) -> Self {
		let header = FrameHeader::new(id, FrameFlags::default());
		Self {
			header,
			encoding,
			values,
		}
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

	/// The first value of the frame
	pub fn value(&self) -> Option<&str> {
		self.values.first().map(String::as_str)
	}

	/// Read a [`TextInformationFrame`] from a slice
	///
	/// NOTE: This expects the frame header to have already been skipped
	///
	/// # Errors
	///
	/// * Unable to decode the text
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`] (with [`ParsingMode::Strict`])
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
		let values = decode_text_list(reader, encoding, [0, 0])?;

		Ok(TextInformationFrame {
			header,
			encoding,
			values,
		})
	}

	/// Convert a [`TextInformationFrame`] to a byte vec
	///
	/// # Errors
	///
	/// * [`WriteOptions::lossy_text_encoding()`] is disabled and the content cannot be encoded in the specified [`TextEncoding`].
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for_version(self.encoding, version);

		let mut content = vec![encoding as u8];
		let last = self.values.len().saturating_sub(1);
		for (i, value) in self.values.iter().enumerate() {
			content.extend(encoding.encode(
				value,
				i != last,
				write_options.lossy_text_encoding,
			)?);
		}

		Ok(content)
	}
}

#[cfg(test)]
mod tests {
	use super::TextInformationFrame;
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
	use crate::util::text::TextEncoding;

	fn header() -> FrameHeader {
		FrameHeader::new(FrameId::new("TIT2").unwrap(), FrameFlags::default())
	}

	#[test_log::test]
	fn terminated_latin1() {
		let frame = TextInformationFrame::parse(
			&mut &b"\x00Hello\x00"[..],
			header(),
			Id3v2Version::V4,
			ParsingMode::Strict,
		)
		.unwrap();

		assert_eq!(frame.encoding, TextEncoding::Latin1);
		assert_eq!(frame.values, vec![String::from("Hello")]);
	}

	#[test_log::test]
	fn multiple_utf16_values() {
		let data = [
			0x01, // UTF-16
			0xFF, 0xFE, b'A', 0x00, 0x00, 0x00, // "A", with a BOM
			0xFF, 0xFE, b'B', 0x00, // "B", with a BOM
		];

		let frame = TextInformationFrame::parse(
			&mut &data[..],
			header(),
			Id3v2Version::V4,
			ParsingMode::Strict,
		)
		.unwrap();

		assert_eq!(frame.values, vec![String::from("A"), String::from("B")]);
		assert_eq!(
			frame
				.as_bytes(Id3v2Version::V4, WriteOptions::default())
				.unwrap(),
			data
		);
	}

	#[test_log::test]
	fn utf8_downgraded_for_v3() {
		let frame =
			TextInformationFrame::new(FrameId::new("TIT2").unwrap(), TextEncoding::UTF8, "A");

		let bytes = frame
			.as_bytes(Id3v2Version::V3, WriteOptions::default())
			.unwrap();
		assert_eq!(bytes, [0x01, 0xFF, 0xFE, b'A', 0x00]);
	}

	#[test_log::test]
	fn unrepresentable_latin1() {
		let frame = TextInformationFrame::new(
			FrameId::new("TIT2").unwrap(),
			TextEncoding::Latin1,
			"日本",
		);

		assert!(
			frame
				.as_bytes(Id3v2Version::V4, WriteOptions::default())
				.is_err()
		);
		assert_eq!(
			frame
				.as_bytes(
					Id3v2Version::V4,
					WriteOptions::default().lossy_text_encoding(true)
				)
				.unwrap(),
			b"\x00??"
		);
	}
}

use crate::error::{ErrorKind, Id3Error, Result};
use crate::macros::err;

use std::io::Read;

use byteorder::ReadBytesExt;

/// Errors that can occur while encoding text
#[derive(Copy, Clone, Debug)]
pub struct TextEncodingError {
	encoding: TextEncoding,
	valid_up_to: usize,
}

impl TextEncodingError {
	/// The target text encoding
	pub fn encoding(&self) -> TextEncoding {
		self.encoding
	}

	/// The character index in the provided string up to which the encoding was valid
	pub fn valid_up_to(&self) -> usize {
		self.valid_up_to
	}
}

impl core::fmt::Display for TextEncodingError {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		write!(
			f,
			"invalid {} sequence from index {}",
			self.encoding.name(),
			self.valid_up_to
		)
	}
}

impl core::error::Error for TextEncodingError {}

/// The text encoding for use in ID3v2 frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
	/// UTF-16 little endian
	///
	/// NOTE: This is not part of any ID3v2 revision, but it is produced by some taggers.
	/// It is always written as [`TextEncoding::UTF16`] in ID3v2.2 and ID3v2.3 tags.
	UTF16LE = 4,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-4 inclusive
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::TextEncoding;
	///
	/// assert_eq!(TextEncoding::from_u8(3), Some(TextEncoding::UTF8));
	/// assert_eq!(TextEncoding::from_u8(5), None);
	/// ```
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			4 => Some(Self::UTF16LE),
			_ => None,
		}
	}

	/// The canonical charset name of the encoding
	pub fn name(self) -> &'static str {
		match self {
			TextEncoding::Latin1 => "ISO-8859-1",
			TextEncoding::UTF16 => "UTF-16",
			TextEncoding::UTF16BE => "UTF-16BE",
			TextEncoding::UTF8 => "UTF-8",
			TextEncoding::UTF16LE => "UTF-16LE",
		}
	}

	pub(crate) fn verify_latin1(text: &str) -> bool {
		text.chars().all(|c| c as u32 <= 255)
	}

	/// The width of a null terminator in this encoding
	pub(crate) fn terminator_len(self) -> usize {
		match self {
			TextEncoding::Latin1 | TextEncoding::UTF8 => 1,
			_ => 2,
		}
	}

	/// ID3v2.2 and ID3v2.3 only know Latin-1 and UTF-16 with a BOM.
	///
	/// When writing those versions, we just substitute with UTF-16.
	pub(crate) fn to_id3v23(self) -> Self {
		match self {
			Self::UTF8 | Self::UTF16BE | Self::UTF16LE => {
				log::warn!(
					"Text encoding {:?} is not supported in ID3v2.2/ID3v2.3, substituting with \
					 UTF-16",
					self
				);
				Self::UTF16
			},
			_ => self,
		}
	}

	pub(crate) fn encode(
		self,
		text: &str,
		terminated: bool,
		lossy: bool,
	) -> std::result::Result<Vec<u8>, TextEncodingError> {
		match self {
			TextEncoding::Latin1 => {
				let mut out =
					latin1_encode(text, lossy).collect::<std::result::Result<Vec<u8>, _>>()?;
				if terminated {
					out.push(0)
				}

				Ok(out)
			},
			// Always little endian with a BOM, which is what most software writes
			TextEncoding::UTF16 => Ok(utf16_encode(text, u16::to_le_bytes, true, terminated)),
			TextEncoding::UTF16BE => Ok(utf16_encode(text, u16::to_be_bytes, false, terminated)),
			TextEncoding::UTF16LE => Ok(utf16_encode(text, u16::to_le_bytes, false, terminated)),
			TextEncoding::UTF8 => {
				let mut out = text.as_bytes().to_vec();

				if terminated {
					out.push(0);
				}

				Ok(out)
			},
		}
	}
}

#[derive(Eq, PartialEq, Debug, Default)]
pub(crate) struct DecodeTextResult {
	pub(crate) content: String,
	pub(crate) bytes_read: usize,
	pub(crate) bom: [u8; 2],
}

/// Specify how to decode the provided text
///
/// By default, this will:
///
/// * Use [`TextEncoding::UTF8`] as the encoding
/// * Not expect the text to be null terminated
/// * Have no byte order mark
#[derive(Copy, Clone, Debug)]
pub(crate) struct TextDecodeOptions {
	pub encoding: TextEncoding,
	pub terminated: bool,
	/// The byte order mark to fall back to when a UTF-16 string doesn't have its own
	pub bom: [u8; 2],
}

impl TextDecodeOptions {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn encoding(mut self, encoding: TextEncoding) -> Self {
		self.encoding = encoding;
		self
	}

	pub(crate) fn terminated(mut self, terminated: bool) -> Self {
		self.terminated = terminated;
		self
	}

	pub(crate) fn bom(mut self, bom: [u8; 2]) -> Self {
		self.bom = bom;
		self
	}
}

impl Default for TextDecodeOptions {
	fn default() -> Self {
		Self {
			encoding: TextEncoding::UTF8,
			terminated: false,
			bom: [0, 0],
		}
	}
}

pub(crate) fn decode_text<R>(reader: &mut R, options: TextDecodeOptions) -> Result<DecodeTextResult>
where
	R: Read,
{
	let raw_bytes;
	let bytes_read;

	if options.terminated {
		let (bytes, terminator_len) = read_to_terminator(reader, options.encoding);

		if bytes.is_empty() {
			return Ok(DecodeTextResult {
				bytes_read: terminator_len,
				bom: options.bom,
				..DecodeTextResult::default()
			});
		}

		bytes_read = bytes.len() + terminator_len;
		raw_bytes = bytes;
	} else {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;

		if bytes.is_empty() {
			return Ok(DecodeTextResult {
				bom: options.bom,
				..DecodeTextResult::default()
			});
		}

		bytes_read = bytes.len();
		raw_bytes = bytes;
	}

	let mut bom = options.bom;
	let read_string = match options.encoding {
		TextEncoding::Latin1 => latin1_decode(&raw_bytes),
		TextEncoding::UTF16 => {
			if raw_bytes.len() % 2 != 0 {
				err!(TextDecode("UTF-16 string has an odd length"));
			}

			match raw_bytes[..2] {
				[0xFE, 0xFF] | [0xFF, 0xFE] => {
					bom = [raw_bytes[0], raw_bytes[1]];
					utf16_decode_bytes(&raw_bytes[2..], endianness_for_bom(bom))?
				},
				_ => {
					if bom == [0, 0] {
						log::debug!("UTF-16 string has no byte order mark, assuming big endian");
					}

					utf16_decode_bytes(&raw_bytes, endianness_for_bom(bom))?
				},
			}
		},
		TextEncoding::UTF16BE => utf16_decode_bytes(&raw_bytes, u16::from_be_bytes)?,
		TextEncoding::UTF16LE => utf16_decode_bytes(&raw_bytes, u16::from_le_bytes)?,
		TextEncoding::UTF8 => utf8_decode(raw_bytes)
			.map_err(|_| Id3Error::new(ErrorKind::TextDecode("Expected a UTF-8 string")))?,
	};

	Ok(DecodeTextResult {
		content: read_string,
		bytes_read,
		bom,
	})
}

fn endianness_for_bom(bom: [u8; 2]) -> fn([u8; 2]) -> u16 {
	match bom {
		[0xFF, 0xFE] => u16::from_le_bytes,
		_ => u16::from_be_bytes,
	}
}

/// Decode every null-separated string in `reader`
///
/// Each UTF-16 string may carry its own BOM. When one doesn't, the previous string's BOM is used.
/// A terminator at the very end doesn't produce a trailing empty string.
pub(crate) fn decode_text_list<R>(
	reader: &mut R,
	encoding: TextEncoding,
	bom: [u8; 2],
) -> Result<Vec<String>>
where
	R: Read,
{
	let mut values = Vec::new();
	let mut options = TextDecodeOptions::new()
		.encoding(encoding)
		.terminated(true)
		.bom(bom);

	loop {
		let decoded = decode_text(reader, options)?;
		if decoded.bytes_read == 0 {
			break;
		}

		options = options.bom(decoded.bom);
		values.push(decoded.content);
	}

	Ok(values)
}

pub(crate) fn read_to_terminator<R>(reader: &mut R, encoding: TextEncoding) -> (Vec<u8>, usize)
where
	R: Read,
{
	let mut text_bytes = Vec::new();
	let mut terminator_len = 0;

	match encoding.terminator_len() {
		1 => {
			while let Ok(byte) = reader.read_u8() {
				if byte == 0 {
					terminator_len = 1;
					break;
				}

				text_bytes.push(byte)
			}
		},
		_ => {
			while let Ok(b1) = reader.read_u8() {
				let Ok(b2) = reader.read_u8() else {
					// Keep the dangling byte, decoding will reject the odd length
					text_bytes.push(b1);
					break;
				};

				if b1 == 0 && b2 == 0 {
					terminator_len = 2;
					break;
				}

				text_bytes.push(b1);
				text_bytes.push(b2)
			}
		},
	}

	(text_bytes, terminator_len)
}

pub(crate) fn latin1_decode(bytes: &[u8]) -> String {
	let mut text = bytes.iter().map(|c| *c as char).collect::<String>();
	trim_end_nulls(&mut text);
	text
}

pub(crate) fn latin1_encode(
	s: &str,
	lossy: bool,
) -> impl Iterator<Item = std::result::Result<u8, TextEncodingError>> {
	s.chars().enumerate().map(move |(index, c)| {
		if (c as u32) <= 255 {
			Ok(c as u8)
		} else if lossy {
			Ok(b'?')
		} else {
			Err(TextEncodingError {
				encoding: TextEncoding::Latin1,
				valid_up_to: index,
			})
		}
	})
}

pub(crate) fn utf8_decode(bytes: Vec<u8>) -> Result<String> {
	String::from_utf8(bytes)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(Into::into)
}

pub(crate) fn utf16_decode_bytes(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	if bytes.is_empty() {
		return Ok(String::new());
	}

	if bytes.len() % 2 != 0 {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	let words: Vec<u16> = bytes
		.chunks_exact(2)
		.map(|c| endianness([c[0], c[1]]))
		.collect();

	String::from_utf16(&words)
		.map(|mut text| {
			trim_end_nulls(&mut text);
			text
		})
		.map_err(|_| Id3Error::new(ErrorKind::TextDecode("Given an invalid UTF-16 string")))
}

pub(crate) fn trim_end_nulls(text: &mut String) {
	if text.ends_with('\0') {
		let new_len = text.trim_end_matches('\0').len();
		text.truncate(new_len);
	}
}

fn utf16_encode(
	text: &str,
	endianness: fn(u16) -> [u8; 2],
	bom: bool,
	terminated: bool,
) -> Vec<u8> {
	let mut encoded = Vec::<u8>::new();

	if bom {
		encoded.extend_from_slice(&endianness(0xFEFF_u16));
	}

	for ch in text.encode_utf16() {
		encoded.extend_from_slice(&endianness(ch));
	}

	if terminated {
		encoded.extend_from_slice(&[0, 0]);
	}

	encoded
}

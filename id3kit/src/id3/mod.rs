//! ID3 specific items
//!
//! ID3 does things differently than most tag formats, making working with them a little more effort.
//! Check the other modules for important notes and/or warnings.

pub mod v1;
pub mod v2;

use crate::config::ParsingMode;
use crate::error::{Id3Error, Result};
use crate::macros::try_vec;
use crate::util::io::{FileLike, Length, Truncate};
use v1::constants::{ID3V1_TAG_MARKER, ID3V1_TAG_SIZE};
use v2::header::Id3v2Header;

use std::io::{Read, Seek, SeekFrom};

/// The type of an ID3 tag
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TagType {
	/// An ID3v1 tag, found at the end of a file
	Id3v1,
	/// An ID3v2 tag, found at the start of a file
	Id3v2,
}

impl TagType {
	/// Remove a tag of this type from a file
	///
	/// This is a no-op if the file doesn't contain a tag of this type.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * The existing ID3v2 header is malformed
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::TagType;
	/// use std::io::Cursor;
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let mut file = Cursor::new(b"not a tag".to_vec());
	/// TagType::Id3v1.remove_from(&mut file)?;
	///
	/// assert_eq!(file.get_ref().len(), 9);
	/// # Ok(()) }
	/// ```
	pub fn remove_from<F>(self, file: &mut F) -> Result<()>
	where
		F: FileLike,
		Id3Error: From<<F as Truncate>::Error>,
		Id3Error: From<<F as Length>::Error>,
	{
		match self {
			TagType::Id3v1 => v1::Id3v1Tag::remove_from(file),
			TagType::Id3v2 => v2::Id3v2Tag::remove_from(file),
		}
	}
}

pub(crate) struct ID3FindResults<Header, Content>(pub Option<Header>, pub Content);

/// Look for an ID3v1 tag in the final 128 bytes of `data`
///
/// On return, `data` is positioned at the start of the tag if one was found, otherwise at the
/// end of the stream.
pub(crate) fn find_id3v1<R>(
	data: &mut R,
	read: bool,
	parse_mode: ParsingMode,
) -> Result<ID3FindResults<(), Option<v1::Id3v1Tag>>>
where
	R: Read + Seek,
{
	log::debug!("Searching for an ID3v1 tag");

	let mut id3v1 = None;
	let mut header = None;

	// Reader is too small to contain an ID3v1 tag
	if data.seek(SeekFrom::End(-(ID3V1_TAG_SIZE as i64))).is_err() {
		data.seek(SeekFrom::End(0))?;
		return Ok(ID3FindResults(header, id3v1));
	}

	let mut id3v1_header = [0; 3];
	data.read_exact(&mut id3v1_header)?;

	data.seek(SeekFrom::Current(-3))?;

	// No ID3v1 tag found
	if id3v1_header != ID3V1_TAG_MARKER {
		data.seek(SeekFrom::End(0))?;
		return Ok(ID3FindResults(header, id3v1));
	}

	log::debug!("Found an ID3v1 tag, parsing");

	header = Some(());

	if read {
		let mut id3v1_tag = [0; ID3V1_TAG_SIZE];
		data.read_exact(&mut id3v1_tag)?;

		id3v1 = Some(v1::Id3v1Tag::parse(id3v1_tag, parse_mode)?)
	}

	Ok(ID3FindResults(header, id3v1))
}

/// Look for an ID3v2 tag at the current position of `data`
///
/// If a tag is found, `data` is positioned after it (including any footer), and if `read` is set,
/// the tag body (everything after the 10 byte header) is returned. If no tag is found, `data` is
/// positioned where it started.
pub(crate) fn find_id3v2<R>(
	data: &mut R,
	read: bool,
	parse_mode: ParsingMode,
) -> Result<ID3FindResults<Id3v2Header, Option<Vec<u8>>>>
where
	R: Read + Seek,
{
	let start = data.stream_position()?;
	log::debug!("Searching for an ID3v2 tag at offset: {start}");

	let mut marker = [0; 3];
	let found_marker = data.read_exact(&mut marker).is_ok() && &marker == b"ID3";
	data.seek(SeekFrom::Start(start))?;

	if !found_marker {
		return Ok(ID3FindResults(None, None));
	}

	let id3v2_header = Id3v2Header::parse(data, parse_mode)?;
	log::debug!(
		"Found an ID3v2.{} tag, size: {}",
		id3v2_header.version.major(),
		id3v2_header.size
	);

	let mut id3v2 = None;
	if read {
		let mut tag = try_vec![0; id3v2_header.size as usize];
		data.read_exact(&mut tag)?;

		id3v2 = Some(tag)
	} else {
		data.seek(SeekFrom::Current(i64::from(id3v2_header.size)))?;
	}

	if id3v2_header.flags.footer {
		v2::header::verify_footer(data, &id3v2_header, parse_mode)?;
	}

	Ok(ID3FindResults(Some(id3v2_header), id3v2))
}

#[cfg(test)]
mod tests {
	use super::{ID3FindResults, find_id3v1, find_id3v2};
	use crate::config::ParsingMode;

	use std::io::{Cursor, Seek};

	#[test_log::test]
	fn find_id3v1_positions() {
		let mut data = vec![0xAA; 64];
		let mut tag = [0; 128];
		tag[..3].copy_from_slice(b"TAG");
		data.extend_from_slice(&tag);

		let mut reader = Cursor::new(data);
		let ID3FindResults(header, parsed) =
			find_id3v1(&mut reader, true, ParsingMode::BestAttempt).unwrap();
		assert!(header.is_some());
		assert!(parsed.is_some());

		let ID3FindResults(header, _) =
			find_id3v1(&mut reader, false, ParsingMode::BestAttempt).unwrap();
		assert!(header.is_some());
		assert_eq!(reader.stream_position().unwrap(), 64);
	}

	#[test_log::test]
	fn find_id3v1_small_reader() {
		let mut reader = Cursor::new(vec![0; 10]);
		let ID3FindResults(header, _) =
			find_id3v1(&mut reader, true, ParsingMode::BestAttempt).unwrap();
		assert!(header.is_none());
		assert_eq!(reader.stream_position().unwrap(), 10);
	}

	#[test_log::test]
	fn find_id3v2_none() {
		let mut reader = Cursor::new(b"\xFF\xFB\x90\x00 audio".to_vec());
		let ID3FindResults(header, content) =
			find_id3v2(&mut reader, true, ParsingMode::BestAttempt).unwrap();
		assert!(header.is_none());
		assert!(content.is_none());
		assert_eq!(reader.stream_position().unwrap(), 0);
	}

	#[test_log::test]
	fn find_id3v2_skip() {
		let mut data = b"ID3\x04\x00\x00\x00\x00\x00\x05".to_vec();
		data.extend_from_slice(&[0; 5]);
		data.extend_from_slice(b"audio");

		let mut reader = Cursor::new(data);
		let ID3FindResults(header, content) =
			find_id3v2(&mut reader, false, ParsingMode::BestAttempt).unwrap();
		assert_eq!(header.unwrap().size, 5);
		assert!(content.is_none());
		assert_eq!(reader.stream_position().unwrap(), 15);
	}
}

use super::constants::{GENRES, ID3V1_TAG_MARKER};
use super::tag::{Id3v1Tag, Id3v1Version};
use crate::config::ParsingMode;
use crate::error::Result;
use crate::macros::{decode_err, err};
use crate::util::text::latin1_decode;

impl Id3v1Tag {
	/// Parse an `Id3v1Tag` from its 128 raw bytes
	///
	/// # Errors
	///
	/// * The data doesn't start with `TAG`
	/// * The year is malformed, and [`ParsingMode::Strict`] is used
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::config::ParsingMode;
	/// use id3kit::id3::v1::Id3v1Tag;
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let mut raw = [0; 128];
	/// raw[..3].copy_from_slice(b"TAG");
	/// raw[3..8].copy_from_slice(b"Title");
	/// raw[127] = 255;
	///
	/// let tag = Id3v1Tag::parse(raw, ParsingMode::BestAttempt)?;
	/// assert_eq!(tag.title(), Some("Title"));
	/// assert_eq!(tag.genre(), None);
	/// # Ok(()) }
	/// ```
	pub fn parse(reader: [u8; 128], parse_mode: ParsingMode) -> Result<Self> {
		if reader[..3] != ID3V1_TAG_MARKER {
			err!(FakeTag);
		}

		// A zero byte right before a non-zero final byte of the comment field marks ID3v1.1.
		// A track number of 0 is invalid, so it can't be told apart from ID3v1.0 padding.
		let version = if reader[125] == 0 && reader[126] != 0 {
			Id3v1Version::V1_1
		} else {
			Id3v1Version::V1_0
		};

		log::trace!("Parsing an ID3v1 tag, version: {version:?}");

		let reader = &reader[3..];

		let mut tag = Self::new(version);
		tag.title = decode_text(&reader[..30]);
		tag.artist = decode_text(&reader[30..60]);
		tag.album = decode_text(&reader[60..90]);
		tag.year = try_parse_year(&reader[90..94], parse_mode)?;

		match version {
			Id3v1Version::V1_1 => {
				tag.comment = decode_text(&reader[94..122]);
				tag.track_number = Some(reader[123]);
			},
			Id3v1Version::V1_0 => tag.comment = decode_text(&reader[94..124]),
		}

		let genre = reader[124];
		if usize::from(genre) < GENRES.len() {
			tag.genre = Some(genre);
		} else if genre != 255 {
			log::debug!("ID3v1 genre index {genre} is unknown, ignoring");
		}

		Ok(tag)
	}
}

fn decode_text(data: &[u8]) -> Option<String> {
	let mut first_null_pos = data.len();
	if let Some(null_pos) = data.iter().position(|&b| b == 0) {
		if data[null_pos..].iter().any(|b| *b != b'\0') {
			log::warn!("ID3v1 text field contains trailing junk, skipping");
		}

		first_null_pos = null_pos;
	}

	let text = latin1_decode(&data[..first_null_pos]);
	let trimmed = text.trim();
	if trimmed.is_empty() {
		return None;
	}

	Some(trimmed.to_owned())
}

fn try_parse_year(input: &[u8], parse_mode: ParsingMode) -> Result<Option<u16>> {
	// Most taggers write "\0\0\0\0" for an empty year, rather than "0000"
	if input.iter().all(|b| *b == 0) {
		return Ok(None);
	}

	let (num_digits, year) = input
		.iter()
		.take_while(|c| (**c).is_ascii_digit())
		.fold((0usize, 0u16), |(num_digits, year), c| {
			(num_digits + 1, year * 10 + u16::from(*c - b'0'))
		});

	if num_digits != 4 {
		if parse_mode == ParsingMode::Strict {
			decode_err!(@BAIL Id3v1, "Year field is not 4 ASCII digits");
		}

		log::warn!("ID3v1 year field is not 4 ASCII digits, discarding");
		return Ok(None);
	}

	Ok(Some(year))
}

#[cfg(test)]
mod tests {
	use crate::config::ParsingMode;
	use crate::error::ErrorKind;
	use crate::id3::TagType;
	use crate::id3::v1::{Id3v1Tag, Id3v1Version};

	fn pad(text: &[u8], len: usize) -> Vec<u8> {
		let mut out = text.to_vec();
		out.resize(len, 0);
		out
	}

	fn raw_tag(comment: &[u8], comment_len: usize, tail: &[u8]) -> [u8; 128] {
		let mut raw = Vec::with_capacity(128);
		raw.extend_from_slice(b"TAG");
		raw.extend(pad(b"Title", 30));
		raw.extend(pad(b"Artist", 30));
		raw.extend(pad(b"Album", 30));
		raw.extend_from_slice(b"2003");
		raw.extend(pad(comment, comment_len));
		raw.extend_from_slice(tail);
		raw.try_into().unwrap()
	}

	#[test_log::test]
	fn parse_v11() {
		let raw = raw_tag(b"Comment", 28, &[0x00, 0x0C, 0x07]);
		let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();

		assert_eq!(tag.version(), Id3v1Version::V1_1);
		assert_eq!(tag.title(), Some("Title"));
		assert_eq!(tag.artist(), Some("Artist"));
		assert_eq!(tag.album(), Some("Album"));
		assert_eq!(tag.year(), Some(2003));
		assert_eq!(tag.comment(), Some("Comment"));
		assert_eq!(tag.track().unwrap(), Some(12));
		assert_eq!(tag.genre(), Some("Hip-Hop"));
	}

	#[test_log::test]
	fn parse_v10() {
		let raw = raw_tag(b"A thirty byte long comment!!!!", 30, &[0xFF]);
		let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();

		assert_eq!(tag.version(), Id3v1Version::V1_0);
		assert_eq!(tag.comment(), Some("A thirty byte long comment!!!!"));
		assert!(tag.track().is_err());
		assert_eq!(tag.genre(), None);
	}

	#[test_log::test]
	fn trims_whitespace_and_junk() {
		let mut raw = raw_tag(b"  padded  ", 28, &[0x00, 0x01, 0x00]);
		// Junk after the terminator
		raw[3 + 6] = 0;
		raw[3 + 7] = b'x';

		let tag = Id3v1Tag::parse(raw, ParsingMode::BestAttempt).unwrap();
		assert_eq!(tag.title(), Some("Title"));
		assert_eq!(tag.comment(), Some("padded"));
		assert_eq!(tag.genre(), Some("Blues"));
	}

	#[test_log::test]
	fn bad_year() {
		let mut raw = raw_tag(b"", 28, &[0x00, 0x01, 0x00]);
		raw[93..97].copy_from_slice(b"20a3");

		let tag = Id3v1Tag::parse(raw, ParsingMode::BestAttempt).unwrap();
		assert_eq!(tag.year(), None);

		let err = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap_err();
		assert!(err.is_format_error());
		assert!(matches!(
			err.kind(),
			ErrorKind::TagDecoding(e) if e.tag_type() == TagType::Id3v1
		));

		raw[93..97].copy_from_slice(&[0; 4]);
		let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();
		assert_eq!(tag.year(), None);
	}

	#[test_log::test]
	fn not_a_tag() {
		let raw = [0; 128];
		let err = Id3v1Tag::parse(raw, ParsingMode::BestAttempt).unwrap_err();
		assert!(err.is_format_error());
	}
}

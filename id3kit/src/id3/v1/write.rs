use super::constants::{ID3V1_TAG_MARKER, ID3V1_TAG_SIZE};
use super::tag::{Id3v1Tag, Id3v1Version};
use crate::config::{ParsingMode, WriteOptions};
use crate::error::{Id3Error, Result};
use crate::id3::{ID3FindResults, find_id3v1};
use crate::util::io::{FileLike, Length, Truncate};
use crate::util::text::latin1_encode;

use std::io::Write;

use byteorder::WriteBytesExt;

pub(crate) fn write_id3v1<F>(
	file: &mut F,
	tag: &Id3v1Tag,
	write_options: WriteOptions,
) -> Result<()>
where
	F: FileLike,
	Id3Error: From<<F as Truncate>::Error>,
	Id3Error: From<<F as Length>::Error>,
{
	// This will seek us to the writing position, either over the existing tag or at the end
	let ID3FindResults(header, _) = find_id3v1(file, false, ParsingMode::BestAttempt)?;
	if header.is_some() {
		log::debug!("Overwriting an existing ID3v1 tag");
	}

	let tag = encode(tag, write_options)?;
	file.write_all(&tag)?;

	Ok(())
}

pub(crate) fn strip_id3v1<F>(file: &mut F) -> Result<()>
where
	F: FileLike,
	Id3Error: From<<F as Truncate>::Error>,
	Id3Error: From<<F as Length>::Error>,
{
	let ID3FindResults(header, _) = find_id3v1(file, false, ParsingMode::BestAttempt)?;
	if header.is_none() {
		log::debug!("No ID3v1 tag to remove");
		return Ok(());
	}

	// An ID3v1 tag occupies the last 128 bytes of the file, so we can just shrink it down.
	let new_length = file.len()?.saturating_sub(ID3V1_TAG_SIZE as u64);
	file.truncate(new_length)?;

	Ok(())
}

pub(super) fn encode(tag: &Id3v1Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	fn write_field<W: Write>(
		writer: &mut W,
		value: Option<&str>,
		size: usize,
		write_options: WriteOptions,
	) -> Result<()> {
		let mut field = vec![0; size];

		if let Some(val) = value {
			for (dst, b) in field
				.iter_mut()
				.zip(latin1_encode(val, write_options.lossy_text_encoding))
			{
				*dst = b?;
			}
		}

		writer.write_all(&field)?;
		Ok(())
	}

	let mut writer = Vec::with_capacity(ID3V1_TAG_SIZE);

	writer.write_all(&ID3V1_TAG_MARKER)?;

	write_field(&mut writer, tag.title(), 30, write_options)?;
	write_field(&mut writer, tag.artist(), 30, write_options)?;
	write_field(&mut writer, tag.album(), 30, write_options)?;

	let mut year = [0; 4];
	if let Some(year_num) = tag.year {
		let mut year_num = std::cmp::min(year_num, 9999);
		for digit in year.iter_mut().rev() {
			*digit = b'0' + (year_num % 10) as u8;
			year_num /= 10;
		}
	}

	writer.write_all(&year)?;

	write_field(&mut writer, tag.comment(), tag.comment_len(), write_options)?;

	if tag.version() == Id3v1Version::V1_1 {
		writer.write_u8(0)?;
		writer.write_u8(tag.track_number.unwrap_or(0))?;
	}

	writer.write_u8(tag.genre.unwrap_or(255))?;

	debug_assert_eq!(writer.len(), ID3V1_TAG_SIZE);
	Ok(writer)
}

#[cfg(test)]
mod tests {
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v1::{Id3v1Tag, Id3v1Version};

	fn full_tag() -> Id3v1Tag {
		let mut tag = Id3v1Tag::new(Id3v1Version::V1_1);
		tag.set_title(String::from("Foo title")).unwrap();
		tag.set_artist(String::from("Bar artist")).unwrap();
		tag.set_album(String::from("Baz album")).unwrap();
		tag.set_year("1984").unwrap();
		tag.set_comment(String::from("Qux comment")).unwrap();
		tag.set_track(1).unwrap();
		tag.set_genre("Classical").unwrap();
		tag
	}

	#[test_log::test]
	fn id3v1_re_read() {
		let tag = full_tag();

		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::default()).unwrap();
		assert_eq!(writer.len(), 128);

		let temp_parsed = Id3v1Tag::parse(writer.try_into().unwrap(), ParsingMode::Strict).unwrap();
		assert_eq!(tag, temp_parsed);
	}

	#[test_log::test]
	fn empty_fields_layout() {
		let tag = Id3v1Tag::new(Id3v1Version::V1_1);

		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::default()).unwrap();

		assert_eq!(&writer[..3], b"TAG");
		assert!(writer[3..127].iter().all(|b| *b == 0));
		// No genre
		assert_eq!(writer[127], 255);
	}

	#[test_log::test]
	fn v10_layout() {
		let mut tag = Id3v1Tag::new(Id3v1Version::V1_0);
		tag.set_comment("z".repeat(30)).unwrap();

		let mut writer = Vec::new();
		tag.dump_to(&mut writer, WriteOptions::default()).unwrap();

		assert_eq!(&writer[97..127], "z".repeat(30).as_bytes());

		let parsed = Id3v1Tag::parse(writer.try_into().unwrap(), ParsingMode::Strict).unwrap();
		assert_eq!(parsed.version(), Id3v1Version::V1_0);
		assert_eq!(parsed, tag);
	}
}

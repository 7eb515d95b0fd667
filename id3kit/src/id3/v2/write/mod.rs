mod frame;

use super::header::{Id3v2Header, Id3v2Version};
use crate::config::{ParsingMode, WriteOptions};
use crate::error::{Id3Error, Result};
use crate::id3::v2::Id3v2Tag;
use crate::id3::v2::util::synchsafe::unsynchronise;
use crate::id3::{ID3FindResults, find_id3v2};
use crate::macros::{err, try_vec};
use crate::util::io::{FileLike, Length, Truncate};

use std::io::Write;
use std::ops::Not;
use std::sync::OnceLock;

// In the very rare chance someone wants to write a CRC in their extended header
fn crc_32_table() -> &'static [u32; 256] {
	static INSTANCE: OnceLock<[u32; 256]> = OnceLock::new();
	INSTANCE.get_or_init(|| {
		let mut crc32_table = [0; 256];

		for n in 0..256 {
			crc32_table[n as usize] = (0..8).fold(n as u32, |acc, _| match acc & 1 {
				1 => 0xEDB8_8320 ^ (acc >> 1),
				_ => acc >> 1,
			});
		}

		crc32_table
	})
}

pub(crate) fn write_id3v2<F>(file: &mut F, tag: &Id3v2Tag, write_options: WriteOptions) -> Result<()>
where
	F: FileLike,
	Id3Error: From<<F as Truncate>::Error>,
	Id3Error: From<<F as Length>::Error>,
{
	let id3v2 = create_tag(tag, write_options)?;

	// find_id3v2 will seek us to the end of the tag
	file.rewind()?;
	let ID3FindResults(header, _) = find_id3v2(file, false, ParsingMode::BestAttempt)?;
	if let Some(header) = header {
		log::debug!(
			"Replacing an existing ID3v2 tag ({} bytes)",
			header.full_tag_size()
		);
	}

	let mut file_bytes = Vec::new();
	file.read_to_end(&mut file_bytes)?;

	file_bytes.splice(0..0, id3v2);

	file.rewind()?;
	file.truncate(0)?;
	file.write_all(&file_bytes)?;

	Ok(())
}

pub(super) fn create_tag(tag: &Id3v2Tag, write_options: WriteOptions) -> Result<Vec<u8>> {
	// We are stripping the tag
	if tag.frames.is_empty() {
		log::debug!("Tag has no frames, nothing to write");
		return Ok(Vec::new());
	}

	let version = tag.version;
	log::debug!("Creating an ID3v2.{} tag", version.major());

	if let Some(extended_header) = &tag.extended_header {
		extended_header.verify(version)?;
	}

	let mut flags = tag.flags;
	flags.extended_header = tag.extended_header.is_some();

	let tag_unsynchronised = version == Id3v2Version::V4 && flags.unsynchronisation;

	let mut frames = Vec::new();
	frame::create_items(
		&mut frames,
		&tag.frames,
		version,
		tag_unsynchronised,
		write_options,
	)?;

	if frames.is_empty() {
		log::warn!("No frames could be written to the ID3v2.{} tag", version.major());
		return Ok(Vec::new());
	}

	// https://mutagen-specs.readthedocs.io/en/latest/id3/id3v2.4.0-structure.html#padding:
	//
	// "[A tag] MUST NOT have any padding when a tag footer is added to the tag"
	let padding_len = if flags.footer {
		log::trace!("Footer requested, not padding tag");
		0
	} else {
		write_options.preferred_padding.unwrap_or(0) as usize
	};

	let padding = try_vec![0; padding_len];

	let mut body = Vec::new();
	if let Some(extended_header) = &tag.extended_header {
		let crc = extended_header.crc_enabled.then(|| match version {
			// ID3v2.4 includes the padding in the CRC, ID3v2.3 does not
			Id3v2Version::V4 => calculate_crc(frames.iter().chain(padding.iter())),
			_ => calculate_crc(frames.iter()),
		});

		body.extend(extended_header.as_bytes(version, padding_len as u32, crc)?);
	}

	body.extend(frames);

	log::trace!("Padding tag with {} bytes", padding_len);
	body.extend(padding);

	// ID3v2.4 unsynchronises frames individually
	if flags.unsynchronisation && version != Id3v2Version::V4 {
		body = unsynchronise(&body);
	}

	let Ok(size) = u32::try_from(body.len()) else {
		err!(TooMuchData);
	};

	let header = Id3v2Header {
		version,
		revision: tag.revision,
		flags,
		size,
	};

	let mut id3v2 = Vec::with_capacity(body.len() + 20);
	id3v2.write_all(&header.as_bytes()?)?;
	id3v2.write_all(&body)?;

	if flags.footer {
		id3v2.write_all(&header.as_footer_bytes()?)?;
	}

	Ok(id3v2)
}

// https://github.com/rstemmer/id3edit/blob/0246f3dc1a7a80a64461eeeb7b9ee88379003eb1/encoding/crc.c#L6:6
fn calculate_crc<'a>(content: impl Iterator<Item = &'a u8>) -> u32 {
	content
		.fold(!0, |crc, octet| {
			(crc >> 8) ^ crc_32_table()[(((crc & 0xFF) ^ u32::from(*octet)) & 0xFF) as usize]
		})
		.not()
}

#[cfg(test)]
mod tests {
	use super::calculate_crc;
	use crate::config::WriteOptions;
	use crate::id3::v2::{
		ExtendedHeader, FrameId, Id3v2Tag, Id3v2Version, TagFlag, TextInformationFrame,
	};
	use crate::util::text::TextEncoding;

	fn artist_tag(version: Id3v2Version) -> Id3v2Tag {
		let mut tag = Id3v2Tag::new(version);
		tag.insert(
			TextInformationFrame::new(
				FrameId::new("TPE1").unwrap(),
				TextEncoding::UTF8,
				"Foo artist",
			)
			.into(),
		)
		.unwrap();
		tag
	}

	#[test_log::test]
	fn crc_check_value() {
		assert_eq!(calculate_crc(b"123456789".iter()), 0xCBF4_3926);
	}

	#[test_log::test]
	fn id3v2_write_crc32() {
		let mut tag = artist_tag(Id3v2Version::V4);

		let mut extended_header = ExtendedHeader::new();
		extended_header.set_crc_enabled(true);
		tag.set_extended_header(Some(extended_header)).unwrap();

		let bytes = tag
			.as_bytes(WriteOptions::new().preferred_padding(0))
			.unwrap();

		// Header (10) + extended header size (4) + flag bytes (2)
		let crc_content = &bytes[16..22];
		assert_eq!(crc_content, &[5, 0x06, 0x35, 0x69, 0x7D, 0x14]);

		let mut unsynch_crc = 0;
		for (i, b) in crc_content[1..].iter().enumerate() {
			unsynch_crc |= u32::from(b & 0x7F) << ((4 - i) * 7);
		}

		assert_eq!(unsynch_crc, 0x66BA_7E94);
	}

	#[test_log::test]
	fn v3_crc_excludes_padding() {
		let mut tag = artist_tag(Id3v2Version::V3);

		let mut extended_header = ExtendedHeader::new();
		extended_header.set_crc_enabled(true);
		tag.set_extended_header(Some(extended_header)).unwrap();

		let padded = tag.as_bytes(WriteOptions::new().preferred_padding(64)).unwrap();
		let unpadded = tag.as_bytes(WriteOptions::new().preferred_padding(0)).unwrap();

		// Size (4) + flags (2) + padding size (4) + CRC (4)
		assert_eq!(&padded[10..16], &[0, 0, 0, 10, 0x80, 0x00]);
		assert_eq!(&padded[16..20], &[0, 0, 0, 64]);
		assert_eq!(&padded[20..24], &unpadded[20..24]);
	}

	#[test_log::test]
	fn footer_disables_padding() {
		let mut tag = artist_tag(Id3v2Version::V4);
		tag.set_flag(TagFlag::Footer, true).unwrap();

		let bytes = tag.as_bytes(WriteOptions::default()).unwrap();

		// Header (10) + TPE1 (10 + 11) + footer (10)
		assert_eq!(bytes.len(), 41);
		assert_eq!(&bytes[..3], b"ID3");
		assert_eq!(&bytes[31..34], b"3DI");
		assert_eq!(&bytes[3..10], &bytes[34..41]);
	}

	#[test_log::test]
	fn preferred_padding() {
		let tag = artist_tag(Id3v2Version::V4);

		let bytes = tag.as_bytes(WriteOptions::default()).unwrap();
		assert_eq!(bytes.len(), 10 + 21 + 1024);
		assert!(bytes[31..].iter().all(|b| *b == 0));

		let bytes = tag.as_bytes(WriteOptions::new().preferred_padding(0)).unwrap();
		assert_eq!(bytes.len(), 10 + 21);
	}

	#[test_log::test]
	fn empty_tag_renders_nothing() {
		let mut tag = Id3v2Tag::default();
		tag.set_flag(TagFlag::Footer, true).unwrap();

		assert!(tag.as_bytes(WriteOptions::default()).unwrap().is_empty());
	}

	#[test_log::test]
	fn v3_tag_unsynchronisation() {
		let mut tag = Id3v2Tag::new(Id3v2Version::V3);
		tag.set_flag(TagFlag::Unsynchronisation, true).unwrap();
		tag.insert(
			crate::id3::v2::BinaryFrame::new(FrameId::new("PRIV").unwrap(), vec![0xFF, 0xE0])
				.into(),
		)
		.unwrap();

		let bytes = tag.as_bytes(WriteOptions::new().preferred_padding(0)).unwrap();
		assert_eq!(bytes[5], 0x80);
		// The frame size is counted before unsynchronisation
		assert_eq!(&bytes[10..], b"PRIV\x00\x00\x00\x02\x00\x00\xFF\x00\xE0");
		assert_eq!(&bytes[6..10], &[0, 0, 0, 13]);
	}
}

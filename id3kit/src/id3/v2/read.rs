use super::extended_header::ExtendedHeader;
use super::frame::read::ParsedFrame;
use super::header::{Id3v2Header, Id3v2Version};
use super::tag::Id3v2Tag;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::resynchronise;

use std::borrow::Cow;

/// Parse the body of an ID3v2 tag (everything between the header and footer)
pub(crate) fn parse_id3v2(
	body: &[u8],
	header: Id3v2Header,
	parse_options: ParseOptions,
) -> Result<Id3v2Tag> {
	log::debug!(
		"Parsing ID3v2 tag, size: {}, version: {:?}",
		header.size,
		header.version
	);

	let mut tag = Id3v2Tag::new(header.version);
	tag.revision = header.revision;
	tag.flags = header.flags;

	// At the time ID3v2.2 was written, a compression scheme wasn't decided
	if header.flags.compression {
		if parse_options.parsing_mode == ParsingMode::Strict {
			return Err(Id3v2Error::new(Id3v2ErrorKind::V2Compression).into());
		}

		log::warn!("Encountered a compressed ID3v2.2 tag, ignoring its frames");
		return Ok(tag);
	}

	// ID3v2.4 unsynchronises frames individually
	let body = if header.flags.unsynchronisation && header.version != Id3v2Version::V4 {
		Cow::Owned(resynchronise(body))
	} else {
		Cow::Borrowed(body)
	};

	let mut reader = &body[..];

	if header.flags.extended_header {
		tag.extended_header = Some(ExtendedHeader::parse(&mut reader, header.version)?);
	}

	let tag_unsynchronised =
		header.version == Id3v2Version::V4 && header.flags.unsynchronisation;

	loop {
		match ParsedFrame::read(&mut reader, header.version, tag_unsynchronised, parse_options)? {
			ParsedFrame::Next(frame) => tag.frames.push(frame),
			// Ignored due to errors, but we can expect more frames
			ParsedFrame::Skip => {},
			// No frame content found, and we can expect there are no more frames
			ParsedFrame::Eof => break,
		}
	}

	// The rest of the tag is padding, or garbage following a bad frame
	if !reader.is_empty() {
		log::trace!("Discarding {} bytes of padding", reader.len());
	}

	Ok(tag)
}

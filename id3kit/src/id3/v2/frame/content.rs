use crate::config::ParsingMode;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::Frame;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::items::{
	AttachedPictureFrame, BinaryFrame, CommentFrame, TextInformationFrame,
};
use crate::id3::v2::FrameHeader;
use crate::macros::{err, parse_mode_choice};
use crate::util::text::TextEncoding;

use std::io::Read;

/// Decode the content of a frame, once all frame-level transformations have been undone
pub(super) fn parse_content<R: Read>(
	reader: &mut R,
	header: FrameHeader,
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<Frame> {
	log::trace!("Parsing frame content for ID: {}", header.id);

	if header.id.is_outdated() {
		return Ok(Frame::Binary(BinaryFrame::parse(reader, header)?));
	}

	Ok(match header.id.as_str() {
		"APIC" => Frame::Picture(AttachedPictureFrame::parse(
			reader, header, version, parse_mode,
		)?),
		"COMM" | "USLT" => Frame::Comment(CommentFrame::parse(
			reader, header, version, parse_mode,
		)?),
		// User defined text frames have a description, they stay opaque
		"TXXX" => Frame::Binary(BinaryFrame::parse(reader, header)?),
		id if id.starts_with('T') => Frame::Text(TextInformationFrame::parse(
			reader, header, version, parse_mode,
		)?),
		_ => Frame::Binary(BinaryFrame::parse(reader, header)?),
	})
}

/// Validate an encoding byte
///
/// ID3v2.2 only defines Latin-1 and UTF-16, anything else is only accepted outside of
/// [`ParsingMode::Strict`].
pub(in crate::id3::v2) fn verify_encoding(
	encoding: u8,
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<TextEncoding> {
	if version == Id3v2Version::V2 && (encoding != 0 && encoding != 1) {
		parse_mode_choice!(
			parse_mode,
			STRICT: return Err(Id3v2Error::new(Id3v2ErrorKind::V2InvalidTextEncoding).into()),
			DEFAULT: log::warn!("Found an ID3v2.4 text encoding ({encoding}) in an ID3v2.2 tag"),
		);
	}

	match TextEncoding::from_u8(encoding) {
		None => err!(TextDecode("Found invalid encoding")),
		Some(e) => Ok(e),
	}
}

/// The encoding to use when writing a frame to a tag of `version`
pub(in crate::id3::v2) fn encoding_for_version(
	encoding: TextEncoding,
	version: Id3v2Version,
) -> TextEncoding {
	match version {
		Id3v2Version::V4 => encoding,
		Id3v2Version::V2 | Id3v2Version::V3 => encoding.to_id3v23(),
	}
}

use crate::config::ParsingMode;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::FrameFlags;
use crate::id3::v2::frame::header::FrameId;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::id3::v2::util::upgrade::upgrade_v2;
use crate::macros::parse_mode_choice;

use std::borrow::Cow;

/// Parse a frame header, advancing `reader` past it
///
/// Returns `None` once there isn't room for another header, or when padding is reached.
pub(crate) fn parse_header(
	reader: &mut &[u8],
	version: Id3v2Version,
	parse_mode: ParsingMode,
) -> Result<Option<(FrameId, u32, FrameFlags)>> {
	let header_len = version.frame_header_len();
	if reader.len() < header_len {
		if !reader.is_empty() && reader.iter().any(|b| *b != 0) {
			log::debug!(
				"Ignoring {} trailing bytes, too short for a frame header",
				reader.len()
			);
		}
		return Ok(None);
	}

	// Assume we just started reading padding
	if reader[0] == 0 {
		return Ok(None);
	}

	let (header, rest) = reader.split_at(header_len);
	*reader = rest;

	let (id_bytes, size, flags) = match version {
		Id3v2Version::V2 => (
			&header[..3],
			u32::from_be_bytes([0, header[3], header[4], header[5]]),
			// V2 doesn't store flags
			FrameFlags::default(),
		),
		Id3v2Version::V3 => (
			&header[..4],
			u32::from_be_bytes([header[4], header[5], header[6], header[7]]),
			FrameFlags::parse_id3v23(u16::from_be_bytes([header[8], header[9]])),
		),
		Id3v2Version::V4 => {
			let size_bytes = [header[4], header[5], header[6], header[7]];
			if size_bytes.iter().any(|b| b & 0x80 == 0x80) {
				parse_mode_choice!(
					parse_mode,
					STRICT: return Err(Id3v2Error::new(Id3v2ErrorKind::BadSynchsafeInteger).into()),
					DEFAULT: log::warn!("Frame size is not a valid synchsafe integer, masking"),
				);
			}

			let mut size = 0_u32;
			for b in size_bytes {
				size = (size << 8) | u32::from(b & 0x7F);
			}

			(
				&header[..4],
				size.unsynch(),
				FrameFlags::parse_id3v24(u16::from_be_bytes([header[8], header[9]])),
			)
		},
	};

	// Some taggers pad the ID with spaces or NULs, some write v2 IDs in v3/v4 tags
	let id_len = id_bytes
		.iter()
		.rposition(|b| *b != 0 && *b != b' ')
		.map_or(0, |pos| pos + 1);
	let id_bytes = &id_bytes[..id_len];

	let Ok(id_str) = std::str::from_utf8(id_bytes) else {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id_bytes.to_vec())).into());
	};

	FrameId::verify_id(id_str)?;

	let id = match id_str.len() {
		3 => {
			if version != Id3v2Version::V2 {
				log::warn!("Found an ID3v2.2 frame ID ({id_str}) in a {version:?} tag, attempting to upgrade");
			}

			match upgrade_v2(id_str) {
				Some(upgraded) => FrameId::Valid(Cow::Borrowed(upgraded)),
				None => FrameId::Outdated(Cow::Owned(id_str.to_owned())),
			}
		},
		_ => FrameId::new_cow(Cow::Owned(id_str.to_owned()))?,
	};

	Ok(Some((id, size, flags)))
}

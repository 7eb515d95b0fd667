use crate::config::WriteOptions;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::FrameFlags;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, unsynchronise};
use crate::id3::v2::Frame;
use crate::macros::err;

use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

pub(in crate::id3::v2) fn create_items<W>(
	writer: &mut W,
	frames: &[Frame],
	version: Id3v2Version,
	tag_unsynchronised: bool,
	write_options: WriteOptions,
) -> Result<()>
where
	W: Write,
{
	for frame in frames {
		let Some(id) = frame.id().for_version(version) else {
			log::warn!(
				"Discarding frame: {}, no ID3v2.{} counterpart",
				frame.id_str(),
				version.major()
			);
			continue;
		};

		verify_frame(frame)?;
		frame.flags().verify(version)?;

		let content = frame.as_bytes(version, write_options)?;

		log::trace!("Writing frame: {id}, content size: {}", content.len());
		write_frame(
			writer,
			id,
			frame.flags(),
			content,
			version,
			tag_unsynchronised,
		)?;
	}

	Ok(())
}

fn verify_frame(frame: &Frame) -> Result<()> {
	match (frame.id_str(), frame) {
		("APIC", Frame::Picture(_)) | ("COMM" | "USLT", Frame::Comment(_)) | (_, Frame::Binary(_)) => {
			Ok(())
		},
		(id, Frame::Text(_)) if id.starts_with('T') && id != "TXXX" => Ok(()),
		(id, frame_value) => Err(Id3v2Error::new(Id3v2ErrorKind::BadFrame(
			id.to_string(),
			frame_value.name(),
		))
		.into()),
	}
}

// The transformations are applied in the order:
//
// compression -> unsynchronisation
fn write_frame<W>(
	writer: &mut W,
	id: &str,
	mut flags: FrameFlags,
	mut content: Vec<u8>,
	version: Id3v2Version,
	tag_unsynchronised: bool,
) -> Result<()>
where
	W: Write,
{
	// Only used by ID3v2.3
	let mut decompressed_size = None;

	if let Some(method_symbol) = flags.encryption {
		// Symbols below 0x80 are reserved
		if method_symbol < 0x80 {
			return Err(
				Id3v2Error::new(Id3v2ErrorKind::InvalidEncryptionMethodSymbol(method_symbol))
					.into(),
			);
		}

		// The content is already in its final form, the sizes must be carried over
		if flags.compression {
			let Some(len) = flags.data_length_indicator else {
				return Err(Id3v2Error::new(Id3v2ErrorKind::MissingDataLengthIndicator).into());
			};

			if version == Id3v2Version::V3 {
				decompressed_size = Some(len);
			}
		}
	} else {
		let original_len = content.len() as u32;

		if flags.compression {
			content = compress(&content)?;

			match version {
				Id3v2Version::V3 => decompressed_size = Some(original_len),
				// Compressed frames must have a data length indicator
				_ => flags.data_length_indicator = Some(original_len),
			}
		} else if flags.data_length_indicator.is_some() {
			flags.data_length_indicator = Some(original_len);
		}
	}

	if version == Id3v2Version::V4 {
		flags.unsynchronisation |= tag_unsynchronised;
		if flags.unsynchronisation {
			content = unsynchronise(&content);
		}
	}

	let mut extras = Vec::new();
	match version {
		Id3v2Version::V2 => {},
		Id3v2Version::V3 => {
			if let Some(size) = decompressed_size {
				extras.write_u32::<BigEndian>(size)?;
			}

			if let Some(method) = flags.encryption {
				extras.write_u8(method)?;
			}

			if let Some(group) = flags.grouping_identity {
				extras.write_u8(group)?;
			}
		},
		Id3v2Version::V4 => {
			if let Some(group) = flags.grouping_identity {
				extras.write_u8(group)?;
			}

			if let Some(method) = flags.encryption {
				extras.write_u8(method)?;
			}

			if let Some(len) = flags.data_length_indicator {
				extras.write_u32::<BigEndian>(len.synch()?)?;
			}
		},
	}

	let Ok(size) = u32::try_from(extras.len() + content.len()) else {
		err!(TooMuchData);
	};

	write_frame_header(writer, id, size, flags, version)?;
	writer.write_all(&extras)?;
	writer.write_all(&content)?;

	Ok(())
}

fn write_frame_header<W>(
	writer: &mut W,
	id: &str,
	size: u32,
	flags: FrameFlags,
	version: Id3v2Version,
) -> Result<()>
where
	W: Write,
{
	writer.write_all(id.as_bytes())?;

	match version {
		Id3v2Version::V2 => {
			if size > 0x00FF_FFFF {
				err!(TooMuchData);
			}

			writer.write_u24::<BigEndian>(size)?;
		},
		Id3v2Version::V3 => {
			writer.write_u32::<BigEndian>(size)?;
			writer.write_u16::<BigEndian>(flags.as_id3v23_bytes())?;
		},
		Id3v2Version::V4 => {
			writer.write_u32::<BigEndian>(size.synch()?)?;
			writer.write_u16::<BigEndian>(flags.as_id3v24_bytes())?;
		},
	}

	Ok(())
}

#[cfg(feature = "id3v2_compression_support")]
fn compress(content: &[u8]) -> Result<Vec<u8>> {
	use flate2::Compression;
	use flate2::write::ZlibEncoder;

	let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
	encoder.write_all(content)?;
	Ok(encoder.finish()?)
}

#[cfg(not(feature = "id3v2_compression_support"))]
#[allow(clippy::unnecessary_wraps)]
fn compress(_: &[u8]) -> Result<Vec<u8>> {
	Err(Id3v2Error::new(Id3v2ErrorKind::CompressedFrameEncountered).into())
}

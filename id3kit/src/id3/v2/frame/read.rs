use super::Frame;
use super::header::parse::parse_header;
use crate::config::{ParseOptions, ParsingMode};
use crate::error::{Id3Error, Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::content::parse_content;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::synchsafe::{SynchsafeInteger, UnsynchronizedStream, resynchronise};
use crate::id3::v2::{BinaryFrame, FrameFlags, FrameHeader, FrameId};
use crate::macros::parse_mode_choice;

use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};

pub(crate) enum ParsedFrame {
	Next(Frame),
	Skip,
	Eof,
}

impl ParsedFrame {
	/// Read the next frame from a tag body
	///
	/// `tag_unsynchronised` is the ID3v2.4 tag-level unsynchronisation flag, which applies to
	/// every frame. Older versions undo unsynchronisation on the whole body before getting here.
	pub(crate) fn read(
		reader: &mut &[u8],
		version: Id3v2Version,
		tag_unsynchronised: bool,
		parse_options: ParseOptions,
	) -> Result<Self> {
		let parse_mode = parse_options.parsing_mode;

		let (id, size, flags) = match parse_header(reader, version, parse_mode) {
			Ok(None) => {
				// Stop reading
				return Ok(Self::Eof);
			},
			Ok(Some(some)) => some,
			Err(err) => {
				match parse_mode {
					ParsingMode::Strict => return Err(err),
					ParsingMode::BestAttempt | ParsingMode::Relaxed => {
						// Without a valid header, there's no telling where the next frame starts
						log::warn!("Failed to read frame header, stopping: {}", err);
						return Ok(Self::Eof);
					},
				}
			},
		};

		if size == 0 {
			log::debug!("Encountered a zero length frame ({id}), stopping");
			return Ok(Self::Eof);
		}

		let size = size as usize;
		if size > reader.len() {
			parse_mode_choice!(
				parse_mode,
				STRICT: return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into()),
				DEFAULT: {
					log::warn!(
						"Frame `{id}` claims a size of {size}, but only {} bytes remain, stopping",
						reader.len()
					);
					return Ok(Self::Eof);
				}
			);
		}

		// Restrict the reader to the frame content
		let (content, rest) = reader.split_at(size);
		*reader = rest;

		if !parse_options.read_cover_art && id.as_str() == "APIC" {
			log::trace!("Skipping attached picture");
			return Ok(Self::Skip);
		}

		match read_frame(content, id, flags, version, tag_unsynchronised, parse_mode) {
			Ok(frame) => Ok(Self::Next(frame)),
			Err(err) => handle_frame_error(err, parse_mode),
		}
	}
}

fn handle_frame_error(err: Id3Error, parse_mode: ParsingMode) -> Result<ParsedFrame> {
	match parse_mode {
		ParsingMode::Strict => Err(err),
		ParsingMode::BestAttempt => {
			log::warn!("Failed to read frame, skipping: {}", err);
			Ok(ParsedFrame::Skip)
		},
		ParsingMode::Relaxed => {
			log::debug!("Failed to read frame, skipping: {}", err);
			Ok(ParsedFrame::Skip)
		},
	}
}

fn read_frame(
	mut content: &[u8],
	id: FrameId,
	mut flags: FrameFlags,
	version: Id3v2Version,
	tag_unsynchronised: bool,
	parse_mode: ParsingMode,
) -> Result<Frame> {
	if read_frame_extras(&mut content, version, &mut flags).is_err() {
		return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameLength).into());
	}

	// Frames must have at least 1 byte, *after* all of the additional data flags can provide
	if content.is_empty() {
		return Err(Id3v2Error::new(Id3v2ErrorKind::EmptyFrame(id.to_string())).into());
	}

	let unsynchronised =
		version == Id3v2Version::V4 && (flags.unsynchronisation || tag_unsynchronised);
	let header = FrameHeader::new(id, flags);

	if flags.encryption.is_some() {
		log::debug!("Encountered an encrypted frame ({}), keeping as binary", header.id);

		let data = if unsynchronised {
			resynchronise(content)
		} else {
			content.to_vec()
		};

		// Nothing further we can do with encrypted frames
		return Ok(Frame::Binary(BinaryFrame { header, data }));
	}

	// The transformations are undone in the order:
	//
	// unsynchronisation -> compression
	match (unsynchronised, flags.compression) {
		(true, true) => {
			let decompressed = decompress(UnsynchronizedStream::new(content))?;
			parse_content(&mut &decompressed[..], header, version, parse_mode)
		},
		(true, false) => parse_content(
			&mut UnsynchronizedStream::new(content),
			header,
			version,
			parse_mode,
		),
		(false, true) => {
			let decompressed = decompress(content)?;
			parse_content(&mut &decompressed[..], header, version, parse_mode)
		},
		(false, false) => parse_content(&mut content, header, version, parse_mode),
	}
}

// The extra data between the frame header and content, in the order each version writes it
fn read_frame_extras(
	content: &mut &[u8],
	version: Id3v2Version,
	flags: &mut FrameFlags,
) -> std::io::Result<()> {
	match version {
		Id3v2Version::V2 => {},
		Id3v2Version::V3 => {
			if flags.compression {
				log::trace!("Reading decompressed size");

				let decompressed_size = content.read_u32::<BigEndian>()?;
				// Only needed to write an encrypted frame back, everything else is recalculated
				if flags.encryption.is_some() {
					flags.data_length_indicator = Some(decompressed_size);
				}
			}

			if let Some(method) = flags.encryption.as_mut() {
				log::trace!("Reading encryption method symbol");
				*method = content.read_u8()?;
			}

			if let Some(group) = flags.grouping_identity.as_mut() {
				log::trace!("Reading group identifier");
				*group = content.read_u8()?;
			}
		},
		Id3v2Version::V4 => {
			if let Some(group) = flags.grouping_identity.as_mut() {
				log::trace!("Reading group identifier");
				*group = content.read_u8()?;
			}

			if let Some(method) = flags.encryption.as_mut() {
				log::trace!("Reading encryption method symbol");
				*method = content.read_u8()?;
			}

			if let Some(len) = flags.data_length_indicator.as_mut() {
				log::trace!("Reading data length indicator");
				*len = content.read_u32::<BigEndian>()?.unsynch();
			}
		},
	}

	Ok(())
}

#[cfg(feature = "id3v2_compression_support")]
fn decompress<R: Read>(reader: R) -> Result<Vec<u8>> {
	use crate::error::ErrorKind;
	use crate::util::alloc::ALLOCATION_LIMIT;

	let mut decompressed = Vec::new();
	flate2::read::ZlibDecoder::new(reader)
		.take(ALLOCATION_LIMIT as u64 + 1)
		.read_to_end(&mut decompressed)
		.map_err(|err| Id3v2Error::new(Id3v2ErrorKind::Decompression(err)))?;

	if decompressed.len() > ALLOCATION_LIMIT {
		return Err(Id3Error::new(ErrorKind::TooMuchData));
	}

	Ok(decompressed)
}

#[cfg(not(feature = "id3v2_compression_support"))]
#[allow(clippy::unnecessary_wraps)]
fn decompress<R: Read>(_: R) -> Result<Vec<u8>> {
	Err(Id3v2Error::new(Id3v2ErrorKind::CompressedFrameEncountered).into())
}

use crate::config::{ParsingMode, WriteOptions};
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::frame::content::{encoding_for_version, verify_encoding};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::{FrameFlags, FrameHeader, FrameId};
use crate::picture::{MimeType, Picture, PictureType};
use crate::util::text::{TextDecodeOptions, TextEncoding, decode_text};

use byteorder::ReadBytesExt;

use std::borrow::Cow;
use std::io::Read;

const FRAME_ID: FrameId = FrameId::Valid(Cow::Borrowed("APIC"));

/// An `ID3v2` attached picture frame
///
/// This is used for both `APIC` (ID3v2.3/4) and `PIC` (ID3v2.2) frames.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AttachedPictureFrame {
	pub(crate) header: FrameHeader,
	/// The encoding of the description
	pub encoding: TextEncoding,
	/// The picture itself
	pub picture: Picture,
}

impl AttachedPictureFrame {
	/// Create a new [`AttachedPictureFrame`]
	pub fn new(encoding: TextEncoding, picture: Picture) -> Self {
		let header = FrameHeader::new(FRAME_ID, FrameFlags::default());
		Self {
			header,
			encoding,
			picture,
		}
	}

	/// Get the ID for the frame
	pub fn id(&self) -> &FrameId {
		&self.header.id
	}

	/// Get the flags for the frame
	pub fn flags(&self) -> FrameFlags {
		self.header.flags
	}

	/// Set the flags for the frame
	pub fn set_flags(&mut self, flags: FrameFlags) {
		self.header.flags = flags;
	}

	/// Get an [`AttachedPictureFrame`] from ID3v2 A/PIC bytes
	///
	/// NOTE: This expects *only* the frame content
	///
	/// # Errors
	///
	/// * There isn't enough data present
	/// * The description can't be decoded
	///
	/// ID3v2.2:
	///
	/// * The encoding is not [`TextEncoding::Latin1`] or [`TextEncoding::UTF16`] (with [`ParsingMode::Strict`])
	pub fn parse<R>(
		reader: &mut R,
		header: FrameHeader,
		version: Id3v2Version,
		parse_mode: ParsingMode,
	) -> Result<Self>
	where
		R: Read,
	{
		let encoding = verify_encoding(reader.read_u8()?, version, parse_mode)?;

		let mime_type = if version == Id3v2Version::V2 {
			let mut format = [0; 3];
			reader.read_exact(&mut format)?;

			Some(MimeType::from_v22_format(format))
		} else {
			let mime_type = decode_text(
				reader,
				TextDecodeOptions::new()
					.encoding(TextEncoding::Latin1)
					.terminated(true),
			)?;

			if mime_type.content.is_empty() {
				None
			} else {
				Some(MimeType::from_str(&mime_type.content))
			}
		};

		let pic_type = PictureType::from_u8(reader.read_u8()?);
		if let PictureType::Undefined(ty) = pic_type {
			log::warn!("Found an unknown picture type ({ty}), keeping as undefined");
		}

		let description = decode_text(
			reader,
			TextDecodeOptions::new().encoding(encoding).terminated(true),
		)?
		.content;

		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		let picture = Picture {
			pic_type,
			mime_type,
			description: (!description.is_empty()).then_some(description),
			data,
		};

		Ok(Self {
			header,
			encoding,
			picture,
		})
	}

	/// Convert an [`AttachedPictureFrame`] to an ID3v2 A/PIC byte Vec
	///
	/// # Errors
	///
	/// * Too much data was provided
	///
	/// ID3v2.2:
	///
	/// * The mimetype has no ID3v2.2 image format (see [`MimeType::as_v22_format`])
	pub fn as_bytes(&self, version: Id3v2Version, write_options: WriteOptions) -> Result<Vec<u8>> {
		let encoding = encoding_for_version(self.encoding, version);

		let mut data = vec![encoding as u8];

		if version == Id3v2Version::V2 {
			let Some(format) = self
				.picture
				.mime_type
				.as_ref()
				.and_then(MimeType::as_v22_format)
			else {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrame(
					String::from("PIC"),
					"picture has no ID3v2.2 image format",
				))
				.into());
			};

			data.extend(format);
		} else {
			if let Some(mime_type) = &self.picture.mime_type {
				data.extend(mime_type.as_str().as_bytes());
			}
			data.push(0);
		}

		data.push(self.picture.pic_type.as_u8());

		let description = self.picture.description.as_deref().unwrap_or_default();
		data.extend(encoding.encode(description, true, write_options.lossy_text_encoding)?);

		data.extend(&self.picture.data);

		Ok(data)
	}
}

#[cfg(test)]
mod tests {
	use super::AttachedPictureFrame;
	use crate::config::{ParsingMode, WriteOptions};
	use crate::id3::v2::{FrameFlags, FrameHeader, FrameId, Id3v2Version};
	use crate::picture::{MimeType, Picture, PictureType};
	use crate::util::text::TextEncoding;

	fn header() -> FrameHeader {
		FrameHeader::new(FrameId::new("APIC").unwrap(), FrameFlags::default())
	}

	#[test_log::test]
	fn v4_picture() {
		let data = b"\x00image/png\x00\x03Front\x00\x89PNG";

		let frame = AttachedPictureFrame::parse(
			&mut &data[..],
			header(),
			Id3v2Version::V4,
			ParsingMode::Strict,
		)
		.unwrap();

		assert_eq!(frame.picture.mime_type(), Some(&MimeType::Png));
		assert_eq!(frame.picture.pic_type(), PictureType::CoverFront);
		assert_eq!(frame.picture.description(), Some("Front"));
		assert_eq!(frame.picture.data(), b"\x89PNG");

		assert_eq!(
			frame
				.as_bytes(Id3v2Version::V4, WriteOptions::default())
				.unwrap(),
			data
		);
	}

	#[test_log::test]
	fn v2_picture() {
		let data = b"\x00JPG\x04\x00\xFF\xD8";

		let frame = AttachedPictureFrame::parse(
			&mut &data[..],
			header(),
			Id3v2Version::V2,
			ParsingMode::Strict,
		)
		.unwrap();

		assert_eq!(frame.picture.mime_type(), Some(&MimeType::Jpeg));
		assert_eq!(frame.picture.pic_type(), PictureType::CoverBack);
		assert_eq!(frame.picture.description(), None);

		assert_eq!(
			frame
				.as_bytes(Id3v2Version::V2, WriteOptions::default())
				.unwrap(),
			data
		);

		// The same picture as an APIC frame
		assert_eq!(
			frame
				.as_bytes(Id3v2Version::V3, WriteOptions::default())
				.unwrap(),
			b"\x00image/jpeg\x00\x04\x00\xFF\xD8"
		);
	}

	#[test_log::test]
	fn undefined_picture_type_is_kept() {
		let frame = AttachedPictureFrame::parse(
			&mut &b"\x00\x00\x30\x00data"[..],
			header(),
			Id3v2Version::V4,
			ParsingMode::Strict,
		)
		.unwrap();

		assert_eq!(frame.picture.mime_type(), None);
		assert_eq!(frame.picture.pic_type(), PictureType::Undefined(0x30));
		assert_eq!(frame.picture.data(), b"data");
	}

	#[test_log::test]
	fn v2_needs_image_format() {
		let frame = AttachedPictureFrame::new(
			TextEncoding::Latin1,
			Picture::new(
				PictureType::Other,
				Some(MimeType::Unknown(String::from("image/webp"))),
				None,
				Vec::new(),
			),
		);

		assert!(
			frame
				.as_bytes(Id3v2Version::V2, WriteOptions::default())
				.is_err()
		);
	}
}

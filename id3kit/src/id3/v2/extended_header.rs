use crate::error::{Id3Error, Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::restrictions::TagRestrictions;
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::validation_err;

use std::io::Write;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

// ID3v2.3 flags
const V3_CRC_FLAG: u16 = 0x8000;

// ID3v2.4 flags
const V4_UPDATE_FLAG: u8 = 0x40;
const V4_CRC_FLAG: u8 = 0x20;
const V4_RESTRICTIONS_FLAG: u8 = 0x10;

/// An ID3v2.3/4 extended header
///
/// The layout differs between the two versions:
///
/// * ID3v2.3 stores a padding size and an optional 32-bit CRC.
/// * ID3v2.4 drops the padding size, stores the CRC as a 35-bit synchsafe integer, and adds
///   the "tag is an update" flag and [`TagRestrictions`].
///
/// When a tag is written, the CRC (if enabled) and padding size are recalculated.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtendedHeader {
	pub(crate) is_update: bool,
	pub(crate) crc_enabled: bool,
	pub(crate) crc: Option<u64>,
	pub(crate) padding_size: u32,
	pub(crate) restrictions: Option<TagRestrictions>,
}

impl ExtendedHeader {
	/// Create an empty `ExtendedHeader`
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether the tag is an update of an earlier tag (ID3v2.4 only)
	pub fn is_update(&self) -> bool {
		self.is_update
	}

	/// Mark the tag as an update (ID3v2.4 only)
	pub fn set_update(&mut self, is_update: bool) {
		self.is_update = is_update;
	}

	/// Whether a CRC-32 will be written
	pub fn crc_enabled(&self) -> bool {
		self.crc_enabled
	}

	/// Enable or disable the CRC-32, which is calculated when the tag is written
	pub fn set_crc_enabled(&mut self, enabled: bool) {
		self.crc_enabled = enabled;
		if !enabled {
			self.crc = None;
		}
	}

	/// The CRC-32 read from the tag, if present
	///
	/// In ID3v2.4 this can exceed 32 bits, since the stored value is made up of a 4-bit high
	/// part and a 28-bit synchsafe low part.
	pub fn crc(&self) -> Option<u64> {
		self.crc
	}

	/// The padding size read from an ID3v2.3 tag
	///
	/// This is always 0 for ID3v2.4.
	pub fn padding_size(&self) -> u32 {
		self.padding_size
	}

	/// The tag restrictions (ID3v2.4 only)
	pub fn restrictions(&self) -> Option<TagRestrictions> {
		self.restrictions
	}

	/// Set the tag restrictions (ID3v2.4 only)
	pub fn set_restrictions(&mut self, restrictions: Option<TagRestrictions>) {
		self.restrictions = restrictions;
	}

	/// Make sure every set field exists in `version`
	pub(crate) fn verify(&self, version: Id3v2Version) -> Result<()> {
		let illegal_flag = match version {
			Id3v2Version::V2 => Some("extended header"),
			Id3v2Version::V3 if self.is_update => Some("tag is an update"),
			Id3v2Version::V3 if self.restrictions.is_some() => Some("restrictions"),
			_ => None,
		};

		if let Some(flag) = illegal_flag {
			return Err(validation_err!(IllegalFlag { flag, version }));
		}

		Ok(())
	}

	/// Parse an extended header, advancing `reader` past it
	///
	/// `reader` is the tag body, so the extended header can never claim more than what's left of it.
	pub(crate) fn parse(reader: &mut &[u8], version: Id3v2Version) -> Result<Self> {
		log::debug!("Parsing ID3v2.{} extended header", version.major());

		let bad_size =
			|| -> Id3Error { Id3v2Error::new(Id3v2ErrorKind::BadExtendedHeaderSize).into() };

		let size_field = reader.read_u32::<BigEndian>()?;
		let (size, content_size) = match version {
			// The size doesn't include itself
			Id3v2Version::V3 => (size_field, size_field),
			// The size includes itself
			Id3v2Version::V4 => {
				let size = size_field.unsynch();
				(size, size.saturating_sub(4))
			},
			Id3v2Version::V2 => {
				return Err(validation_err!(IllegalFlag {
					flag: "extended header",
					version,
				}));
			},
		};

		if size < 6 || content_size as usize > reader.len() {
			return Err(bad_size());
		}

		let (mut content, rest) = reader.split_at(content_size as usize);
		*reader = rest;

		let parsed = match version {
			Id3v2Version::V3 => Self::parse_v3(&mut content),
			_ => Self::parse_v4(&mut content),
		};

		parsed.map_err(|_| bad_size())
	}

	fn parse_v3(content: &mut &[u8]) -> std::io::Result<Self> {
		let flags = content.read_u16::<BigEndian>()?;
		let padding_size = content.read_u32::<BigEndian>()?;

		let mut crc = None;
		if flags & V3_CRC_FLAG == V3_CRC_FLAG {
			crc = Some(u64::from(content.read_u32::<BigEndian>()?));
		}

		Ok(Self {
			crc_enabled: crc.is_some(),
			crc,
			padding_size,
			..Self::default()
		})
	}

	fn parse_v4(content: &mut &[u8]) -> std::io::Result<Self> {
		// Always 1
		let _num_flag_bytes = content.read_u8()?;
		let flags = content.read_u8()?;

		let mut extended_header = Self::default();

		// Every flag is followed by the length of its data
		if flags & V4_UPDATE_FLAG == V4_UPDATE_FLAG {
			let _data_length = content.read_u8()?;
			extended_header.is_update = true;
		}

		if flags & V4_CRC_FLAG == V4_CRC_FLAG {
			let _data_length = content.read_u8()?;

			let high = content.read_u8()?;
			let low = content.read_u32::<BigEndian>()?.unsynch();
			extended_header.crc_enabled = true;
			extended_header.crc = Some(u64::from(high) * 0x1000_0000 + u64::from(low));
		}

		if flags & V4_RESTRICTIONS_FLAG == V4_RESTRICTIONS_FLAG {
			let _data_length = content.read_u8()?;
			extended_header.restrictions = Some(TagRestrictions::from_byte(content.read_u8()?));
		}

		Ok(extended_header)
	}

	/// Render the extended header
	///
	/// * `padding_size` is only written to ID3v2.3 tags
	/// * `crc` is written if provided
	pub(crate) fn as_bytes(
		&self,
		version: Id3v2Version,
		padding_size: u32,
		crc: Option<u32>,
	) -> Result<Vec<u8>> {
		self.verify(version)?;

		let mut bytes = Vec::with_capacity(16);
		match version {
			Id3v2Version::V3 => {
				let (size, flags) = match crc {
					Some(_) => (10, V3_CRC_FLAG),
					None => (6, 0),
				};

				bytes.write_u32::<BigEndian>(size)?;
				bytes.write_u16::<BigEndian>(flags)?;
				bytes.write_u32::<BigEndian>(padding_size)?;

				if let Some(crc) = crc {
					bytes.write_u32::<BigEndian>(crc)?;
				}
			},
			Id3v2Version::V4 => {
				let mut flags = 0;
				let mut flag_data = Vec::new();

				if self.is_update {
					flags |= V4_UPDATE_FLAG;
					flag_data.write_u8(0)?;
				}

				if let Some(crc) = crc {
					flags |= V4_CRC_FLAG;
					flag_data.write_u8(5)?;
					flag_data.write_u8((crc >> 28) as u8)?;
					flag_data.write_u32::<BigEndian>((crc & 0x0FFF_FFFF).synch()?)?;
				}

				if let Some(restrictions) = self.restrictions {
					flags |= V4_RESTRICTIONS_FLAG;
					flag_data.write_u8(1)?;
					flag_data.write_u8(restrictions.as_byte())?;
				}

				// Size (4) + number of flag bytes (1) + flags (1)
				let size = 6 + flag_data.len() as u32;
				bytes.write_u32::<BigEndian>(size.synch()?)?;
				bytes.write_u8(1)?;
				bytes.write_u8(flags)?;
				bytes.write_all(&flag_data)?;
			},
			// Rejected by `verify`
			Id3v2Version::V2 => {},
		}

		Ok(bytes)
	}
}

#[cfg(test)]
mod tests {
	use super::ExtendedHeader;
	use crate::id3::v2::Id3v2Version;
	use crate::id3::v2::restrictions::{TagRestrictions, TagSizeRestrictions};

	#[test_log::test]
	fn parse_v3_with_crc() {
		let bytes = [
			0x00, 0x00, 0x00, 0x0A, // Size
			0x80, 0x00, // Flags
			0x00, 0x00, 0x04, 0x00, // Padding
			0xDE, 0xAD, 0xBE, 0xEF, // CRC
			b'T', b'I', b'T', b'2',
		];

		let mut reader = &bytes[..];
		let extended_header = ExtendedHeader::parse(&mut reader, Id3v2Version::V3).unwrap();

		assert_eq!(extended_header.padding_size(), 1024);
		assert_eq!(extended_header.crc(), Some(0xDEAD_BEEF));
		assert!(!extended_header.is_update());
		assert_eq!(reader, b"TIT2");
	}

	#[test_log::test]
	fn parse_v3_without_crc() {
		let bytes = [0, 0, 0, 6, 0, 0, 0, 0, 0, 0];

		let mut reader = &bytes[..];
		let extended_header = ExtendedHeader::parse(&mut reader, Id3v2Version::V3).unwrap();
		assert_eq!(extended_header.crc(), None);
		assert!(reader.is_empty());
	}

	#[test_log::test]
	fn parse_v4_all_flags() {
		let bytes = [
			0x00, 0x00, 0x00, 0x0F, // Size (15)
			0x01, // Number of flag bytes
			0x70, // Update, CRC, and restrictions
			0x00, // Update data length
			0x05, 0x0F, 0x7F, 0x7F, 0x7F, 0x7F, // CRC
			0x01, 0x40, // Restrictions
			0xAA,
		];

		let mut reader = &bytes[..];
		let extended_header = ExtendedHeader::parse(&mut reader, Id3v2Version::V4).unwrap();

		assert!(extended_header.is_update());
		assert_eq!(extended_header.crc(), Some(0x0F * 0x1000_0000 + 0x0FFF_FFFF));
		assert_eq!(
			extended_header.restrictions().map(|r| r.size),
			Some(TagSizeRestrictions::S_64F_128K)
		);
		assert_eq!(reader, [0xAA]);
	}

	#[test_log::test]
	fn bad_sizes() {
		// Too small
		let bytes = [0, 0, 0, 5, 0, 0, 0, 0, 0];
		assert!(ExtendedHeader::parse(&mut &bytes[..], Id3v2Version::V3).is_err());

		// Larger than the rest of the tag
		let bytes = [0, 0, 0, 0x40, 1, 0];
		let err = ExtendedHeader::parse(&mut &bytes[..], Id3v2Version::V4).unwrap_err();
		assert!(err.is_format_error());

		// CRC flag set, but no room for it
		let bytes = [0, 0, 0, 6, 0x80, 0, 0, 0, 0, 0];
		assert!(ExtendedHeader::parse(&mut &bytes[..], Id3v2Version::V3).is_err());
	}

	#[test_log::test]
	fn render_v4() {
		let mut extended_header = ExtendedHeader::new();
		extended_header.set_update(true);
		extended_header.set_restrictions(Some(TagRestrictions::from_byte(0x40)));

		let bytes = extended_header
			.as_bytes(Id3v2Version::V4, 0, Some(0xFFFF_FFFF))
			.unwrap();
		assert_eq!(
			bytes,
			[
				0x00, 0x00, 0x00, 0x0F, 0x01, 0x70, 0x00, 0x05, 0x0F, 0x7F, 0x7F, 0x7F, 0x7F,
				0x01, 0x40
			]
		);

		let parsed = ExtendedHeader::parse(&mut &bytes[..], Id3v2Version::V4).unwrap();
		assert_eq!(parsed.crc(), Some(0xFFFF_FFFF));
		assert!(parsed.is_update());
	}

	#[test_log::test]
	fn render_v3() {
		let bytes = ExtendedHeader::new()
			.as_bytes(Id3v2Version::V3, 512, None)
			.unwrap();
		assert_eq!(bytes, [0, 0, 0, 6, 0, 0, 0, 0, 0x02, 0x00]);
	}

	#[test_log::test]
	fn v4_only_fields_rejected_in_v3() {
		let mut extended_header = ExtendedHeader::new();
		extended_header.set_update(true);

		let err = extended_header
			.as_bytes(Id3v2Version::V3, 0, None)
			.unwrap_err();
		assert!(err.is_validation_error());
		assert!(extended_header.verify(Id3v2Version::V4).is_ok());
		assert!(ExtendedHeader::new().verify(Id3v2Version::V2).is_err());
	}
}

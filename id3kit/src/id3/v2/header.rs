use crate::config::ParsingMode;
use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::util::synchsafe::SynchsafeInteger;
use crate::macros::{err, parse_mode_choice, validation_err};

use std::io::Read;

use byteorder::{BigEndian, ByteOrder};

pub(crate) const ID3V2_TAG_MARKER: [u8; 3] = *b"ID3";
pub(crate) const ID3V2_FOOTER_MARKER: [u8; 3] = *b"3DI";
pub(crate) const ID3V2_HEADER_SIZE: usize = 10;

/// The ID3v2 version
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash, Default)]
pub enum Id3v2Version {
	/// ID3v2.2
	V2,
	/// ID3v2.3
	V3,
	/// ID3v2.4
	#[default]
	V4,
}

impl Id3v2Version {
	/// The major version number, as stored in the header
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::Id3v2Version;
	///
	/// assert_eq!(Id3v2Version::V3.major(), 3);
	/// ```
	pub fn major(self) -> u8 {
		match self {
			Id3v2Version::V2 => 2,
			Id3v2Version::V3 => 3,
			Id3v2Version::V4 => 4,
		}
	}

	pub(crate) fn from_major(major: u8) -> Option<Self> {
		match major {
			2 => Some(Id3v2Version::V2),
			3 => Some(Id3v2Version::V3),
			4 => Some(Id3v2Version::V4),
			_ => None,
		}
	}

	/// The width of a frame header in this version
	pub(crate) fn frame_header_len(self) -> usize {
		match self {
			Id3v2Version::V2 => 6,
			_ => 10,
		}
	}
}

/// A single flag in the ID3v2 header
///
/// Not every flag exists in every version, see [`TagFlag::is_legal`].
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum TagFlag {
	/// All frames are unsynchronised (all versions)
	Unsynchronisation,
	/// The tag is compressed (ID3v2.2 only)
	///
	/// No compression scheme was ever decided for ID3v2.2, so tags with this flag have their
	/// frames ignored.
	Compression,
	/// An extended header follows the header (ID3v2.3 and ID3v2.4)
	ExtendedHeader,
	/// The tag is in an experimental stage (ID3v2.3 and ID3v2.4)
	Experimental,
	/// A footer follows the tag (ID3v2.4 only)
	Footer,
}

impl TagFlag {
	/// Whether the flag exists in `version`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::{Id3v2Version, TagFlag};
	///
	/// assert!(TagFlag::Footer.is_legal(Id3v2Version::V4));
	/// assert!(!TagFlag::Footer.is_legal(Id3v2Version::V3));
	/// assert!(!TagFlag::ExtendedHeader.is_legal(Id3v2Version::V2));
	/// ```
	pub fn is_legal(self, version: Id3v2Version) -> bool {
		match self {
			TagFlag::Unsynchronisation => true,
			TagFlag::Compression => version == Id3v2Version::V2,
			TagFlag::ExtendedHeader | TagFlag::Experimental => version != Id3v2Version::V2,
			TagFlag::Footer => version == Id3v2Version::V4,
		}
	}

	pub(crate) fn name(self) -> &'static str {
		match self {
			TagFlag::Unsynchronisation => "unsynchronisation",
			TagFlag::Compression => "compression",
			TagFlag::ExtendedHeader => "extended header",
			TagFlag::Experimental => "experimental",
			TagFlag::Footer => "footer",
		}
	}

	fn bit(self) -> u8 {
		match self {
			TagFlag::Unsynchronisation => 0x80,
			// Both occupy the same bit, `is_legal` tells them apart
			TagFlag::Compression | TagFlag::ExtendedHeader => 0x40,
			TagFlag::Experimental => 0x20,
			TagFlag::Footer => 0x10,
		}
	}
}

const ALL_FLAGS: [TagFlag; 5] = [
	TagFlag::Unsynchronisation,
	TagFlag::Compression,
	TagFlag::ExtendedHeader,
	TagFlag::Experimental,
	TagFlag::Footer,
];

/// Flags that apply to the entire tag
///
/// These can only be changed through [`Id3v2Tag::set_flag`](crate::id3::v2::Id3v2Tag::set_flag),
/// which rejects flags that don't exist in the tag's version.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[allow(clippy::struct_excessive_bools)]
pub struct Id3v2TagFlags {
	pub(crate) unsynchronisation: bool,
	pub(crate) compression: bool,
	pub(crate) extended_header: bool,
	pub(crate) experimental: bool,
	pub(crate) footer: bool,
}

impl Id3v2TagFlags {
	/// Decode the flag byte, keeping only the bits defined for `version`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::{Id3v2TagFlags, Id3v2Version, TagFlag};
	///
	/// // In ID3v2.2, 0x40 is compression, not the extended header
	/// let flags = Id3v2TagFlags::parse(0x50, Id3v2Version::V2);
	/// assert!(flags.get(TagFlag::Compression));
	/// assert!(!flags.get(TagFlag::ExtendedHeader));
	/// assert!(!flags.get(TagFlag::Footer));
	/// ```
	pub fn parse(byte: u8, version: Id3v2Version) -> Self {
		let mut flags = Self::default();
		for flag in ALL_FLAGS {
			if flag.is_legal(version) && byte & flag.bit() == flag.bit() {
				*flags.field_mut(flag) = true;
			}
		}

		let known_bits = ALL_FLAGS
			.iter()
			.filter(|flag| flag.is_legal(version))
			.fold(0, |acc, flag| acc | flag.bit());
		if byte & !known_bits != 0 {
			log::debug!(
				"Ignoring undefined ID3v2.{} header flags: {:#04x}",
				version.major(),
				byte & !known_bits
			);
		}

		flags
	}

	/// Encode the flags for `version`
	///
	/// Flags that don't exist in `version` are never set.
	pub fn as_byte(&self, version: Id3v2Version) -> u8 {
		ALL_FLAGS
			.iter()
			.filter(|flag| flag.is_legal(version) && self.get(**flag))
			.fold(0, |acc, flag| acc | flag.bit())
	}

	/// Whether `flag` is set
	pub fn get(&self, flag: TagFlag) -> bool {
		match flag {
			TagFlag::Unsynchronisation => self.unsynchronisation,
			TagFlag::Compression => self.compression,
			TagFlag::ExtendedHeader => self.extended_header,
			TagFlag::Experimental => self.experimental,
			TagFlag::Footer => self.footer,
		}
	}

	/// Set `flag`, failing if it doesn't exist in `version`
	///
	/// # Errors
	///
	/// * `flag` is not legal in `version`, see [`TagFlag::is_legal`]
	pub(crate) fn set(&mut self, flag: TagFlag, value: bool, version: Id3v2Version) -> Result<()> {
		if !flag.is_legal(version) {
			return Err(validation_err!(IllegalFlag {
				flag: flag.name(),
				version,
			}));
		}

		*self.field_mut(flag) = value;
		Ok(())
	}

	fn field_mut(&mut self, flag: TagFlag) -> &mut bool {
		match flag {
			TagFlag::Unsynchronisation => &mut self.unsynchronisation,
			TagFlag::Compression => &mut self.compression,
			TagFlag::ExtendedHeader => &mut self.extended_header,
			TagFlag::Experimental => &mut self.experimental,
			TagFlag::Footer => &mut self.footer,
		}
	}
}

/// The 10 byte header at the start of every ID3v2 tag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Id3v2Header {
	pub(crate) version: Id3v2Version,
	pub(crate) revision: u8,
	pub(crate) flags: Id3v2TagFlags,
	/// The size of the tag contents (**DOES NOT INCLUDE THE HEADER/FOOTER**)
	pub(crate) size: u32,
}

impl Id3v2Header {
	/// Read an ID3v2 header
	///
	/// # Errors
	///
	/// * The reader doesn't start with `ID3`
	/// * The major version is not 2, 3, or 4
	/// * The size is 0
	/// * The size has a high bit set, and [`ParsingMode::Strict`] is used
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::config::ParsingMode;
	/// use id3kit::id3::v2::{Id3v2Header, Id3v2Version};
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// // A size of 1000, synchsafe encoded
	/// let bytes = *b"ID3\x03\x00\x00\x00\x00\x07\x68";
	/// let header = Id3v2Header::parse(&mut &bytes[..], ParsingMode::Strict)?;
	///
	/// assert_eq!(header.version(), Id3v2Version::V3);
	/// assert_eq!(header.size(), 1000);
	/// # Ok(()) }
	/// ```
	pub fn parse<R>(reader: &mut R, parse_mode: ParsingMode) -> Result<Self>
	where
		R: Read,
	{
		log::debug!("Parsing ID3v2 header");

		let mut header = [0; ID3V2_HEADER_SIZE];
		reader.read_exact(&mut header)?;

		if header[..3] != ID3V2_TAG_MARKER {
			err!(FakeTag);
		}

		let Some(version) = Id3v2Version::from_major(header[3]) else {
			return Err(
				Id3v2Error::new(Id3v2ErrorKind::BadId3v2Version(header[3], header[4])).into(),
			);
		};
		let revision = header[4];
		let flags = Id3v2TagFlags::parse(header[5], version);

		let size = read_synchsafe_size(&header[6..], parse_mode)?;
		if size == 0 {
			return Err(Id3v2Error::new(Id3v2ErrorKind::EmptyTag).into());
		}

		Ok(Self {
			version,
			revision,
			flags,
			size,
		})
	}

	/// The ID3v2 version
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// The revision number, stored right after the major version
	pub fn revision(&self) -> u8 {
		self.revision
	}

	/// The tag flags
	pub fn flags(&self) -> Id3v2TagFlags {
		self.flags
	}

	/// The size of the tag, excluding the header and footer
	pub fn size(&self) -> u32 {
		self.size
	}

	/// The total size of the tag, including the header and footer
	pub(crate) fn full_tag_size(&self) -> u64 {
		let footer = if self.flags.footer { 10 } else { 0 };
		u64::from(self.size) + ID3V2_HEADER_SIZE as u64 + footer
	}

	/// Render the header
	///
	/// # Errors
	///
	/// * The size doesn't fit in 28 bits
	pub fn as_bytes(&self) -> Result<[u8; ID3V2_HEADER_SIZE]> {
		self.render(ID3V2_TAG_MARKER)
	}

	/// Render the footer, which is the header with a reversed marker
	pub(crate) fn as_footer_bytes(&self) -> Result<[u8; ID3V2_HEADER_SIZE]> {
		self.render(ID3V2_FOOTER_MARKER)
	}

	fn render(&self, marker: [u8; 3]) -> Result<[u8; ID3V2_HEADER_SIZE]> {
		let mut bytes = [0; ID3V2_HEADER_SIZE];
		bytes[..3].copy_from_slice(&marker);
		bytes[3] = self.version.major();
		bytes[4] = self.revision;
		bytes[5] = self.flags.as_byte(self.version);
		BigEndian::write_u32(&mut bytes[6..], self.size.synch()?);

		Ok(bytes)
	}
}

/// Read the 4 byte synchsafe size used by the header and footer
fn read_synchsafe_size(bytes: &[u8], parse_mode: ParsingMode) -> Result<u32> {
	if bytes.iter().any(|b| b & 0x80 != 0) {
		parse_mode_choice!(
			parse_mode,
			STRICT: return Err(Id3v2Error::new(Id3v2ErrorKind::BadSynchsafeInteger).into()),
			DEFAULT: log::warn!("ID3v2 size has a high bit set, ignoring the extra bits")
		);
	}

	Ok(BigEndian::read_u32(bytes).unsynch())
}

/// Read the footer that follows a tag, and make sure it agrees with `header`
///
/// A mismatch is only an error with [`ParsingMode::Strict`].
pub(crate) fn verify_footer<R>(
	reader: &mut R,
	header: &Id3v2Header,
	parse_mode: ParsingMode,
) -> Result<()>
where
	R: Read,
{
	let mut footer = [0; ID3V2_HEADER_SIZE];
	let matches = match reader.read_exact(&mut footer) {
		Ok(()) => {
			footer[..3] == ID3V2_FOOTER_MARKER
				&& footer[3] == header.version.major()
				&& footer[4] == header.revision
				&& Id3v2TagFlags::parse(footer[5], header.version) == header.flags
				&& BigEndian::read_u32(&footer[6..]).unsynch() == header.size
		},
		Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => false,
		Err(e) => return Err(e.into()),
	};

	if !matches {
		parse_mode_choice!(
			parse_mode,
			STRICT: return Err(Id3v2Error::new(Id3v2ErrorKind::BadFooter).into()),
			DEFAULT: log::warn!("ID3v2 footer doesn't match the header, ignoring")
		);
	}

	Ok(())
}

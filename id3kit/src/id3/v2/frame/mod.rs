pub(super) mod content;
pub(super) mod header;
pub(super) mod read;

use super::items::{AttachedPictureFrame, BinaryFrame, CommentFrame, TextInformationFrame};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::id3::v2::header::Id3v2Version;
use crate::macros::validation_err;
use header::FrameId;

use std::hash::Hash;

macro_rules! define_frames {
	(
		$(#[$meta:meta])*
		pub enum Frame {
			$(
				$(#[$field_meta:meta])+
				$variant:ident($type:ty),
			)*
		}
	) => {
		$(#[$meta])*
		pub enum Frame {
			$(
				$(#[$field_meta])+
				$variant($type),
			)*
		}

		impl Frame {
			/// Get the ID of the frame
			pub fn id(&self) -> &FrameId {
				match self {
					$(
						Frame::$variant(frame) => &frame.header.id,
					)*
				}
			}

			/// Get the flags for the frame
			pub fn flags(&self) -> FrameFlags {
				match self {
					$(
						Frame::$variant(frame) => frame.header.flags,
					)*
				}
			}

			/// Set the flags for the frame
			///
			/// NOTE: The flags are checked against the tag version when the frame is added
			/// to an [`Id3v2Tag`](crate::id3::v2::Id3v2Tag), and again when it is written.
			pub fn set_flags(&mut self, flags: FrameFlags) {
				match self {
					$(
						Frame::$variant(frame) => frame.header.flags = flags,
					)*
				}
			}
		}

		$(
			impl From<$type> for Frame {
				fn from(value: $type) -> Self {
					Frame::$variant(value)
				}
			}
		)*
	}
}

define_frames! {
	/// Represents an `ID3v2` frame
	///
	/// ## Outdated Frames
	///
	/// `ID3v2.2` frame IDs are 3 characters. When reading these tags, [`upgrade_v2`](crate::id3::v2::upgrade_v2) is used, which has a list of all of the common IDs
	/// that have a mapping to `ID3v2.3/4`. Any ID that fails to be converted will be stored as [`FrameId::Outdated`] in a [`Frame::Binary`].
	/// Those frames are only written back to `ID3v2.2` tags.
	#[non_exhaustive]
	#[derive(Clone, Debug, PartialEq, Eq, Hash)]
	pub enum Frame {
		/// Represents a "T..." (excluding TXXX) frame
		Text(TextInformationFrame),
		/// Represents a "COMM" or "USLT" frame
		Comment(CommentFrame),
		/// Represents an "APIC" or "PIC" frame
		Picture(AttachedPictureFrame),
		/// Binary data
		///
		/// NOTES:
		///
		/// * This is used for **all** frames with an ID of [`FrameId::Outdated`]
		/// * This is used for encrypted frames, as their content can't be interpreted
		/// * This is used for unknown frames
		Binary(BinaryFrame),
	}
}

impl Frame {
	/// Extract the string from the [`FrameId`]
	pub fn id_str(&self) -> &str {
		self.id().as_str()
	}

	/// Whether `other` occupies the same place in a tag as `self`
	///
	/// Most frames are unique by their ID. Comments are additionally keyed by their language and
	/// description, and pictures by their type.
	pub(crate) fn same_slot(&self, other: &Frame) -> bool {
		if self.id() != other.id() {
			return false;
		}

		match (self, other) {
			(Frame::Comment(a), Frame::Comment(b)) => {
				a.language == b.language && a.description == b.description
			},
			(Frame::Picture(a), Frame::Picture(b)) => a.picture.pic_type == b.picture.pic_type,
			_ => true,
		}
	}

	pub(super) fn as_bytes(
		&self,
		version: Id3v2Version,
		write_options: WriteOptions,
	) -> Result<Vec<u8>> {
		Ok(match self {
			Frame::Text(tif) => tif.as_bytes(version, write_options)?,
			Frame::Comment(comment) => comment.as_bytes(version, write_options)?,
			Frame::Picture(attached_picture) => attached_picture.as_bytes(version, write_options)?,
			Frame::Binary(frame) => frame.as_bytes(),
		})
	}

	/// Used for errors in write::frame
	pub(super) fn name(&self) -> &'static str {
		match self {
			Frame::Text(_) => "Text",
			Frame::Comment(_) => "Comment",
			Frame::Picture(_) => "Picture",
			Frame::Binary(_) => "Binary",
		}
	}
}

/// Various flags to describe the content of an item
///
/// Which flags exist depends on the tag version:
///
/// * `ID3v2.2` frames have no flags at all
/// * `unsynchronisation` only exists in `ID3v2.4`
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct FrameFlags {
	/// Preserve frame on tag edit
	pub tag_alter_preservation: bool,
	/// Preserve frame on file edit
	pub file_alter_preservation: bool,
	/// Item cannot be written to
	pub read_only: bool,
	/// The group identifier the frame belongs to
	///
	/// All frames with the same group identifier byte belong to the same group.
	pub grouping_identity: Option<u8>,
	/// Frame is zlib compressed
	///
	/// Frames are decompressed when read, and compressed again when written.
	pub compression: bool,
	/// Frame encryption method symbol
	///
	/// NOTE: Since the encryption method is unknown, id3kit cannot do anything with these frames.
	/// Their content is kept as a [`Frame::Binary`].
	///
	/// The encryption method symbol **must** be >= 0x80.
	pub encryption: Option<u8>,
	/// Frame is unsynchronised
	///
	/// In short, this makes all "0xFF X (X >= 0xE0)" combinations into "0xFF 0x00 X" to avoid confusion
	/// with the MPEG frame header, which is often identified by its "frame sync" (11 set bits).
	///
	/// The frame content is re-synchronised when read, and unsynchronised again when written.
	pub unsynchronisation: bool,
	/// Frame has a data length indicator
	///
	/// The data length indicator is the size of the frame content once compression and
	/// unsynchronisation have been undone. It is recalculated when writing, unless the frame is
	/// encrypted.
	///
	/// `ID3v2.3` has no such flag, but stores the decompressed size of compressed frames. For
	/// encrypted frames, that size is kept here so it can be written back.
	pub data_length_indicator: Option<u32>,
}

impl FrameFlags {
	/// Parse the flags from an ID3v2.4 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	/// * `data_length_indicator`
	pub fn parse_id3v24(flags: u16) -> Self {
		FrameFlags {
			tag_alter_preservation: flags & 0x4000 == 0x4000,
			file_alter_preservation: flags & 0x2000 == 0x2000,
			read_only: flags & 0x1000 == 0x1000,
			grouping_identity: (flags & 0x0040 == 0x0040).then_some(0),
			compression: flags & 0x0008 == 0x0008,
			encryption: (flags & 0x0004 == 0x0004).then_some(0),
			unsynchronisation: flags & 0x0002 == 0x0002,
			data_length_indicator: (flags & 0x0001 == 0x0001).then_some(0),
		}
	}

	/// Parse the flags from an ID3v2.3 frame
	///
	/// NOTE: If any of the following flags are set, they will be set to `Some(0)`:
	/// * `grouping_identity`
	/// * `encryption`
	pub fn parse_id3v23(flags: u16) -> Self {
		FrameFlags {
			tag_alter_preservation: flags & 0x8000 == 0x8000,
			file_alter_preservation: flags & 0x4000 == 0x4000,
			read_only: flags & 0x2000 == 0x2000,
			grouping_identity: (flags & 0x0020 == 0x0020).then_some(0),
			compression: flags & 0x0080 == 0x0080,
			encryption: (flags & 0x0040 == 0x0040).then_some(0),
			unsynchronisation: false,
			data_length_indicator: None,
		}
	}

	/// Get the ID3v2.4 byte representation of the flags
	pub fn as_id3v24_bytes(&self) -> u16 {
		let mut flags = 0;

		if *self == FrameFlags::default() {
			return flags;
		}

		if self.tag_alter_preservation {
			flags |= 0x4000
		}

		if self.file_alter_preservation {
			flags |= 0x2000
		}

		if self.read_only {
			flags |= 0x1000
		}

		if self.grouping_identity.is_some() {
			flags |= 0x0040
		}

		if self.compression {
			flags |= 0x0008
		}

		if self.encryption.is_some() {
			flags |= 0x0004
		}

		if self.unsynchronisation {
			flags |= 0x0002
		}

		if self.data_length_indicator.is_some() {
			flags |= 0x0001
		}

		flags
	}

	/// Get the ID3v2.3 byte representation of the flags
	pub fn as_id3v23_bytes(&self) -> u16 {
		let mut flags = 0;

		if *self == FrameFlags::default() {
			return flags;
		}

		if self.tag_alter_preservation {
			flags |= 0x8000
		}

		if self.file_alter_preservation {
			flags |= 0x4000
		}

		if self.read_only {
			flags |= 0x2000
		}

		if self.grouping_identity.is_some() {
			flags |= 0x0020
		}

		if self.compression {
			flags |= 0x0080
		}

		if self.encryption.is_some() {
			flags |= 0x0040
		}

		flags
	}

	/// Check that every set flag exists in `version`
	pub(crate) fn verify(&self, version: Id3v2Version) -> Result<()> {
		let illegal = match version {
			Id3v2Version::V2 => [
				(self.tag_alter_preservation, "tag_alter_preservation"),
				(self.file_alter_preservation, "file_alter_preservation"),
				(self.read_only, "read_only"),
				(self.grouping_identity.is_some(), "grouping_identity"),
				(self.compression, "compression"),
				(self.encryption.is_some(), "encryption"),
				(self.unsynchronisation, "unsynchronisation"),
				(self.data_length_indicator.is_some(), "data_length_indicator"),
			]
			.into_iter()
			.find_map(|(set, name)| set.then_some(name)),
			Id3v2Version::V3 => self.unsynchronisation.then_some("unsynchronisation"),
			Id3v2Version::V4 => None,
		};

		match illegal {
			Some(flag) => Err(validation_err!(IllegalFlag { flag, version })),
			None => Ok(()),
		}
	}
}

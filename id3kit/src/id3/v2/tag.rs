#[cfg(test)]
mod tests;

use super::extended_header::ExtendedHeader;
use super::frame::Frame;
use super::header::{Id3v2Header, Id3v2TagFlags, Id3v2Version, TagFlag, verify_footer};
use super::items::{AttachedPictureFrame, CommentFrame, TextInformationFrame};
use super::read::parse_id3v2;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Id3Error, Result};
use crate::id3::{ID3FindResults, find_id3v2};
use crate::macros::try_vec;
use crate::util::io::{FileLike, Length, Truncate};

use std::io::{Read, Seek, Write};

/// An `ID3v2` tag
///
/// A tag keeps the version it was read as (or created with) for its whole life, and is always
/// written back as that version.
///
/// ## Frame uniqueness
///
/// [`Id3v2Tag::insert`] treats frames as unique by their ID, with two exceptions:
///
/// * Comments (`COMM`) and lyrics (`USLT`) are unique by their language and description
/// * Pictures (`APIC`) are unique by their [`PictureType`](crate::picture::PictureType)
///
/// Use [`Id3v2Tag::push`] to add a frame without replacing anything.
///
/// ## Outdated frames
///
/// `ID3v2.2` frames that have no `ID3v2.3/4` counterpart are kept as [`Frame::Binary`] with a
/// [`FrameId::Outdated`](crate::id3::v2::FrameId::Outdated) ID. They are only written to `ID3v2.2` tags.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Id3v2Tag {
	pub(crate) version: Id3v2Version,
	pub(crate) revision: u8,
	pub(crate) flags: Id3v2TagFlags,
	pub(crate) extended_header: Option<ExtendedHeader>,
	pub(crate) frames: Vec<Frame>,
}

impl IntoIterator for Id3v2Tag {
	type Item = Frame;
	type IntoIter = std::vec::IntoIter<Self::Item>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.into_iter()
	}
}

impl<'a> IntoIterator for &'a Id3v2Tag {
	type Item = &'a Frame;
	type IntoIter = std::slice::Iter<'a, Frame>;

	fn into_iter(self) -> Self::IntoIter {
		self.frames.iter()
	}
}

impl Default for Id3v2Tag {
	fn default() -> Self {
		Self::new(Id3v2Version::V4)
	}
}

impl Id3v2Tag {
	/// Create a new empty `Id3v2Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// let id3v2_tag = Id3v2Tag::new(Id3v2Version::V3);
	/// assert!(id3v2_tag.is_empty());
	/// assert_eq!(id3v2_tag.version(), Id3v2Version::V3);
	/// ```
	pub fn new(version: Id3v2Version) -> Self {
		Self {
			version,
			revision: 0,
			flags: Id3v2TagFlags::default(),
			extended_header: None,
			frames: Vec::new(),
		}
	}

	/// The version of the tag
	pub fn version(&self) -> Id3v2Version {
		self.version
	}

	/// The revision of the tag
	///
	/// This is kept from the header that was read, and is 0 for new tags.
	pub fn revision(&self) -> u8 {
		self.revision
	}

	/// Returns the [`Id3v2TagFlags`]
	pub fn flags(&self) -> Id3v2TagFlags {
		self.flags
	}

	/// Whether `flag` is set
	pub fn flag(&self, flag: TagFlag) -> bool {
		self.flags.get(flag)
	}

	/// Set or clear a header flag
	///
	/// Setting [`TagFlag::ExtendedHeader`] adds an empty [`ExtendedHeader`] if there is none,
	/// clearing it removes the extended header.
	///
	/// # Errors
	///
	/// * `flag` doesn't exist in the tag's version, see [`TagFlag::is_legal`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::{Id3v2Tag, Id3v2Version, TagFlag};
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	///
	/// tag.set_flag(TagFlag::Experimental, true)?;
	/// assert!(tag.flag(TagFlag::Experimental));
	///
	/// // Footers only exist in ID3v2.4
	/// assert!(tag.set_flag(TagFlag::Footer, true).is_err());
	/// # Ok(()) }
	/// ```
	pub fn set_flag(&mut self, flag: TagFlag, value: bool) -> Result<()> {
		self.flags.set(flag, value, self.version)?;

		if flag == TagFlag::ExtendedHeader {
			match value {
				true if self.extended_header.is_none() => {
					self.extended_header = Some(ExtendedHeader::default())
				},
				false => self.extended_header = None,
				_ => {},
			}
		}

		Ok(())
	}

	/// Returns the [`ExtendedHeader`], if present
	pub fn extended_header(&self) -> Option<&ExtendedHeader> {
		self.extended_header.as_ref()
	}

	/// Set or remove the extended header
	///
	/// # Errors
	///
	/// * The tag is `ID3v2.2`, which has no extended header
	/// * `extended_header` uses fields that don't exist in the tag's version
	pub fn set_extended_header(&mut self, extended_header: Option<ExtendedHeader>) -> Result<()> {
		if let Some(extended_header) = &extended_header {
			extended_header.verify(self.version)?;
		}

		self.flags.extended_header = extended_header.is_some();
		self.extended_header = extended_header;
		Ok(())
	}
}

impl Id3v2Tag {
	/// Gets the first [`Frame`] with an id
	pub fn get(&self, id: &str) -> Option<&Frame> {
		self.frames.iter().find(|f| f.id_str() == id)
	}

	/// Gets all of the [`Frame`]s with an id
	pub fn get_all<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Frame> + 'a {
		self.frames.iter().filter(move |f| f.id_str() == id)
	}

	/// Gets the first value of a text frame
	///
	/// NOTE: This will not work for `TXXX` frames, which are kept as [`Frame::Binary`].
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::TextEncoding;
	/// use id3kit::id3::v2::{FrameId, Id3v2Tag, TextInformationFrame};
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let mut tag = Id3v2Tag::default();
	/// tag.insert(
	/// 	TextInformationFrame::with_values(
	/// 		FrameId::new("TPE1")?,
	/// 		TextEncoding::UTF8,
	/// 		vec![String::from("Foo"), String::from("Bar")],
	/// 	)
	/// 	.into(),
	/// )?;
	///
	/// assert_eq!(tag.get_text("TPE1"), Some("Foo"));
	/// # Ok(()) }
	/// ```
	pub fn get_text(&self, id: &str) -> Option<&str> {
		if let Some(Frame::Text(frame)) = self.get(id) {
			return frame.value();
		}

		None
	}

	/// Gets all of the values of a text frame
	pub fn get_texts(&self, id: &str) -> Option<&[String]> {
		if let Some(Frame::Text(TextInformationFrame { values, .. })) = self.get(id) {
			return Some(values);
		}

		None
	}

	/// Inserts a [`Frame`]
	///
	/// This will replace any frame occupying the same slot (see [frame uniqueness](Id3v2Tag#frame-uniqueness)),
	/// returning it.
	///
	/// # Errors
	///
	/// * The frame's flags don't exist in the tag's version, see [`FrameFlags`](crate::id3::v2::FrameFlags)
	pub fn insert(&mut self, frame: Frame) -> Result<Option<Frame>> {
		frame.flags().verify(self.version)?;

		let replaced = self
			.frames
			.iter()
			.position(|f| f.same_slot(&frame))
			.map(|pos| self.frames.remove(pos));

		self.frames.push(frame);
		Ok(replaced)
	}

	/// Appends a [`Frame`], keeping any others with the same ID
	///
	/// # Errors
	///
	/// * The frame's flags don't exist in the tag's version, see [`FrameFlags`](crate::id3::v2::FrameFlags)
	pub fn push(&mut self, frame: Frame) -> Result<()> {
		frame.flags().verify(self.version)?;

		self.frames.push(frame);
		Ok(())
	}

	/// Removes every [`Frame`] with an id
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::TextEncoding;
	/// use id3kit::id3::v2::{Frame, FrameId, Id3v2Tag, TextInformationFrame};
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let mut tag = Id3v2Tag::default();
	///
	/// let tmoo_frame = Frame::Text(TextInformationFrame::new(
	/// 	FrameId::new("TMOO")?,
	/// 	TextEncoding::Latin1,
	/// 	"Classical",
	/// ));
	///
	/// tag.insert(tmoo_frame.clone())?;
	/// assert!(!tag.is_empty());
	///
	/// // We got back exactly what we inserted
	/// assert_eq!(tag.remove("TMOO"), vec![tmoo_frame]);
	/// assert!(tag.is_empty());
	/// # Ok(()) }
	/// ```
	pub fn remove(&mut self, id: &str) -> Vec<Frame> {
		let mut split_idx = 0_usize;

		for read_idx in 0..self.frames.len() {
			if self.frames[read_idx].id_str() == id {
				self.frames.swap(split_idx, read_idx);
				split_idx += 1;
			}
		}

		self.frames.drain(..split_idx).collect()
	}

	/// Retains [`Frame`]s by evaluating the predicate
	pub fn retain<P>(&mut self, predicate: P)
	where
		P: FnMut(&Frame) -> bool,
	{
		self.frames.retain(predicate)
	}

	/// All of the frames, in tag order
	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	/// Returns all comment (`COMM`) frames
	pub fn comments(&self) -> impl Iterator<Item = &CommentFrame> {
		self.frames.iter().filter_map(|frame| match frame {
			Frame::Comment(comment) if comment.id().as_str() == "COMM" => Some(comment),
			_ => None,
		})
	}

	/// Returns all attached picture (`APIC`) frames
	pub fn pictures(&self) -> impl Iterator<Item = &AttachedPictureFrame> {
		self.frames.iter().filter_map(|frame| match frame {
			Frame::Picture(picture) => Some(picture),
			_ => None,
		})
	}

	/// The number of frames in the tag
	pub fn len(&self) -> usize {
		self.frames.len()
	}

	/// Whether the tag has no frames
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}

	/// Removes every frame, keeping the version and flags
	pub fn clear(&mut self) {
		self.frames.clear();
	}
}

impl Id3v2Tag {
	/// Read an `Id3v2Tag` from the current position of a reader
	///
	/// Returns `None` if the reader doesn't start with a tag. Otherwise, the reader is left after
	/// the tag (and its footer).
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * The tag is malformed, see [`ParsingMode`](crate::config::ParsingMode) for what is tolerated
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Option<Self>>
	where
		R: Read + Seek,
	{
		let ID3FindResults(header, body) =
			find_id3v2(reader, true, parse_options.parsing_mode)?;

		let (Some(header), Some(body)) = (header, body) else {
			log::debug!("No ID3v2 tag found");
			return Ok(None);
		};

		parse_id3v2(&body, header, parse_options).map(Some)
	}

	/// Parse an `Id3v2Tag` from a reader that starts with one
	///
	/// Unlike [`Id3v2Tag::read_from`], this doesn't need [`Seek`].
	///
	/// # Errors
	///
	/// * The reader doesn't start with an ID3v2 header
	/// * [`std::io::Error`]
	/// * The tag is malformed, see [`ParsingMode`](crate::config::ParsingMode) for what is tolerated
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::config::ParseOptions;
	/// use id3kit::id3::v2::{Id3v2Tag, Id3v2Version};
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let bytes = b"ID3\x03\x00\x00\x00\x00\x00\x10TIT2\x00\x00\x00\x06\x00\x00\x00Hello";
	/// let tag = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new())?;
	///
	/// assert_eq!(tag.version(), Id3v2Version::V3);
	/// assert_eq!(tag.get_text("TIT2"), Some("Hello"));
	/// # Ok(()) }
	/// ```
	pub fn parse<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read,
	{
		let header = Id3v2Header::parse(reader, parse_options.parsing_mode)?;

		let mut body = try_vec![0; header.size as usize];
		reader.read_exact(&mut body)?;

		if header.flags.footer {
			verify_footer(reader, &header, parse_options.parsing_mode)?;
		}

		parse_id3v2(&body, header, parse_options)
	}

	/// Write the tag to a file
	///
	/// Any existing ID3v2 tag at the start of the file is replaced. Writing an empty tag
	/// removes the existing tag.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * A frame can't be written in the tag's version
	/// * The tag is too large
	pub fn write_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		Id3Error: From<<F as Truncate>::Error>,
		Id3Error: From<<F as Length>::Error>,
	{
		super::write::write_id3v2(file, self, write_options)
	}

	/// Dumps the tag to a writer
	///
	/// Nothing is written for an empty tag.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * A frame can't be written in the tag's version
	/// * The tag is too large
	pub fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let id3v2 = super::write::create_tag(self, write_options)?;
		writer.write_all(&id3v2)?;
		Ok(())
	}

	/// Render the tag, including its header, padding, and footer
	///
	/// An empty tag renders to nothing.
	///
	/// # Errors
	///
	/// See [`Id3v2Tag::dump_to`]
	pub fn as_bytes(&self, write_options: WriteOptions) -> Result<Vec<u8>> {
		super::write::create_tag(self, write_options)
	}

	/// Remove an ID3v2 tag from the start of a file
	///
	/// This is a no-op if the file has no ID3v2 tag.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * The existing header is malformed
	pub fn remove_from<F>(file: &mut F) -> Result<()>
	where
		F: FileLike,
		Id3Error: From<<F as Truncate>::Error>,
		Id3Error: From<<F as Length>::Error>,
	{
		super::write::write_id3v2(file, &Id3v2Tag::default(), WriteOptions::default())
	}
}

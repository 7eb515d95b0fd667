use super::constants::GENRES;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Id3Error, Result};
use crate::id3::{ID3FindResults, find_id3v1};
use crate::macros::validation_err;
use crate::util::io::{FileLike, Length, Truncate};
use crate::util::text::TextEncoding;

use std::io::{Read, Seek, Write};

macro_rules! impl_accessor {
	($($name:ident,)+) => {
		paste::paste! {
			$(
				#[doc = "Returns the " $name ", if set"]
				pub fn $name(&self) -> Option<&str> {
					self.$name.as_deref()
				}

				#[doc = "Sets the " $name]
				///
				/// # Errors
				///
				/// * The value contains characters outside of Latin-1
				/// * The value is longer than 30 bytes
				pub fn [<set_ $name>](&mut self, value: String) -> Result<()> {
					verify_field(stringify!($name), &value, 30)?;
					self.$name = Some(value);
					Ok(())
				}

				#[doc = "Removes the " $name]
				pub fn [<remove_ $name>](&mut self) {
					self.$name = None
				}
			)+
		}
	}
}

/// The version of an ID3v1 tag
#[derive(Default, Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Id3v1Version {
	/// ID3v1.0, with a 30 byte comment and no track number
	V1_0,
	/// ID3v1.1, with a 28 byte comment and a track number
	#[default]
	V1_1,
}

/// An ID3v1 tag
///
/// ID3v1 is a severely limited format, with each field being incredibly small in size.
/// All setters check their input against the field's maximum size and restrictions,
/// and fail instead of silently shrinking the value.
///
/// The version of a tag is fixed at creation, as it decides the size of the comment field
/// and whether a track number is available at all.
///
/// | Field   | v1.0               | v1.1               |
/// |---------|--------------------|--------------------|
/// | title   | 30 bytes           | 30 bytes           |
/// | artist  | 30 bytes           | 30 bytes           |
/// | album   | 30 bytes           | 30 bytes           |
/// | year    | 4 digits           | 4 digits           |
/// | comment | 30 bytes           | 28 bytes           |
/// | track   | N/A                | 1..=99             |
/// | genre   | One of [`GENRES`]  | One of [`GENRES`]  |
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Id3v1Tag {
	pub(crate) version: Id3v1Version,
	pub(crate) title: Option<String>,
	pub(crate) artist: Option<String>,
	pub(crate) album: Option<String>,
	pub(crate) year: Option<u16>,
	pub(crate) comment: Option<String>,
	pub(crate) track_number: Option<u8>,
	pub(crate) genre: Option<u8>,
}

impl Id3v1Tag {
	/// Create a new empty `Id3v1Tag`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v1::{Id3v1Tag, Id3v1Version};
	///
	/// let id3v1_tag = Id3v1Tag::new(Id3v1Version::V1_1);
	/// assert!(id3v1_tag.is_empty());
	/// ```
	pub fn new(version: Id3v1Version) -> Self {
		Self {
			version,
			..Self::default()
		}
	}

	/// Returns the tag's [`Id3v1Version`]
	pub fn version(&self) -> Id3v1Version {
		self.version
	}

	impl_accessor!(title, artist, album,);

	/// Returns the year, if set
	pub fn year(&self) -> Option<u16> {
		self.year
	}

	/// Sets the year
	///
	/// # Errors
	///
	/// * `year` is not exactly 4 ASCII digits
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v1::Id3v1Tag;
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let mut tag = Id3v1Tag::default();
	/// tag.set_year("2003")?;
	/// assert_eq!(tag.year(), Some(2003));
	///
	/// assert!(tag.set_year("03").is_err());
	/// # Ok(()) }
	/// ```
	pub fn set_year(&mut self, year: &str) -> Result<()> {
		if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
			return Err(validation_err!(InvalidYear(year.to_owned())));
		}

		self.year = year.parse().ok();
		Ok(())
	}

	/// Removes the year
	pub fn remove_year(&mut self) {
		self.year = None;
	}

	/// Returns the comment, if set
	pub fn comment(&self) -> Option<&str> {
		self.comment.as_deref()
	}

	/// Sets the comment
	///
	/// # Errors
	///
	/// * The value contains characters outside of Latin-1
	/// * The value is longer than 28 bytes (ID3v1.1) or 30 bytes (ID3v1.0)
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v1::{Id3v1Tag, Id3v1Version};
	///
	/// let comment = "a".repeat(29);
	///
	/// let mut v11 = Id3v1Tag::new(Id3v1Version::V1_1);
	/// assert!(v11.set_comment(comment.clone()).is_err());
	///
	/// let mut v10 = Id3v1Tag::new(Id3v1Version::V1_0);
	/// assert!(v10.set_comment(comment).is_ok());
	/// ```
	pub fn set_comment(&mut self, comment: String) -> Result<()> {
		verify_field("comment", &comment, self.comment_len())?;
		self.comment = Some(comment);
		Ok(())
	}

	/// Removes the comment
	pub fn remove_comment(&mut self) {
		self.comment = None;
	}

	/// Returns the track number, if set
	///
	/// # Errors
	///
	/// * The tag is [`Id3v1Version::V1_0`], which has no track number
	pub fn track(&self) -> Result<Option<u8>> {
		if self.version == Id3v1Version::V1_0 {
			return Err(validation_err!(TrackUnsupported));
		}

		Ok(self.track_number)
	}

	/// Sets the track number
	///
	/// # Errors
	///
	/// * The tag is [`Id3v1Version::V1_0`], which has no track number
	/// * `track` is not within `1..=99`
	pub fn set_track(&mut self, track: u8) -> Result<()> {
		if self.version == Id3v1Version::V1_0 {
			return Err(validation_err!(TrackUnsupported));
		}

		if !(1..=99).contains(&track) {
			return Err(validation_err!(InvalidTrack(track)));
		}

		self.track_number = Some(track);
		Ok(())
	}

	/// Removes the track number
	pub fn remove_track(&mut self) {
		self.track_number = None;
	}

	/// Returns the genre name, if set
	pub fn genre(&self) -> Option<&'static str> {
		self.genre.and_then(|index| GENRES.get(usize::from(index)).copied())
	}

	/// Returns the raw genre index, if set
	pub fn genre_index(&self) -> Option<u8> {
		self.genre
	}

	/// Sets the genre by name
	///
	/// The lookup is case-insensitive.
	///
	/// # Errors
	///
	/// * `genre` is not present in [`GENRES`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v1::Id3v1Tag;
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let mut tag = Id3v1Tag::default();
	/// tag.set_genre("hip-hop")?;
	///
	/// assert_eq!(tag.genre(), Some("Hip-Hop"));
	/// assert_eq!(tag.genre_index(), Some(7));
	/// # Ok(()) }
	/// ```
	pub fn set_genre(&mut self, genre: &str) -> Result<()> {
		match GENRES.iter().position(|g| g.eq_ignore_ascii_case(genre)) {
			Some(index) => {
				self.genre = Some(index as u8);
				Ok(())
			},
			None => Err(validation_err!(UnknownGenre(genre.to_owned()))),
		}
	}

	/// Removes the genre
	pub fn remove_genre(&mut self) {
		self.genre = None;
	}

	/// Whether the tag has no fields set
	pub fn is_empty(&self) -> bool {
		self.title.is_none()
			&& self.artist.is_none()
			&& self.album.is_none()
			&& self.year.is_none()
			&& self.comment.is_none()
			&& self.track_number.is_none()
			&& self.genre.is_none()
	}

	/// Clears every field, keeping the version
	pub fn clear(&mut self) {
		*self = Self::new(self.version);
	}

	pub(crate) fn comment_len(&self) -> usize {
		match self.version {
			Id3v1Version::V1_0 => 30,
			Id3v1Version::V1_1 => 28,
		}
	}

	/// Read an `Id3v1Tag` from the end of a reader
	///
	/// Returns `None` if no tag is present. The reader is left at the end of the stream.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	/// * The year is malformed, and [`ParsingMode::Strict`](crate::config::ParsingMode::Strict) is used
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Option<Self>>
	where
		R: Read + Seek,
	{
		let ID3FindResults(_, tag) = find_id3v1(reader, true, parse_options.parsing_mode)?;
		Ok(tag)
	}

	/// Write the tag to a file
	///
	/// An existing ID3v1 tag is overwritten in place, otherwise the tag is appended.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	pub fn write_to<F>(&self, file: &mut F, write_options: WriteOptions) -> Result<()>
	where
		F: FileLike,
		Id3Error: From<<F as Truncate>::Error>,
		Id3Error: From<<F as Length>::Error>,
	{
		super::write::write_id3v1(file, self, write_options)
	}

	/// Dumps the tag to a writer
	///
	/// This writes exactly 128 bytes.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	pub fn dump_to<W: Write>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()> {
		let tag = super::write::encode(self, write_options)?;
		writer.write_all(&tag)?;
		Ok(())
	}

	/// Remove an ID3v1 tag from a file
	///
	/// This is a no-op if the file has no ID3v1 tag.
	///
	/// # Errors
	///
	/// * [`std::io::Error`]
	pub fn remove_from<F>(file: &mut F) -> Result<()>
	where
		F: FileLike,
		Id3Error: From<<F as Truncate>::Error>,
		Id3Error: From<<F as Length>::Error>,
	{
		super::write::strip_id3v1(file)
	}
}

fn verify_field(field: &'static str, value: &str, max: usize) -> Result<()> {
	if !TextEncoding::verify_latin1(value) {
		return Err(validation_err!(UnrepresentableText(field)));
	}

	// Every Latin-1 character is a single byte
	let len = value.chars().count();
	if len > max {
		return Err(validation_err!(FieldTooLong { field, max, len }));
	}

	Ok(())
}

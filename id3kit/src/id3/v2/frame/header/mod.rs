pub(super) mod parse;

use crate::error::{Id3v2Error, Id3v2ErrorKind, Result};
use crate::id3::v2::FrameFlags;
use crate::id3::v2::header::Id3v2Version;
use crate::id3::v2::util::upgrade::downgrade_v2;

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// An ID3v2 frame header
///
/// These are rarely constructed by hand. Usually they are created in the background
/// when making a new [`Frame`](crate::id3::v2::Frame).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FrameHeader {
	pub(crate) id: FrameId,
	/// The frame flags
	pub flags: FrameFlags,
}

impl FrameHeader {
	/// Create a new [`FrameHeader`]
	///
	/// NOTE: Once the header is created, the ID becomes immutable.
	pub const fn new(id: FrameId, flags: FrameFlags) -> Self {
		Self { id, flags }
	}

	/// Get the ID of the frame
	pub const fn id(&self) -> &FrameId {
		&self.id
	}
}

/// An ID3v2 frame ID
///
/// IDs read from ID3v2.2 tags are upgraded to their ID3v2.3/4 counterparts where possible
/// (see [`upgrade_v2`](crate::id3::v2::upgrade_v2)), so frames can be looked up the same way
/// regardless of version.
#[derive(PartialEq, Clone, Debug, Eq, Hash)]
pub enum FrameId {
	/// A 4 character ID3v2.3/4 ID
	Valid(Cow<'static, str>),
	/// A 3 character ID3v2.2 ID that has no ID3v2.3/4 counterpart
	///
	/// These are only written to ID3v2.2 tags, and are dropped from anything newer.
	Outdated(Cow<'static, str>),
}

impl FrameId {
	/// Attempts to create a `FrameId` from an ID string
	///
	/// NOTE: This will not upgrade IDs.
	///
	/// # Errors
	///
	/// * `id` contains invalid characters (must be 'A'..='Z' and '0'..='9')
	/// * `id` is an invalid length (must be 3 or 4)
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::FrameId;
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// let title = FrameId::new("TIT2")?;
	/// assert!(title.is_valid());
	///
	/// let old_title = FrameId::new("TT2")?;
	/// assert!(old_title.is_outdated());
	///
	/// assert!(FrameId::new("tit2").is_err());
	/// assert!(FrameId::new("TITLE").is_err());
	/// # Ok(()) }
	/// ```
	pub fn new<I>(id: I) -> Result<Self>
	where
		I: Into<Cow<'static, str>>,
	{
		Self::new_cow(id.into())
	}

	// Split from generic, public method to avoid code bloat by monomorphization.
	pub(crate) fn new_cow(id: Cow<'static, str>) -> Result<Self> {
		Self::verify_id(&id)?;

		match id.len() {
			3 => Ok(FrameId::Outdated(id)),
			4 => Ok(FrameId::Valid(id)),
			_ => Err(
				Id3v2Error::new(Id3v2ErrorKind::BadFrameId(id.into_owned().into_bytes())).into(),
			),
		}
	}

	/// Whether this frame ID represents an outdated (ID3v2.2) ID
	pub fn is_outdated(&self) -> bool {
		matches!(self, FrameId::Outdated(_))
	}

	/// Whether this frame ID represents a valid (ID3v2.3 or ID3v2.4) ID
	pub fn is_valid(&self) -> bool {
		matches!(self, FrameId::Valid(_))
	}

	/// Extracts the string from the ID
	pub fn as_str(&self) -> &str {
		match self {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}

	/// Consumes the [`FrameId`], returning the inner value
	pub fn into_inner(self) -> Cow<'static, str> {
		match self {
			FrameId::Valid(v) | FrameId::Outdated(v) => v,
		}
	}

	/// The ID as it is written in a tag of `version`
	///
	/// This is `None` when the ID can't be represented in `version`.
	pub(crate) fn for_version(&self, version: Id3v2Version) -> Option<&str> {
		match (self, version) {
			(FrameId::Valid(id), Id3v2Version::V3 | Id3v2Version::V4) => Some(id),
			(FrameId::Valid(id), Id3v2Version::V2) => downgrade_v2(id),
			(FrameId::Outdated(id), Id3v2Version::V2) => Some(id),
			(FrameId::Outdated(_), _) => None,
		}
	}

	pub(crate) fn verify_id(id_str: &str) -> Result<()> {
		for c in id_str.chars() {
			if !c.is_ascii_uppercase() && !c.is_ascii_digit() {
				return Err(Id3v2Error::new(Id3v2ErrorKind::BadFrameId(
					id_str.as_bytes().to_vec(),
				))
				.into());
			}
		}

		Ok(())
	}
}

impl Display for FrameId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<FrameId> for Cow<'static, str> {
	fn from(id: FrameId) -> Self {
		id.into_inner()
	}
}

//! Attached picture handling

use crate::error::Result;
use crate::macros::validation_err;

use std::fmt::{Display, Formatter};

/// Names of every defined [`PictureType`], indexed by their byte value
pub const PICTURE_TYPES: [&str; 21] = [
	"Other",
	"32x32 pixels 'file icon' (PNG only)",
	"Other file icon",
	"Cover (front)",
	"Cover (back)",
	"Leaflet page",
	"Media (e.g. label side of CD)",
	"Lead artist/lead performer/soloist",
	"Artist/performer",
	"Conductor",
	"Band/Orchestra",
	"Composer",
	"Lyricist/text writer",
	"Recording Location",
	"During recording",
	"During performance",
	"Movie/video screen capture",
	"A bright coloured fish",
	"Illustration",
	"Band/artist logotype",
	"Publisher/Studio logotype",
];

/// Mime types for pictures.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum MimeType {
	/// PNG image
	Png,
	/// JPEG image
	Jpeg,
	/// TIFF image
	Tiff,
	/// BMP image
	Bmp,
	/// GIF image
	Gif,
	/// Some unknown mime type
	Unknown(String),
}

impl MimeType {
	/// Get a `MimeType` from a string
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::picture::MimeType;
	///
	/// let jpeg_mimetype_str = "image/jpeg";
	/// assert_eq!(MimeType::from_str(jpeg_mimetype_str), MimeType::Jpeg);
	/// ```
	#[must_use]
	#[allow(clippy::should_implement_trait)] // Infallible in contrast to FromStr
	pub fn from_str(mime_type: &str) -> Self {
		match &*mime_type.to_lowercase() {
			"image/jpeg" | "image/jpg" => Self::Jpeg,
			"image/png" => Self::Png,
			"image/tiff" => Self::Tiff,
			"image/bmp" => Self::Bmp,
			"image/gif" => Self::Gif,
			_ => Self::Unknown(mime_type.to_owned()),
		}
	}

	/// Get a &str from a `MimeType`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::picture::MimeType;
	///
	/// let jpeg_mimetype = MimeType::Jpeg;
	/// assert_eq!(jpeg_mimetype.as_str(), "image/jpeg")
	/// ```
	#[must_use]
	pub fn as_str(&self) -> &str {
		match self {
			MimeType::Jpeg => "image/jpeg",
			MimeType::Png => "image/png",
			MimeType::Tiff => "image/tiff",
			MimeType::Bmp => "image/bmp",
			MimeType::Gif => "image/gif",
			MimeType::Unknown(unknown) => unknown,
		}
	}

	/// Get a `MimeType` from an ID3v2.2 `PIC` image format
	///
	/// Unlike the later versions, ID3v2.2 stores a 3 character image format instead of a mime type.
	pub fn from_v22_format(format: [u8; 3]) -> Self {
		match format.to_ascii_uppercase().as_slice() {
			b"PNG" => Self::Png,
			b"JPG" => Self::Jpeg,
			b"TIF" => Self::Tiff,
			b"BMP" => Self::Bmp,
			b"GIF" => Self::Gif,
			_ => Self::Unknown(format.iter().map(|b| *b as char).collect()),
		}
	}

	/// Get the ID3v2.2 `PIC` image format for a `MimeType`
	///
	/// This is only `None` for [`MimeType::Unknown`] values that aren't already 3 ASCII characters.
	pub fn as_v22_format(&self) -> Option<[u8; 3]> {
		match self {
			MimeType::Png => Some(*b"PNG"),
			MimeType::Jpeg => Some(*b"JPG"),
			MimeType::Tiff => Some(*b"TIF"),
			MimeType::Bmp => Some(*b"BMP"),
			MimeType::Gif => Some(*b"GIF"),
			MimeType::Unknown(unknown) => match unknown.as_bytes() {
				[a, b, c] if unknown.is_ascii() => Some([*a, *b, *c]),
				_ => None,
			},
		}
	}
}

impl Display for MimeType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The picture type, according to ID3v2 APIC
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum PictureType {
	Other,
	Icon,
	OtherIcon,
	CoverFront,
	CoverBack,
	Leaflet,
	Media,
	LeadArtist,
	Artist,
	Conductor,
	Band,
	Composer,
	Lyricist,
	RecordingLocation,
	DuringRecording,
	DuringPerformance,
	ScreenCapture,
	BrightFish,
	Illustration,
	BandLogo,
	PublisherLogo,
	/// A value outside of the defined enumeration, as found in a tag
	Undefined(u8),
}

impl PictureType {
	/// Get a u8 from a `PictureType` according to ID3v2 APIC
	pub fn as_u8(&self) -> u8 {
		match self {
			Self::Other => 0,
			Self::Icon => 1,
			Self::OtherIcon => 2,
			Self::CoverFront => 3,
			Self::CoverBack => 4,
			Self::Leaflet => 5,
			Self::Media => 6,
			Self::LeadArtist => 7,
			Self::Artist => 8,
			Self::Conductor => 9,
			Self::Band => 10,
			Self::Composer => 11,
			Self::Lyricist => 12,
			Self::RecordingLocation => 13,
			Self::DuringRecording => 14,
			Self::DuringPerformance => 15,
			Self::ScreenCapture => 16,
			Self::BrightFish => 17,
			Self::Illustration => 18,
			Self::BandLogo => 19,
			Self::PublisherLogo => 20,
			Self::Undefined(i) => *i,
		}
	}

	/// Get a `PictureType` from a u8 according to ID3v2 APIC
	///
	/// Values outside of the enumeration become [`PictureType::Undefined`].
	pub fn from_u8(byte: u8) -> Self {
		match byte {
			0 => Self::Other,
			1 => Self::Icon,
			2 => Self::OtherIcon,
			3 => Self::CoverFront,
			4 => Self::CoverBack,
			5 => Self::Leaflet,
			6 => Self::Media,
			7 => Self::LeadArtist,
			8 => Self::Artist,
			9 => Self::Conductor,
			10 => Self::Band,
			11 => Self::Composer,
			12 => Self::Lyricist,
			13 => Self::RecordingLocation,
			14 => Self::DuringRecording,
			15 => Self::DuringPerformance,
			16 => Self::ScreenCapture,
			17 => Self::BrightFish,
			18 => Self::Illustration,
			19 => Self::BandLogo,
			20 => Self::PublisherLogo,
			i => Self::Undefined(i),
		}
	}

	/// Get a `PictureType` from a u8, rejecting values outside of the enumeration
	///
	/// # Errors
	///
	/// * `byte` > 20
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::picture::PictureType;
	///
	/// assert_eq!(PictureType::try_from_u8(3).unwrap(), PictureType::CoverFront);
	/// assert!(PictureType::try_from_u8(21).is_err());
	/// ```
	pub fn try_from_u8(byte: u8) -> Result<Self> {
		match Self::from_u8(byte) {
			Self::Undefined(ty) => Err(validation_err!(UnknownPictureType(ty))),
			ty => Ok(ty),
		}
	}

	/// A human readable description of the picture type
	///
	/// This is `None` for [`PictureType::Undefined`].
	pub fn description(&self) -> Option<&'static str> {
		PICTURE_TYPES.get(usize::from(self.as_u8())).copied().filter(|_| !self.is_undefined())
	}

	/// Whether this is a value outside of the defined enumeration
	pub fn is_undefined(&self) -> bool {
		matches!(self, Self::Undefined(_))
	}
}

/// Represents a picture.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Picture {
	pub(crate) pic_type: PictureType,
	pub(crate) mime_type: Option<MimeType>,
	pub(crate) description: Option<String>,
	pub(crate) data: Vec<u8>,
}

impl Picture {
	/// Create a new `Picture`
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::picture::{MimeType, Picture, PictureType};
	///
	/// let picture = Picture::new(
	/// 	PictureType::CoverFront,
	/// 	Some(MimeType::Png),
	/// 	None,
	/// 	vec![0x89, b'P', b'N', b'G'],
	/// );
	///
	/// assert_eq!(picture.data().len(), 4);
	/// ```
	pub fn new(
		pic_type: PictureType,
		mime_type: Option<MimeType>,
		description: Option<String>,
		data: Vec<u8>,
	) -> Self {
		Self {
			pic_type,
			mime_type,
			description,
			data,
		}
	}

	/// Returns the [`PictureType`]
	pub fn pic_type(&self) -> PictureType {
		self.pic_type
	}

	/// Sets the [`PictureType`]
	///
	/// # Errors
	///
	/// * `pic_type` is [`PictureType::Undefined`]
	pub fn set_pic_type(&mut self, pic_type: PictureType) -> Result<()> {
		if let PictureType::Undefined(ty) = pic_type {
			return Err(validation_err!(UnknownPictureType(ty)));
		}

		self.pic_type = pic_type;
		Ok(())
	}

	/// Returns the [`MimeType`]
	pub fn mime_type(&self) -> Option<&MimeType> {
		self.mime_type.as_ref()
	}

	/// Sets the [`MimeType`]
	pub fn set_mime_type(&mut self, mime_type: MimeType) {
		self.mime_type = Some(mime_type);
	}

	/// Returns the description
	pub fn description(&self) -> Option<&str> {
		self.description.as_deref()
	}

	/// Sets the description
	pub fn set_description(&mut self, description: Option<String>) {
		self.description = description;
	}

	/// Returns the picture data
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Consumes a `Picture`, returning the data
	pub fn into_data(self) -> Vec<u8> {
		self.data
	}
}

#[cfg(test)]
mod tests {
	use super::{MimeType, Picture, PictureType};

	#[test_log::test]
	fn picture_type_bounds() {
		for i in 0..=20u8 {
			let ty = PictureType::from_u8(i);
			assert!(!ty.is_undefined());
			assert_eq!(ty.as_u8(), i);
			assert!(ty.description().is_some());
		}

		assert_eq!(PictureType::from_u8(21), PictureType::Undefined(21));
		assert!(PictureType::from_u8(0xFF).description().is_none());
		assert!(PictureType::try_from_u8(21).unwrap_err().is_validation_error());
		assert_eq!(
			PictureType::CoverFront.description(),
			Some("Cover (front)")
		);
	}

	#[test_log::test]
	fn set_undefined_pic_type() {
		let mut picture = Picture::new(PictureType::Other, None, None, Vec::new());
		assert!(picture.set_pic_type(PictureType::Undefined(42)).is_err());
		assert_eq!(picture.pic_type(), PictureType::Other);

		picture.set_pic_type(PictureType::CoverBack).unwrap();
		assert_eq!(picture.pic_type(), PictureType::CoverBack);
	}

	#[test_log::test]
	fn v22_image_format() {
		assert_eq!(MimeType::from_v22_format(*b"jpg"), MimeType::Jpeg);
		assert_eq!(MimeType::Png.as_v22_format(), Some(*b"PNG"));
		assert_eq!(
			MimeType::from_v22_format(*b"XYZ"),
			MimeType::Unknown(String::from("XYZ"))
		);
		assert_eq!(
			MimeType::Unknown(String::from("image/webp")).as_v22_format(),
			None
		);
	}
}

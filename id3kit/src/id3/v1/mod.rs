//! ID3v1 items
//!
//! # ID3v1 notes
//!
//! An ID3v1 tag is a fixed 128 byte block at the very end of a file. See also: [`Id3v1Tag`]
//!
//! ## Genres
//!
//! ID3v1 stores the genre in a single byte, which is an index into [`GENRES`]. Genres are
//! set and retrieved by name.
//!
//! ## Track Numbers
//!
//! ID3v1.1 steals the final two bytes of the comment field to store a track number. As such,
//! ID3v1.0 tags have no track number, and attempting to access it is an error.

pub(crate) mod constants;
pub(crate) mod read;
pub(crate) mod tag;
pub(crate) mod write;

pub use constants::GENRES;
pub use tag::{Id3v1Tag, Id3v1Version};

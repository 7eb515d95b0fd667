//! ID3v2 items and utilities
//!
//! ## Important notes
//!
//! See:
//!
//! * [`Id3v2Tag`]
//! * [`Frame`]

mod extended_header;
mod frame;
pub(crate) mod header;
mod items;
pub(crate) mod read;
mod restrictions;
pub(crate) mod tag;
pub mod util;
pub(crate) mod write;

// Exports

pub use extended_header::ExtendedHeader;
pub use header::{Id3v2Header, Id3v2TagFlags, Id3v2Version, TagFlag};
pub use util::upgrade::{downgrade_v2, upgrade_v2};

pub use tag::Id3v2Tag;

pub use items::*;

pub use frame::header::{FrameHeader, FrameId};
pub use frame::{Frame, FrameFlags};

pub use restrictions::{
	ImageSizeRestrictions, TagRestrictions, TagSizeRestrictions, TextSizeRestrictions,
};

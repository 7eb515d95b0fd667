//! Read, edit, and write ID3v1 and ID3v2 tags.
//!
//! # Supported Tags
//!
//! | Tag    | Versions           | Location               |
//! |--------|--------------------|------------------------|
//! | ID3v1  | 1.0, 1.1           | Last 128 bytes         |
//! | ID3v2  | 2.2, 2.3, 2.4      | Start of the stream    |
//!
//! # Examples
//!
//! ## Reading an ID3v2 tag
//!
//! ```rust,no_run
//! # fn main() -> id3kit::error::Result<()> {
//! use id3kit::config::ParseOptions;
//! use id3kit::id3::v2::Id3v2Tag;
//! use std::fs::File;
//!
//! let mut file = File::open("test.mp3")?;
//!
//! if let Some(tag) = Id3v2Tag::read_from(&mut file, ParseOptions::new())? {
//! 	println!("Title: {:?}", tag.get_text("TIT2"));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Editing and writing
//!
//! ```rust,no_run
//! # fn main() -> id3kit::error::Result<()> {
//! use id3kit::TextEncoding;
//! use id3kit::config::WriteOptions;
//! use id3kit::id3::v2::{FrameId, Id3v2Tag, Id3v2Version, TextInformationFrame};
//! use std::fs::OpenOptions;
//!
//! let mut file = OpenOptions::new().read(true).write(true).open("test.mp3")?;
//!
//! let mut tag = Id3v2Tag::new(Id3v2Version::V3);
//! tag.insert(
//! 	TextInformationFrame::new(FrameId::new("TIT2")?, TextEncoding::UTF16, "Foo title").into(),
//! )?;
//!
//! // Replaces any existing ID3v2 tag at the start of the file
//! tag.write_to(&mut file, WriteOptions::default())?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Removing tags
//!
//! ```rust,no_run
//! # fn main() -> id3kit::error::Result<()> {
//! use id3kit::id3::TagType;
//! use std::fs::OpenOptions;
//!
//! let mut file = OpenOptions::new().read(true).write(true).open("test.mp3")?;
//!
//! TagType::Id3v1.remove_from(&mut file)?;
//! TagType::Id3v2.remove_from(&mut file)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Important format-specific notes
//!
//! ID3v2 tags are never converted between versions. A tag is written back as the version it was
//! read as, and frames or encodings that don't exist in that version are substituted or dropped
//! (with a warning). Be sure to read the module documentation of [`id3::v2`].
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod config;
pub mod error;
pub mod id3;
pub(crate) mod macros;
pub mod picture;
mod util;

pub use util::text::TextEncoding;

pub use util::io;

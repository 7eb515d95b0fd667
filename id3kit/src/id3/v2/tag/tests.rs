use crate::config::{ParseOptions, ParsingMode};
use crate::id3::v2::{
	BinaryFrame, CommentFrame, ExtendedHeader, FrameFlags, FrameId, TagRestrictions,
	TagSizeRestrictions,
};
use crate::picture::{MimeType, Picture, PictureType};
use crate::util::text::TextEncoding;

use super::*;

use std::io::Cursor;

fn text_frame(id: &'static str, value: &str) -> Frame {
	Frame::Text(TextInformationFrame::new(
		FrameId::new(id).unwrap(),
		TextEncoding::Latin1,
		value,
	))
}

fn picture_frame(pic_type: PictureType, data: &[u8]) -> Frame {
	Frame::Picture(AttachedPictureFrame::new(
		TextEncoding::Latin1,
		Picture::new(pic_type, Some(MimeType::Png), None, data.to_vec()),
	))
}

fn dump_and_re_read(tag: &Id3v2Tag, write_options: WriteOptions) -> Id3v2Tag {
	let mut tag_bytes = Vec::new();
	tag.dump_to(&mut tag_bytes, write_options).unwrap();

	Id3v2Tag::parse(
		&mut &tag_bytes[..],
		ParseOptions::new().parsing_mode(ParsingMode::Strict),
	)
	.unwrap()
}

#[test_log::test]
fn insert_replaces_same_id() {
	let mut tag = Id3v2Tag::default();

	assert_eq!(tag.insert(text_frame("TIT2", "Foo")).unwrap(), None);
	let replaced = tag.insert(text_frame("TIT2", "Bar")).unwrap();

	assert_eq!(replaced, Some(text_frame("TIT2", "Foo")));
	assert_eq!(tag.len(), 1);
	assert_eq!(tag.get_text("TIT2"), Some("Bar"));
}

#[test_log::test]
fn comments_are_keyed_by_language_and_description() {
	let mut tag = Id3v2Tag::default();

	let english = CommentFrame::new(TextEncoding::Latin1, *b"eng", "", "One").unwrap();
	let german = CommentFrame::new(TextEncoding::Latin1, *b"deu", "", "Eins").unwrap();
	let described = CommentFrame::new(TextEncoding::Latin1, *b"eng", "Notes", "Two").unwrap();

	tag.insert(english.into()).unwrap();
	tag.insert(german.into()).unwrap();
	tag.insert(described.into()).unwrap();
	assert_eq!(tag.comments().count(), 3);

	let replacement = CommentFrame::new(TextEncoding::Latin1, *b"ENG", "", "Three").unwrap();
	let replaced = tag.insert(replacement.into()).unwrap();

	let Some(Frame::Comment(replaced)) = replaced else {
		panic!("Expected a comment to be replaced");
	};
	assert_eq!(replaced.text(), Some("One"));
	assert_eq!(tag.comments().count(), 3);
}

#[test_log::test]
fn pictures_are_keyed_by_type() {
	let mut tag = Id3v2Tag::default();

	tag.insert(picture_frame(PictureType::CoverFront, b"front"))
		.unwrap();
	tag.insert(picture_frame(PictureType::CoverBack, b"back"))
		.unwrap();
	assert!(
		tag.insert(picture_frame(PictureType::CoverFront, b"new front"))
			.unwrap()
			.is_some()
	);

	let data = tag
		.pictures()
		.map(|frame| frame.picture.data())
		.collect::<Vec<_>>();
	assert_eq!(data, [&b"back"[..], &b"new front"[..]]);
}

#[test_log::test]
fn push_keeps_duplicates() {
	let mut tag = Id3v2Tag::default();

	tag.push(text_frame("TIT2", "Foo")).unwrap();
	tag.push(text_frame("TIT2", "Bar")).unwrap();
	tag.push(text_frame("TPE1", "Baz")).unwrap();

	assert_eq!(tag.get_all("TIT2").count(), 2);
	assert_eq!(tag.get_text("TIT2"), Some("Foo"));

	let removed = tag.remove("TIT2");
	assert_eq!(removed.len(), 2);
	assert_eq!(tag.len(), 1);
	assert!(tag.remove("TIT2").is_empty());

	tag.clear();
	assert!(tag.is_empty());
}

#[test_log::test]
fn frame_flags_checked_against_version() {
	let mut frame = text_frame("TIT2", "Foo");
	frame.set_flags(FrameFlags {
		unsynchronisation: true,
		..FrameFlags::default()
	});

	let mut v3 = Id3v2Tag::new(Id3v2Version::V3);
	assert!(v3.insert(frame.clone()).unwrap_err().is_validation_error());
	assert!(v3.push(frame.clone()).is_err());
	assert!(v3.is_empty());

	let mut v4 = Id3v2Tag::new(Id3v2Version::V4);
	assert!(v4.insert(frame).is_ok());
}

#[test_log::test]
fn extended_header_flag() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);

	tag.set_flag(TagFlag::ExtendedHeader, true).unwrap();
	assert!(tag.extended_header().is_some());

	tag.set_flag(TagFlag::ExtendedHeader, false).unwrap();
	assert!(tag.extended_header().is_none());

	let mut restricted = ExtendedHeader::new();
	restricted.set_restrictions(Some(TagRestrictions::default()));
	assert!(tag.set_extended_header(Some(restricted)).is_err());
	assert!(!tag.flag(TagFlag::ExtendedHeader));

	let mut v2 = Id3v2Tag::new(Id3v2Version::V2);
	assert!(v2.set_flag(TagFlag::ExtendedHeader, true).is_err());
	assert!(v2.set_extended_header(Some(ExtendedHeader::new())).is_err());
}

#[test_log::test]
fn v4_round_trip() {
	let mut tag = Id3v2Tag::default();
	tag.insert(text_frame("TIT2", "Foo title")).unwrap();
	tag.insert(
		TextInformationFrame::with_values(
			FrameId::new("TPE1").unwrap(),
			TextEncoding::UTF8,
			vec![String::from("Foo"), String::from("B\u{e4}r")],
		)
		.into(),
	)
	.unwrap();
	tag.insert(
		CommentFrame::new(TextEncoding::UTF16, *b"eng", "Notes", "\u{3042}")
			.unwrap()
			.into(),
	)
	.unwrap();
	tag.insert(picture_frame(PictureType::CoverFront, &[0xFF, 0xD8, 0xFF, 0xE0]))
		.unwrap();
	tag.insert(BinaryFrame::new(FrameId::new("PRIV").unwrap(), vec![1, 2, 3]).into())
		.unwrap();

	let re_read = dump_and_re_read(&tag, WriteOptions::default());
	assert_eq!(re_read, tag);
}

#[test_log::test]
fn v4_round_trip_with_everything() {
	let mut tag = Id3v2Tag::default();
	tag.set_flag(TagFlag::Unsynchronisation, true).unwrap();
	tag.set_flag(TagFlag::Footer, true).unwrap();

	let mut extended_header = ExtendedHeader::new();
	extended_header.set_update(true);
	extended_header.set_crc_enabled(true);
	extended_header.set_restrictions(Some(TagRestrictions {
		size: TagSizeRestrictions::S_64F_128K,
		..TagRestrictions::default()
	}));
	tag.set_extended_header(Some(extended_header)).unwrap();

	let mut frame = BinaryFrame::new(FrameId::new("PRIV").unwrap(), vec![0xFF, 0xE0, 0xFF]);
	frame.set_flags(FrameFlags {
		read_only: true,
		grouping_identity: Some(7),
		..FrameFlags::default()
	});
	tag.insert(frame.into()).unwrap();

	let re_read = dump_and_re_read(&tag, WriteOptions::default());

	let extended_header = re_read.extended_header().unwrap();
	assert!(extended_header.is_update());
	assert!(extended_header.crc().is_some());
	assert_eq!(
		extended_header.restrictions().unwrap().size,
		TagSizeRestrictions::S_64F_128K
	);

	assert!(re_read.flag(TagFlag::Unsynchronisation));
	assert!(re_read.flag(TagFlag::Footer));

	let Some(Frame::Binary(frame)) = re_read.get("PRIV") else {
		panic!("Expected a binary frame");
	};
	assert_eq!(frame.data, [0xFF, 0xE0, 0xFF]);
	assert!(frame.flags().read_only);
	assert!(frame.flags().unsynchronisation);
	assert_eq!(frame.flags().grouping_identity, Some(7));
}

#[test_log::test]
fn v3_writes_utf16() {
	let mut tag = Id3v2Tag::new(Id3v2Version::V3);
	tag.insert(
		TextInformationFrame::new(FrameId::new("TIT2").unwrap(), TextEncoding::UTF8, "Foo")
			.into(),
	)
	.unwrap();

	let re_read = dump_and_re_read(&tag, WriteOptions::default());
	assert_eq!(re_read.version(), Id3v2Version::V3);

	let Some(Frame::Text(frame)) = re_read.get("TIT2") else {
		panic!("Expected a text frame");
	};
	assert_eq!(frame.encoding, TextEncoding::UTF16);
	assert_eq!(frame.value(), Some("Foo"));
}

#[test_log::test]
fn v2_round_trip() {
	let bytes = b"ID3\x02\x00\x00\x00\x00\x00\x12TT2\x00\x00\x04\x00FooXYZ\x00\x00\x02\x01\x02";

	let tag = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new()).unwrap();
	assert_eq!(tag.version(), Id3v2Version::V2);
	assert_eq!(tag.get_text("TIT2"), Some("Foo"));
	assert!(tag.get("XYZ").unwrap().id().is_outdated());

	let written = tag
		.as_bytes(WriteOptions::new().preferred_padding(0))
		.unwrap();
	assert_eq!(written, bytes);
}

#[test_log::test]
fn read_from_positions_after_tag() {
	let mut tag = Id3v2Tag::default();
	tag.insert(text_frame("TALB", "Foo album")).unwrap();

	let mut bytes = tag
		.as_bytes(WriteOptions::new().preferred_padding(16))
		.unwrap();
	let tag_len = bytes.len() as u64;
	bytes.extend(b"audio");

	let mut reader = Cursor::new(bytes);
	let read = Id3v2Tag::read_from(&mut reader, ParseOptions::new())
		.unwrap()
		.unwrap();

	assert_eq!(read.get_text("TALB"), Some("Foo album"));
	assert_eq!(reader.position(), tag_len);

	let mut no_tag = Cursor::new(b"audio".to_vec());
	assert!(
		Id3v2Tag::read_from(&mut no_tag, ParseOptions::new())
			.unwrap()
			.is_none()
	);
	assert_eq!(no_tag.position(), 0);
}

#[test_log::test]
fn cover_art_can_be_skipped() {
	let mut tag = Id3v2Tag::default();
	tag.insert(text_frame("TIT2", "Foo")).unwrap();
	tag.insert(picture_frame(PictureType::CoverFront, b"data"))
		.unwrap();

	let bytes = tag.as_bytes(WriteOptions::default()).unwrap();

	let read = Id3v2Tag::parse(
		&mut &bytes[..],
		ParseOptions::new().read_cover_art(false),
	)
	.unwrap();
	assert_eq!(read.len(), 1);
	assert_eq!(read.pictures().count(), 0);
}

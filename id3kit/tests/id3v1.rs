use id3kit::config::{ParseOptions, ParsingMode, WriteOptions};
use id3kit::id3::TagType;
use id3kit::id3::v1::{Id3v1Tag, Id3v1Version};

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

fn v11_tag() -> [u8; 128] {
	let mut raw = [0; 128];
	raw[..3].copy_from_slice(b"TAG");
	raw[3..8].copy_from_slice(b"Title");
	raw[33..39].copy_from_slice(b"Artist");
	raw[63..68].copy_from_slice(b"Album");
	raw[93..97].copy_from_slice(b"2003");
	raw[97..104].copy_from_slice(b"Comment");
	raw[126] = 12;
	raw[127] = 7;
	raw
}

#[test_log::test]
fn parse_v11() {
	let tag = Id3v1Tag::parse(v11_tag(), ParsingMode::Strict).unwrap();

	assert_eq!(tag.version(), Id3v1Version::V1_1);
	assert_eq!(tag.title(), Some("Title"));
	assert_eq!(tag.artist(), Some("Artist"));
	assert_eq!(tag.album(), Some("Album"));
	assert_eq!(tag.year(), Some(2003));
	assert_eq!(tag.comment(), Some("Comment"));
	assert_eq!(tag.track().unwrap(), Some(12));
	assert_eq!(tag.genre(), Some("Hip-Hop"));
}

#[test_log::test]
fn parse_v10() {
	let mut raw = v11_tag();
	// A full 30 byte comment
	raw[97..127].copy_from_slice(&[b'a'; 30]);
	raw[127] = 255;

	let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();

	assert_eq!(tag.version(), Id3v1Version::V1_0);
	assert_eq!(tag.comment().map(str::len), Some(30));
	assert!(tag.track().is_err());
	assert_eq!(tag.genre(), None);
}

#[test_log::test]
fn comment_length_boundary() {
	let mut v11 = Id3v1Tag::new(Id3v1Version::V1_1);
	assert!(v11.set_comment("a".repeat(28)).is_ok());
	assert!(v11.set_comment("a".repeat(29)).is_err());

	let mut v10 = Id3v1Tag::new(Id3v1Version::V1_0);
	assert!(v10.set_comment("a".repeat(30)).is_ok());
	assert!(v10.set_comment("a".repeat(31)).is_err());
}

#[test_log::test]
fn dump_matches_parsed_bytes() {
	let raw = v11_tag();
	let tag = Id3v1Tag::parse(raw, ParsingMode::Strict).unwrap();

	let mut written = Vec::new();
	tag.dump_to(&mut written, WriteOptions::default()).unwrap();

	assert_eq!(written, raw);
}

#[test_log::test]
fn read_from_end_of_stream() {
	let mut data = vec![0xAA; 512];
	data.extend(v11_tag());

	let tag = Id3v1Tag::read_from(&mut Cursor::new(&data), ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(tag.title(), Some("Title"));

	let no_tag = Id3v1Tag::read_from(&mut Cursor::new(&data[..512]), ParseOptions::new()).unwrap();
	assert!(no_tag.is_none());
}

#[test_log::test]
fn write_appends_then_overwrites() {
	let mut file = tempfile::tempfile().unwrap();
	file.write_all(&[1; 200]).unwrap();
	file.rewind().unwrap();

	let mut tag = Id3v1Tag::new(Id3v1Version::V1_1);
	tag.set_title(String::from("Foo title")).unwrap();
	tag.set_track(3).unwrap();
	tag.write_to(&mut file, WriteOptions::default()).unwrap();

	assert_eq!(file.seek(SeekFrom::End(0)).unwrap(), 328);

	tag.set_title(String::from("Bar title")).unwrap();
	file.rewind().unwrap();
	tag.write_to(&mut file, WriteOptions::default()).unwrap();

	// The existing tag was replaced in place
	assert_eq!(file.seek(SeekFrom::End(0)).unwrap(), 328);

	file.rewind().unwrap();
	let read = Id3v1Tag::read_from(&mut file, ParseOptions::new())
		.unwrap()
		.unwrap();
	assert_eq!(read.title(), Some("Bar title"));
	assert_eq!(read.track().unwrap(), Some(3));
}

#[test_log::test]
fn remove() {
	let mut file = tempfile::tempfile().unwrap();
	file.write_all(&[1; 200]).unwrap();
	file.write_all(&v11_tag()).unwrap();
	file.rewind().unwrap();

	TagType::Id3v1.remove_from(&mut file).unwrap();

	file.rewind().unwrap();
	let mut contents = Vec::new();
	file.read_to_end(&mut contents).unwrap();
	assert_eq!(contents, [1; 200]);

	// Nothing left to remove
	file.rewind().unwrap();
	TagType::Id3v1.remove_from(&mut file).unwrap();
	assert_eq!(file.seek(SeekFrom::End(0)).unwrap(), 200);
}

#[test_log::test]
fn latin1_text() {
	let mut tag = Id3v1Tag::new(Id3v1Version::V1_1);
	tag.set_genre("Rock").unwrap();
	assert!(tag.set_title(String::from("\u{2603}")).is_err());

	tag.set_title(String::from("Caf\u{e9}")).unwrap();

	let mut written = Vec::new();
	tag.dump_to(&mut written, WriteOptions::default()).unwrap();
	assert_eq!(&written[3..8], b"Caf\xE9\x00");
	assert_eq!(written[127], 17);
}

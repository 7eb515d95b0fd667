#![no_main]

use id3kit::config::{ParseOptions, WriteOptions};
use id3kit::id3::v2::Id3v2Tag;
use libfuzzer_sys::fuzz_target;

// Anything that can be read must survive being written and read again
fuzz_target!(|data: &[u8]| {
	let Ok(tag) = Id3v2Tag::parse(&mut &data[..], ParseOptions::new()) else {
		return;
	};

	let Ok(bytes) = tag.as_bytes(WriteOptions::new().lossy_text_encoding(true)) else {
		return;
	};

	if bytes.is_empty() {
		return;
	}

	let re_read = Id3v2Tag::parse(&mut &bytes[..], ParseOptions::new())
		.expect("a written tag should always be readable");
	assert_eq!(re_read.version(), tag.version());
});

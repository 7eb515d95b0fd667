#![no_main]

use id3kit::config::ParsingMode;
use id3kit::id3::v1::Id3v1Tag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: [u8; 128]| {
	let _ = Id3v1Tag::parse(data, ParsingMode::Strict);
	let _ = Id3v1Tag::parse(data, ParsingMode::BestAttempt);
});

#![no_main]

use id3kit::config::{ParseOptions, ParsingMode};
use id3kit::id3::v2::Id3v2Tag;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
	for parsing_mode in [
		ParsingMode::Strict,
		ParsingMode::BestAttempt,
		ParsingMode::Relaxed,
	] {
		let _ = Id3v2Tag::parse(
			&mut &data[..],
			ParseOptions::new().parsing_mode(parsing_mode),
		);
	}
});

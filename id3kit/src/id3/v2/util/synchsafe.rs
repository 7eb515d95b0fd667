//! Utilities for working with synchsafe integers and unsynchronised ID3v2 content
//!
//! An MPEG frame sync is 11 set bits, so any `0xFF` followed by a byte `>= 0xE0` inside a tag
//! could be mistaken for audio. ID3v2 avoids this in two ways:
//!
//! * Sizes are stored as synchsafe integers, with only 7 bits used per byte. See [`SynchsafeInteger`].
//! * Content can be unsynchronised, where a `0x00` is inserted after problematic `0xFF` bytes.
//!   See [`unsynchronise`] and [`UnsynchronizedStream`].

use crate::error::Result;

use std::io::Read;

/// A reader for unsynchronised content
///
/// This removes the `0x00` following every `0xFF`, reversing [`unsynchronise`].
///
/// # Examples
///
/// ```rust
/// use id3kit::id3::v2::util::synchsafe::UnsynchronizedStream;
/// use std::io::{Cursor, Read};
///
/// # fn main() -> id3kit::error::Result<()> {
/// // The content has two `0xFF 0x00` pairs, which will be removed
/// let content = [0xFF, 0x00, 0x1A, 0xFF, 0x00, 0x15];
///
/// let mut unsynchronized_reader = UnsynchronizedStream::new(Cursor::new(content));
///
/// let mut unsynchronized_content = Vec::new();
/// unsynchronized_reader.read_to_end(&mut unsynchronized_content)?;
///
/// // All null bytes following `0xFF` have been removed
/// assert_eq!(unsynchronized_content, [0xFF, 0x1A, 0xFF, 0x15]);
/// # Ok(()) }
/// ```
pub struct UnsynchronizedStream<R> {
	reader: R,
	// Same buffer size as `BufReader`
	buf: [u8; 8 * 1024],
	bytes_available: usize,
	pos: usize,
	encountered_ff: bool,
}

impl<R> UnsynchronizedStream<R> {
	/// Create a new [`UnsynchronizedStream`]
	pub fn new(reader: R) -> Self {
		Self {
			reader,
			buf: [0; 8 * 1024],
			bytes_available: 0,
			pos: 0,
			encountered_ff: false,
		}
	}

	/// Extract the reader, discarding the [`UnsynchronizedStream`]
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl<R: Read> Read for UnsynchronizedStream<R> {
	fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
		let dest_len = buf.len();
		if dest_len == 0 {
			return Ok(0);
		}

		let mut dest_pos = 0;
		loop {
			if dest_pos == dest_len {
				break;
			}

			if self.pos >= self.bytes_available {
				self.bytes_available = self.reader.read(&mut self.buf)?;
				self.pos = 0;
			}

			// Exhausted the reader
			if self.bytes_available == 0 {
				break;
			}

			if self.encountered_ff {
				self.encountered_ff = false;

				// Only skip the next byte if this is valid unsynchronisation
				if self.buf[self.pos] == 0 {
					self.pos += 1;
					continue;
				}
			}

			let current_byte = self.buf[self.pos];
			buf[dest_pos] = current_byte;
			dest_pos += 1;
			self.pos += 1;

			if current_byte == 0xFF {
				self.encountered_ff = true;
			}
		}

		Ok(dest_pos)
	}
}

/// Unsynchronise `content`
///
/// A `0x00` is inserted after every `0xFF` that is followed by a byte `>= 0xE0`, by `0x00`, or that
/// ends the content. The last two cases make the transform reversible with [`resynchronise`].
///
/// # Examples
///
/// ```rust
/// use id3kit::id3::v2::util::synchsafe::{resynchronise, unsynchronise};
///
/// let content = [0xFF, 0xE0, 0x12, 0xFF, 0x00, 0xFF];
/// let unsynchronised = unsynchronise(&content);
///
/// assert_eq!(
/// 	unsynchronised,
/// 	[0xFF, 0x00, 0xE0, 0x12, 0xFF, 0x00, 0x00, 0xFF, 0x00]
/// );
/// assert_eq!(resynchronise(&unsynchronised), content);
/// ```
pub fn unsynchronise(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len() + content.len() / 64);

	let mut iter = content.iter().peekable();
	while let Some(&byte) = iter.next() {
		out.push(byte);

		if byte != 0xFF {
			continue;
		}

		match iter.peek() {
			Some(&&next) if next < 0xE0 && next != 0x00 => {},
			_ => out.push(0x00),
		}
	}

	out
}

/// Reverse [`unsynchronise`], removing the `0x00` that follows every `0xFF`
pub fn resynchronise(content: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(content.len());

	let mut previous_ff = false;
	for &byte in content {
		if previous_ff && byte == 0x00 {
			previous_ff = false;
			continue;
		}

		previous_ff = byte == 0xFF;
		out.push(byte);
	}

	out
}

/// An integer that can be converted to and from synchsafe variants
pub trait SynchsafeInteger: Sized {
	/// The integer type that this can be widened to for use in [`SynchsafeInteger::widening_synch`]
	type WideningType;

	/// Create a synchsafe integer
	///
	/// # Errors
	///
	/// `self` doesn't fit in <`INTEGER_TYPE::BITS - size_of::<INTEGER_TYPE>()`> bits
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// # fn main() -> id3kit::error::Result<()> {
	/// assert_eq!(257_u32.synch()?, 0x0000_0201);
	///
	/// // Maximum value we can represent in a synchsafe u32
	/// let synch_number = 0xFFF_FFFF_u32.synch()?;
	/// assert_eq!(synch_number, 0x7F7F_7F7F);
	///
	/// assert!(0x1000_0000_u32.synch().is_err());
	/// # Ok(()) }
	/// ```
	fn synch(self) -> Result<Self>;

	/// Create a synchsafe integer, widening to the next available integer type
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// // 0b11111111
	/// let large_number = u8::MAX;
	///
	/// // Widened to a u16
	/// // 0b00000001_01111111
	/// let large_number_synchsafe = large_number.widening_synch();
	///
	/// // Unsynchronizing the number will get us back to 255
	/// assert_eq!(large_number_synchsafe.unsynch(), large_number as u16);
	/// ```
	fn widening_synch(self) -> Self::WideningType;

	/// Decode a synchsafe integer
	///
	/// The high bit of every byte is discarded.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::id3::v2::util::synchsafe::SynchsafeInteger;
	///
	/// assert_eq!(u32::from_be_bytes([0x00, 0x00, 0x02, 0x01]).unsynch(), 257);
	/// ```
	fn unsynch(self) -> Self;
}

macro_rules! impl_synchsafe {
	(
		$ty:ty, $widening_ty:ty,
		synch($n:ident) $body:block;
		widening_synch($w:ident) $widening_body:block;
		unsynch($u:ident) $unsynch_body:block
	) => {
		#[allow(unused_parens)]
		impl SynchsafeInteger for $ty {
			type WideningType = $widening_ty;

			fn synch(self) -> Result<Self> {
				const MAXIMUM_INTEGER: $ty = {
					let num_bytes = core::mem::size_of::<$ty>();
					// 7 bits are available per byte, shave off 1 bit per byte
					<$ty>::MAX >> num_bytes
				};

				if self > MAXIMUM_INTEGER {
					crate::macros::err!(TooMuchData);
				}

				let $n = self;
				Ok($body)
			}

			fn widening_synch(self) -> Self::WideningType {
				let mut $w = <$widening_ty>::MIN;
				let $n = self;
				$widening_body;
				$w
			}

			fn unsynch(self) -> Self {
				let $u = self;
				$unsynch_body
			}
		}
	};
}

impl_synchsafe! {
	u8, u16,
	synch(n) {
		(n & 0x7F)
	};
	widening_synch(w) {
		w |= u16::from(n & 0x7F);
		w |= u16::from(n & 0x80) << 1;
	};
	unsynch(u) {
		(u & 0x7F)
	}
}

impl_synchsafe! {
	u16, u32,
	synch(n) {
		(n & 0x7F) |
		((n & (0x7F << 7)) << 1)
	};
	widening_synch(w) {
		w |= u32::from(n & 0x7F);
		w |= u32::from((n & (0x7F << 7)) << 1);
		w |= u32::from(n & (0x03 << 14)) << 2;
	};
	unsynch(u) {
		((u & 0x7F00) >> 1) | (u & 0x7F)
	}
}

impl_synchsafe! {
	u32, u64,
	synch(n) {
		(n & 0x7F) |
		((n & (0x7F << 7)) << 1) |
		((n & (0x7F << 14)) << 2) |
		((n & (0x7F << 21)) << 3)
	};
	widening_synch(w) {
		w |= u64::from(n & 0x7F);
		w |= u64::from(n & (0x7F << 7)) << 1;
		w |= u64::from(n & (0x7F << 14)) << 2;
		w |= u64::from(n & (0x7F << 21)) << 3;
		w |= u64::from(n & (0x0F << 28)) << 4;
	};
	unsynch(u) {
		((u & 0x7F00_0000) >> 3) | ((u & 0x7F_0000) >> 2) | ((u & 0x7F00) >> 1) | (u & 0x7F)
	}
}

#[cfg(test)]
mod tests {
	use crate::id3::v2::util::synchsafe::{
		SynchsafeInteger, UnsynchronizedStream, resynchronise, unsynchronise,
	};

	use std::io::{Cursor, Read};

	const UNSYNCHRONIZED_CONTENT: &[u8] =
		&[0xFF, 0x00, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00, 0x00];
	const EXPECTED: &[u8] = &[0xFF, 0x00, 0xFF, 0x12, 0xB0, 0x05, 0xFF, 0x00];

	#[test_log::test]
	fn unsynchronized_stream() {
		let reader = Cursor::new(UNSYNCHRONIZED_CONTENT);
		let mut unsynchronized_reader = UnsynchronizedStream::new(reader);

		let mut final_content = Vec::new();
		unsynchronized_reader
			.read_to_end(&mut final_content)
			.unwrap();

		assert_eq!(final_content, EXPECTED);
		assert_eq!(resynchronise(UNSYNCHRONIZED_CONTENT), EXPECTED);
	}

	#[test_log::test]
	fn unsynchronized_stream_large() {
		// Create a buffer >8k to force a buffer reset
		let reader = Cursor::new(UNSYNCHRONIZED_CONTENT.repeat(1000));
		let mut unsynchronized_reader = UnsynchronizedStream::new(reader);

		let mut final_content = Vec::new();
		unsynchronized_reader
			.read_to_end(&mut final_content)
			.unwrap();

		assert_eq!(final_content, EXPECTED.repeat(1000));
	}

	#[test_log::test]
	fn unsynchronized_stream_should_not_replace_unrelated() {
		const ORIGINAL_CONTENT: &[u8] = &[0xFF, 0x1A, 0xFF, 0xC0, 0x10, 0x01];

		let reader = Cursor::new(ORIGINAL_CONTENT);
		let mut unsynchronized_reader = UnsynchronizedStream::new(reader);

		let mut final_content = Vec::new();
		unsynchronized_reader
			.read_to_end(&mut final_content)
			.unwrap();

		assert_eq!(final_content, ORIGINAL_CONTENT);
		// Nothing to escape here either
		assert_eq!(unsynchronise(ORIGINAL_CONTENT), ORIGINAL_CONTENT);
	}

	#[test_log::test]
	fn unsynchronise_escapes_false_syncs() {
		assert_eq!(unsynchronise(&[0xFF, 0xFB, 0x90]), [0xFF, 0x00, 0xFB, 0x90]);
		assert_eq!(unsynchronise(&[0xFF, 0xFF]), [0xFF, 0x00, 0xFF, 0x00]);
		assert_eq!(unsynchronise(&[0x01, 0xFF]), [0x01, 0xFF, 0x00]);
		assert_eq!(unsynchronise(&[0xFF, 0x00, 0x00]), [0xFF, 0x00, 0x00, 0x00]);
		assert!(unsynchronise(&[]).is_empty());
	}

	#[test_log::test]
	fn unsynchronisation_round_trip() {
		let inputs: [&[u8]; 6] = [
			&[],
			&[0xFF],
			&[0xFF, 0x00],
			&[0xFF, 0xFF, 0xFF],
			&[0x00, 0xFF, 0x00, 0x00, 0xFF, 0xE0, 0xFF],
			&[0x12, 0xFF, 0x34, 0xFF, 0xF0, 0xFF, 0x00, 0xE1],
		];

		for input in inputs {
			let encoded = unsynchronise(input);
			assert_eq!(resynchronise(&encoded), input);

			let mut streamed = Vec::new();
			UnsynchronizedStream::new(&encoded[..])
				.read_to_end(&mut streamed)
				.unwrap();
			assert_eq!(streamed, input);

			// No false syncs may remain
			assert!(
				encoded
					.windows(2)
					.all(|w| !(w[0] == 0xFF && w[1] >= 0xE0))
			);
		}
	}

	macro_rules! synchsafe_integer_tests {
		(
			$($int:ty => {
				synch: $original:literal, $new:literal;
				unsynch: $original_unsync:literal, $new_unsynch:literal;
				widen: $original_widen:literal, $new_widen:literal;
			});+
		) => {
			$(
				paste::paste! {
					#[test_log::test]
					fn [<$int _synch>]() {
						assert_eq!($original.synch().unwrap(), $new);
					}

					#[test_log::test]
					fn [<$int _unsynch>]() {
						assert_eq!($original_unsync.unsynch(), $new_unsynch);
					}

					#[test_log::test]
					fn [<$int _widen>]() {
						assert_eq!($original_widen.widening_synch(), $new_widen);
					}
				}
			)+
		};
	}

	synchsafe_integer_tests! {
		u8 => {
			synch:   0x7F_u8, 0x7F_u8;
			unsynch: 0x7F_u8, 0x7F_u8;
			widen:   0xFF_u8, 0x017F_u16;
		};
		u16 => {
			synch:   0x3FFF_u16, 0x7F7F_u16;
			unsynch: 0x7F7F_u16, 0x3FFF_u16;
			widen:   0xFFFF_u16, 0x0003_7F7F_u32;
		};
		u32 => {
			synch:   0xFFF_FFFF_u32, 0x7F7F_7F7F_u32;
			unsynch: 0x7F7F_7F7F_u32, 0xFFF_FFFF_u32;
			widen:   0xFFFF_FFFF_u32, 0x000F_7F7F_7F7F_u64;
		}
	}

	#[test_log::test]
	fn synchsafe_257() {
		let bytes = [0x00, 0x00, 0x02, 0x01];
		assert_eq!(u32::from_be_bytes(bytes).unsynch(), 257);
		assert_eq!(257_u32.synch().unwrap().to_be_bytes(), bytes);
	}

	#[test_log::test]
	fn synchsafe_too_large() {
		assert!(0x1000_0000_u32.synch().is_err());
		assert!(0x80_u8.synch().is_err());
	}
}

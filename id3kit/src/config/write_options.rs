/// Options to control how id3kit writes a tag
///
/// This is best used as an application global config that gets set once.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) preferred_padding: Option<u32>,
	pub(crate) lossy_text_encoding: bool,
}

impl WriteOptions {
	/// Default preferred padding size in bytes
	pub const DEFAULT_PREFERRED_PADDING: u32 = 1024;

	/// Creates a new `WriteOptions`, alias for `Default` implementation
	///
	/// See also: [`WriteOptions::default`]
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::config::WriteOptions;
	///
	/// let write_options = WriteOptions::new();
	/// ```
	pub const fn new() -> Self {
		Self {
			preferred_padding: Some(Self::DEFAULT_PREFERRED_PADDING),
			lossy_text_encoding: false,
		}
	}

	/// Set the preferred padding size in bytes
	///
	/// ID3v2 tags are followed by this many null bytes, which allows later edits to be made
	/// in place.
	///
	/// NOTES:
	///
	/// * ID3v1 tags have a fixed size, and are not affected
	/// * ID3v2.4 tags with a footer are never padded
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::config::WriteOptions;
	///
	/// // I really don't want my files rewritten, so I'll double the padding size!
	/// let options = WriteOptions::new().preferred_padding(2048);
	///
	/// // ...Or I don't want padding under any circumstances!
	/// let options = WriteOptions::new().preferred_padding(0);
	/// ```
	pub fn preferred_padding(mut self, preferred_padding: u32) -> Self {
		match preferred_padding {
			0 => self.preferred_padding = None,
			_ => self.preferred_padding = Some(preferred_padding),
		}
		self
	}

	/// Whether to replace characters that can't be represented in the target encoding
	///
	/// When enabled, characters that can't be encoded (for example, non-Latin-1 text in a
	/// Latin-1 frame) are replaced with `?`. When disabled, writing such a frame fails.
	///
	/// # Examples
	///
	/// ```rust
	/// use id3kit::config::WriteOptions;
	///
	/// // I'd rather lose a few characters than fail to save
	/// let options = WriteOptions::new().lossy_text_encoding(true);
	/// ```
	pub fn lossy_text_encoding(mut self, lossy_text_encoding: bool) -> Self {
		self.lossy_text_encoding = lossy_text_encoding;
		self
	}
}

impl Default for WriteOptions {
	/// The default implementation for `WriteOptions`
	///
	/// The defaults are as follows:
	///
	/// ```rust,ignore
	/// WriteOptions {
	///     preferred_padding: 1024,
	///     lossy_text_encoding: false,
	/// }
	/// ```
	fn default() -> Self {
		Self::new()
	}
}

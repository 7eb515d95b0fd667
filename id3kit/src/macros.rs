macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// Shorthand for return Err(Id3Error::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(Id3Error::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(Id3Error::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::Id3Error::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:literal)) => {
		return Err(crate::error::Id3Error::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for TagDecodingError::new(TagType::Foo, "Message")
//
// Usage:
//
// - decode_err!(Variant, Message)
//
// or bail:
//
// - decode_err!(@BAIL Variant, Message)
macro_rules! decode_err {
	($tag_ty:ident, $reason:literal) => {
		Into::<crate::error::Id3Error>::into(crate::error::TagDecodingError::new(
			crate::id3::TagType::$tag_ty,
			$reason,
		))
	};
	(@BAIL $tag_ty:ident, $reason:literal) => {
		return Err(decode_err!($tag_ty, $reason))
	};
}

// Shorthand for Id3Error::from(ValidationError::new(ValidationErrorKind::Foo))
//
// Usage:
//
// - validation_err!(Variant)
// - validation_err!(Variant(args..))
// - validation_err!(Variant { fields.. })
macro_rules! validation_err {
	($variant:ident $($rest:tt)*) => {
		Into::<crate::error::Id3Error>::into(crate::error::ValidationError::new(
			crate::error::ValidationErrorKind::$variant $($rest)*,
		))
	};
}

// A macro for handling the different `ParsingMode`s
//
// NOTE: All fields are optional, if `STRICT` or `RELAXED` are missing, it will
// 		 fall through to `DEFAULT`. If `DEFAULT` is missing, it will fall through
// 		 to an empty block.
//
// Usage:
//
// - parse_mode_choice!(
// 		ident_of_parsing_mode,
// 		STRICT: some_expr,
// 		RELAXED: some_expr,
// 		DEFAULT: some_expr,
// 	 )
macro_rules! parse_mode_choice {
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr,)?
		DEFAULT: $default:expr $(,)?
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			#[allow(unreachable_patterns)]
			_ => { $default }
		}
	};
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(BESTATTEMPT: $best_attempt_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr $(,)?)?
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => { $strict_handler },)?
			$(crate::config::ParsingMode::BestAttempt => { $best_attempt_handler },)?
			$(crate::config::ParsingMode::Relaxed => { $relaxed_handler },)?
			#[allow(unreachable_patterns)]
			_ => {}
		}
	};
}

pub(crate) use {decode_err, err, parse_mode_choice, try_vec, validation_err};

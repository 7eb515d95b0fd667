mod attached_picture_frame;
mod binary_frame;
mod language_frame;
mod text_information_frame;

pub use attached_picture_frame::AttachedPictureFrame;
pub use binary_frame::BinaryFrame;
pub use language_frame::{CommentFrame, UNKNOWN_LANGUAGE};
pub use text_information_frame::TextInformationFrame;

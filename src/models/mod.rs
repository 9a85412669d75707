pub mod draft;

pub use draft::{AttachmentState, Draft};

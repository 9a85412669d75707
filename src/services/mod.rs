pub mod draft_service;
pub mod photo_attachment;
pub mod photo_preview;
pub mod photo_storage;

//! Resume input: file type detection, text extraction and line streaming

pub mod file_detector;
pub mod text_extractor;
pub mod manager;

pub use manager::{InputManager, ResumeLines};

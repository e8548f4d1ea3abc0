// src/documents/mod.rs
pub mod reader;

pub use reader::{TranscriptReader, TranscriptText};

// src/extractors/mod.rs
pub mod ratios;
pub mod transcripts;

// Re-export the extraction entry points for convenience
pub use ratios::extract_top_ratios;
pub use transcripts::extract_transcript_links;

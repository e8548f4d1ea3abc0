// src/screener/mod.rs
pub mod client;
pub mod models;

pub use client::{build_http_client, ScreenerClient};
pub use models::{ProfilePage, RatioSet, TranscriptLink};

// src/utils/error.rs
use thiserror::Error;

// Define specific error types for different parts of the application
#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found for an unknown ticker
}

#[derive(Error, Debug)]
pub enum ApifyError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Apify API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Actor run {run_id} finished with status {status}")]
    RunFailed { run_id: String, status: String },

    #[error("Actor run {0} did not finish in time")]
    RunTimedOut(String),

    #[error("Actor dataset is empty")]
    EmptyDataset,

    #[error("Failed to parse actor output: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode),

    #[error("PDF parsing failed: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("PDF parsing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gemini API error (status {status}): {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Gemini returned no usable text: {0}")]
    EmptyResponse(String),
}

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Please enter a ticker")]
    EmptyTicker,

    #[error("Failed to fetch financial data: {0}")]
    NoRemoteRatios(String),

    #[error("Report generation failed: {0}")]
    Generation(#[from] LlmError),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Analysis failed: {0}")]
    Pipeline(#[from] PipelineError),
}

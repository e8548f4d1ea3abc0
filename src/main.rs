// src/main.rs
mod apify;
mod config;
mod documents;
mod extractors;
mod llm;
mod pipeline;
mod screener;
mod utils;

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use utils::AppError;
use apify::ApifyClient;
use config::Settings;
use documents::TranscriptReader;
use llm::{GeminiClient, ReportSynthesizer};
use pipeline::{LiveSources, Orchestrator, DEFAULT_MAX_TRANSCRIPTS};
use screener::{build_http_client, ScreenerClient};

/// AI stock research report from screener.in ratios and concall transcripts
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Ticker symbol of the company (prompted for when omitted)
    #[arg(short, long)]
    ticker: Option<String>,

    /// Number of most recent concall transcripts to read
    #[arg(long, default_value_t = DEFAULT_MAX_TRANSCRIPTS)]
    max_transcripts: usize,

    /// Leading pages read from each transcript PDF
    #[arg(long, default_value_t = documents::reader::DEFAULT_MAX_PAGES)]
    max_pages: usize,

    /// Save annotated copies of the fetched profile pages here
    #[arg(short, long)]
    debug_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting with args: {:?}", args);

    // 3. Secrets must be present before any request is accepted
    let settings = Settings::from_env()?;
    tracing::debug!("Loaded settings: {:?}", settings);

    // 4. Ticker from the command line or the operator
    let ticker = match args.ticker {
        Some(ticker) => ticker,
        None => prompt_for_ticker()?,
    }
    .to_uppercase();

    // 5. One HTTP client shared by every service
    let http = build_http_client()?;
    let sources = LiveSources::new(
        ScreenerClient::new(http.clone()),
        ApifyClient::new(http.clone(), settings.apify_token.clone(), &settings.apify_actor),
        TranscriptReader::new(http.clone(), args.max_pages),
    )
    .with_debug_dir(args.debug_dir);
    let synthesizer = ReportSynthesizer::new(GeminiClient::new(http, settings.gemini_api_key.clone(), settings.gemini_model.clone()));
    let mut orchestrator = Orchestrator::new(sources, synthesizer).with_max_transcripts(args.max_transcripts);

    // 6. Run the research pipeline
    match orchestrator.analyze(&ticker).await {
        Ok(report) => {
            tracing::info!("Audit complete for {} (stage {:?})", ticker, orchestrator.stage());
            println!("{}", report.text());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Analysis for '{}' stopped at {:?}: {}", ticker, orchestrator.stage(), e);
            Err(e.into())
        }
    }
}

fn prompt_for_ticker() -> Result<String, AppError> {
    print!("Enter any Indian listed company ticker symbol (e.g. INFY, TCS, RELIANCE): ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

// src/pipeline/mod.rs
pub mod sources;

use crate::documents::TranscriptText;
use crate::llm::{AnalysisReport, PromptInputs, ReportSynthesizer, TextGenerator};
use crate::screener::{RatioSet, TranscriptLink};
use crate::utils::error::PipelineError;

pub use sources::{LiveSources, ResearchSources};

/// Transcripts read per request, most recent first.
pub const DEFAULT_MAX_TRANSCRIPTS: usize = 3;

/// Result of a stage where missing data is acceptable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Data(T),
    Empty { reason: String },
}

/// Collections an [`Outcome`] can be built from.
pub trait Collection {
    fn is_empty(&self) -> bool;
}

impl Collection for RatioSet {
    fn is_empty(&self) -> bool {
        RatioSet::is_empty(self)
    }
}

impl<T> Collection for Vec<T> {
    fn is_empty(&self) -> bool {
        Vec::is_empty(self)
    }
}

impl<T> Outcome<T> {
    pub fn empty(reason: impl Into<String>) -> Self {
        Outcome::Empty { reason: reason.into() }
    }

    /// `Data` unless the collection holds nothing.
    pub fn non_empty(value: T, reason: &str) -> Self
    where
        T: Collection,
    {
        if value.is_empty() {
            Outcome::empty(reason)
        } else {
            Outcome::Data(value)
        }
    }

    /// Logs the reason of an empty outcome and falls back to the default.
    fn or_default_logged(self, what: &str) -> T
    where
        T: Default,
    {
        match self {
            Outcome::Data(value) => value,
            Outcome::Empty { reason } => {
                tracing::warn!("No {}: {}", what, reason);
                T::default()
            }
        }
    }
}

/// Where a request currently is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    FetchingLocalRatios,
    FetchingRemoteRatiosAndLinks,
    ExtractingTranscripts,
    Synthesizing,
    Complete,
    Failed,
}

/// Sequences one research request from ticker to report.
///
/// Runs take `&mut self`, so at most one ticker is in flight per
/// orchestrator; nothing but the last stage survives between runs.
pub struct Orchestrator<S, G> {
    sources: S,
    synthesizer: ReportSynthesizer<G>,
    max_transcripts: usize,
    stage: Stage,
}

impl<S: ResearchSources, G: TextGenerator> Orchestrator<S, G> {
    pub fn new(sources: S, synthesizer: ReportSynthesizer<G>) -> Self {
        Self {
            sources,
            synthesizer,
            max_transcripts: DEFAULT_MAX_TRANSCRIPTS,
            stage: Stage::Idle,
        }
    }

    pub fn with_max_transcripts(mut self, max_transcripts: usize) -> Self {
        self.max_transcripts = max_transcripts;
        self
    }

    #[cfg(test)]
    pub fn sources(&self) -> &S {
        &self.sources
    }

    /// The last stage reached.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, stage: Stage) {
        tracing::info!("Stage: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
    }

    pub async fn analyze(&mut self, ticker: &str) -> Result<AnalysisReport, PipelineError> {
        self.stage = Stage::Idle;
        let ticker = normalize_ticker(ticker).ok_or(PipelineError::EmptyTicker)?;

        self.enter(Stage::FetchingLocalRatios);
        tracing::info!("Scraping fundamental financial data for {}", ticker);
        let local_ratios = self.sources.local_ratios(&ticker).await.or_default_logged("top ratios");

        self.enter(Stage::FetchingRemoteRatiosAndLinks);
        tracing::info!("Gathering financial ratios and concall transcript links...");
        let remote_ratios = match self.sources.remote_ratios(&ticker).await {
            Outcome::Data(ratios) => ratios,
            Outcome::Empty { reason } => {
                self.enter(Stage::Failed);
                tracing::error!("Failed to fetch financial data for {}: {}", ticker, reason);
                return Err(PipelineError::NoRemoteRatios(reason));
            }
        };
        let links = self.sources.transcript_links(&ticker).await.or_default_logged("transcript links");

        self.enter(Stage::ExtractingTranscripts);
        let transcripts = self.read_transcripts(&links).await;

        self.enter(Stage::Synthesizing);
        tracing::info!("Analysing all the data for {}", ticker);
        let inputs = PromptInputs {
            ticker: &ticker,
            local_ratios: &local_ratios,
            remote_ratios: &remote_ratios,
            transcripts: &transcripts,
        };
        match self.synthesizer.synthesize(&inputs).await {
            Ok(report) => {
                self.enter(Stage::Complete);
                Ok(report)
            }
            Err(e) => {
                self.enter(Stage::Failed);
                Err(e.into())
            }
        }
    }

    /// Reads the most recent transcripts one at a time and joins them,
    /// each behind a numbered source label.
    async fn read_transcripts(&self, links: &[TranscriptLink]) -> String {
        if links.is_empty() {
            tracing::info!("No transcripts found. Proceeding with ratio analysis only.");
            return String::new();
        }

        let recent = &links[..links.len().min(self.max_transcripts)];
        let mut texts: Vec<TranscriptText> = Vec::with_capacity(recent.len());
        for (i, link) in recent.iter().enumerate() {
            tracing::info!("Downloading & parsing transcript {} of {}...", i + 1, recent.len());
            texts.push(self.sources.transcript_text(link).await);
        }
        join_transcripts(&texts)
    }
}

/// Trims and uppercases a ticker; `None` when nothing is left.
pub fn normalize_ticker(ticker: &str) -> Option<String> {
    let ticker = ticker.trim();
    (!ticker.is_empty()).then(|| ticker.to_uppercase())
}

pub fn join_transcripts(texts: &[TranscriptText]) -> String {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("\n--- TRANSCRIPT {} SOURCE ---\n{}", i + 1, text))
        .collect()
}

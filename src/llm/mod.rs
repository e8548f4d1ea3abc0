// src/llm/mod.rs
pub mod gemini;
pub mod prompt;
pub mod retry;

use crate::utils::error::LlmError;
use async_trait::async_trait;
use std::fmt;

pub use gemini::GeminiClient;
pub use prompt::{build_prompt, PromptInputs};
pub use retry::RetryPolicy;

/// A remote text-generation endpoint: one prompt in, generated text out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Lets one process-wide client be shared between owners.
#[async_trait]
impl<T: TextGenerator + ?Sized> TextGenerator for std::sync::Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).generate(prompt).await
    }
}

/// The generated report, exactly as the model returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport(pub String);

impl AnalysisReport {
    pub fn text(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds the research prompt and runs it through a [`TextGenerator`]
/// under a retry policy.
#[derive(Debug, Clone)]
pub struct ReportSynthesizer<G> {
    generator: G,
    retry: RetryPolicy,
}

impl<G: TextGenerator> ReportSynthesizer<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            retry: RetryPolicy::generation(),
        }
    }

    #[cfg(test)]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// All-or-nothing: either the complete generated text or the last error.
    pub async fn synthesize(&self, inputs: &PromptInputs<'_>) -> Result<AnalysisReport, LlmError> {
        let prompt = build_prompt(inputs);
        tracing::debug!("Built prompt for {} ({} chars)", inputs.ticker, prompt.chars().count());

        let generator = &self.generator;
        let prompt = prompt.as_str();
        let text = self
            .retry
            .execute("generate_analysis", move || generator.generate(prompt))
            .await?;

        Ok(AnalysisReport(text))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::screener::models::RatioSet;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    /// Scripted generator: fails `failures` times, then answers.
    pub(crate) struct ScriptedGenerator {
        pub failures: u32,
        pub calls: AtomicU32,
        pub prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        pub fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.prompts.lock().unwrap().push(prompt.to_string());
            if call <= self.failures {
                return Err(LlmError::EmptyResponse(format!("scripted failure {}", call)));
            }
            Ok("# Report".to_string())
        }
    }

    fn inputs<'a>(ratios: &'a RatioSet) -> PromptInputs<'a> {
        PromptInputs {
            ticker: "INFY",
            local_ratios: ratios,
            remote_ratios: ratios,
            transcripts: "",
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_synthesize_returns_raw_text() {
        let ratios: RatioSet = [("P/E", "23.5")].into_iter().collect();
        let synthesizer = ReportSynthesizer::new(ScriptedGenerator::new(0));

        let report = synthesizer.synthesize(&inputs(&ratios)).await.unwrap();
        assert_eq!(report.text(), "# Report");
        assert_eq!(synthesizer.generator.calls(), 1);
        assert!(synthesizer.generator.prompts.lock().unwrap()[0].contains(r#"{"P/E": "23.5"}"#));
    }

    #[tokio::test(start_paused = true)]
    async fn test_synthesize_retries_then_succeeds() {
        let ratios = RatioSet::new();
        let synthesizer = ReportSynthesizer::new(ScriptedGenerator::new(2));

        let report = synthesizer.synthesize(&inputs(&ratios)).await;
        assert_eq!(report.unwrap().text(), "# Report");
        assert_eq!(synthesizer.generator.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_synthesize_propagates_last_error_after_three_attempts() {
        let ratios = RatioSet::new();
        let synthesizer = ReportSynthesizer::new(ScriptedGenerator::new(u32::MAX));
        let started = tokio::time::Instant::now();

        let err = synthesizer.synthesize(&inputs(&ratios)).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(ref reason) if reason == "scripted failure 3"));
        assert_eq!(synthesizer.generator.calls(), 3);

        let waited = started.elapsed();
        assert!(waited >= std::time::Duration::from_secs(20) && waited <= std::time::Duration::from_secs(120));
    }
}

// src/config.rs
use crate::llm::gemini::DEFAULT_GEMINI_MODEL;
use crate::utils::AppError;

pub const DEFAULT_APIFY_ACTOR: &str = "shashwattrivedi/screener-in";

/// Secrets and service settings read from the environment at startup.
#[derive(Clone)]
pub struct Settings {
    pub apify_token: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub apify_actor: String,
}

// Keep secrets out of logs
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("apify_token", &"<redacted>")
            .field("gemini_api_key", &"<redacted>")
            .field("gemini_model", &self.gemini_model)
            .field("apify_actor", &self.apify_actor)
            .finish()
    }
}

impl Settings {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        if let Ok(path) = dotenv::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from any key lookup; blank values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let missing: Vec<&str> = ["APIFY_TOKEN", "GEMINI_API_KEY"]
            .into_iter()
            .filter(|key| read(*key).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "Missing API keys! Please set {} in your environment.",
                missing.join(" and ")
            )));
        }

        Ok(Self {
            apify_token: read("APIFY_TOKEN").unwrap_or_default(),
            gemini_api_key: read("GEMINI_API_KEY").unwrap_or_default(),
            gemini_model: read("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            apify_actor: read("APIFY_ACTOR").unwrap_or_else(|| DEFAULT_APIFY_ACTOR.to_string()),
        })
    }
}

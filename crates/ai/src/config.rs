//! Configuration for the language-model backed stages.

use std::env;
use std::time::Duration;

use log::warn;

const DEFAULT_PROVIDER: &str = "openai";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_FALLBACK_CONFIDENCE: f64 = 0.5;
const DEFAULT_OVERRIDE_THRESHOLD: f64 = 0.3;
const DEFAULT_MAX_CONTENT_CHARS: usize = 1000;

/// Settings for the text generator, classifier and advisor.
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// `openai`, `anthropic`, `gemini`/`google`, `groq`, `ollama`; anything
    /// else is treated as an OpenAI-compatible endpoint.
    pub provider_id: String,
    pub model_id: String,
    pub api_key: Option<String>,
    /// Overrides the provider's default endpoint (OpenAI-compatible and Ollama).
    pub base_url: Option<String>,
    pub call_timeout: Duration,
    /// Confidence reported when the rule-based classifier produced the result.
    pub fallback_confidence: f64,
    /// Below this model confidence the rule-based category wins.
    pub category_override_threshold: f64,
    /// Article body is cut to this many characters before prompting.
    pub max_content_chars: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider_id: DEFAULT_PROVIDER.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: None,
            call_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fallback_confidence: DEFAULT_FALLBACK_CONFIDENCE,
            category_override_threshold: DEFAULT_OVERRIDE_THRESHOLD,
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

impl AiConfig {
    /// Load from `INVESTNOTE_LLM_*` environment variables (and `.env`).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            provider_id: non_empty("INVESTNOTE_LLM_PROVIDER")
                .map(|p| p.to_lowercase())
                .unwrap_or(defaults.provider_id),
            model_id: non_empty("INVESTNOTE_LLM_MODEL").unwrap_or(defaults.model_id),
            api_key: non_empty("INVESTNOTE_LLM_API_KEY"),
            base_url: non_empty("INVESTNOTE_LLM_BASE_URL"),
            call_timeout: parsed("INVESTNOTE_LLM_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.call_timeout),
            fallback_confidence: parsed("INVESTNOTE_CLASSIFIER_FALLBACK_CONFIDENCE")
                .unwrap_or(defaults.fallback_confidence),
            category_override_threshold: parsed("INVESTNOTE_CLASSIFIER_OVERRIDE_THRESHOLD")
                .unwrap_or(defaults.category_override_threshold),
            max_content_chars: parsed("INVESTNOTE_LLM_MAX_CONTENT_CHARS")
                .unwrap_or(defaults.max_content_chars),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = non_empty(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value '{}' for {}", raw, key);
            None
        }
    }
}

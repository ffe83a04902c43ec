//! Text generation seam.
//!
//! Every language-model call in this crate goes through [`TextGeneratorTrait`]:
//! a prompt in, raw text out. [`RigTextGenerator`] talks to a real provider
//! through rig-core; [`FakeTextGenerator`] replays scripted answers in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client as HttpClient;
use rig::{
    client::{CompletionClient, Nothing},
    completion::Prompt,
    providers::{anthropic, gemini, groq, ollama, openai},
};

use crate::config::AiConfig;
use crate::error::AiError;

// ============================================================================
// Text Generator Trait
// ============================================================================

/// One-shot text generation.
#[async_trait]
pub trait TextGeneratorTrait: Send + Sync {
    /// Send `prompt` with the given system preamble and return the raw answer.
    async fn generate(&self, preamble: &str, prompt: &str) -> Result<String, AiError>;
}

// ============================================================================
// Rig Text Generator
// ============================================================================

/// Text generator backed by a rig-core provider client.
pub struct RigTextGenerator {
    config: AiConfig,
    temperature: f64,
}

impl RigTextGenerator {
    pub fn new(config: AiConfig) -> Self {
        Self {
            config,
            temperature: 0.3,
        }
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    fn api_key(&self) -> Result<String, AiError> {
        self.config
            .api_key
            .clone()
            .ok_or_else(|| AiError::MissingApiKey(self.config.provider_id.clone()))
    }

    async fn call_provider(&self, preamble: &str, prompt: &str) -> Result<String, AiError> {
        let provider_id = self.config.provider_id.as_str();
        let model_id = self.config.model_id.as_str();

        debug!("Generating with provider {} model {}", provider_id, model_id);

        let response = match provider_id {
            "anthropic" => {
                let key = self.api_key()?;
                let client: anthropic::Client<HttpClient> =
                    anthropic::Client::new(&key).map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model_id)
                    .preamble(preamble)
                    .temperature(self.temperature)
                    .max_tokens(2048)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            "gemini" | "google" => {
                let key = self.api_key()?;
                let client: gemini::Client<HttpClient> =
                    gemini::Client::new(&key).map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model_id)
                    .preamble(preamble)
                    .temperature(self.temperature)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            "groq" => {
                let key = self.api_key()?;
                let client: groq::Client<HttpClient> =
                    groq::Client::new(&key).map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model_id)
                    .preamble(preamble)
                    .temperature(self.temperature)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            "ollama" => {
                let mut builder = ollama::Client::<HttpClient>::builder().api_key(Nothing);
                if let Some(url) = &self.config.base_url {
                    builder = builder.base_url(url);
                }
                let client = builder
                    .build()
                    .map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model_id)
                    .preamble(preamble)
                    .temperature(self.temperature)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
            _ => {
                // OpenAI or any OpenAI-compatible endpoint
                let key = self.api_key()?;
                let mut builder = openai::CompletionsClient::<HttpClient>::builder().api_key(&key);
                if let Some(url) = &self.config.base_url {
                    builder = builder.base_url(url);
                }
                let client = builder
                    .build()
                    .map_err(|e| AiError::Provider(e.to_string()))?;
                client
                    .agent(model_id)
                    .preamble(preamble)
                    .temperature(self.temperature)
                    .build()
                    .prompt(prompt)
                    .await
                    .map_err(|e| AiError::Provider(e.to_string()))?
            }
        };

        Ok(response)
    }
}

#[async_trait]
impl TextGeneratorTrait for RigTextGenerator {
    async fn generate(&self, preamble: &str, prompt: &str) -> Result<String, AiError> {
        let timeout = self.config.call_timeout;
        match tokio::time::timeout(timeout, self.call_provider(preamble, prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Generation with {} timed out after {:?}",
                    self.config.provider_id, timeout
                );
                Err(AiError::Timeout(timeout.as_secs()))
            }
        }
    }
}

// ============================================================================
// Fake Generator for Testing
// ============================================================================

/// Scripted text generator. Answers are returned in order; once the script
/// runs out every call fails with a provider error.
#[derive(Default)]
pub struct FakeTextGenerator {
    script: Mutex<VecDeque<Result<String, String>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl FakeTextGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful answer.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.push(Ok(response.into()));
        self
    }

    /// Queue a provider failure.
    pub fn with_failure(self, message: impl Into<String>) -> Self {
        self.push(Err(message.into()));
        self
    }

    fn push(&self, entry: Result<String, String>) {
        self.script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push_back(entry);
    }

    /// Number of `generate` calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .clone()
    }
}

#[async_trait]
impl TextGeneratorTrait for FakeTextGenerator {
    async fn generate(&self, _preamble: &str, prompt: &str) -> Result<String, AiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .push(prompt.to_string());

        let next = self
            .script
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(AiError::Provider(message)),
            None => Err(AiError::provider("no scripted response left")),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_generator_replays_script_in_order() {
        let generator = FakeTextGenerator::new()
            .with_response("first")
            .with_failure("boom")
            .with_response("third");

        assert_eq!(generator.generate("", "a").await.unwrap(), "first");
        assert!(matches!(
            generator.generate("", "b").await,
            Err(AiError::Provider(_))
        ));
        assert_eq!(generator.generate("", "c").await.unwrap(), "third");
        assert!(generator.generate("", "d").await.is_err());
        assert_eq!(generator.calls(), 4);
        assert_eq!(generator.prompts(), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_reported() {
        let generator = RigTextGenerator::new(AiConfig {
            provider_id: "anthropic".to_string(),
            api_key: None,
            ..Default::default()
        });

        let err = generator.generate("system", "hello").await.unwrap_err();
        assert!(matches!(err, AiError::MissingApiKey(p) if p == "anthropic"));
    }
}

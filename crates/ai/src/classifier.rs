//! News classifier.
//!
//! Asks the model for a structured classification and validates it. If the
//! answer is unusable, a deterministic rule pass takes over. Instruments found
//! by either pass are unioned so a directly named code is never lost.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use investnote_core::news::{Category, ClassificationResult, NewsArticle, NewsClassifierTrait};

use crate::config::AiConfig;
use crate::error::AiError;
use crate::json_extract::parse_json_object;
use crate::prompts::{classification_prompt, CLASSIFIER_PREAMBLE};
use crate::rules::{extract_industries, extract_instruments, normalize_code};
use crate::text_generator::TextGeneratorTrait;

// ============================================================================
// Model Output
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMention {
    Code(String),
    Detailed { code: String },
}

impl RawMention {
    fn code(&self) -> &str {
        match self {
            RawMention::Code(code) => code,
            RawMention::Detailed { code } => code,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawClassification {
    #[serde(alias = "analysis_type", alias = "type")]
    category: Option<String>,
    confidence: Option<f64>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(alias = "mentioned_stocks", alias = "stocks")]
    mentioned_instruments: Option<Vec<RawMention>>,
    #[serde(alias = "industries")]
    mentioned_industries: Option<Vec<String>>,
}

/// Validated model answer.
#[derive(Debug)]
struct ModelClassification {
    category: Category,
    confidence: f64,
    reason: Option<String>,
    instruments: Vec<String>,
    industries: Vec<String>,
}

fn parse_classification(raw: &str) -> Result<ModelClassification, AiError> {
    let parsed: RawClassification =
        parse_json_object(raw).map_err(AiError::ClassificationParse)?;

    let category = parsed
        .category
        .ok_or_else(|| AiError::ClassificationParse("missing category".to_string()))?
        .parse::<Category>()
        .map_err(AiError::ClassificationParse)?;
    let confidence = parsed
        .confidence
        .filter(|c| c.is_finite())
        .ok_or_else(|| AiError::ClassificationParse("missing confidence".to_string()))?;

    let mentioned_instruments = parsed
        .mentioned_instruments
        .ok_or_else(|| AiError::ClassificationParse("missing mentioned_instruments".to_string()))?;
    let industries = parsed
        .mentioned_industries
        .ok_or_else(|| AiError::ClassificationParse("missing mentioned_industries".to_string()))?;

    let instruments = mentioned_instruments
        .iter()
        .filter_map(|m| {
            let code = normalize_code(m.code());
            if code.is_none() {
                debug!("Dropping model-reported code '{}'", m.code());
            }
            code
        })
        .collect();

    Ok(ModelClassification {
        category,
        confidence,
        reason: parsed.reason,
        instruments,
        industries,
    })
}

// ============================================================================
// Classifier
// ============================================================================

/// Classifier with a model primary path and a rule-based fallback.
pub struct NewsClassifier {
    generator: Arc<dyn TextGeneratorTrait>,
    config: AiConfig,
}

impl NewsClassifier {
    pub fn new(generator: Arc<dyn TextGeneratorTrait>, config: AiConfig) -> Self {
        Self { generator, config }
    }

    async fn classify_with_model(&self, article: &NewsArticle) -> Result<ModelClassification, AiError> {
        let prompt = classification_prompt(article, self.config.max_content_chars);
        let raw = self.generator.generate(CLASSIFIER_PREAMBLE, &prompt).await?;
        debug!("Classifier raw answer for {}: {}", article.id, raw);
        parse_classification(&raw)
    }
}

#[async_trait]
impl NewsClassifierTrait for NewsClassifier {
    async fn classify(&self, article: &NewsArticle) -> ClassificationResult {
        let text = article.text();
        let rule_instruments: Vec<String> =
            extract_instruments(&text).into_iter().map(|m| m.code).collect();
        let rule_industries = extract_industries(&text);

        let result = match self.classify_with_model(article).await {
            Ok(model) => {
                // Model codes first, then anything only the pattern pass found.
                let instruments: Vec<String> = model
                    .instruments
                    .into_iter()
                    .chain(rule_instruments)
                    .collect();
                let industries = if model.industries.is_empty() {
                    rule_industries
                } else {
                    model.industries
                };

                let category = if model.confidence < self.config.category_override_threshold {
                    let fallback = Category::from_mentions(&instruments, &industries);
                    info!(
                        "Article {}: model confidence {:.2} below {:.2}, category {} -> {}",
                        article.id,
                        model.confidence,
                        self.config.category_override_threshold,
                        model.category,
                        fallback
                    );
                    fallback
                } else {
                    model.category
                };

                let result =
                    ClassificationResult::new(category, instruments, industries, model.confidence);
                match model.reason {
                    Some(reason) => result.with_reason(reason),
                    None => result,
                }
            }
            Err(e) => {
                warn!(
                    "Article {}: model classification failed ({}), using rule-based fallback",
                    article.id, e
                );
                let category = Category::from_mentions(&rule_instruments, &rule_industries);
                ClassificationResult::new(
                    category,
                    rule_instruments,
                    rule_industries,
                    self.config.fallback_confidence,
                )
                .with_reason("rule-based fallback")
            }
        };

        info!(
            "Article {} classified as {} ({} instruments, {} industries, confidence {:.2})",
            article.id,
            result.category(),
            result.mentioned_instruments().len(),
            result.mentioned_industries().len(),
            result.confidence()
        );
        result
    }
}

// ============================================================================
// Tests
// ============================================================================

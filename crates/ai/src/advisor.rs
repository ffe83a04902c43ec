//! Investment advisor.
//!
//! Turns a classification plus scored candidates into a [`Recommendation`].
//! An empty candidate list never reaches the model. A malformed answer gets
//! one retry with a stricter prompt; a second failure degrades to a
//! `no_action` recommendation carrying the raw answer.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::Deserialize;

use investnote_core::advice::{Action, InvestmentAdvisorTrait, Recommendation, RiskLevel};
use investnote_core::candidates::CandidateInstrument;
use investnote_core::news::ClassificationResult;

use crate::error::AiError;
use crate::json_extract::parse_json_object;
use crate::prompts::{advice_prompt, strict_advice_prompt, ADVISOR_PREAMBLE};
use crate::text_generator::TextGeneratorTrait;

#[derive(Debug, Deserialize)]
struct RawAdvice {
    #[serde(alias = "recommendation")]
    action: Option<String>,
    #[serde(alias = "risk", alias = "risk_assessment")]
    risk_level: Option<String>,
    rationale: Option<String>,
    #[serde(alias = "time_horizon")]
    timeframe: Option<String>,
    #[serde(default)]
    confidence_level: Option<f64>,
    #[serde(default)]
    key_factors: Vec<String>,
    #[serde(default)]
    related_instruments: Vec<String>,
}

fn normalize_timeframe(raw: &str) -> Result<String, AiError> {
    let timeframe = match raw.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
        "short_term" | "short" | "短期" => "short_term",
        "medium_term" | "medium" | "mid_term" | "中期" => "medium_term",
        "long_term" | "long" | "长期" => "long_term",
        other => return Err(AiError::AdvisorParse(format!("unknown timeframe '{}'", other))),
    };
    Ok(timeframe.to_string())
}

fn required(value: Option<String>, field: &str) -> Result<String, AiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AiError::AdvisorParse(format!("missing {}", field)))
}

/// Validate a model answer against the recommendation schema.
fn parse_advice(raw: &str, candidates: &[CandidateInstrument]) -> Result<Recommendation, AiError> {
    let parsed: RawAdvice = parse_json_object(raw).map_err(AiError::AdvisorParse)?;

    let action: Action = required(parsed.action, "action")?
        .parse()
        .map_err(AiError::AdvisorParse)?;
    let risk_level: RiskLevel = required(parsed.risk_level, "risk_level")?
        .parse()
        .map_err(AiError::AdvisorParse)?;
    let rationale = required(parsed.rationale, "rationale")?;
    let timeframe = normalize_timeframe(&required(parsed.timeframe, "timeframe")?)?;

    // Only codes that were actually offered; default to all of them.
    let known: HashSet<&str> = candidates.iter().map(|c| c.code.as_str()).collect();
    let mut seen = HashSet::new();
    let mut related: Vec<String> = parsed
        .related_instruments
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| known.contains(c.as_str()) && seen.insert(c.clone()))
        .collect();
    if related.is_empty() {
        related = candidates.iter().map(|c| c.code.clone()).collect();
    }

    Ok(Recommendation {
        action,
        risk_level,
        rationale,
        timeframe,
        related_instruments: related,
        key_factors: parsed
            .key_factors
            .into_iter()
            .filter(|f| !f.trim().is_empty())
            .collect(),
        confidence_level: parsed
            .confidence_level
            .filter(|c| c.is_finite())
            .map(|c| c.round().clamp(1.0, 10.0) as u8),
        generation_skipped: false,
    })
}

/// Model-backed advisor.
pub struct InvestmentAdvisor {
    generator: Arc<dyn TextGeneratorTrait>,
}

impl InvestmentAdvisor {
    pub fn new(generator: Arc<dyn TextGeneratorTrait>) -> Self {
        Self { generator }
    }

    /// One generation call. Returns the raw text alongside any failure so the
    /// caller can surface it.
    async fn attempt(
        &self,
        prompt: &str,
        candidates: &[CandidateInstrument],
    ) -> Result<Recommendation, (AiError, Option<String>)> {
        let raw = self
            .generator
            .generate(ADVISOR_PREAMBLE, prompt)
            .await
            .map_err(|e| (e, None))?;
        debug!("Advisor raw answer: {}", raw);
        parse_advice(&raw, candidates).map_err(|e| (e, Some(raw)))
    }
}

#[async_trait]
impl InvestmentAdvisorTrait for InvestmentAdvisor {
    async fn advise(
        &self,
        classification: &ClassificationResult,
        candidates: &[CandidateInstrument],
    ) -> Recommendation {
        if candidates.is_empty() {
            info!("No candidates, skipping advice generation");
            return Recommendation::no_candidates();
        }

        let prompt = advice_prompt(classification, candidates);
        let (first_error, first_raw) = match self.attempt(&prompt, candidates).await {
            Ok(recommendation) => return recommendation,
            Err(failure) => failure,
        };
        warn!("Advice attempt failed ({}), retrying with strict prompt", first_error);

        let strict = strict_advice_prompt(classification, candidates);
        let (error, raw) = match self.attempt(&strict, candidates).await {
            Ok(recommendation) => return recommendation,
            Err(failure) => failure,
        };
        warn!("Advice retry failed ({}), degrading to no_action", error);

        // The retry's text wins; a transport failure on retry keeps the first text.
        let rationale = match raw
            .filter(|r| !r.trim().is_empty())
            .or_else(|| first_raw.filter(|r| !r.trim().is_empty()))
        {
            Some(raw) => raw.trim().to_string(),
            None => format!("advice generation failed: {}", error),
        };
        let mut recommendation = Recommendation::no_action(RiskLevel::Medium, rationale)
            .with_related(candidates.iter().map(|c| c.code.clone()).collect());
        recommendation.generation_skipped = false;
        recommendation
    }
}

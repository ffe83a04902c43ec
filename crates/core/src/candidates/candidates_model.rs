use serde::Serialize;

use investnote_market_data::{ConstituentInstrument, InstrumentCode, Market};

use crate::constants::EXPLICIT_MENTION_RELEVANCE;
use crate::scores::ScoreSummary;

/// How a candidate entered the list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CandidateOrigin {
    /// Named directly in the article.
    Mentioned,
    /// Found by expanding an industry label.
    Industry { label: String, board: String },
}

/// Instrument considered relevant to an article.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateInstrument {
    pub code: InstrumentCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub market: Market,
    /// Ranking weight only; not an investment score.
    pub relevance_score: f64,
    /// Filled by the score fetcher when the scoring service had data.
    pub resolved_score: Option<ScoreSummary>,
    pub origin: CandidateOrigin,
}

impl CandidateInstrument {
    /// Candidate for an instrument named in the article.
    pub fn mentioned(code: impl Into<String>, name: Option<String>, market: Market) -> Self {
        Self {
            code: code.into(),
            name,
            market,
            relevance_score: EXPLICIT_MENTION_RELEVANCE,
            resolved_score: None,
            origin: CandidateOrigin::Mentioned,
        }
    }

    /// Candidate derived from an industry board constituent.
    pub fn from_constituent(
        constituent: &ConstituentInstrument,
        label: &str,
        relevance_score: f64,
    ) -> Self {
        Self {
            code: constituent.code.clone(),
            name: (!constituent.name.is_empty()).then(|| constituent.name.clone()),
            market: Market::infer(&constituent.code),
            relevance_score,
            resolved_score: None,
            origin: CandidateOrigin::Industry {
                label: label.to_string(),
                board: constituent.board.clone(),
            },
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.code)
    }
}

/// Output of the candidate resolver.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCandidates {
    pub candidates: Vec<CandidateInstrument>,
    /// True when at least one label could not be expanded because every
    /// provider was unavailable. Distinguishes an outage from "no matches".
    pub degraded: bool,
    /// Labels that hit a provider outage.
    pub failed_labels: Vec<String>,
}

impl ResolvedCandidates {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

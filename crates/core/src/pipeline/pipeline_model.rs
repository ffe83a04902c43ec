use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use investnote_market_data::ProviderHealth;

use crate::advice::Recommendation;
use crate::candidates::CandidateInstrument;
use crate::news::ClassificationResult;

/// States of the per-article state machine.
///
/// ```text
/// INIT -> CLASSIFIED -> STOCK_PATH | INDUSTRY_PATH | TERMINAL_IRRELEVANT
///      -> CANDIDATES_RESOLVED -> SCORED -> ADVISED -> DONE
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Init,
    Classified,
    StockPath,
    IndustryPath,
    TerminalIrrelevant,
    CandidatesResolved,
    Scored,
    Advised,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Init => "INIT",
            Self::Classified => "CLASSIFIED",
            Self::StockPath => "STOCK_PATH",
            Self::IndustryPath => "INDUSTRY_PATH",
            Self::TerminalIrrelevant => "TERMINAL_IRRELEVANT",
            Self::CandidatesResolved => "CANDIDATES_RESOLVED",
            Self::Scored => "SCORED",
            Self::Advised => "ADVISED",
            Self::Done => "DONE",
        };
        f.write_str(name)
    }
}

/// Everything one pipeline run produced, for the caller and for audit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineOutcome {
    pub article_id: String,
    /// Irrelevant with zero confidence when the deadline expired before
    /// classification finished.
    pub classification: ClassificationResult,
    pub candidates: Vec<CandidateInstrument>,
    pub recommendation: Recommendation,
    /// Set when a provider outage or the deadline limited the result.
    pub degraded: bool,
    pub timed_out: bool,
    /// Provider health rows, attached to degraded outcomes.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provider_status: Vec<ProviderHealth>,
    pub stages: Vec<PipelineStage>,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl PipelineOutcome {
    pub fn final_stage(&self) -> Option<PipelineStage> {
        self.stages.last().copied()
    }

    pub fn passed_through(&self, stage: PipelineStage) -> bool {
        self.stages.contains(&stage)
    }
}

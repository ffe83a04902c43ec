use async_trait::async_trait;

use super::scores_model::ScoreSnapshot;
use crate::candidates::CandidateInstrument;
use crate::errors::ScoringError;

/// The external scoring service, consumed as a black box.
#[async_trait]
pub trait ScoringServiceTrait: Send + Sync {
    /// Latest score history for an instrument, or `ScoringError::Unavailable`.
    async fn get_score(&self, code: &str) -> Result<ScoreSnapshot, ScoringError>;
}

/// Attaches score summaries to candidates.
#[async_trait]
pub trait ScoreFetcherTrait: Send + Sync {
    /// Returns the same candidates, in the same order, with `resolved_score`
    /// filled where a score was available. Never drops a candidate.
    async fn attach_scores(&self, candidates: Vec<CandidateInstrument>) -> Vec<CandidateInstrument>;
}

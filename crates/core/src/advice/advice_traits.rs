use async_trait::async_trait;

use super::advice_model::Recommendation;
use crate::candidates::CandidateInstrument;
use crate::news::ClassificationResult;

/// Produces the final recommendation for an article.
#[async_trait]
pub trait InvestmentAdvisorTrait: Send + Sync {
    /// With no candidates, implementations must return a fixed `no_action`
    /// recommendation without making a generation call.
    async fn advise(
        &self,
        classification: &ClassificationResult,
        candidates: &[CandidateInstrument],
    ) -> Recommendation;
}

use async_trait::async_trait;

use super::candidates_model::ResolvedCandidates;
use crate::news::ClassificationResult;

/// Turns a classification into candidate instruments.
#[async_trait]
pub trait CandidateResolverTrait: Send + Sync {
    /// Never fails: provider outages surface as `degraded` with fewer candidates.
    async fn resolve(&self, classification: &ClassificationResult) -> ResolvedCandidates;
}

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{debug, warn};

use super::scores_model::ScoreSummary;
use super::scores_traits::{ScoreFetcherTrait, ScoringServiceTrait};
use crate::candidates::CandidateInstrument;
use crate::constants::{DEFAULT_SCORE_FAN_OUT, DEFAULT_SCORE_TIMEOUT_SECS};
use crate::errors::ScoringError;

/// Fetches scores for many candidates with bounded concurrency.
pub struct ScoreFetcher {
    service: Arc<dyn ScoringServiceTrait>,
    fan_out: usize,
    call_timeout: Duration,
}

impl ScoreFetcher {
    pub fn new(service: Arc<dyn ScoringServiceTrait>) -> Self {
        Self {
            service,
            fan_out: DEFAULT_SCORE_FAN_OUT,
            call_timeout: Duration::from_secs(DEFAULT_SCORE_TIMEOUT_SECS),
        }
    }

    pub fn with_limits(mut self, fan_out: usize, call_timeout: Duration) -> Self {
        self.fan_out = fan_out.max(1);
        self.call_timeout = call_timeout;
        self
    }

    /// Score one instrument. Any failure maps to `None`.
    pub async fn get_score(&self, code: &str) -> Option<ScoreSummary> {
        let result = match tokio::time::timeout(self.call_timeout, self.service.get_score(code)).await
        {
            Ok(result) => result,
            Err(_) => Err(ScoringError::Timeout(code.to_string())),
        };

        match result {
            Ok(snapshot) => {
                let summary = ScoreSummary::from_snapshot(&snapshot);
                if summary.is_none() {
                    debug!("Score history for {} has no usable points", code);
                }
                summary
            }
            Err(ScoringError::Unavailable(_)) => {
                debug!("No score available for {}", code);
                None
            }
            Err(e) => {
                warn!("Score lookup failed for {}: {}", code, e);
                None
            }
        }
    }
}

#[async_trait]
impl ScoreFetcherTrait for ScoreFetcher {
    async fn attach_scores(&self, candidates: Vec<CandidateInstrument>) -> Vec<CandidateInstrument> {
        // `buffered` keeps input order while running up to `fan_out` lookups.
        let scored: Vec<CandidateInstrument> = stream::iter(candidates.into_iter().map(
            |mut candidate| async move {
                candidate.resolved_score = self.get_score(&candidate.code).await;
                candidate
            },
        ))
        .buffered(self.fan_out)
        .collect()
        .await;

        debug!(
            "Scores attached: {}/{} candidates",
            scored.iter().filter(|c| c.resolved_score.is_some()).count(),
            scored.len()
        );
        scored
    }
}

//! In-memory scoring service for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::scores_model::{ScorePoint, ScoreSnapshot};
use super::scores_traits::ScoringServiceTrait;
use crate::errors::ScoringError;

/// Serves fixed score histories; unknown codes are unavailable.
#[derive(Default)]
pub struct FakeScoringService {
    scores: HashMap<String, Vec<f64>>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeScoringService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scores(mut self, code: &str, scores: &[f64]) -> Self {
        self.scores.insert(code.to_string(), scores.to_vec());
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent `get_score` calls observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScoringServiceTrait for FakeScoringService {
    async fn get_score(&self, code: &str) -> Result<ScoreSnapshot, ScoringError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let scores = self
            .scores
            .get(code)
            .ok_or_else(|| ScoringError::Unavailable(code.to_string()))?;

        Ok(ScoreSnapshot {
            code: code.to_string(),
            history: scores
                .iter()
                .enumerate()
                .map(|(i, score)| ScorePoint {
                    time_key: format!("{:03}", i),
                    score: *score,
                })
                .collect(),
        })
    }
}

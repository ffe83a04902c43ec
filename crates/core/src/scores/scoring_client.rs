//! HTTP client for the scoring service.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::scores_model::{ScorePoint, ScoreSnapshot};
use super::scores_traits::ScoringServiceTrait;
use crate::constants::DEFAULT_SCORE_HISTORY_DAYS;
use crate::errors::ScoringError;

/// Accepts both `{"scores": [...]}` and `{"data": {"scores": [...]}}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScoresResponse {
    Bare { scores: Vec<ScorePoint> },
    Wrapped { data: Option<ScoresBody> },
}

#[derive(Debug, Deserialize)]
struct ScoresBody {
    #[serde(default)]
    scores: Vec<ScorePoint>,
}

/// Reads `GET {base}/api/ticker/{code}/scores?days=N`.
pub struct HttpScoringService {
    client: Client,
    base_url: String,
    days: u32,
}

impl HttpScoringService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            days: DEFAULT_SCORE_HISTORY_DAYS,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    fn parse(code: &str, body: &str) -> Result<ScoreSnapshot, ScoringError> {
        let response: ScoresResponse = serde_json::from_str(body)
            .map_err(|e| ScoringError::MalformedResponse(format!("{}: {}", code, e)))?;

        let mut history = match response {
            ScoresResponse::Bare { scores } => scores,
            ScoresResponse::Wrapped { data } => data.map(|d| d.scores).unwrap_or_default(),
        };

        if history.is_empty() {
            return Err(ScoringError::Unavailable(code.to_string()));
        }

        history.sort_by(|a, b| a.time_key.cmp(&b.time_key));
        Ok(ScoreSnapshot {
            code: code.to_string(),
            history,
        })
    }
}

#[async_trait]
impl ScoringServiceTrait for HttpScoringService {
    async fn get_score(&self, code: &str) -> Result<ScoreSnapshot, ScoringError> {
        let url = format!("{}/api/ticker/{}/scores", self.base_url, code);
        debug!("Fetching scores for {} from {}", code, url);

        let response = self
            .client
            .get(&url)
            .query(&[("days", self.days)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Err(ScoringError::Unavailable(code.to_string())),
            status if !status.is_success() => {
                return Err(ScoringError::Request(format!("HTTP {} for {}", status, code)))
            }
            _ => {}
        }

        let body = response.text().await?;
        Self::parse(code, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wrapped_response_sorts_history() {
        let body = r#"{"data":{"scores":[{"time_key":"2024-01-02","score":7.5},{"time_key":"2024-01-01","score":6.0}]}}"#;
        let snapshot = HttpScoringService::parse("600519", body).unwrap();

        assert_eq!(snapshot.history.len(), 2);
        assert_eq!(snapshot.history[0].time_key, "2024-01-01");
    }

    #[test]
    fn test_parse_bare_response() {
        let body = r#"{"scores":[{"timeKey":"2024-01-01","score":6.0}]}"#;
        let snapshot = HttpScoringService::parse("000001", body).unwrap();
        assert_eq!(snapshot.history[0].score, 6.0);
    }

    #[test]
    fn test_empty_history_is_unavailable() {
        let err = HttpScoringService::parse("000001", r#"{"data":null}"#).unwrap_err();
        assert!(matches!(err, ScoringError::Unavailable(_)));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let err = HttpScoringService::parse("000001", "<html>").unwrap_err();
        assert!(matches!(err, ScoringError::MalformedResponse(_)));
    }
}

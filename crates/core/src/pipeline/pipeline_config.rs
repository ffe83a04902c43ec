use std::time::Duration;

use crate::candidates::CandidateLimits;
use crate::constants::*;

/// Orchestrator settings.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub per_industry_cap: usize,
    pub total_cap: usize,
    /// Concurrent score lookups within one article.
    pub score_fan_out: usize,
    pub score_timeout: Duration,
    /// Budget for one article; on expiry the best partial outcome is returned.
    pub article_deadline: Duration,
    /// Articles processed concurrently by `run_batch`.
    pub worker_pool_size: usize,
    pub enrich_mentions: bool,
    /// Base URL of the scoring service.
    pub scoring_base_url: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            per_industry_cap: DEFAULT_PER_INDUSTRY_CAP,
            total_cap: DEFAULT_TOTAL_CAP,
            score_fan_out: DEFAULT_SCORE_FAN_OUT,
            score_timeout: Duration::from_secs(DEFAULT_SCORE_TIMEOUT_SECS),
            article_deadline: Duration::from_secs(DEFAULT_ARTICLE_DEADLINE_SECS),
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            enrich_mentions: true,
            scoring_base_url: "http://localhost:8000".to_string(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

impl PipelineConfig {
    /// Read `INVESTNOTE_*` variables, keeping defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            per_industry_cap: env_parse("INVESTNOTE_PER_INDUSTRY_CAP")
                .unwrap_or(defaults.per_industry_cap),
            total_cap: env_parse("INVESTNOTE_TOTAL_CAP").unwrap_or(defaults.total_cap),
            score_fan_out: env_parse("INVESTNOTE_SCORE_FAN_OUT")
                .filter(|v: &usize| *v > 0)
                .unwrap_or(defaults.score_fan_out),
            score_timeout: env_parse("INVESTNOTE_SCORE_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.score_timeout),
            article_deadline: env_parse("INVESTNOTE_ARTICLE_DEADLINE_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.article_deadline),
            worker_pool_size: env_parse("INVESTNOTE_WORKER_POOL_SIZE")
                .filter(|v: &usize| *v > 0)
                .unwrap_or(defaults.worker_pool_size),
            enrich_mentions: env_parse("INVESTNOTE_ENRICH_MENTIONS")
                .unwrap_or(defaults.enrich_mentions),
            scoring_base_url: std::env::var("INVESTNOTE_SCORING_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.scoring_base_url),
        }
    }

    pub fn candidate_limits(&self) -> CandidateLimits {
        CandidateLimits {
            per_industry_cap: self.per_industry_cap,
            total_cap: self.total_cap,
            enrich_mentions: self.enrich_mentions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.per_industry_cap, 15);
        assert_eq!(config.total_cap, 30);
        assert_eq!(config.score_fan_out, 10);
        assert_eq!(config.candidate_limits().total_cap, 30);
    }
}

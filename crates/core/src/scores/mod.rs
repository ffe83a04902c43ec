//! Scores module - score fetching from the external scoring service.

mod fake;
mod scores_model;
mod scores_service;
mod scores_traits;
mod scoring_client;

pub use fake::FakeScoringService;
pub use scores_model::{ScorePoint, ScoreSnapshot, ScoreSummary, ScoreTrend};
pub use scores_service::ScoreFetcher;
pub use scores_traits::{ScoreFetcherTrait, ScoringServiceTrait};
pub use scoring_client::HttpScoringService;

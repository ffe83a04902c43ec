//! Pipeline orchestrator.
//!
//! Runs one article through classification, candidate resolution, scoring
//! and advice. Stages run strictly in sequence; every transition depends
//! only on the previous stage's output. Stage failures degrade the outcome
//! instead of aborting it, and a per-article deadline bounds the whole run.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant as StdInstant;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use tokio::time::Instant;

use investnote_market_data::ProviderResolver;

use super::pipeline_config::PipelineConfig;
use super::pipeline_model::{PipelineOutcome, PipelineStage};
use crate::advice::{InvestmentAdvisorTrait, Recommendation, RiskLevel};
use crate::candidates::{CandidateInstrument, CandidateResolver, CandidateResolverTrait};
use crate::constants::{IRRELEVANT_RATIONALE, TIMED_OUT_RATIONALE};
use crate::errors::{Error, Result};
use crate::news::{Category, ClassificationResult, NewsArticle, NewsClassifierTrait};
use crate::scores::{HttpScoringService, ScoreFetcher, ScoreFetcherTrait};

/// Partial results accumulated while a run progresses.
struct RunState {
    article_id: String,
    started_at: DateTime<Utc>,
    clock: StdInstant,
    stages: Vec<PipelineStage>,
    classification: Option<ClassificationResult>,
    candidates: Vec<CandidateInstrument>,
    degraded: bool,
}

impl RunState {
    fn new(article_id: &str) -> Self {
        Self {
            article_id: article_id.to_string(),
            started_at: Utc::now(),
            clock: StdInstant::now(),
            stages: vec![PipelineStage::Init],
            classification: None,
            candidates: Vec::new(),
            degraded: false,
        }
    }

    fn enter(&mut self, stage: PipelineStage) {
        debug!("Article {}: -> {}", self.article_id, stage);
        self.stages.push(stage);
    }
}

/// News-to-recommendation orchestrator.
///
/// Built with [`PipelineBuilder`]; every collaborator is injected, so tests
/// can swap any of them for a deterministic fake.
pub struct Pipeline {
    classifier: Arc<dyn NewsClassifierTrait>,
    resolver: Arc<dyn CandidateResolverTrait>,
    score_fetcher: Arc<dyn ScoreFetcherTrait>,
    advisor: Arc<dyn InvestmentAdvisorTrait>,
    providers: Arc<ProviderResolver>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one article. Always returns an outcome.
    pub async fn run(&self, article: &NewsArticle) -> PipelineOutcome {
        let deadline = Instant::now() + self.config.article_deadline;
        let mut state = RunState::new(&article.id);

        info!("Pipeline started for article {} ({})", article.id, article.title);

        // INIT -> CLASSIFIED
        let Some(classification) = within(deadline, self.classifier.classify(article)).await else {
            return self.timed_out(state);
        };
        state.enter(PipelineStage::Classified);
        state.classification = Some(classification.clone());

        // CLASSIFIED -> path
        match classification.category() {
            Category::Irrelevant => {
                state.enter(PipelineStage::TerminalIrrelevant);
                return self.finish(
                    state,
                    Recommendation::no_action(RiskLevel::Low, IRRELEVANT_RATIONALE),
                );
            }
            Category::StockSpecific => state.enter(PipelineStage::StockPath),
            Category::IndustryFocused => state.enter(PipelineStage::IndustryPath),
        }

        // path -> CANDIDATES_RESOLVED
        let Some(resolved) = within(deadline, self.resolver.resolve(&classification)).await else {
            return self.timed_out(state);
        };
        state.enter(PipelineStage::CandidatesResolved);
        state.degraded |= resolved.degraded;
        state.candidates = resolved.candidates;

        if state.candidates.is_empty() {
            info!(
                "Article {}: no candidates{}, skipping scoring and advice",
                article.id,
                if state.degraded { " (provider outage)" } else { "" }
            );
            return self.finish(state, Recommendation::no_candidates());
        }

        // CANDIDATES_RESOLVED -> SCORED
        let candidates = std::mem::take(&mut state.candidates);
        let fallback = candidates.clone();
        match within(deadline, self.score_fetcher.attach_scores(candidates)).await {
            Some(scored) => state.candidates = scored,
            None => {
                state.candidates = fallback;
                return self.timed_out(state);
            }
        }
        state.enter(PipelineStage::Scored);

        // SCORED -> ADVISED
        let Some(recommendation) = within(
            deadline,
            self.advisor.advise(&classification, &state.candidates),
        )
        .await
        else {
            return self.timed_out(state);
        };
        state.enter(PipelineStage::Advised);

        self.finish(state, recommendation)
    }

    /// Run many articles on a bounded worker pool. Outcomes keep input order.
    pub async fn run_batch(&self, articles: &[NewsArticle]) -> Vec<PipelineOutcome> {
        info!(
            "Pipeline batch of {} articles ({} workers)",
            articles.len(),
            self.config.worker_pool_size
        );

        stream::iter(articles.iter().map(|article| self.run(article)))
            .buffered(self.config.worker_pool_size.max(1))
            .collect()
            .await
    }

    fn finish(&self, mut state: RunState, recommendation: Recommendation) -> PipelineOutcome {
        state.enter(PipelineStage::Done);

        let provider_status = if state.degraded {
            self.providers.health_snapshot()
        } else {
            Vec::new()
        };
        let elapsed_ms = state.clock.elapsed().as_millis() as u64;

        info!(
            "Pipeline finished for article {}: {} ({} candidates, {} ms{})",
            state.article_id,
            recommendation.action,
            state.candidates.len(),
            elapsed_ms,
            if state.degraded { ", degraded" } else { "" }
        );

        PipelineOutcome {
            article_id: state.article_id,
            // Unset only when the deadline hit before classification finished.
            classification: state
                .classification
                .unwrap_or_else(ClassificationResult::irrelevant),
            timed_out: false,
            candidates: state.candidates,
            recommendation,
            degraded: state.degraded,
            provider_status,
            stages: state.stages,
            started_at: state.started_at,
            elapsed_ms,
        }
    }

    fn timed_out(&self, mut state: RunState) -> PipelineOutcome {
        warn!(
            "Article {}: deadline of {:?} exceeded after {}",
            state.article_id,
            self.config.article_deadline,
            state.stages.last().copied().unwrap_or(PipelineStage::Init)
        );
        state.degraded = true;

        let related = state.candidates.iter().map(|c| c.code.clone()).collect();
        let recommendation =
            Recommendation::no_action(RiskLevel::Medium, TIMED_OUT_RATIONALE).with_related(related);

        let mut outcome = self.finish(state, recommendation);
        outcome.timed_out = true;
        outcome
    }
}

/// Await `future` unless the deadline passes first; the future is dropped on expiry.
async fn within<F: Future>(deadline: Instant, future: F) -> Option<F::Output> {
    tokio::time::timeout_at(deadline, future).await.ok()
}

/// Assembles a [`Pipeline`]. Missing collaborators are the only fatal error.
#[derive(Default)]
pub struct PipelineBuilder {
    classifier: Option<Arc<dyn NewsClassifierTrait>>,
    resolver: Option<Arc<dyn CandidateResolverTrait>>,
    score_fetcher: Option<Arc<dyn ScoreFetcherTrait>>,
    advisor: Option<Arc<dyn InvestmentAdvisorTrait>>,
    providers: Option<Arc<ProviderResolver>>,
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn classifier(mut self, classifier: Arc<dyn NewsClassifierTrait>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn candidate_resolver(mut self, resolver: Arc<dyn CandidateResolverTrait>) -> Self {
        self.resolver = Some(resolver);
        self
    }

    pub fn score_fetcher(mut self, score_fetcher: Arc<dyn ScoreFetcherTrait>) -> Self {
        self.score_fetcher = Some(score_fetcher);
        self
    }

    pub fn advisor(mut self, advisor: Arc<dyn InvestmentAdvisorTrait>) -> Self {
        self.advisor = Some(advisor);
        self
    }

    pub fn providers(mut self, providers: Arc<ProviderResolver>) -> Self {
        self.providers = Some(providers);
        self
    }

    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Fill the resolver and score fetcher from the provider set and config
    /// when they were not supplied explicitly.
    pub fn with_default_stages(mut self) -> Self {
        if self.resolver.is_none() {
            if let Some(providers) = &self.providers {
                self.resolver = Some(Arc::new(CandidateResolver::with_limits(
                    Arc::clone(providers),
                    self.config.candidate_limits(),
                )));
            }
        }
        if self.score_fetcher.is_none() {
            let service = HttpScoringService::new(
                self.config.scoring_base_url.clone(),
                self.config.score_timeout,
            );
            self.score_fetcher = Some(Arc::new(
                ScoreFetcher::new(Arc::new(service))
                    .with_limits(self.config.score_fan_out, self.config.score_timeout),
            ));
        }
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        Ok(Pipeline {
            classifier: self.classifier.ok_or(Error::MissingDependency("classifier"))?,
            resolver: self
                .resolver
                .ok_or(Error::MissingDependency("candidate resolver"))?,
            score_fetcher: self
                .score_fetcher
                .ok_or(Error::MissingDependency("score fetcher"))?,
            advisor: self.advisor.ok_or(Error::MissingDependency("advisor"))?,
            providers: self.providers.ok_or(Error::MissingDependency("provider set"))?,
            config: self.config,
        })
    }
}

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info, warn};

use investnote_market_data::{Market, MarketDataError, ProviderResolver};

use super::candidates_model::{CandidateInstrument, ResolvedCandidates};
use super::candidates_traits::CandidateResolverTrait;
use super::relevance::rank;
use crate::constants::{DEFAULT_PER_INDUSTRY_CAP, DEFAULT_TOTAL_CAP};
use crate::news::{Category, ClassificationResult};

/// Limits applied while building the candidate list.
#[derive(Debug, Clone)]
pub struct CandidateLimits {
    pub per_industry_cap: usize,
    pub total_cap: usize,
    /// Look up named instruments to attach display names.
    pub enrich_mentions: bool,
}

impl Default for CandidateLimits {
    fn default() -> Self {
        Self {
            per_industry_cap: DEFAULT_PER_INDUSTRY_CAP,
            total_cap: DEFAULT_TOTAL_CAP,
            enrich_mentions: true,
        }
    }
}

/// Turns a classification into a bounded, deduplicated, ranked candidate list.
pub struct CandidateResolver {
    providers: Arc<ProviderResolver>,
    limits: CandidateLimits,
}

impl CandidateResolver {
    pub fn new(providers: Arc<ProviderResolver>) -> Self {
        Self::with_limits(providers, CandidateLimits::default())
    }

    pub fn with_limits(providers: Arc<ProviderResolver>, limits: CandidateLimits) -> Self {
        Self { providers, limits }
    }

    /// Wrap every mentioned instrument, optionally enriched with its name.
    async fn mentioned_candidates(&self, codes: &[String]) -> Vec<CandidateInstrument> {
        let mut candidates = Vec::with_capacity(codes.len());
        for code in codes {
            let candidate = if self.limits.enrich_mentions {
                match self.providers.lookup(code).await {
                    Ok(snapshot) => {
                        CandidateInstrument::mentioned(code, Some(snapshot.name), snapshot.market)
                    }
                    Err(MarketDataError::NotFound(_)) => {
                        debug!("Mentioned instrument {} unknown to providers", code);
                        CandidateInstrument::mentioned(code, None, Market::infer(code))
                    }
                    Err(e) => {
                        debug!("Could not enrich {}: {}", code, e);
                        CandidateInstrument::mentioned(code, None, Market::infer(code))
                    }
                }
            } else {
                CandidateInstrument::mentioned(code, None, Market::infer(code))
            };
            candidates.push(candidate);
        }
        candidates
    }

    /// Expand each label, ranked and capped per label. Returns the candidates
    /// and the labels that hit a provider outage.
    async fn industry_candidates(&self, labels: &[String]) -> (Vec<CandidateInstrument>, Vec<String>) {
        let mut candidates = Vec::new();
        let mut failed = Vec::new();

        for label in labels {
            match self.providers.search_industry(label).await {
                Ok(constituents) => {
                    let ranked = rank(&constituents);
                    debug!(
                        "Industry '{}' expanded to {} constituents, keeping {}",
                        label,
                        ranked.len(),
                        ranked.len().min(self.limits.per_industry_cap)
                    );
                    candidates.extend(
                        ranked
                            .into_iter()
                            .take(self.limits.per_industry_cap)
                            .map(|(c, score)| CandidateInstrument::from_constituent(c, label, score)),
                    );
                }
                Err(e) => {
                    warn!("Industry '{}' could not be expanded: {}", label, e);
                    failed.push(label.clone());
                }
            }
        }

        (candidates, failed)
    }

    fn merge(&self, lists: Vec<Vec<CandidateInstrument>>) -> Vec<CandidateInstrument> {
        let mut seen = HashSet::new();
        let mut merged: Vec<CandidateInstrument> = lists
            .into_iter()
            .flatten()
            .filter(|c| seen.insert(c.code.clone()))
            .collect();

        // Stable: equal relevance keeps merge order.
        merged.sort_by(|a, b| b.relevance_score.total_cmp(&a.relevance_score));
        merged.truncate(self.limits.total_cap);
        merged
    }
}

#[async_trait]
impl CandidateResolverTrait for CandidateResolver {
    async fn resolve(&self, classification: &ClassificationResult) -> ResolvedCandidates {
        let instruments = classification.mentioned_instruments();
        let industries = classification.mentioned_industries();

        let (mentioned, expanded, failed_labels) = match classification.category() {
            Category::Irrelevant => return ResolvedCandidates::default(),
            Category::StockSpecific if !instruments.is_empty() => {
                (self.mentioned_candidates(instruments).await, Vec::new(), Vec::new())
            }
            // Industry path, or a stock path that named no instrument.
            Category::StockSpecific | Category::IndustryFocused => {
                let mentioned = self.mentioned_candidates(instruments).await;
                let (expanded, failed) = self.industry_candidates(industries).await;
                (mentioned, expanded, failed)
            }
        };

        let candidates = self.merge(vec![mentioned, expanded]);
        let degraded = !failed_labels.is_empty();

        info!(
            "Resolved {} candidates ({} path{})",
            candidates.len(),
            classification.category(),
            if degraded { ", degraded" } else { "" }
        );

        ResolvedCandidates {
            candidates,
            degraded,
            failed_labels,
        }
    }
}


#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use investnote_market_data::provider::fake::{constituent, FakeBehavior, FakeProvider};
    use investnote_market_data::{
        IndustryCatalog, MarketDataProvider, ProviderResolver, ResolverConfig,
    };

    use crate::candidates::{
        CandidateLimits, CandidateOrigin, CandidateResolver, CandidateResolverTrait,
    };
    use crate::news::{Category, ClassificationResult};

    fn board(prefix: &str, count: usize) -> Vec<investnote_market_data::ConstituentInstrument> {
        (0..count)
            .map(|i| {
                constituent(
                    &format!("{}{:03}", prefix, i),
                    &format!("{} member {}", prefix, i),
                    1_000 - i as i64,
                    500,
                    0.8,
                )
            })
            .collect()
    }

    fn resolver_with(provider: FakeProvider) -> Arc<ProviderResolver> {
        let catalog = IndustryCatalog::new(["Semiconductor", "Software", "Banks"])
            .with_synonym(["AI"], ["Semiconductor", "Software"]);
        let providers: Vec<Arc<dyn MarketDataProvider>> = vec![Arc::new(provider)];
        Arc::new(ProviderResolver::with_catalog(
            providers,
            catalog,
            ResolverConfig {
                call_timeout: Duration::from_millis(50),
                ..Default::default()
            },
        ))
    }

    fn default_provider() -> FakeProvider {
        FakeProvider::new("FAKE", 1)
            .with_instrument("000001", "Ping An Bank")
            .with_board("Semiconductor", board("688", 20))
            .with_board("Software", board("300", 20))
            .with_board("Banks", board("601", 5))
    }

    fn classification(
        category: Category,
        instruments: &[&str],
        industries: &[&str],
    ) -> ClassificationResult {
        ClassificationResult::new(
            category,
            instruments.iter().copied(),
            industries.iter().copied(),
            0.9,
        )
    }

    #[tokio::test]
    async fn test_stock_path_uses_mentions_directly() {
        let resolver = CandidateResolver::new(resolver_with(default_provider()));

        let resolved = resolver
            .resolve(&classification(Category::StockSpecific, &["000001"], &["Banks"]))
            .await;

        assert_eq!(resolved.candidates.len(), 1);
        let candidate = &resolved.candidates[0];
        assert_eq!(candidate.code, "000001");
        assert_eq!(candidate.relevance_score, 1.0);
        assert_eq!(candidate.name.as_deref(), Some("Ping An Bank"));
        assert_eq!(candidate.origin, CandidateOrigin::Mentioned);
        assert!(!resolved.degraded);
    }

    #[tokio::test]
    async fn test_unknown_mention_is_kept() {
        let resolver = CandidateResolver::new(resolver_with(default_provider()));

        let resolved = resolver
            .resolve(&classification(Category::StockSpecific, &["600999"], &[]))
            .await;

        assert_eq!(resolved.candidates.len(), 1);
        assert!(resolved.candidates[0].name.is_none());
    }

    #[tokio::test]
    async fn test_industry_path_caps_per_label_and_total() {
        let resolver = CandidateResolver::with_limits(
            resolver_with(default_provider()),
            CandidateLimits {
                per_industry_cap: 15,
                total_cap: 20,
                enrich_mentions: false,
            },
        );

        let resolved = resolver
            .resolve(&classification(
                Category::IndustryFocused,
                &[],
                &["Semiconductor", "Software"],
            ))
            .await;

        assert_eq!(resolved.candidates.len(), 20);
        let from_semis = resolved
            .candidates
            .iter()
            .filter(|c| c.code.starts_with("688"))
            .count();
        assert!(from_semis <= 15);
    }

    #[tokio::test]
    async fn test_industry_path_ranks_descending() {
        let resolver = CandidateResolver::new(resolver_with(default_provider()));

        let resolved = resolver
            .resolve(&classification(Category::IndustryFocused, &[], &["Banks"]))
            .await;

        let scores: Vec<f64> = resolved.candidates.iter().map(|c| c.relevance_score).collect();
        assert_eq!(scores.len(), 5);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(resolved.candidates[0].code, "601000");
    }

    #[tokio::test]
    async fn test_duplicates_across_labels_keep_first() {
        let provider = FakeProvider::new("FAKE", 1)
            .with_board("Semiconductor", vec![constituent("688981", "SMIC", 100, 10, 0.9)])
            .with_board("Software", vec![constituent("688981", "SMIC", 100, 10, 0.9)]);
        let resolver = CandidateResolver::new(resolver_with(provider));

        let resolved = resolver
            .resolve(&classification(
                Category::IndustryFocused,
                &[],
                &["Semiconductor", "Software"],
            ))
            .await;

        assert_eq!(resolved.candidates.len(), 1);
        match &resolved.candidates[0].origin {
            CandidateOrigin::Industry { label, .. } => assert_eq!(label, "Semiconductor"),
            other => panic!("unexpected origin {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_irrelevant_and_unmatched_are_empty() {
        let resolver = CandidateResolver::new(resolver_with(default_provider()));

        let resolved = resolver.resolve(&ClassificationResult::irrelevant()).await;
        assert!(resolved.is_empty());
        assert!(!resolved.degraded);

        let resolved = resolver
            .resolve(&classification(Category::IndustryFocused, &[], &["Weather"]))
            .await;
        assert!(resolved.is_empty());
        assert!(!resolved.degraded);
    }

    #[tokio::test]
    async fn test_provider_outage_is_degraded_not_empty_match() {
        let resolver = CandidateResolver::new(resolver_with(
            default_provider().with_behavior(FakeBehavior::Failing),
        ));

        let resolved = resolver
            .resolve(&classification(Category::IndustryFocused, &[], &["Banks"]))
            .await;

        assert!(resolved.is_empty());
        assert!(resolved.degraded);
        assert_eq!(resolved.failed_labels, vec!["Banks".to_string()]);
    }

    #[tokio::test]
    async fn test_resolution_is_idempotent() {
        let resolver = CandidateResolver::new(resolver_with(default_provider()));
        let input = classification(Category::IndustryFocused, &["000001"], &["AI", "Banks"]);

        let first = resolver.resolve(&input).await;
        let second = resolver.resolve(&input).await;

        assert_eq!(first, second);
        assert_eq!(first.candidates[0].code, "000001");
    }
}

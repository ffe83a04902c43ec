#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use async_trait::async_trait;

    use investnote_market_data::provider::fake::{FakeBehavior, FakeProvider};
    use investnote_market_data::{MarketDataProvider, ProviderResolver, ResolverConfig};

    use crate::advice::{Action, InvestmentAdvisorTrait, Recommendation, RiskLevel};
    use crate::candidates::{
        CandidateInstrument, CandidateResolver, CandidateResolverTrait, ResolvedCandidates,
    };
    use crate::errors::Error;
    use crate::news::{Category, ClassificationResult, NewsArticle, NewsClassifierTrait};
    use crate::pipeline::{Pipeline, PipelineConfig, PipelineStage};
    use crate::scores::{FakeScoringService, ScoreFetcher};

    // --- Fakes ---

    struct FixedClassifier {
        result: ClassificationResult,
        delay: Option<Duration>,
    }

    impl FixedClassifier {
        fn new(result: ClassificationResult) -> Self {
            Self {
                result,
                delay: None,
            }
        }
    }

    #[async_trait]
    impl NewsClassifierTrait for FixedClassifier {
        async fn classify(&self, _article: &NewsArticle) -> ClassificationResult {
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct CountingAdvisor {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl InvestmentAdvisorTrait for CountingAdvisor {
        async fn advise(
            &self,
            _classification: &ClassificationResult,
            candidates: &[CandidateInstrument],
        ) -> Recommendation {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Recommendation {
                action: Action::Buy,
                risk_level: RiskLevel::Medium,
                rationale: "scripted".to_string(),
                timeframe: "medium_term".to_string(),
                related_instruments: candidates.iter().map(|c| c.code.clone()).collect(),
                key_factors: Vec::new(),
                confidence_level: Some(7),
                generation_skipped: false,
            }
        }
    }

    #[derive(Default)]
    struct CountingResolver {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CandidateResolverTrait for CountingResolver {
        async fn resolve(&self, _classification: &ClassificationResult) -> ResolvedCandidates {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ResolvedCandidates::default()
        }
    }

    fn providers(behavior: FakeBehavior) -> Arc<ProviderResolver> {
        let provider = FakeProvider::new("FAKE", 1)
            .with_instrument("000001", "Ping An Bank")
            .with_behavior(behavior);
        let providers: Vec<Arc<dyn MarketDataProvider>> = vec![Arc::new(provider)];
        Arc::new(ProviderResolver::new(
            providers,
            ResolverConfig {
                call_timeout: Duration::from_millis(50),
                ..Default::default()
            },
        ))
    }

    fn stock_classification() -> ClassificationResult {
        ClassificationResult::new(
            Category::StockSpecific,
            ["000001"],
            Vec::<String>::new(),
            0.9,
        )
    }

    fn pipeline(
        classifier: FixedClassifier,
        advisor: Arc<CountingAdvisor>,
        providers: Arc<ProviderResolver>,
        config: PipelineConfig,
    ) -> Pipeline {
        let scoring = Arc::new(FakeScoringService::new().with_scores("000001", &[6.0, 6.5, 7.0]));
        Pipeline::builder()
            .classifier(Arc::new(classifier))
            .candidate_resolver(Arc::new(CandidateResolver::new(providers.clone())))
            .score_fetcher(Arc::new(ScoreFetcher::new(scoring)))
            .advisor(advisor)
            .providers(providers)
            .config(config)
            .build()
            .unwrap()
    }

    fn article() -> NewsArticle {
        NewsArticle::new("a-1", "Ping An Bank (000001) beats estimates")
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_stock_path_walks_every_stage() {
        let advisor = Arc::new(CountingAdvisor::default());
        let pipeline = pipeline(
            FixedClassifier::new(stock_classification()),
            advisor.clone(),
            providers(FakeBehavior::Healthy),
            PipelineConfig::default(),
        );

        let outcome = pipeline.run(&article()).await;

        assert_eq!(
            outcome.stages,
            vec![
                PipelineStage::Init,
                PipelineStage::Classified,
                PipelineStage::StockPath,
                PipelineStage::CandidatesResolved,
                PipelineStage::Scored,
                PipelineStage::Advised,
                PipelineStage::Done,
            ]
        );
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(outcome.candidates[0].code, "000001");
        assert!(outcome.candidates[0].resolved_score.is_some());
        assert_eq!(outcome.recommendation.related_instruments, vec!["000001"]);
        assert!(!outcome.degraded);
        assert!(outcome.provider_status.is_empty());
    }

    #[tokio::test]
    async fn test_irrelevant_short_circuits() {
        let advisor = Arc::new(CountingAdvisor::default());
        let resolver = Arc::new(CountingResolver::default());
        let scoring = Arc::new(FakeScoringService::new());
        let pipeline = Pipeline::builder()
            .classifier(Arc::new(FixedClassifier::new(ClassificationResult::irrelevant())))
            .candidate_resolver(resolver.clone())
            .score_fetcher(Arc::new(ScoreFetcher::new(scoring.clone())))
            .advisor(advisor.clone())
            .providers(providers(FakeBehavior::Healthy))
            .build()
            .unwrap();

        let outcome = pipeline.run(&article()).await;

        assert_eq!(outcome.final_stage(), Some(PipelineStage::Done));
        assert!(outcome.passed_through(PipelineStage::TerminalIrrelevant));
        assert!(!outcome.passed_through(PipelineStage::CandidatesResolved));
        assert_eq!(outcome.recommendation.action, Action::NoAction);
        assert_eq!(resolver.calls.load(Ordering::SeqCst), 0);
        assert_eq!(scoring.calls(), 0);
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_candidates_skip_scoring_and_advice() {
        let advisor = Arc::new(CountingAdvisor::default());
        let resolver = Arc::new(CountingResolver::default());
        let pipeline = Pipeline::builder()
            .classifier(Arc::new(FixedClassifier::new(stock_classification())))
            .candidate_resolver(resolver.clone())
            .score_fetcher(Arc::new(ScoreFetcher::new(Arc::new(FakeScoringService::new()))))
            .advisor(advisor.clone())
            .providers(providers(FakeBehavior::Healthy))
            .build()
            .unwrap();

        let outcome = pipeline.run(&article()).await;

        assert_eq!(resolver.calls.load(Ordering::SeqCst), 1);
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
        assert!(!outcome.passed_through(PipelineStage::Scored));
        assert_eq!(outcome.recommendation.rationale, "no matching instruments found");
    }

    #[tokio::test]
    async fn test_provider_outage_flags_degraded_outcome() {
        let advisor = Arc::new(CountingAdvisor::default());
        let pipeline = pipeline(
            FixedClassifier::new(ClassificationResult::new(
                Category::IndustryFocused,
                Vec::<String>::new(),
                ["银行"],
                0.8,
            )),
            advisor.clone(),
            providers(FakeBehavior::Failing),
            PipelineConfig::default(),
        );

        let outcome = pipeline.run(&article()).await;

        assert!(outcome.degraded);
        assert!(outcome.candidates.is_empty());
        assert_eq!(outcome.provider_status.len(), 1);
        assert_eq!(outcome.provider_status[0].provider, "FAKE");
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_outcome() {
        let advisor = Arc::new(CountingAdvisor::default());
        let classifier = FixedClassifier {
            result: stock_classification(),
            delay: Some(Duration::from_millis(500)),
        };
        let pipeline = pipeline(
            classifier,
            advisor.clone(),
            providers(FakeBehavior::Healthy),
            PipelineConfig {
                article_deadline: Duration::from_millis(30),
                ..Default::default()
            },
        );

        let outcome = pipeline.run(&article()).await;

        assert!(outcome.timed_out);
        assert!(outcome.degraded);
        let classification = &outcome.classification;
        assert_eq!(classification.category(), Category::Irrelevant);
        assert_eq!(classification.confidence(), 0.0);
        assert_eq!(outcome.recommendation.action, Action::NoAction);
        assert_eq!(
            outcome.stages,
            vec![PipelineStage::Init, PipelineStage::Done]
        );
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_isolates_failures() {
        let advisor = Arc::new(CountingAdvisor::default());
        let pipeline = pipeline(
            FixedClassifier::new(stock_classification()),
            advisor.clone(),
            providers(FakeBehavior::Healthy),
            PipelineConfig {
                worker_pool_size: 2,
                ..Default::default()
            },
        );
        let articles: Vec<NewsArticle> = (0..5)
            .map(|i| NewsArticle::new(format!("a-{}", i), "Ping An Bank (000001)"))
            .collect();

        let outcomes = pipeline.run_batch(&articles).await;

        let ids: Vec<&str> = outcomes.iter().map(|o| o.article_id.as_str()).collect();
        assert_eq!(ids, vec!["a-0", "a-1", "a-2", "a-3", "a-4"]);
        assert_eq!(advisor.calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_missing_dependency_aborts_build() {
        let result = Pipeline::builder()
            .classifier(Arc::new(FixedClassifier::new(ClassificationResult::irrelevant())))
            .build();

        assert!(matches!(
            result,
            Err(Error::MissingDependency("candidate resolver"))
        ));
    }

    #[tokio::test]
    async fn test_default_stages_fill_resolver_and_fetcher() {
        let pipeline = Pipeline::builder()
            .classifier(Arc::new(FixedClassifier::new(ClassificationResult::irrelevant())))
            .advisor(Arc::new(CountingAdvisor::default()))
            .providers(providers(FakeBehavior::Healthy))
            .with_default_stages()
            .build();

        assert!(pipeline.is_ok());
    }
}

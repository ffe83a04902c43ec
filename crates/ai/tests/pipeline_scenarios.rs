//! End-to-end pipeline scenarios.
//!
//! Each test wires the real classifier, candidate resolver, score fetcher and
//! advisor together, with scripted model answers, fake market-data providers
//! and a fake scoring service standing in for the network.

use std::sync::Arc;
use std::time::Duration;

use investnote_ai::{AiConfig, FakeTextGenerator, InvestmentAdvisor, NewsClassifier};
use investnote_core::advice::Action;
use investnote_core::candidates::CandidateResolver;
use investnote_core::news::{Category, NewsArticle};
use investnote_core::pipeline::{Pipeline, PipelineStage};
use investnote_core::scores::{FakeScoringService, ScoreFetcher};
use investnote_market_data::provider::fake::{constituent, FakeBehavior, FakeProvider};
use investnote_market_data::{MarketDataProvider, ProviderResolver, ResolverConfig};

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    pipeline: Pipeline,
    generator: Arc<FakeTextGenerator>,
    providers: Arc<ProviderResolver>,
}

fn harness(
    generator: FakeTextGenerator,
    providers: &[Arc<FakeProvider>],
    scoring: FakeScoringService,
) -> Harness {
    let generator = Arc::new(generator);
    let providers: Vec<Arc<dyn MarketDataProvider>> = providers
        .iter()
        .map(|p| p.clone() as Arc<dyn MarketDataProvider>)
        .collect();
    let providers = Arc::new(ProviderResolver::new(
        providers,
        ResolverConfig {
            call_timeout: Duration::from_millis(50),
            ..Default::default()
        },
    ));

    let pipeline = Pipeline::builder()
        .classifier(Arc::new(NewsClassifier::new(
            generator.clone(),
            AiConfig::default(),
        )))
        .candidate_resolver(Arc::new(CandidateResolver::new(providers.clone())))
        .score_fetcher(Arc::new(ScoreFetcher::new(Arc::new(scoring))))
        .advisor(Arc::new(InvestmentAdvisor::new(generator.clone())))
        .providers(providers.clone())
        .build()
        .unwrap();

    Harness {
        pipeline,
        generator,
        providers,
    }
}

fn industry_answer(label: &str) -> String {
    format!(
        r#"{{"category": "industry_focused", "confidence": 0.85, "reason": "sector news",
            "mentioned_instruments": [], "mentioned_industries": ["{}"]}}"#,
        label
    )
}

const HOLD_ANSWER: &str = r#"{"action": "hold", "risk_level": "medium",
    "rationale": "sector momentum is priced in", "timeframe": "medium_term",
    "confidence_level": 6, "key_factors": ["valuation"]}"#;

fn semiconductor_board() -> Vec<investnote_market_data::ConstituentInstrument> {
    (1..=20)
        .map(|i| {
            constituent(
                &format!("6880{:02}", i),
                &format!("Chip {}", i),
                1_000 * i,
                500 * i,
                0.5,
            )
        })
        .collect()
}

// =============================================================================
// Scenarios
// =============================================================================

/// Scenario 1: a single bracketed instrument mention.
#[tokio::test]
async fn stock_mention_flows_to_recommendation() {
    let provider = Arc::new(FakeProvider::new("PRIMARY", 0).with_instrument("000001", "Acme Corp"));
    let h = harness(
        FakeTextGenerator::new()
            .with_response(
                r#"{"category": "stock_specific", "confidence": 0.9,
                    "mentioned_instruments": [{"name": "Acme Corp", "code": "000001"}],
                    "mentioned_industries": []}"#,
            )
            .with_response(
                r#"{"action": "buy", "risk_level": "medium", "rationale": "contract win",
                    "timeframe": "short_term", "related_instruments": ["000001"]}"#,
            ),
        &[provider],
        FakeScoringService::new().with_scores("000001", &[6.0, 6.5, 7.0]),
    );
    let article = NewsArticle::new("s1", "Acme Corp (000001) signs supply contract");

    let outcome = h.pipeline.run(&article).await;

    let classification = &outcome.classification;
    assert_eq!(classification.category(), Category::StockSpecific);
    assert_eq!(classification.mentioned_instruments(), ["000001"]);
    assert_eq!(outcome.candidates.len(), 1);
    assert_eq!(outcome.candidates[0].code, "000001");
    assert_eq!(outcome.candidates[0].name.as_deref(), Some("Acme Corp"));
    assert!(outcome.candidates[0].resolved_score.is_some());
    assert_eq!(outcome.recommendation.action, Action::Buy);
    assert_eq!(outcome.recommendation.related_instruments, vec!["000001"]);
    assert!(outcome.passed_through(PipelineStage::StockPath));
    assert_eq!(h.generator.calls(), 2);
}

/// Scenario 2: a theme phrase is expanded through synonym boards.
#[tokio::test]
async fn industry_theme_expands_to_ranked_candidates() {
    let provider = FakeProvider::new("PRIMARY", 0)
        .with_board("半导体", semiconductor_board())
        .with_board(
            "软件开发",
            vec![
                constituent("688001", "Chip 1", 1_000, 500, 0.5),
                constituent("300001", "Soft 1", 50_000, 20_000, 0.9),
            ],
        );
    let h = harness(
        FakeTextGenerator::new()
            .with_response(industry_answer("AI"))
            .with_response(HOLD_ANSWER),
        &[Arc::new(provider)],
        FakeScoringService::new().with_scores("300001", &[7.0, 7.5, 8.0]),
    );
    let article = NewsArticle::new("s2", "Strong growth in the AI sector")
        .with_body("Demand for compute keeps rising across the industry.");

    let outcome = h.pipeline.run(&article).await;

    assert!(outcome.passed_through(PipelineStage::IndustryPath));
    assert_eq!(outcome.candidates.len(), 15);
    assert_eq!(outcome.candidates[0].code, "300001");
    assert!(outcome.candidates[0].resolved_score.is_some());
    let codes: std::collections::HashSet<&str> =
        outcome.candidates.iter().map(|c| c.code.as_str()).collect();
    assert_eq!(codes.len(), 15);

    assert_eq!(h.generator.calls(), 2);
    assert!(h.generator.prompts()[1].contains("300001"));
    assert_eq!(outcome.recommendation.action, Action::Hold);
    assert_eq!(outcome.recommendation.confidence_level, Some(6));
    assert!(!outcome.degraded);
}

/// Scenario 3: nothing market related.
#[tokio::test]
async fn irrelevant_article_ends_without_lookups_or_advice() {
    let provider = Arc::new(FakeProvider::new("PRIMARY", 0));
    let h = harness(
        FakeTextGenerator::new().with_response(
            r#"{"category": "irrelevant", "confidence": 0.95, "reason": "weather report",
                "mentioned_instruments": [], "mentioned_industries": []}"#,
        ),
        &[provider.clone()],
        FakeScoringService::new(),
    );
    let article = NewsArticle::new("s3", "Sunny weekend ahead with light winds");

    let outcome = h.pipeline.run(&article).await;

    assert!(outcome.passed_through(PipelineStage::TerminalIrrelevant));
    assert_eq!(outcome.final_stage(), Some(PipelineStage::Done));
    assert_eq!(outcome.recommendation.action, Action::NoAction);
    assert!(outcome.candidates.is_empty());
    assert_eq!(provider.lookup_calls(), 0);
    assert_eq!(provider.industry_calls(), 0);
    assert_eq!(h.generator.calls(), 1);
}

/// Scenario 4: a hanging primary is disabled and the secondary takes over.
#[tokio::test]
async fn hanging_primary_is_disabled_and_secondary_serves() {
    let primary = Arc::new(
        FakeProvider::new("PRIMARY", 0)
            .with_board("银行", semiconductor_board())
            .with_behavior(FakeBehavior::Hanging),
    );
    let secondary = Arc::new(
        FakeProvider::new("SECONDARY", 1)
            .with_board("银行", vec![constituent("600036", "Merchants Bank", 9_000, 800, 0.8)])
            .with_board("证券", vec![constituent("600030", "Citic Securities", 7_000, 900, 0.7)])
            .with_board("保险", vec![constituent("601318", "Ping An", 8_000, 700, 0.6)])
            .with_board("煤炭行业", vec![constituent("601088", "Shenhua", 6_000, 600, 0.9)]),
    );

    let mut generator = FakeTextGenerator::new();
    for label in ["银行", "证券", "保险", "煤炭行业"] {
        generator = generator
            .with_response(industry_answer(label))
            .with_response(HOLD_ANSWER);
    }
    let h = harness(
        generator,
        &[primary.clone(), secondary.clone()],
        FakeScoringService::new(),
    );

    for (i, label) in ["银行", "证券", "保险"].iter().enumerate() {
        let article = NewsArticle::new(format!("s4-{}", i), format!("{} sector update", label));
        let outcome = h.pipeline.run(&article).await;
        assert_eq!(outcome.candidates.len(), 1, "label {}", label);
    }
    assert_eq!(primary.industry_calls(), 3);

    let status = h.providers.health_snapshot();
    assert_eq!(status[0].provider, "PRIMARY");
    assert!(status[0].is_disabled());

    let article = NewsArticle::new("s4-3", "煤炭行业 sector update");
    let outcome = h.pipeline.run(&article).await;

    assert_eq!(outcome.candidates[0].code, "601088");
    assert_eq!(primary.industry_calls(), 3);
    assert_eq!(secondary.industry_calls(), 4);
}

/// Scenario 5: a label that no catalog tier recognizes.
#[tokio::test]
async fn unmatched_label_skips_advice() {
    let provider = Arc::new(FakeProvider::new("PRIMARY", 0));
    let h = harness(
        FakeTextGenerator::new().with_response(industry_answer("quantum knitting")),
        &[provider.clone()],
        FakeScoringService::new(),
    );
    let article = NewsArticle::new("s5", "Quantum knitting startups attract attention");

    let outcome = h.pipeline.run(&article).await;

    assert!(outcome.candidates.is_empty());
    assert!(!outcome.degraded);
    assert!(!outcome.passed_through(PipelineStage::Advised));
    assert_eq!(outcome.recommendation.action, Action::NoAction);
    assert_eq!(
        outcome.recommendation.rationale,
        "no matching instruments found"
    );
    assert_eq!(provider.industry_calls(), 0);
    assert_eq!(h.generator.calls(), 1);
}

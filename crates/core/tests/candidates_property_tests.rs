//! Property-based integration tests for candidate resolution.
//!
//! These tests check the list invariants (caps, uniqueness, ordering and
//! idempotence) over randomly generated industry boards.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use investnote_core::candidates::{
    CandidateLimits, CandidateOrigin, CandidateResolver, CandidateResolverTrait,
};
use investnote_core::news::{Category, ClassificationResult};
use investnote_market_data::provider::fake::{constituent, FakeProvider};
use investnote_market_data::{
    ConstituentInstrument, IndustryCatalog, MarketDataProvider, ProviderResolver, ResolverConfig,
};

const BOARDS: [&str; 3] = ["B0", "B1", "B2"];

// =============================================================================
// Generators
// =============================================================================

/// Generates a board constituent drawn from a small code pool so that
/// overlaps between boards are common.
fn arb_constituent() -> impl Strategy<Value = ConstituentInstrument> {
    (0u32..40, 1i64..1_000_000, 1i64..100_000, 0.0f64..1.0).prop_map(
        |(n, cap, turnover, stability)| {
            let code = format!("{:06}", 600000 + n);
            constituent(&code, &format!("Name {}", n), cap, turnover, stability)
        },
    )
}

/// Generates constituents for every board.
fn arb_boards() -> impl Strategy<Value = Vec<Vec<ConstituentInstrument>>> {
    prop::collection::vec(prop::collection::vec(arb_constituent(), 0..30), BOARDS.len())
}

fn resolver(boards: Vec<Vec<ConstituentInstrument>>, limits: CandidateLimits) -> CandidateResolver {
    let mut provider = FakeProvider::new("FAKE", 0);
    for (board, members) in BOARDS.iter().zip(boards) {
        // Board data keeps the first occurrence of a code, like a real listing.
        let mut seen = HashSet::new();
        let members = members
            .into_iter()
            .filter(|c| seen.insert(c.code.clone()))
            .collect();
        provider = provider.with_board(board, members);
    }
    let providers: Vec<Arc<dyn MarketDataProvider>> = vec![Arc::new(provider)];
    let market = ProviderResolver::with_catalog(
        providers,
        IndustryCatalog::new(BOARDS),
        ResolverConfig::default(),
    );
    CandidateResolver::with_limits(Arc::new(market), limits)
}

fn classification(labels: usize) -> ClassificationResult {
    ClassificationResult::new(
        Category::IndustryFocused,
        Vec::<String>::new(),
        BOARDS.iter().take(labels),
        0.8,
    )
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn candidate_list_respects_caps_and_is_unique(
        boards in arb_boards(),
        labels in 1usize..=3,
        per_industry_cap in 1usize..20,
        total_cap in 1usize..40,
    ) {
        let limits = CandidateLimits { per_industry_cap, total_cap, enrich_mentions: false };
        let resolver = resolver(boards, limits);

        let resolved = runtime().block_on(resolver.resolve(&classification(labels)));

        prop_assert!(!resolved.degraded);
        prop_assert!(resolved.candidates.len() <= total_cap);

        let codes: HashSet<&str> = resolved.candidates.iter().map(|c| c.code.as_str()).collect();
        prop_assert_eq!(codes.len(), resolved.candidates.len());

        let mut per_label: HashMap<&str, usize> = HashMap::new();
        for candidate in &resolved.candidates {
            if let CandidateOrigin::Industry { label, .. } = &candidate.origin {
                *per_label.entry(label.as_str()).or_default() += 1;
            }
        }
        prop_assert!(per_label.values().all(|n| *n <= per_industry_cap));
    }

    #[test]
    fn candidate_list_is_ordered_by_relevance(boards in arb_boards()) {
        let resolver = resolver(boards, CandidateLimits::default());

        let resolved = runtime().block_on(resolver.resolve(&classification(3)));

        for pair in resolved.candidates.windows(2) {
            prop_assert!(pair[0].relevance_score >= pair[1].relevance_score);
        }
        prop_assert!(resolved
            .candidates
            .iter()
            .all(|c| (0.0..=1.0).contains(&c.relevance_score)));
    }

    #[test]
    fn resolution_is_idempotent(boards in arb_boards(), labels in 1usize..=3) {
        let resolver = resolver(boards, CandidateLimits::default());
        let classification = classification(labels);
        let rt = runtime();

        let first = rt.block_on(resolver.resolve(&classification));
        let second = rt.block_on(resolver.resolve(&classification));

        prop_assert_eq!(first, second);
    }
}

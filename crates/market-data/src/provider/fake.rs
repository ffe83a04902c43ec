//! In-memory provider for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{ConstituentInstrument, InstrumentSnapshot, Market};

use super::{MarketDataProvider, ProviderCapabilities};

/// How a [`FakeProvider`] answers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FakeBehavior {
    /// Serve the configured data.
    Healthy,
    /// Answer every call with `ProviderUnavailable`.
    Failing,
    /// Never answer; relies on the caller's timeout.
    Hanging,
}

/// Scripted provider serving a fixed set of instruments and boards.
pub struct FakeProvider {
    id: &'static str,
    priority: u8,
    capabilities: ProviderCapabilities,
    instruments: HashMap<String, String>,
    boards: HashMap<String, Vec<ConstituentInstrument>>,
    behavior: Mutex<FakeBehavior>,
    lookup_calls: AtomicUsize,
    industry_calls: AtomicUsize,
}

impl FakeProvider {
    pub fn new(id: &'static str, priority: u8) -> Self {
        Self {
            id,
            priority,
            capabilities: ProviderCapabilities::FULL,
            instruments: HashMap::new(),
            boards: HashMap::new(),
            behavior: Mutex::new(FakeBehavior::Healthy),
            lookup_calls: AtomicUsize::new(0),
            industry_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_instrument(mut self, code: &str, name: &str) -> Self {
        self.instruments.insert(code.to_string(), name.to_string());
        self
    }

    pub fn with_board(mut self, board: &str, constituents: Vec<ConstituentInstrument>) -> Self {
        self.boards.insert(board.to_string(), constituents);
        self
    }

    pub fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_behavior(self, behavior: FakeBehavior) -> Self {
        self.set_behavior(behavior);
        self
    }

    pub fn set_behavior(&self, behavior: FakeBehavior) {
        *self
            .behavior
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = behavior;
    }

    fn behavior(&self) -> FakeBehavior {
        *self
            .behavior
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn lookup_calls(&self) -> usize {
        self.lookup_calls.load(Ordering::SeqCst)
    }

    pub fn industry_calls(&self) -> usize {
        self.industry_calls.load(Ordering::SeqCst)
    }

    async fn gate(&self) -> Result<(), MarketDataError> {
        match self.behavior() {
            FakeBehavior::Healthy => Ok(()),
            FakeBehavior::Failing => Err(MarketDataError::ProviderUnavailable {
                provider: self.id.to_string(),
                message: "scripted failure".to_string(),
            }),
            FakeBehavior::Hanging => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err(MarketDataError::Timeout {
                    provider: self.id.to_string(),
                })
            }
        }
    }
}

/// Build a board constituent with whole-number cap and turnover.
pub fn constituent(
    code: &str,
    name: &str,
    market_cap: i64,
    turnover: i64,
    recent_price_stability: f64,
) -> ConstituentInstrument {
    ConstituentInstrument {
        code: code.to_string(),
        name: name.to_string(),
        market_cap: Decimal::from(market_cap),
        turnover: Decimal::from(turnover),
        recent_price_stability,
        board: String::new(),
    }
}

#[async_trait]
impl MarketDataProvider for FakeProvider {
    fn id(&self) -> &'static str {
        self.id
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities
    }

    async fn lookup(&self, code: &str) -> Result<InstrumentSnapshot, MarketDataError> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;

        let name = self
            .instruments
            .get(code)
            .ok_or_else(|| MarketDataError::NotFound(code.to_string()))?;

        Ok(InstrumentSnapshot {
            code: code.to_string(),
            name: name.clone(),
            market: Market::infer(code),
            last_price: None,
            change_pct: None,
            market_cap: None,
            source: self.id.to_string(),
            as_of: Utc::now(),
        })
    }

    async fn search_industry(
        &self,
        board: &str,
    ) -> Result<Vec<ConstituentInstrument>, MarketDataError> {
        self.industry_calls.fetch_add(1, Ordering::SeqCst);
        self.gate().await?;

        Ok(self
            .boards
            .get(board)
            .map(|members| {
                members
                    .iter()
                    .cloned()
                    .map(|mut c| {
                        c.board = board.to_string();
                        c
                    })
                    .collect()
            })
            .unwrap_or_default())
    }
}

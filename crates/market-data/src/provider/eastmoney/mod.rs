//! Eastmoney market data provider implementation.
//!
//! This module reads the public push2 JSON endpoints:
//! - Industry board list via /api/qt/clist/get (fs=m:90+t:2)
//! - Board constituents via /api/qt/clist/get (fs=b:<board code>)
//! - Single instrument quotes via /api/qt/stock/get
//!
//! Numeric fields come back as JSON numbers, or as "-" when the exchange has
//! not published a value yet; both are handled.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{ConstituentInstrument, InstrumentSnapshot, Market};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://push2.eastmoney.com";
const PROVIDER_ID: &str = "EASTMONEY";

/// Board list refresh interval.
const BOARD_LIST_TTL: Duration = Duration::from_secs(3600);

/// Maximum constituents requested per board.
const MAX_CONSTITUENTS: u32 = 200;

// ============================================================================
// API Response Structures
// ============================================================================

/// Envelope shared by every push2 endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    /// Return code, 0 on success
    rc: i64,
    data: Option<T>,
}

/// Payload of /api/qt/clist/get
#[derive(Debug, Deserialize)]
struct ListData {
    #[serde(default)]
    diff: Vec<HashMap<String, Value>>,
}

// ============================================================================
// EastmoneyProvider
// ============================================================================

/// Eastmoney market data provider.
///
/// Serves A-share and Hong Kong lookups and the Eastmoney industry board
/// taxonomy. No API key is required.
pub struct EastmoneyProvider {
    client: Client,
    base_url: String,
    priority: u8,
    /// Board name -> board code ("BK1036"), refreshed hourly.
    boards: RwLock<Option<(Instant, HashMap<String, String>)>>,
}

impl EastmoneyProvider {
    /// Create a new Eastmoney provider with the default priority.
    pub fn new() -> Self {
        Self::with_priority(0)
    }

    /// Create a provider that registers with the given static priority.
    pub fn with_priority(priority: u8) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: BASE_URL.to_string(),
            priority,
            boards: RwLock::new(None),
        }
    }

    /// Point the provider at a different host (used by tests and mirrors).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Make a GET request and decode the push2 envelope.
    async fn fetch<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);

        debug!("Eastmoney request: {} with {} params", endpoint, params.len());

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    MarketDataError::Timeout {
                        provider: PROVIDER_ID.to_string(),
                    }
                } else {
                    MarketDataError::ProviderUnavailable {
                        provider: PROVIDER_ID.to_string(),
                        message: format!("Request failed: {}", e),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MarketDataError::ProviderUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let text = response.text().await?;
        let envelope: Envelope<T> =
            serde_json::from_str(&text).map_err(|e| MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to parse response: {}", e),
            })?;

        if envelope.rc != 0 {
            return Err(MarketDataError::ProviderUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("rc={}", envelope.rc),
            });
        }

        Ok(envelope.data)
    }

    /// Resolve a catalog board name to an Eastmoney board code.
    async fn board_code(&self, board: &str) -> Result<Option<String>, MarketDataError> {
        {
            let cached = self.boards.read().await;
            if let Some((fetched_at, boards)) = cached.as_ref() {
                if fetched_at.elapsed() < BOARD_LIST_TTL {
                    return Ok(lookup_board(boards, board));
                }
            }
        }

        let params = [
            ("pn", "1".to_string()),
            ("pz", "1000".to_string()),
            ("po", "1".to_string()),
            ("np", "1".to_string()),
            ("fltt", "2".to_string()),
            ("invt", "2".to_string()),
            ("fs", "m:90+t:2+f:!50".to_string()),
            ("fields", "f12,f14".to_string()),
        ];
        let data: Option<ListData> = self.fetch("/api/qt/clist/get", &params).await?;
        let boards: HashMap<String, String> = data
            .map(|d| d.diff)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|row| {
                let code = row.get("f12")?.as_str()?.to_string();
                let name = row.get("f14")?.as_str()?.to_string();
                Some((name, code))
            })
            .collect();

        if boards.is_empty() {
            return Err(MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: "Empty industry board list".to_string(),
            });
        }

        debug!("Eastmoney board list refreshed: {} boards", boards.len());
        let code = lookup_board(&boards, board);
        *self.boards.write().await = Some((Instant::now(), boards));
        Ok(code)
    }
}

impl Default for EastmoneyProvider {
    fn default() -> Self {
        Self::new()
    }
}

/// Exact board name first, then the first board whose name contains it.
fn lookup_board(boards: &HashMap<String, String>, board: &str) -> Option<String> {
    if let Some(code) = boards.get(board) {
        return Some(code.clone());
    }
    let mut partial: Vec<(&String, &String)> = boards
        .iter()
        .filter(|(name, _)| name.contains(board))
        .collect();
    partial.sort_by(|a, b| a.0.cmp(b.0));
    partial.first().map(|(_, code)| (*code).clone())
}

/// Eastmoney "secid" for a quote request: `<market>.<code>`.
fn secid(code: &str) -> String {
    match Market::infer(code) {
        Market::Sh => format!("1.{}", code),
        Market::Hk => format!("116.{}", code),
        _ => format!("0.{}", code),
    }
}

/// Read a numeric field that may be a number, a numeric string, or "-".
fn number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn decimal(value: Option<&Value>) -> Decimal {
    number(value)
        .and_then(Decimal::from_f64)
        .unwrap_or(Decimal::ZERO)
}

#[async_trait]
impl MarketDataProvider for EastmoneyProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn priority(&self) -> u8 {
        self.priority
    }

    fn capabilities(&self) -> ProviderCapabilities {
        ProviderCapabilities::FULL
    }

    async fn lookup(&self, code: &str) -> Result<InstrumentSnapshot, MarketDataError> {
        let params = [
            ("secid", secid(code)),
            ("fltt", "2".to_string()),
            ("invt", "2".to_string()),
            ("fields", "f43,f57,f58,f116,f170".to_string()),
        ];
        let data: Option<HashMap<String, Value>> =
            self.fetch("/api/qt/stock/get", &params).await?;

        // Unknown secids come back as rc=0 with data=null.
        let data = data.ok_or_else(|| MarketDataError::NotFound(code.to_string()))?;

        let name = data
            .get("f58")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Missing name for {}", code),
            })?;

        Ok(InstrumentSnapshot {
            code: code.to_string(),
            name,
            market: Market::infer(code),
            last_price: number(data.get("f43")).and_then(Decimal::from_f64),
            change_pct: number(data.get("f170")),
            market_cap: number(data.get("f116")).and_then(Decimal::from_f64),
            source: PROVIDER_ID.to_string(),
            as_of: Utc::now(),
        })
    }

    async fn search_industry(
        &self,
        board: &str,
    ) -> Result<Vec<ConstituentInstrument>, MarketDataError> {
        let Some(board_code) = self.board_code(board).await? else {
            debug!("Eastmoney has no board named '{}'", board);
            return Ok(Vec::new());
        };

        let params = [
            ("pn", "1".to_string()),
            ("pz", MAX_CONSTITUENTS.to_string()),
            ("po", "1".to_string()),
            ("np", "1".to_string()),
            ("fltt", "2".to_string()),
            ("invt", "2".to_string()),
            ("fid", "f20".to_string()),
            ("fs", format!("b:{}+f:!50", board_code)),
            ("fields", "f3,f6,f12,f14,f20".to_string()),
        ];
        let data: Option<ListData> = self.fetch("/api/qt/clist/get", &params).await?;

        let rows = data.map(|d| d.diff).unwrap_or_default();
        let total = rows.len();
        let constituents: Vec<ConstituentInstrument> = rows
            .into_iter()
            .filter_map(|row| {
                let code = row.get("f12")?.as_str()?.to_string();
                if code.len() != 6 {
                    return None;
                }
                let name = row
                    .get("f14")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let change_pct = number(row.get("f3")).unwrap_or(0.0);
                Some(ConstituentInstrument {
                    code,
                    name,
                    market_cap: decimal(row.get("f20")),
                    turnover: decimal(row.get("f6")),
                    recent_price_stability: ConstituentInstrument::stability_from_change_pct(
                        change_pct,
                    ),
                    board: board.to_string(),
                })
            })
            .collect();

        if constituents.len() < total {
            warn!(
                "Eastmoney board {} dropped {} rows with invalid codes",
                board_code,
                total - constituents.len()
            );
        }

        Ok(constituents)
    }
}

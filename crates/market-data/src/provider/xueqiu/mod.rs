//! Xueqiu (Snowball) market data provider implementation.
//!
//! Used as the secondary source behind Eastmoney. Xueqiu requires an
//! `xq_a_token` cookie on every request; without one the provider reports
//! itself as unavailable and the resolver moves on.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use reqwest::Client;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::{ConstituentInstrument, InstrumentSnapshot, Market};
use crate::provider::{MarketDataProvider, ProviderCapabilities};

const BASE_URL: &str = "https://stock.xueqiu.com";
const PROVIDER_ID: &str = "XUEQIU";

/// Constituents requested per industry page.
const PAGE_SIZE: u32 = 90;

// ============================================================================
// API Response Structures
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    quote: Option<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    code: Option<String>,
    name: Option<String>,
    current: Option<f64>,
    percent: Option<f64>,
    market_capital: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct IndustriesData {
    #[serde(default)]
    industries: Vec<Industry>,
}

#[derive(Debug, Clone, Deserialize)]
struct Industry {
    name: String,
    encode: String,
}

#[derive(Debug, Deserialize)]
struct ScreenerData {
    #[serde(default)]
    list: Vec<ScreenerRow>,
}

#[derive(Debug, Deserialize)]
struct ScreenerRow {
    symbol: String,
    name: Option<String>,
    percent: Option<f64>,
    market_capital: Option<f64>,
    amount: Option<f64>,
}

// ============================================================================
// XueqiuProvider
// ============================================================================

/// Xueqiu market data provider.
pub struct XueqiuProvider {
    client: Client,
    base_url: String,
    token: Option<String>,
    priority: u8,
    industries: RwLock<Vec<Industry>>,
}

impl XueqiuProvider {
    /// Create a new provider authenticated with an `xq_a_token` value.
    pub fn new(token: Option<String>) -> Self {
        Self::with_priority(token, 1)
    }

    pub fn with_priority(token: Option<String>, priority: u8) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: BASE_URL.to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
            priority,
            industries: RwLock::new(Vec::new()),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn headers(&self) -> Result<HeaderMap, MarketDataError> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| MarketDataError::ProviderUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: "xq_a_token not configured".to_string(),
            })?;

        let mut headers = HeaderMap::new();
        let cookie = HeaderValue::from_str(&format!("xq_a_token={}", token)).map_err(|e| {
            MarketDataError::ProviderUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: format!("Invalid token: {}", e),
            }
        })?;
        headers.insert(COOKIE, cookie);
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));
        Ok(headers)
    }

    async fn fetch<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, MarketDataError> {
        let url = format!("{}{}", self.base_url, endpoint);
        let headers = self.headers()?;

        debug!("Xueqiu request: {}", endpoint);

        let response = self
            .client
            .get(&url)
            .headers(headers)
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
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            warn!("Xueqiu rejected the configured token ({})", status);
        }
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

        if envelope.error_code != 0 {
            return Err(MarketDataError::ProviderUnavailable {
                provider: PROVIDER_ID.to_string(),
                message: envelope
                    .error_description
                    .unwrap_or_else(|| format!("error_code={}", envelope.error_code)),
            });
        }

        Ok(envelope.data)
    }

    async fn industry_code(&self, board: &str) -> Result<Option<String>, MarketDataError> {
        if self.industries.read().await.is_empty() {
            let params = [("category", "CN".to_string())];
            let data: Option<IndustriesData> = self
                .fetch("/v5/stock/screener/industries.json", &params)
                .await?;
            let industries = data.map(|d| d.industries).unwrap_or_default();
            debug!("Xueqiu industry list loaded: {} entries", industries.len());
            *self.industries.write().await = industries;
        }

        let industries = self.industries.read().await;
        let code = industries
            .iter()
            .find(|i| i.name == board)
            .or_else(|| industries.iter().find(|i| i.name.contains(board)))
            .map(|i| i.encode.clone());
        Ok(code)
    }
}

/// Xueqiu symbols carry the venue as a prefix: "SH600519", "SZ000001".
fn symbol(code: &str) -> String {
    match Market::infer(code) {
        Market::Sh => format!("SH{}", code),
        Market::Sz => format!("SZ{}", code),
        Market::Bj => format!("BJ{}", code),
        _ => code.to_string(),
    }
}

fn strip_symbol(symbol: &str) -> &str {
    symbol.trim_start_matches(|c: char| c.is_ascii_alphabetic())
}

#[async_trait]
impl MarketDataProvider for XueqiuProvider {
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
        let params = [("symbol", symbol(code)), ("extend", "detail".to_string())];
        let data: Option<QuoteData> = self.fetch("/v5/stock/quote.json", &params).await?;

        let quote = data
            .and_then(|d| d.quote)
            .ok_or_else(|| MarketDataError::NotFound(code.to_string()))?;

        let name = quote
            .name
            .ok_or_else(|| MarketDataError::MalformedResponse {
                provider: PROVIDER_ID.to_string(),
                message: format!("Missing name for {}", code),
            })?;

        Ok(InstrumentSnapshot {
            code: quote.code.unwrap_or_else(|| code.to_string()),
            name,
            market: Market::infer(code),
            last_price: quote.current.and_then(Decimal::from_f64),
            change_pct: quote.percent,
            market_cap: quote.market_capital.and_then(Decimal::from_f64),
            source: PROVIDER_ID.to_string(),
            as_of: Utc::now(),
        })
    }

    async fn search_industry(
        &self,
        board: &str,
    ) -> Result<Vec<ConstituentInstrument>, MarketDataError> {
        let Some(ind_code) = self.industry_code(board).await? else {
            debug!("Xueqiu has no industry named '{}'", board);
            return Ok(Vec::new());
        };

        let params = [
            ("page", "1".to_string()),
            ("size", PAGE_SIZE.to_string()),
            ("order", "desc".to_string()),
            ("order_by", "market_capital".to_string()),
            ("market", "CN".to_string()),
            ("type", "sh_sz".to_string()),
            ("ind_code", ind_code),
        ];
        let data: Option<ScreenerData> = self
            .fetch("/v5/stock/screener/quote/list.json", &params)
            .await?;

        Ok(data
            .map(|d| d.list)
            .unwrap_or_default()
            .into_iter()
            .map(|row| ConstituentInstrument {
                code: strip_symbol(&row.symbol).to_string(),
                name: row.name.unwrap_or_default(),
                market_cap: row
                    .market_capital
                    .and_then(Decimal::from_f64)
                    .unwrap_or(Decimal::ZERO),
                turnover: row.amount.and_then(Decimal::from_f64).unwrap_or(Decimal::ZERO),
                recent_price_stability: ConstituentInstrument::stability_from_change_pct(
                    row.percent.unwrap_or(0.0),
                ),
                board: board.to_string(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_prefix() {
        assert_eq!(symbol("600519"), "SH600519");
        assert_eq!(symbol("300750"), "SZ300750");
        assert_eq!(symbol("00700"), "00700");
        assert_eq!(strip_symbol("SH600519"), "600519");
    }

    #[tokio::test]
    async fn test_missing_token_is_unavailable() {
        let provider = XueqiuProvider::new(Some("  ".to_string()));
        let err = provider.lookup("600519").await.unwrap_err();
        assert!(matches!(err, MarketDataError::ProviderUnavailable { .. }));
    }

    #[test]
    fn test_quote_envelope_parses() {
        let body = r#"{"data":{"quote":{"code":"600519","name":"贵州茅台","current":1700.5,"percent":0.8,"market_capital":2.1e12}},"error_code":0}"#;
        let envelope: Envelope<QuoteData> = serde_json::from_str(body).unwrap();
        let quote = envelope.data.unwrap().quote.unwrap();
        assert_eq!(quote.name.as_deref(), Some("贵州茅台"));
        assert_eq!(quote.percent, Some(0.8));
    }
}

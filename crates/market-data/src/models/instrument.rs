use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::InstrumentCode;

/// Listing venue of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Market {
    /// Shanghai Stock Exchange
    Sh,
    /// Shenzhen Stock Exchange
    Sz,
    /// Beijing Stock Exchange
    Bj,
    /// Hong Kong Stock Exchange
    Hk,
    /// Mainland listing whose venue cannot be told from the code
    #[default]
    Cn,
}

impl Market {
    /// Infer the listing venue from an instrument code.
    ///
    /// Six-digit codes are mapped by their board prefix, five-digit codes are
    /// Hong Kong listings. Anything else falls back to [`Market::Cn`].
    pub fn infer(code: &str) -> Self {
        let code = code.trim();
        if !code.chars().all(|c| c.is_ascii_digit()) {
            return Self::Cn;
        }
        match code.len() {
            6 if code.starts_with("60") || code.starts_with("68") => Self::Sh,
            6 if code.starts_with("00") || code.starts_with("30") => Self::Sz,
            6 if code.starts_with('8') || code.starts_with('4') => Self::Bj,
            5 => Self::Hk,
            _ => Self::Cn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sh => "SH",
            Self::Sz => "SZ",
            Self::Bj => "BJ",
            Self::Hk => "HK",
            Self::Cn => "CN",
        }
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Point-in-time view of a single instrument returned by `lookup`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentSnapshot {
    pub code: InstrumentCode,
    pub name: String,
    pub market: Market,
    /// Last traded price
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_price: Option<Decimal>,
    /// Percent change on the session
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_pct: Option<f64>,
    /// Total market capitalization
    #[serde(skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<Decimal>,
    /// Provider that answered
    pub source: String,
    pub as_of: DateTime<Utc>,
}

/// Member of an industry board, as returned by `search_industry`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstituentInstrument {
    pub code: InstrumentCode,
    pub name: String,
    /// Total market capitalization
    pub market_cap: Decimal,
    /// Session turnover amount
    pub turnover: Decimal,
    /// 1.0 for a flat session, approaching 0.0 as the absolute move grows.
    pub recent_price_stability: f64,
    /// Catalog board the instrument was found under
    pub board: String,
}

impl ConstituentInstrument {
    /// Map an absolute percentage move to a stability score in `[0, 1]`.
    ///
    /// A ±10% move (the main-board daily limit) or more scores zero.
    pub fn stability_from_change_pct(change_pct: f64) -> f64 {
        if !change_pct.is_finite() {
            return 0.0;
        }
        (1.0 - change_pct.abs() / 10.0).clamp(0.0, 1.0)
    }
}

//! Relevance ranking for industry constituents.
//!
//! relevance = 0.5 * cap / max_cap + 0.25 * turnover / max_turnover + 0.25 * stability
//!
//! Normalization is per label, so scores are comparable within one board
//! expansion only.

use std::cmp::Ordering;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use investnote_market_data::ConstituentInstrument;

const MARKET_CAP_WEIGHT: f64 = 0.5;
const TURNOVER_WEIGHT: f64 = 0.25;
const STABILITY_WEIGHT: f64 = 0.25;

fn ratio(value: Decimal, max: Decimal) -> f64 {
    if max <= Decimal::ZERO || value <= Decimal::ZERO {
        return 0.0;
    }
    (value / max).to_f64().unwrap_or(0.0).clamp(0.0, 1.0)
}

/// Score and sort constituents, highest relevance first; ties go to the lower code.
pub fn rank(constituents: &[ConstituentInstrument]) -> Vec<(&ConstituentInstrument, f64)> {
    let max_cap = constituents
        .iter()
        .map(|c| c.market_cap)
        .max()
        .unwrap_or(Decimal::ZERO);
    let max_turnover = constituents
        .iter()
        .map(|c| c.turnover)
        .max()
        .unwrap_or(Decimal::ZERO);

    let mut ranked: Vec<(&ConstituentInstrument, f64)> = constituents
        .iter()
        .map(|c| {
            let stability = if c.recent_price_stability.is_finite() {
                c.recent_price_stability.clamp(0.0, 1.0)
            } else {
                0.0
            };
            let score = MARKET_CAP_WEIGHT * ratio(c.market_cap, max_cap)
                + TURNOVER_WEIGHT * ratio(c.turnover, max_turnover)
                + STABILITY_WEIGHT * stability;
            (c, score)
        })
        .collect();

    ranked.sort_by(|a, b| by_relevance(a.1, &a.0.code, b.1, &b.0.code));
    ranked
}

/// Descending relevance, then ascending code.
fn by_relevance(a_score: f64, a_code: &str, b_score: f64, b_code: &str) -> Ordering {
    b_score
        .total_cmp(&a_score)
        .then_with(|| a_code.cmp(b_code))
}

use serde::{Deserialize, Serialize};

use investnote_market_data::InstrumentCode;

/// Band within which the early and recent averages count as unchanged.
const TREND_BAND: f64 = 0.5;

/// One dated score from the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePoint {
    #[serde(alias = "time_key")]
    pub time_key: String,
    pub score: f64,
}

/// Raw answer of the scoring service for one instrument, oldest point first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSnapshot {
    pub code: InstrumentCode,
    pub history: Vec<ScorePoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreTrend {
    Rising,
    Falling,
    Flat,
    /// Fewer than three usable points.
    Insufficient,
}

impl ScoreTrend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Flat => "flat",
            Self::Insufficient => "insufficient data",
        }
    }

    /// Compare the mean of the last third against the mean of the first third.
    pub fn from_scores(scores: &[f64]) -> Self {
        let third = scores.len() / 3;
        if third == 0 {
            return Self::Insufficient;
        }
        let early = scores[..third].iter().sum::<f64>() / third as f64;
        let recent = scores[scores.len() - third..].iter().sum::<f64>() / third as f64;
        let diff = recent - early;
        if diff > TREND_BAND {
            Self::Rising
        } else if diff < -TREND_BAND {
            Self::Falling
        } else {
            Self::Flat
        }
    }
}

/// Compact view of a score history attached to a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSummary {
    pub latest: f64,
    pub average: f64,
    pub trend: ScoreTrend,
    pub samples: usize,
}

impl ScoreSummary {
    /// Summarize a snapshot. Zero and non-finite scores are treated as gaps.
    /// Returns `None` when nothing usable remains.
    pub fn from_snapshot(snapshot: &ScoreSnapshot) -> Option<Self> {
        let scores: Vec<f64> = snapshot
            .history
            .iter()
            .map(|p| p.score)
            .filter(|s| s.is_finite() && *s != 0.0)
            .collect();

        let latest = *scores.last()?;
        let average = scores.iter().sum::<f64>() / scores.len() as f64;

        Some(Self {
            latest,
            average: (average * 100.0).round() / 100.0,
            trend: ScoreTrend::from_scores(&scores),
            samples: scores.len(),
        })
    }
}

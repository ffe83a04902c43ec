use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use investnote_market_data::InstrumentCode;

use crate::constants::NO_CANDIDATES_RATIONALE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Buy,
    Hold,
    Reduce,
    NoAction,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Hold => "hold",
            Self::Reduce => "reduce",
            Self::NoAction => "no_action",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "buy" | "add" | "accumulate" | "买入" | "增持" => Ok(Self::Buy),
            "hold" | "keep" | "持有" => Ok(Self::Hold),
            "reduce" | "sell" | "trim" | "卖出" | "减持" => Ok(Self::Reduce),
            "no_action" | "none" | "watch" | "wait" | "观望" => Ok(Self::NoAction),
            other => Err(format!("unknown action '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" | "低" | "低风险" => Ok(Self::Low),
            "medium" | "moderate" | "中" | "中等" | "中风险" => Ok(Self::Medium),
            "high" | "高" | "高风险" => Ok(Self::High),
            other => Err(format!("unknown risk level '{}'", other)),
        }
    }
}

/// Terminal output of the pipeline. Not mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub action: Action,
    pub risk_level: RiskLevel,
    pub rationale: String,
    /// Holding horizon label, e.g. "short_term".
    pub timeframe: String,
    /// Codes of the candidates this recommendation refers to.
    pub related_instruments: Vec<InstrumentCode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_factors: Vec<String>,
    /// Advisor's own confidence, 1 to 10, when it gave one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_level: Option<u8>,
    /// True when no generation call was made for this recommendation.
    #[serde(default)]
    pub generation_skipped: bool,
}

impl Recommendation {
    /// Fixed recommendation for an article with no actionable instruments.
    pub fn no_candidates() -> Self {
        Self::no_action(RiskLevel::Low, NO_CANDIDATES_RATIONALE)
    }

    pub fn no_action(risk_level: RiskLevel, rationale: impl Into<String>) -> Self {
        Self {
            action: Action::NoAction,
            risk_level,
            rationale: rationale.into(),
            timeframe: "short_term".to_string(),
            related_instruments: Vec::new(),
            key_factors: Vec::new(),
            confidence_level: None,
            generation_skipped: true,
        }
    }

    pub fn with_related(mut self, codes: Vec<InstrumentCode>) -> Self {
        self.related_instruments = codes;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_synonyms() {
        assert_eq!("买入".parse::<Action>(), Ok(Action::Buy));
        assert_eq!("Sell".parse::<Action>(), Ok(Action::Reduce));
        assert_eq!("减持".parse::<Action>(), Ok(Action::Reduce));
        assert_eq!("观望".parse::<Action>(), Ok(Action::NoAction));
        assert_eq!("no action".parse::<Action>(), Ok(Action::NoAction));
        assert!("yolo".parse::<Action>().is_err());
    }

    #[test]
    fn test_risk_synonyms() {
        assert_eq!("高".parse::<RiskLevel>(), Ok(RiskLevel::High));
        assert_eq!("Moderate".parse::<RiskLevel>(), Ok(RiskLevel::Medium));
    }

    #[test]
    fn test_no_candidates_recommendation() {
        let rec = Recommendation::no_candidates();
        assert_eq!(rec.action, Action::NoAction);
        assert_eq!(rec.rationale, "no matching instruments found");
        assert!(rec.generation_skipped);
        assert!(rec.related_instruments.is_empty());
    }

    #[test]
    fn test_serializes_snake_case_enums() {
        let json = serde_json::to_value(Recommendation::no_candidates()).unwrap();
        assert_eq!(json["action"], "no_action");
        assert_eq!(json["riskLevel"], "low");
    }
}

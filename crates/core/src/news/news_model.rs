//! News article and classification domain models.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use investnote_market_data::InstrumentCode;

/// Article handed over by the ingestion collaborator. Never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: String,
    pub title: String,
    /// May be absent when the ingestion side has not fetched it yet.
    pub body: Option<String>,
    pub source_url: Option<String>,
    pub published_at: DateTime<Utc>,
}

impl NewsArticle {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: None,
            source_url: None,
            published_at: Utc::now(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_source_url(mut self, url: impl Into<String>) -> Self {
        self.source_url = Some(url.into());
        self
    }

    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = published_at;
        self
    }

    /// Title and body joined, body omitted when empty.
    pub fn text(&self) -> String {
        match self.body.as_deref().map(str::trim) {
            Some(body) if !body.is_empty() => format!("{}\n\n{}", self.title, body),
            _ => self.title.clone(),
        }
    }
}

/// Routing decision made by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StockSpecific,
    IndustryFocused,
    Irrelevant,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StockSpecific => "stock_specific",
            Self::IndustryFocused => "industry_focused",
            Self::Irrelevant => "irrelevant",
        }
    }

    /// Rule used when no better signal exists: instruments first, then industries.
    pub fn from_mentions(instruments: &[InstrumentCode], industries: &[String]) -> Self {
        if !instruments.is_empty() {
            Self::StockSpecific
        } else if !industries.is_empty() {
            Self::IndustryFocused
        } else {
            Self::Irrelevant
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "stock_specific" | "stock" | "个股" => Ok(Self::StockSpecific),
            "industry_focused" | "industry" | "sector" | "theme" | "行业" => {
                Ok(Self::IndustryFocused)
            }
            "irrelevant" | "none" | "not_relevant" | "无关" => Ok(Self::Irrelevant),
            other => Err(format!("unknown category '{}'", other)),
        }
    }
}

/// Output of the classifier.
///
/// Built through [`ClassificationResult::new`], which keeps the invariants:
/// mentions are trimmed and deduplicated in first-seen order, an instrument
/// code never appears among the industry labels, and confidence is a finite
/// value in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    category: Category,
    mentioned_instruments: Vec<InstrumentCode>,
    mentioned_industries: Vec<String>,
    confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

fn dedup_trimmed<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter_map(|item| {
            let item = item.as_ref().trim();
            (!item.is_empty() && seen.insert(item.to_string())).then(|| item.to_string())
        })
        .collect()
}

impl ClassificationResult {
    pub fn new<I, S, J, T>(category: Category, instruments: I, industries: J, confidence: f64) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mentioned_instruments = dedup_trimmed(instruments);
        let codes: HashSet<String> = mentioned_instruments
            .iter()
            .map(|c| c.to_lowercase())
            .collect();
        let mentioned_industries = dedup_trimmed(industries)
            .into_iter()
            .filter(|label| !codes.contains(&label.to_lowercase()))
            .collect();

        Self {
            category,
            mentioned_instruments,
            mentioned_industries,
            confidence: if confidence.is_finite() {
                confidence.clamp(0.0, 1.0)
            } else {
                0.0
            },
            reason: None,
        }
    }

    /// Irrelevant result with zero confidence.
    pub fn irrelevant() -> Self {
        Self::new(
            Category::Irrelevant,
            Vec::<String>::new(),
            Vec::<String>::new(),
            0.0,
        )
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.reason = (!reason.trim().is_empty()).then_some(reason);
        self
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn mentioned_instruments(&self) -> &[InstrumentCode] {
        &self.mentioned_instruments
    }

    pub fn mentioned_industries(&self) -> &[String] {
        &self.mentioned_industries
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }
}

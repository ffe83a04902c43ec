//! Prompt builders for the classifier and advisor.

use std::fmt::Write;

use investnote_core::candidates::{CandidateInstrument, CandidateOrigin};
use investnote_core::news::{ClassificationResult, NewsArticle};

pub const CLASSIFIER_PREAMBLE: &str = "You are a financial news analyst covering the Chinese \
A-share and Hong Kong markets. You answer with a single JSON object and nothing else.";

pub const ADVISOR_PREAMBLE: &str = "You are a senior investment advisor. You give objective, \
risk-aware advice and answer with a single JSON object and nothing else.";

/// Cut `text` to at most `max_chars` characters, marking the cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &text[..byte_idx]),
        None => text.to_string(),
    }
}

pub fn classification_prompt(article: &NewsArticle, max_content_chars: usize) -> String {
    let body = article.body.as_deref().unwrap_or("").trim();
    format!(
        r#"Classify the following news article and extract the instruments and industries it mentions.

Title: {title}
Content: {content}

Return JSON in exactly this shape:
{{
  "category": "stock_specific" | "industry_focused" | "irrelevant",
  "confidence": number between 0.0 and 1.0,
  "reason": "one sentence",
  "mentioned_instruments": [{{"name": "company name", "code": "6-digit A-share or 5-digit HK code"}}],
  "mentioned_industries": ["industry or theme label"]
}}

Rules:
- stock_specific: the article names specific listed companies, usually as "Name(code)".
- industry_focused: the article is about a sector, theme or policy rather than one company.
- irrelevant: the article has no bearing on listed equities.
- Only list codes that appear in the article or that you are certain of."#,
        title = article.title.trim(),
        content = truncate_chars(body, max_content_chars),
    )
}

fn candidate_line(candidate: &CandidateInstrument) -> String {
    let mut line = format!("- {} {}", candidate.code, candidate.display_name());
    match &candidate.resolved_score {
        Some(score) => {
            let _ = write!(
                line,
                ": score {:.1}/10 (avg {:.2}, {}, {} samples)",
                score.latest,
                score.average,
                score.trend.as_str(),
                score.samples
            );
        }
        None => line.push_str(": no score available"),
    }
    match &candidate.origin {
        CandidateOrigin::Mentioned => line.push_str(" - named in article"),
        CandidateOrigin::Industry { label, board } => {
            let _ = write!(line, " - {} via board {}", label, board);
        }
    }
    line
}

pub fn advice_prompt(
    classification: &ClassificationResult,
    candidates: &[CandidateInstrument],
) -> String {
    let industries = if classification.mentioned_industries().is_empty() {
        "none".to_string()
    } else {
        classification.mentioned_industries().join(", ")
    };
    let instruments: Vec<String> = candidates.iter().map(candidate_line).collect();

    format!(
        r#"Give investment advice based on this news analysis.

Category: {category} (confidence {confidence:.2})
Reason: {reason}
Industries: {industries}

Candidate instruments, most relevant first:
{instruments}

Return JSON in exactly this shape:
{{
  "action": "buy" | "hold" | "reduce" | "no_action",
  "risk_level": "low" | "medium" | "high",
  "rationale": "investment logic",
  "timeframe": "short_term" | "medium_term" | "long_term",
  "confidence_level": integer 1-10,
  "key_factors": ["factor", "factor"],
  "related_instruments": ["codes from the list above this advice refers to"]
}}"#,
        category = classification.category(),
        confidence = classification.confidence(),
        reason = classification.reason().unwrap_or("-"),
        industries = industries,
        instruments = instruments.join("\n"),
    )
}

/// Retry prompt after a malformed answer: same request, tighter output rules.
pub fn strict_advice_prompt(
    classification: &ClassificationResult,
    candidates: &[CandidateInstrument],
) -> String {
    format!(
        "{}\n\nIMPORTANT: your previous answer could not be parsed. Reply with ONLY the JSON \
object, no markdown fences and no text before or after it. \"action\" must be one of \
buy, hold, reduce, no_action and \"risk_level\" one of low, medium, high.",
        advice_prompt(classification, candidates)
    )
}

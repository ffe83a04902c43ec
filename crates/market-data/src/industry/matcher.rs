//! Three-tier matching of free-text industry labels against the catalog.
//!
//! 1. Exact, case-insensitive board name.
//! 2. Containment in either direction between label and board name.
//! 3. Theme phrase from the synonym table.
//!
//! The first tier that yields anything decides the result. Inside a tier,
//! boards keep catalog declaration order.
//!
//! ASCII terms only match on word boundaries ("ai" does not hit "retail");
//! CJK terms match as plain substrings.

use serde::Serialize;

use super::catalog::IndustryCatalog;

/// Which tier produced a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchTier {
    Exact,
    Contains,
    Synonym,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardMatch {
    pub board: String,
    pub tier: MatchTier,
}

/// Lowercase and collapse every non-alphanumeric run into one space.
fn normalize(text: &str) -> String {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether `needle` occurs in `haystack`, both already normalized.
fn contains_term(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    if needle.is_ascii() {
        format!(" {} ", haystack).contains(&format!(" {} ", needle))
    } else {
        haystack.contains(needle)
    }
}

/// Match a label against the catalog, returning at most `limit` boards.
pub fn match_label(catalog: &IndustryCatalog, label: &str, limit: usize) -> Vec<BoardMatch> {
    let label = normalize(label);
    if label.is_empty() || limit == 0 {
        return Vec::new();
    }

    let normalized_boards: Vec<(usize, &String, String)> = catalog
        .boards()
        .iter()
        .enumerate()
        .map(|(i, board)| (i, board, normalize(board)))
        .collect();

    let exact: Vec<usize> = normalized_boards
        .iter()
        .filter(|(_, _, name)| *name == label)
        .map(|(i, _, _)| *i)
        .collect();
    if !exact.is_empty() {
        return collect(catalog, exact, MatchTier::Exact, limit);
    }

    let contains: Vec<usize> = normalized_boards
        .iter()
        .filter(|(_, _, name)| contains_term(name, &label) || contains_term(&label, name))
        .map(|(i, _, _)| *i)
        .collect();
    if !contains.is_empty() {
        return collect(catalog, contains, MatchTier::Contains, limit);
    }

    let mut synonym: Vec<usize> = catalog
        .synonyms()
        .iter()
        .filter(|s| {
            s.phrases.iter().any(|phrase| {
                let phrase = normalize(phrase);
                phrase == label || contains_term(&label, &phrase)
            })
        })
        .flat_map(|s| s.boards.iter().filter_map(|b| catalog.position(b)))
        .collect();
    synonym.sort_unstable();
    synonym.dedup();
    collect(catalog, synonym, MatchTier::Synonym, limit)
}

fn collect(
    catalog: &IndustryCatalog,
    indices: Vec<usize>,
    tier: MatchTier,
    limit: usize,
) -> Vec<BoardMatch> {
    indices
        .into_iter()
        .take(limit)
        .map(|i| BoardMatch {
            board: catalog.boards()[i].clone(),
            tier,
        })
        .collect()
}

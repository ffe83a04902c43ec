//! Deterministic extraction used when the model answer is unusable.
//!
//! Instruments are found as bracketed codes like `Name(600519)`, `名称（600519）`
//! or a bare `(600519)`, industries
//! through a static keyword list. ASCII keywords match case-insensitively and
//! only when not embedded in a longer ASCII word; CJK keywords match anywhere.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use investnote_market_data::InstrumentCode;

/// Bracketed 5 or 6 digit code, ASCII or full-width brackets, with an optional
/// leading name. Names are either CJK runs or up to four capitalized words.
static MENTION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:([\p{Han}][\p{Han}A-Za-z&]{1,19})|([A-Z][A-Za-z&.]*(?:\s+[A-Z][A-Za-z&.]*){0,3}))?\s*[（(](\d{5,6})[）)]",
    )
    .expect("Invalid regex pattern")
});

/// Industry keywords the rule pass recognizes, mapped to the label reported.
const INDUSTRY_KEYWORDS: &[(&str, &str)] = &[
    ("AI", "AI"),
    ("artificial intelligence", "AI"),
    ("人工智能", "人工智能"),
    ("大模型", "大模型"),
    ("算力", "算力"),
    ("semiconductor", "半导体"),
    ("chip", "半导体"),
    ("半导体", "半导体"),
    ("芯片", "半导体"),
    ("software", "软件开发"),
    ("软件", "软件开发"),
    ("EV", "新能源汽车"),
    ("electric vehicle", "新能源汽车"),
    ("新能源汽车", "新能源汽车"),
    ("battery", "电池"),
    ("batteries", "电池"),
    ("电池", "电池"),
    ("锂电", "电池"),
    ("solar", "光伏设备"),
    ("光伏", "光伏设备"),
    ("bank", "银行"),
    ("银行", "银行"),
    ("brokerage", "证券"),
    ("券商", "证券"),
    ("insurance", "保险"),
    ("保险", "保险"),
    ("real estate", "房地产开发"),
    ("房地产", "房地产开发"),
    ("pharmaceutical", "化学制药"),
    ("医药", "化学制药"),
    ("biotech", "生物制品"),
    ("生物医药", "生物制品"),
    ("medical device", "医疗器械"),
    ("医疗器械", "医疗器械"),
    ("liquor", "酿酒行业"),
    ("白酒", "酿酒行业"),
    ("defense", "航天航空"),
    ("军工", "航天航空"),
    ("5G", "通信设备"),
    ("通信", "通信设备"),
    ("coal", "煤炭行业"),
    ("煤炭", "煤炭行业"),
    ("steel", "钢铁行业"),
    ("钢铁", "钢铁行业"),
    ("oil", "石油行业"),
    ("石油", "石油行业"),
    ("consumer electronics", "消费电子"),
    ("消费电子", "消费电子"),
    ("game", "游戏"),
    ("游戏", "游戏"),
];

struct Keyword {
    label: &'static str,
    matcher: KeywordMatcher,
}

enum KeywordMatcher {
    Word(Regex),
    Substring(&'static str),
}

static KEYWORDS: Lazy<Vec<Keyword>> = Lazy::new(|| {
    INDUSTRY_KEYWORDS
        .iter()
        .filter_map(|(keyword, label)| {
            let matcher = if keyword.is_ascii() {
                let pattern = format!(
                    r"(?i)(?:^|[^A-Za-z0-9]){}s?(?:$|[^A-Za-z0-9])",
                    regex::escape(keyword)
                );
                KeywordMatcher::Word(Regex::new(&pattern).ok()?)
            } else {
                KeywordMatcher::Substring(keyword)
            };
            Some(Keyword { label, matcher })
        })
        .collect()
});

/// An instrument found by pattern in the article text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MentionedInstrument {
    pub code: InstrumentCode,
    pub name: Option<String>,
}

/// Bracketed instrument codes in order of first appearance.
pub fn extract_instruments(text: &str) -> Vec<MentionedInstrument> {
    let mut seen = HashSet::new();
    MENTION_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let code = caps.get(3)?.as_str().to_string();
            if !seen.insert(code.clone()) {
                return None;
            }
            let name = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().trim().to_string())
                .filter(|n| !n.is_empty());
            Some(MentionedInstrument { code, name })
        })
        .collect()
}

/// Industry labels whose keywords occur in the text, in keyword-list order.
pub fn extract_industries(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    KEYWORDS
        .iter()
        .filter(|k| match &k.matcher {
            KeywordMatcher::Word(re) => re.is_match(text),
            KeywordMatcher::Substring(needle) => text.contains(needle),
        })
        .filter(|k| seen.insert(k.label))
        .map(|k| k.label.to_string())
        .collect()
}

/// Reduce a model-reported code like `SH600519`, `600519.SH` or `HK00700` to
/// its digits. Returns `None` unless 5 or 6 digits remain.
pub fn normalize_code(raw: &str) -> Option<InstrumentCode> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let letters_ok = raw
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .count()
        <= 2;
    (letters_ok && (5..=6).contains(&digits.len())).then_some(digits)
}

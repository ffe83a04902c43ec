/// Maximum candidates kept from one industry label.
pub const DEFAULT_PER_INDUSTRY_CAP: usize = 15;

/// Maximum candidates kept for one article.
pub const DEFAULT_TOTAL_CAP: usize = 30;

/// Maximum concurrent score lookups within one article.
pub const DEFAULT_SCORE_FAN_OUT: usize = 10;

/// Per-call timeout for the scoring service, in seconds.
pub const DEFAULT_SCORE_TIMEOUT_SECS: u64 = 10;

/// Overall budget for one article, in seconds.
pub const DEFAULT_ARTICLE_DEADLINE_SECS: u64 = 120;

/// Articles processed concurrently by `Pipeline::run_batch`.
pub const DEFAULT_WORKER_POOL_SIZE: usize = 4;

/// Days of score history requested from the scoring service.
pub const DEFAULT_SCORE_HISTORY_DAYS: u32 = 30;

/// Relevance given to an instrument named directly in the article.
pub const EXPLICIT_MENTION_RELEVANCE: f64 = 1.0;

/// Rationale attached when no instrument could be linked to the article.
pub const NO_CANDIDATES_RATIONALE: &str = "no matching instruments found";

/// Rationale attached when the article has no market relevance.
pub const IRRELEVANT_RATIONALE: &str = "article has no market relevance";

/// Rationale attached when the per-article deadline cut the run short.
pub const TIMED_OUT_RATIONALE: &str = "analysis timed out before advice was produced";

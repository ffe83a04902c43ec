//! Industry catalog and label matching.

mod catalog;
mod matcher;

pub use catalog::{IndustryCatalog, Synonym};
pub use matcher::{match_label, BoardMatch, MatchTier};

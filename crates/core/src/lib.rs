//! InvestNote Core - News analysis domain, services, and the pipeline.
//!
//! This crate holds the business logic that turns a news article into a
//! recommendation. Language-model backed stages are defined here as traits
//! and implemented by the `ai` crate; market data comes from `market-data`.

pub mod advice;
pub mod candidates;
pub mod constants;
pub mod errors;
pub mod news;
pub mod pipeline;
pub mod scores;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! Candidates module - stock/industry resolution into ranked candidates.

mod candidates_model;
mod candidates_service;
mod candidates_traits;
mod relevance;

#[cfg(test)]
mod candidates_service_tests;

pub use candidates_model::{CandidateInstrument, CandidateOrigin, ResolvedCandidates};
pub use candidates_service::{CandidateLimits, CandidateResolver};
pub use candidates_traits::CandidateResolverTrait;
pub use relevance::rank;

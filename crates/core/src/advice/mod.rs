//! Advice module - recommendation model and the advisor seam.

mod advice_model;
mod advice_traits;

pub use advice_model::{Action, Recommendation, RiskLevel};
pub use advice_traits::InvestmentAdvisorTrait;

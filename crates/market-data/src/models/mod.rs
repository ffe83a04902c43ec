//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `types` - Type aliases for common identifiers
//! - `instrument` - Market classification, instrument snapshots and industry constituents

mod instrument;
mod types;

pub use instrument::{ConstituentInstrument, InstrumentSnapshot, Market};
pub use types::InstrumentCode;

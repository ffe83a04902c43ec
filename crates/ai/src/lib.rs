//! InvestNote AI - language-model backed pipeline stages using rig-core.
//!
//! Implements the classifier and advisor seams defined in `investnote-core`.
//!
//! # Architecture
//!
//! - `text_generator`: one-shot generation seam, rig-core client factory, test fake
//! - `classifier`: model classification with a rule-based fallback
//! - `advisor`: recommendation generation with one strict retry
//! - `rules`: instrument-code patterns and industry keywords
//! - `prompts`: prompt builders
//! - `json_extract`: JSON object extraction from free-form model output
//! - `config`: `AiConfig` loaded from the environment
//!
//! # Example
//!
//! ```ignore
//! use investnote_ai::{AiConfig, InvestmentAdvisor, NewsClassifier, RigTextGenerator};
//!
//! let config = AiConfig::from_env();
//! let generator = Arc::new(RigTextGenerator::new(config.clone()));
//!
//! let pipeline = Pipeline::builder()
//!     .classifier(Arc::new(NewsClassifier::new(generator.clone(), config)))
//!     .advisor(Arc::new(InvestmentAdvisor::new(generator)))
//!     .providers(Arc::new(default_resolver(ResolverConfig::from_env())))
//!     .config(PipelineConfig::from_env())
//!     .with_default_stages()
//!     .build()?;
//!
//! let outcome = pipeline.run(&article).await;
//! ```

pub mod advisor;
pub mod classifier;
pub mod config;
pub mod error;
pub mod json_extract;
pub mod prompts;
pub mod rules;
pub mod text_generator;

// Re-export main types for convenience
pub use advisor::InvestmentAdvisor;
pub use classifier::NewsClassifier;
pub use config::AiConfig;
pub use error::AiError;
pub use json_extract::{extract_json_object, parse_json_object, strip_code_fence};
pub use text_generator::{FakeTextGenerator, RigTextGenerator, TextGeneratorTrait};

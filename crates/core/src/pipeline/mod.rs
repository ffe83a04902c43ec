//! Pipeline module - per-article state machine and batch runner.

mod pipeline_config;
mod pipeline_model;
mod pipeline_service;

#[cfg(test)]
mod pipeline_service_tests;

pub use pipeline_config::PipelineConfig;
pub use pipeline_model::{PipelineOutcome, PipelineStage};
pub use pipeline_service::{Pipeline, PipelineBuilder};

//! Relay Core - typed pipeline definitions
//!
//! This crate provides the model a pipeline definition file is bound into:
//! - `PipelineDefinition`, the document root
//! - `Pipeline`, its stages and jobs

pub mod ast;

// Re-export commonly used types
pub use ast::{Job, Pipeline, PipelineDefinition};

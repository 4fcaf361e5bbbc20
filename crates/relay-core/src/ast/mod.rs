//! Definitions for Relay documents
//!
//! This module contains the typed nodes a pipeline definition file is
//! deserialized into.

pub mod pipeline;
pub mod scalar;

pub use pipeline::{Job, Pipeline, PipelineDefinition};

//! Relay Parser - location-aware YAML parser for pipeline definitions
//!
//! This crate parses YAML pipeline definition files into typed models while
//! recording the line/column of every node, so that later validation can
//! point at the exact place a problem occurs.
//!
//! ```rust,ignore
//! use relay_parser::parse_pipeline;
//!
//! let parsed = parse_pipeline("pipelines/build.yaml")?;
//! println!("{}", parsed.model.pipeline.name);
//! println!("jobs start at line {}", parsed.field_line("pipeline.jobs"));
//! ```

mod composer;
mod convert;
mod indexer;
mod loose;
mod node;

pub mod config;
pub mod error;
pub mod loader;
pub mod location;
pub mod yaml_parser;

// Re-export main parser types
pub use config::{DuplicateKeyPolicy, ParserConfig};
pub use error::{ParseError, ParseErrorKind, Result, StructureViolation};
pub use loader::{DocumentLoader, LoadedDocument, SourceDocument};
pub use location::{LocationIndex, Mark, SourceLocations};
pub use node::YamlNode;
pub use yaml_parser::{parse_pipeline, Definition, DocumentParser, ParsedDocument};

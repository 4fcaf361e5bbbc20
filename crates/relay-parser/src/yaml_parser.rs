//! YAML Parser
//!
//! Parses definition files into typed models together with the location of
//! every field, and reduces every failure to a single [`ParseError`].

use crate::config::ParserConfig;
use crate::convert::from_loose;
use crate::error::{ParseError, Result};
use crate::indexer::index_locations;
use crate::loader::{DocumentLoader, SourceDocument};
use crate::location::LocationIndex;
use relay_core::PipelineDefinition;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A typed model a document can be bound into
pub trait Definition: DeserializeOwned {
    /// Name logged once the model was built
    fn display_name(&self) -> &str;
}

impl Definition for PipelineDefinition {
    fn display_name(&self) -> &str {
        &self.pipeline.name
    }
}

/// A parsed document and the locations of its fields
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument<T> {
    /// Basename of the source
    pub source_name: String,

    pub model: T,

    pub locations: LocationIndex,
}

impl<T> ParsedDocument<T> {
    /// 1-indexed line where `field_path` starts, or 1 when it is unknown
    pub fn field_line(&self, field_path: &str) -> usize {
        self.locations.line_of(field_path)
    }

    /// 1-indexed column where `field_path` starts, or 1 when it is unknown
    pub fn field_column(&self, field_path: &str) -> usize {
        self.locations.column_of(field_path)
    }

    pub fn into_parts(self) -> (T, LocationIndex) {
        (self.model, self.locations)
    }
}

/// Location-aware document parser
#[derive(Debug, Clone, Default)]
pub struct DocumentParser {
    config: ParserConfig,
}

impl DocumentParser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse the file at `path` into `T`
    pub fn parse_document<T: Definition>(&self, path: impl AsRef<Path>) -> Result<ParsedDocument<T>> {
        let source = SourceDocument::read(path.as_ref())?;
        self.parse_source(&source)
    }

    /// Parse in-memory text into `T`, reporting errors against `source_name`
    pub fn parse_str<T: Definition>(
        &self,
        source_name: &str,
        content: &str,
    ) -> Result<ParsedDocument<T>> {
        self.parse_source(&SourceDocument::in_memory(source_name, content))
    }

    /// Parse an already read source into `T`
    pub fn parse_source<T: Definition>(&self, source: &SourceDocument) -> Result<ParsedDocument<T>> {
        log::info!("Parsing YAML file: {}", source.path.display());

        let loaded = DocumentLoader::new(&self.config).load(source)?;

        let locations = index_locations(&loaded.root).map_err(|v| {
            log::error!("Invalid structure in {}: {}", source.path.display(), v);
            ParseError::structure_violation(&source.name, &v)
        })?;
        log::info!(
            "YAML structure indexed successfully: {} ({} locations)",
            source.path.display(),
            locations.len()
        );

        let model: T = from_loose(&loaded.value).map_err(|e| {
            let mark = e.path.as_deref().and_then(|path| locations.get(path));
            log::error!(
                "Invalid YAML format in {} at '{}': {}",
                source.path.display(),
                e.path.as_deref().unwrap_or_default(),
                e.error
            );
            ParseError::invalid_format(&source.name, &e.error, mark)
        })?;
        log::info!(
            "Successfully converted {} to definition: {}",
            source.path.display(),
            model.display_name()
        );

        Ok(ParsedDocument {
            source_name: source.name.clone(),
            model,
            locations,
        })
    }
}

/// Parse a pipeline definition file with the default configuration
pub fn parse_pipeline(path: impl AsRef<Path>) -> Result<ParsedDocument<PipelineDefinition>> {
    DocumentParser::default().parse_document(path)
}

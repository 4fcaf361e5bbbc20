//! Document loader
//!
//! Reads a source, rejects empty input and composes the text into a
//! [`YamlNode`] tree plus the loose `serde_yaml::Value` derived from it.

use crate::composer::compose;
use crate::config::ParserConfig;
use crate::error::{ParseError, Result};
use crate::location::LineIndex;
use crate::loose::to_loose_value;
use crate::node::YamlNode;
use path_absolutize::Absolutize;
use serde_yaml::Value as YamlValue;
use std::path::{Path, PathBuf};

/// Text of one source, read once per parse call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    /// Basename used in error messages
    pub name: String,

    /// Absolute path, or the name for in-memory sources
    pub path: PathBuf,

    pub content: String,
}

impl SourceDocument {
    /// Read a source file
    ///
    /// Fails with `SourceNotFound` when `path` is not an existing regular
    /// file and with `Io` when reading it fails.
    pub fn read(path: &Path) -> Result<Self> {
        let absolute = path
            .absolutize()
            .map(|p| p.into_owned())
            .unwrap_or_else(|_| path.to_path_buf());
        let name = source_name(path);

        if !absolute.is_file() {
            log::error!("Source file not found: {}", absolute.display());
            return Err(ParseError::source_not_found(
                &name,
                &absolute.display().to_string(),
            ));
        }

        let content = std::fs::read_to_string(&absolute).map_err(|e| {
            log::error!("Failed to read source {}: {}", absolute.display(), e);
            ParseError::io(&name, &e)
        })?;

        Ok(Self {
            name,
            path: absolute,
            content,
        })
    }

    /// Wrap text that did not come from the file system
    pub fn in_memory(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            content: content.into(),
        }
    }
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// A composed document
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Root of the composed tree
    pub root: YamlNode,

    /// Untyped value with the same shape as `root`
    pub value: YamlValue,
}

/// Composes sources into trees
pub struct DocumentLoader<'a> {
    config: &'a ParserConfig,
}

impl<'a> DocumentLoader<'a> {
    pub fn new(config: &'a ParserConfig) -> Self {
        Self { config }
    }

    /// Compose `source` into a tree and derive its loose value
    pub fn load(&self, source: &SourceDocument) -> Result<LoadedDocument> {
        if source.content.trim().is_empty() {
            log::error!("Source is empty: {}", source.path.display());
            return Err(ParseError::empty_document(&source.name));
        }

        let lines = LineIndex::new(&source.content);
        let root = compose(&source.content, &lines)
            .map_err(|e| {
                log::error!("YAML parsing error in {}: {}", source.path.display(), e);
                ParseError::syntax(&source.name, &e, &lines)
            })?
            .ok_or_else(|| {
                log::error!("Invalid or empty structure in: {}", source.path.display());
                ParseError::invalid_structure(&source.name)
            })?;

        let value = to_loose_value(&root, self.config.duplicate_keys).map_err(|v| {
            log::error!("Invalid structure in {}: {}", source.path.display(), v);
            ParseError::structure_violation(&source.name, &v)
        })?;

        Ok(LoadedDocument { root, value })
    }
}

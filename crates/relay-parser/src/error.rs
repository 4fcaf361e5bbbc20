//! Parser error types
//!
//! Every failure raised while reading, composing, indexing or converting a
//! document is reported as a single [`ParseError`] carrying the source name
//! and a 1-indexed position. Position `(0, 0)` is reserved for failures that
//! happen before any text was read.

use crate::location::{LineIndex, Mark};
use thiserror::Error;

/// Category of a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// The source does not exist or is not a regular file
    SourceNotFound,

    /// The source is empty or whitespace only
    EmptyDocument,

    /// The text composed into no usable structure
    InvalidStructure,

    /// The loose value could not be bound into the typed model
    InvalidFormat,

    /// The YAML scanner rejected the text
    Syntax,

    /// Reading the source failed after it was found
    Io,
}

/// Parser error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{source_name}:{line}:{column}: {message}")]
pub struct ParseError {
    /// Failure category
    pub kind: ParseErrorKind,

    /// Basename of the source the error belongs to
    pub source_name: String,

    /// 1-indexed line, or 0 when no text was read
    pub line: usize,

    /// 1-indexed column, or 0 when no text was read
    pub column: usize,

    /// Human-readable description
    pub message: String,
}

/// Structural problems found while walking a composed document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureViolation {
    /// A mapping key was itself a mapping or a sequence
    #[error("mapping keys must be scalars")]
    NonScalarKey { mark: Mark },

    /// A key appeared twice in one mapping and duplicates are rejected
    #[error("duplicate key '{key}'")]
    DuplicateKey { key: String, mark: Mark },
}

impl StructureViolation {
    /// Where the offending key starts
    pub fn mark(&self) -> Mark {
        match self {
            StructureViolation::NonScalarKey { mark } => *mark,
            StructureViolation::DuplicateKey { mark, .. } => *mark,
        }
    }
}

impl ParseError {
    /// Create an error at an explicit position
    pub fn new(
        kind: ParseErrorKind,
        source_name: impl Into<String>,
        line: usize,
        column: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            source_name: source_name.into(),
            line,
            column,
            message: message.into(),
        }
    }

    pub fn source_not_found(source_name: &str, absolute_path: &str) -> Self {
        Self::new(
            ParseErrorKind::SourceNotFound,
            source_name,
            0,
            0,
            format!("source not found: {}", absolute_path),
        )
    }

    pub fn empty_document(source_name: &str) -> Self {
        Self::new(
            ParseErrorKind::EmptyDocument,
            source_name,
            1,
            1,
            "document is empty",
        )
    }

    /// The composer produced no root node
    pub fn invalid_structure(source_name: &str) -> Self {
        Self::new(
            ParseErrorKind::InvalidStructure,
            source_name,
            1,
            1,
            "invalid or empty structure",
        )
    }

    /// A structural violation, reported at the offending key
    pub fn structure_violation(source_name: &str, violation: &StructureViolation) -> Self {
        let mark = violation.mark();
        Self::new(
            ParseErrorKind::InvalidStructure,
            source_name,
            mark.display_line(),
            mark.display_column(),
            format!("invalid structure: {}", violation),
        )
    }

    /// Typed conversion failure
    ///
    /// Positioned at `mark`, the node whose conversion failed, when it is
    /// known, else where serde_yaml reports it, else at (1,1).
    pub fn invalid_format(source_name: &str, err: &serde_yaml::Error, mark: Option<Mark>) -> Self {
        let (line, column) = mark
            .map(|m| (m.display_line(), m.display_column()))
            .or_else(|| err.location().map(|loc| (loc.line(), loc.column())))
            .unwrap_or((1, 1));
        Self::new(
            ParseErrorKind::InvalidFormat,
            source_name,
            line,
            column,
            format!("invalid format: {}", err),
        )
    }

    /// Scanner failure, positioned at the offending character
    pub(crate) fn syntax(
        source_name: &str,
        err: &yaml_rust2::ScanError,
        lines: &LineIndex,
    ) -> Self {
        let mark = lines.mark_at(err.marker().index());
        Self::new(
            ParseErrorKind::Syntax,
            source_name,
            mark.display_line(),
            mark.display_column(),
            format!("parsing error: {}", err.info()),
        )
    }

    pub fn io(source_name: &str, err: &std::io::Error) -> Self {
        Self::new(
            ParseErrorKind::Io,
            source_name,
            0,
            0,
            format!("failed to read source: {}", err),
        )
    }

    /// True for failures that happened before any text was read
    pub fn is_pre_content(&self) -> bool {
        self.line == 0
    }
}

/// Result type for parser operations
pub type Result<T> = std::result::Result<T, ParseError>;

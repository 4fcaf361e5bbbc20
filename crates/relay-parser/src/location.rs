//! Source positions and the path → location index
//!
//! A field path names a node by its structural position: mapping keys are
//! joined with `.` and sequence indices appended as `[i]`, so the second job's
//! stage lives at `pipeline.jobs[1].stage`. The document root is `""`.

use std::collections::HashMap;

/// Start position of a node, 0-indexed
///
/// `index` counts characters from the start of the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Mark {
    pub index: usize,
    pub line: usize,
    pub column: usize,
}

impl Mark {
    pub fn new(index: usize, line: usize, column: usize) -> Self {
        Self {
            index,
            line,
            column,
        }
    }

    /// 1-indexed line for display
    pub fn display_line(&self) -> usize {
        self.line + 1
    }

    /// 1-indexed column for display
    pub fn display_column(&self) -> usize {
        self.column + 1
    }
}

/// Maps character offsets to line/column positions
#[derive(Debug, Clone)]
pub(crate) struct LineIndex {
    /// Character offset at which each line starts
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, ch) in text.chars().enumerate() {
            if ch == '\n' {
                line_starts.push(offset + 1);
            }
        }
        Self { line_starts }
    }

    pub(crate) fn mark_at(&self, index: usize) -> Mark {
        let line = match self.line_starts.binary_search(&index) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Mark::new(index, line, index - self.line_starts[line])
    }
}

/// Path of the value stored under `key` in the mapping at `parent`
pub fn key_path(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

/// Path of the element at `index` in the sequence at `parent`
pub fn index_path(parent: &str, index: usize) -> String {
    format!("{}[{}]", parent, index)
}

/// Field path → start position for one parsed document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationIndex {
    marks: HashMap<String, Mark>,
}

impl LocationIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `mark` under `path`, replacing any earlier entry
    pub fn record(&mut self, path: impl Into<String>, mark: Mark) {
        self.marks.insert(path.into(), mark);
    }

    pub fn get(&self, path: &str) -> Option<Mark> {
        self.marks.get(path).copied()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.marks.contains_key(path)
    }

    /// 1-indexed line of `path`, or 1 when the path was never indexed
    pub fn line_of(&self, path: &str) -> usize {
        self.get(path).unwrap_or_default().display_line()
    }

    /// 1-indexed column of `path`, or 1 when the path was never indexed
    pub fn column_of(&self, path: &str) -> usize {
        self.get(path).unwrap_or_default().display_column()
    }

    pub fn len(&self) -> usize {
        self.marks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.marks.is_empty()
    }

    /// All indexed paths, sorted
    pub fn paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = self.marks.keys().map(|p| p.as_str()).collect();
        paths.sort_unstable();
        paths
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Mark)> {
        self.marks.iter().map(|(path, mark)| (path.as_str(), *mark))
    }
}

/// Location indices of several documents, keyed by source name
///
/// Validators that check a whole directory keep one of these so errors can
/// be positioned by `(source name, field path)`.
#[derive(Debug, Clone, Default)]
pub struct SourceLocations {
    sources: HashMap<String, LocationIndex>,
}

impl SourceLocations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the index of `source_name`, replacing a previous one
    pub fn insert(&mut self, source_name: impl Into<String>, index: LocationIndex) {
        self.sources.insert(source_name.into(), index);
    }

    pub fn get(&self, source_name: &str) -> Option<&LocationIndex> {
        self.sources.get(source_name)
    }

    /// 1-indexed line of `path` in `source_name`, or 1 when either is unknown
    pub fn field_line(&self, source_name: &str, path: &str) -> usize {
        match self.sources.get(source_name) {
            Some(index) => index.line_of(path),
            None => Mark::default().display_line(),
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

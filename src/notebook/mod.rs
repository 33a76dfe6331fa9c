//! Notebook document model.
//!
//! A notebook is kept as an opaque JSON object so that every field nbkit does
//! not touch (outputs, kernel specs, format versions) survives a rewrite with
//! its key order intact. Typed access is limited to `cells[].cell_type`,
//! `cells[].source` and the top-level `metadata` object.

pub mod discover;

use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for notebook I/O.
pub type Result<T> = std::result::Result<T, NotebookError>;

/// Errors raised while loading or saving a notebook document.
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The file could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Notebook path.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The file is not valid JSON, or could not be serialized.
    #[error("invalid notebook JSON in {}: {source}", path.display())]
    Json {
        /// Notebook path.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },

    /// The document parsed, but its top level is not an object.
    #[error("notebook {} is not a JSON object", path.display())]
    NotObject {
        /// Notebook path.
        path: PathBuf,
    },
}

/// Kind of a notebook cell, as far as nbkit cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    /// Formatted text.
    Markdown,
    /// Code, raw, or anything else.
    Other,
}

/// A cell's `source` field in whichever shape the file used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellSource {
    /// A single string with embedded newlines.
    Text(String),
    /// One string per line, each but the last ending in `\n`.
    Lines(Vec<String>),
}

impl CellSource {
    /// Reads a source value. Missing or non-string entries are treated as empty.
    fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::String(s)) => Self::Text(s.clone()),
            Some(Value::Array(items)) => Self::Lines(
                items
                    .iter()
                    .map(|v| v.as_str().unwrap_or_default().to_string())
                    .collect(),
            ),
            _ => Self::Lines(Vec::new()),
        }
    }

    fn into_value(self) -> Value {
        match self {
            Self::Text(s) => Value::String(s),
            Self::Lines(lines) => Value::Array(lines.into_iter().map(Value::String).collect()),
        }
    }

    /// Logical lines without their terminators.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Text(s) => s.split('\n').map(str::to_string).collect(),
            Self::Lines(lines) => lines
                .iter()
                .map(|l| l.trim_end_matches('\n').to_string())
                .collect(),
        }
    }

    /// Rebuilds a source from logical lines, in the same shape as `self`.
    #[must_use]
    pub fn with_lines(&self, lines: &[String]) -> Self {
        match self {
            Self::Text(_) => Self::Text(lines.join("\n")),
            Self::Lines(_) => {
                let last = lines.len().saturating_sub(1);
                Self::Lines(
                    lines
                        .iter()
                        .enumerate()
                        .map(|(i, l)| if i < last { format!("{l}\n") } else { l.clone() })
                        .collect(),
                )
            }
        }
    }

    /// The full cell text.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Lines(lines) => lines.concat(),
        }
    }
}

/// Borrowed view over one cell object.
#[derive(Debug, Clone, Copy)]
pub struct Cell<'a>(&'a Map<String, Value>);

impl Cell<'_> {
    /// The cell's kind.
    #[must_use]
    pub fn kind(&self) -> CellKind {
        match self.0.get("cell_type").and_then(Value::as_str) {
            Some("markdown") => CellKind::Markdown,
            _ => CellKind::Other,
        }
    }

    /// The cell's source.
    #[must_use]
    pub fn source(&self) -> CellSource {
        CellSource::from_value(self.0.get("source"))
    }
}

/// Mutable view over one cell object.
#[derive(Debug)]
pub struct CellMut<'a>(&'a mut Map<String, Value>);

impl CellMut<'_> {
    /// Read-only view of the same cell.
    #[must_use]
    pub fn as_cell(&self) -> Cell<'_> {
        Cell(&*self.0)
    }

    /// Replaces the cell's source.
    pub fn set_source(&mut self, source: CellSource) {
        self.0.insert("source".to_string(), source.into_value());
    }
}

/// A loaded notebook document.
#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    root: Map<String, Value>,
}

impl Notebook {
    /// Wraps a JSON value. Fails if it is not an object.
    ///
    /// # Errors
    ///
    /// Returns [`NotebookError::NotObject`] when `value` is not an object.
    pub fn from_value(value: Value, path: &Path) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(NotebookError::NotObject {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Reads and parses a notebook file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not JSON, or is not a
    /// JSON object.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|source| NotebookError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_value(value, path)
    }

    /// Serializes with one-space indentation and a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self, path: &Path) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.root
            .serialize(&mut ser)
            .map_err(|source| NotebookError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        // serde_json only ever emits UTF-8
        let mut out = String::from_utf8_lossy(&buf).into_owned();
        out.push('\n');
        Ok(out)
    }

    /// Rewrites the whole file in a single write.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_json_string(path)?;
        fs::write(path, content).map_err(|source| NotebookError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// All cells that are JSON objects, in document order.
    pub fn cells(&self) -> impl Iterator<Item = Cell<'_>> {
        self.root
            .get("cells")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_object)
            .map(Cell)
    }

    /// Whether the document has no cells at all.
    #[must_use]
    pub fn has_cells(&self) -> bool {
        self.root
            .get("cells")
            .and_then(Value::as_array)
            .is_some_and(|cells| !cells.is_empty())
    }

    /// The first cell, if it exists and is an object.
    pub fn first_cell_mut(&mut self) -> Option<CellMut<'_>> {
        self.root
            .get_mut("cells")
            .and_then(Value::as_array_mut)
            .and_then(|cells| cells.first_mut())
            .and_then(Value::as_object_mut)
            .map(CellMut)
    }

    /// The top-level `metadata` object, if present.
    #[must_use]
    pub fn metadata(&self) -> Option<&Map<String, Value>> {
        self.root.get("metadata").and_then(Value::as_object)
    }

    /// Inserts `entries` into the top-level `metadata` object, creating it
    /// (or replacing it, if it is not an object) as needed.
    pub fn insert_metadata<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let slot = self
            .root
            .entry("metadata")
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        if let Value::Object(map) = slot {
            map.extend(entries);
        }
    }
}

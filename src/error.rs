//! Error types shared by the annotation core and its loaders.
//!
//! The transition functions in [`crate::annotation`] never fail: unresolvable
//! vocabulary references are dropped softly and schema problems come back as a
//! [`crate::dictionary::ValidationReport`]. The errors here cover the
//! boundaries instead: reading vocabulary configuration, parsing tabular
//! files, compiling the dictionary schema and rejecting stale store writes.
//!
//! ```
//! use annotator::error::{AnnotatorError, ResultExt as _};
//!
//! fn read_table(path: &str) -> annotator::error::Result<String> {
//!     std::fs::read_to_string(path).context("Failed to read data table")
//! }
//!
//! match read_table("missing.tsv") {
//!     Err(AnnotatorError::Other(msg)) => assert!(msg.starts_with("Failed to read data table")),
//!     other => panic!("unexpected: {other:?}"),
//! }
//! ```

use std::fmt;

/// Main error type for annotator operations.
#[derive(Debug)]
pub enum AnnotatorError {
    /// I/O errors (reading tables, configuration or dictionaries)
    Io(std::io::Error),

    /// JSON (de)serialization errors
    Json(String),

    /// Malformed vocabulary configuration
    Vocabulary(String),

    /// Malformed tabular file
    Table(String),

    /// The dictionary schema itself could not be compiled
    Schema(String),

    /// A write was based on an outdated column revision
    StaleRevision {
        column: String,
        expected: u64,
        actual: u64,
    },

    /// Generic error with context
    Other(String),
}

impl fmt::Display for AnnotatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Json(msg) => write!(f, "JSON error: {msg}"),
            Self::Vocabulary(msg) => write!(f, "Vocabulary configuration error: {msg}"),
            Self::Table(msg) => write!(f, "Data table error: {msg}"),
            Self::Schema(msg) => write!(f, "Schema error: {msg}"),
            Self::StaleRevision {
                column,
                expected,
                actual,
            } => write!(
                f,
                "Column {column} changed concurrently (expected revision {expected}, found {actual})"
            ),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for AnnotatorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AnnotatorError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for AnnotatorError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for AnnotatorError {
    fn from(err: csv::Error) -> Self {
        Self::Table(err.to_string())
    }
}

impl From<anyhow::Error> for AnnotatorError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for annotator operations.
pub type Result<T> = std::result::Result<T, AnnotatorError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AnnotatorError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: AnnotatorError = e.into();
            AnnotatorError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: AnnotatorError = e.into();
            AnnotatorError::Other(format!("{}: {}", f(), err))
        })
    }
}

//! Error taxonomy for loading and plotting
//!
//! Every fallible operation in this crate fails with one of three kinds:
//! - `FileAccess`: the path could not be opened, read or written
//! - `Parse`: the content is structurally invalid
//! - `Shape`: the grid is empty, ragged or degenerate
//!
//! None of them are retried. The pipeline is single-shot, so the first error
//! aborts the run.

use std::fmt;
use std::path::{Path, PathBuf};

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, PlotError>;

/// Where inside a file a parse error was detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// 1-based line number, if known
    pub line: Option<u64>,
    /// 1-based field (column) index within the line, if known
    pub field: Option<usize>,
}

impl Location {
    /// Location with only a line number
    #[must_use]
    pub fn line(line: u64) -> Self {
        Self {
            line: Some(line),
            field: None,
        }
    }

    /// Location pointing at a single CSV field
    #[must_use]
    pub fn field(line: u64, field: usize) -> Self {
        Self {
            line: Some(line),
            field: Some(field),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.field) {
            (Some(line), Some(field)) => write!(f, "line {line}, field {field}"),
            (Some(line), None) => write!(f, "line {line}"),
            (None, Some(field)) => write!(f, "field {field}"),
            (None, None) => f.write_str("unknown location"),
        }
    }
}

/// Errors produced while loading inputs or rendering the surface
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    /// Path does not exist, is a directory, or cannot be read/written
    #[error("{}: {source}", path.display())]
    FileAccess {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// Content is not well-formed (bad JSON, missing key, non-numeric field)
    #[error("{}: {location}: {message}", path.display())]
    Parse {
        /// File the content came from
        path: PathBuf,
        /// Line/field context where available
        location: Location,
        /// Parser diagnostic
        message: String,
    },

    /// Grid is empty, ragged or degenerate
    #[error("{}: {message} (expected {expected}, observed {observed})", path.display())]
    Shape {
        /// File the grid came from (empty for in-memory grids)
        path: PathBuf,
        /// Human-readable summary of the violation
        message: String,
        /// Expected shape or count
        expected: String,
        /// Observed shape or count
        observed: String,
    },
}

impl PlotError {
    /// Wrap an I/O failure on `path`
    pub fn file_access(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::FileAccess {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Build a parse error at `location` in `path`
    pub fn parse(path: impl AsRef<Path>, location: Location, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            location,
            message: message.into(),
        }
    }

    /// Build a shape error for `path`
    pub fn shape(
        path: impl AsRef<Path>,
        message: impl Into<String>,
        expected: impl fmt::Display,
        observed: impl fmt::Display,
    ) -> Self {
        Self::Shape {
            path: path.as_ref().to_path_buf(),
            message: message.into(),
            expected: expected.to_string(),
            observed: observed.to_string(),
        }
    }

    /// True for `FileAccess` errors
    #[must_use]
    pub fn is_file_access(&self) -> bool {
        matches!(self, Self::FileAccess { .. })
    }

    /// True for `Parse` errors
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    /// True for `Shape` errors
    #[must_use]
    pub fn is_shape(&self) -> bool {
        matches!(self, Self::Shape { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        assert_eq!(Location::field(3, 2).to_string(), "line 3, field 2");
        assert_eq!(Location::line(7).to_string(), "line 7");
        assert_eq!(Location::default().to_string(), "unknown location");
    }

    #[test]
    fn test_messages_name_path_and_context() {
        let err = PlotError::parse("res.csv", Location::field(2, 3), "invalid float literal");
        assert_eq!(
            err.to_string(),
            "res.csv: line 2, field 3: invalid float literal"
        );
        assert!(err.is_parse());

        let err = PlotError::shape("res.csv", "row 3 is ragged", "3 fields", "2 fields");
        assert_eq!(
            err.to_string(),
            "res.csv: row 3 is ragged (expected 3 fields, observed 2 fields)"
        );
        assert!(err.is_shape());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "No such file");
        let err = PlotError::file_access("config", io);
        assert_eq!(err.to_string(), "config: No such file");
        assert!(err.is_file_access());
    }
}

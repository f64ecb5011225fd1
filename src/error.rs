//! Error types for grid persistence and tooling.
//!
//! The execution engine itself never fails; these cover the file boundary
//! and validation of restored state.

use std::path::PathBuf;

use thiserror::Error;

/// Library result type alias.
pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Error, Debug)]
pub enum GridError {
    /// Opening, reading or writing a snapshot file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot blob length does not match the fixed grid layout.
    #[error("grid snapshot is {actual} bytes, expected exactly {expected}")]
    SizeMismatch { expected: usize, actual: usize },

    /// A restored bus line points outside the node id space.
    #[error("cell {cell} bus line {line} references node {node}, outside 0..{limit}")]
    NodeOutOfRange {
        cell: usize,
        line: usize,
        node: u16,
        limit: usize,
    },

    /// A restored wave origin byte is not a direction.
    #[error("cell {cell} has invalid wave origin byte {value:#04x}")]
    InvalidDirection { cell: usize, value: u8 },

    /// A restored load phase byte is not a known phase.
    #[error("cell {cell} has invalid load phase byte {value:#04x}")]
    InvalidLoadPhase { cell: usize, value: u8 },

    /// PNG encoding of the accumulator field failed.
    #[cfg(feature = "screenshot")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl GridError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GridError::Io {
            path: path.into(),
            source,
        }
    }
}

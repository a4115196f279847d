//! Error types for stream graph construction, sampling, and edge loading.

use crate::sampling::Strategy;
use thiserror::Error;

/// Error type for streamwalk operations.
///
/// Early walk termination is not represented here: a walk that runs out of
/// future edges is a valid result (see [`crate::Termination`]).
#[derive(Error, Debug)]
pub enum Error {
    /// A temporal edge could not be ingested.
    #[error("malformed edge at index {index}: {reason}")]
    MalformedEdge { index: usize, reason: String },

    /// Sampling was requested on a graph with no edges.
    #[error("cannot sample from an empty stream graph")]
    EmptyGraph,

    /// Strategy tag not recognized.
    #[error("unknown sampling strategy: {0:?} (expected uniform, linear or exponential)")]
    UnknownStrategy(String),

    /// Strategy tag recognized but not implemented.
    #[error("sampling strategy {0} is not supported yet")]
    UnsupportedStrategy(Strategy),

    /// Walks need at least the two seed nodes.
    #[error("walk length must be at least 2, got {0}")]
    InvalidWalkLength(usize),

    /// Test fraction outside the open interval (0, 1).
    #[error("test fraction must lie in (0, 1), got {0}")]
    InvalidTestFraction(f64),

    /// Edge list delimiter must be a single ASCII byte.
    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),

    /// Edge list line could not be parsed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for streamwalk operations.
pub type Result<T> = std::result::Result<T, Error>;

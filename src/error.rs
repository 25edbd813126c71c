// Fatal device errors. Recoverable short writes are not errors; see zram_repo::WriteOutcome.

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZramError>;

/// Failure to bind extracted integers to a fixed-arity record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected} numeric fields, found {found}")]
    InsufficientFields { expected: usize, found: usize },
    #[error("numeric field {index} does not fit in 64 bits")]
    Overflow { index: usize },
}

#[derive(Debug, Error)]
pub enum ZramError {
    #[error("failed to open {path} for reading: {source}")]
    OpenRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: no data")]
    EmptyRead { path: PathBuf },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("failed to open control file {path} for writing: {source}")]
    OpenWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("runtime failure: {details}")]
    Runtime { details: String },
}

impl ZramError {
    /// Failing attribute path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OpenRead { path, .. }
            | Self::Read { path, .. }
            | Self::EmptyRead { path }
            | Self::Parse { path, .. }
            | Self::OpenWrite { path, .. } => Some(path),
            Self::Runtime { .. } => None,
        }
    }
}

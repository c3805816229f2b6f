//! Error types for the grid store

use std::path::PathBuf;

/// Errors raised while addressing, loading or persisting a grid
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A1 cell reference could not be parsed
    #[error("invalid cell address: {0:?}")]
    InvalidAddress(String),

    /// A1 range reference could not be parsed
    #[error("invalid cell range: {0:?}")]
    InvalidRange(String),

    /// Background color is not `#rrggbb`
    #[error("invalid color: {0:?}")]
    InvalidColor(String),

    /// Reading or writing the workbook file failed
    #[error("workbook i/o failed for {path}: {source}")]
    Io {
        /// File that was being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Workbook file is not valid workbook JSON
    #[error("workbook encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Atomic rename of the flushed workbook failed
    #[error("workbook persist failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl GridError {
    /// Wrap an I/O error with the path it concerns
    #[inline]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Check if error comes from the storage medium rather than bad input
    #[inline]
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Persist(_))
    }
}

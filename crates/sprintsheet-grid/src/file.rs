//! JSON-file backed workbook

use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::book::{MemoryBook, Workbook};
use crate::error::GridError;
use crate::grid::Grid;

/// Workbook persisted as a single JSON document
///
/// Edits accumulate in memory; [`Workbook::flush`] writes the whole book to a
/// temporary file next to the target and renames it over the target, so
/// readers never observe a half-written file.
#[derive(Debug)]
pub struct FileBook {
    path: PathBuf,
    book: MemoryBook,
}

impl FileBook {
    /// Load workbook from disk
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, GridError> {
        let path = path.into();
        let raw = fs::read(&path).map_err(|e| GridError::io(&path, e))?;
        let book: MemoryBook = serde_json::from_slice(&raw)?;
        tracing::debug!(path = %path.display(), sheets = book.sheet_names().count(), "workbook loaded");
        Ok(Self { path, book })
    }

    /// Write a new workbook file, replacing any existing one
    pub fn create(path: impl Into<PathBuf>, book: MemoryBook) -> Result<Self, GridError> {
        let mut file = Self {
            path: path.into(),
            book,
        };
        file.flush()?;
        Ok(file)
    }

    /// Location on disk
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// In-memory view of the book
    #[inline]
    #[must_use]
    pub fn book(&self) -> &MemoryBook {
        &self.book
    }

    fn write_atomically(&self) -> Result<(), GridError> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let tmp = NamedTempFile::new_in(dir).map_err(|e| GridError::io(dir, e))?;
        {
            let mut writer = BufWriter::new(tmp.as_file());
            serde_json::to_writer_pretty(&mut writer, &self.book)?;
            writer
                .write_all(b"\n")
                .and_then(|()| writer.flush())
                .map_err(|e| GridError::io(tmp.path(), e))?;
        }
        tmp.as_file()
            .sync_all()
            .map_err(|e| GridError::io(tmp.path(), e))?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl Workbook for FileBook {
    type Sheet = Grid;

    fn sheet_mut(&mut self, name: &str) -> Option<&mut Grid> {
        self.book.sheet_mut(name)
    }

    fn flush(&mut self) -> Result<(), GridError> {
        self.write_atomically()?;
        self.book.flush()?;
        tracing::debug!(path = %self.path.display(), "workbook flushed");
        Ok(())
    }
}

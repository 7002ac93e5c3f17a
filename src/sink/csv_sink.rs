use crate::SinkError;
use csv::{Terminator, WriterBuilder};
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

/// When to emit the header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderPolicy {
    /// Rows only; the header, if any, is managed outside this tool
    Never,
    /// Header written when the file does not exist yet
    IfAbsent,
}

/// Append-only CSV table
///
/// Each call to [`CsvSink::append`] opens the file in append mode, writes its
/// rows in order, flushes and closes. Nothing already in the file is ever
/// read back, rewritten or deduplicated.
#[derive(Debug, Clone)]
pub struct CsvSink {
    path: PathBuf,
    header: HeaderPolicy,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>, header: HeaderPolicy) -> Self {
        Self {
            path: path.into(),
            header,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn header_policy(&self) -> HeaderPolicy {
        self.header
    }

    /// Appends rows to the table and returns how many were written
    ///
    /// An empty batch leaves the file untouched (it is not even created).
    pub fn append<R, I>(&self, rows: I) -> Result<usize, SinkError>
    where
        R: Serialize,
        I: IntoIterator<Item = R>,
    {
        let mut rows = rows.into_iter().peekable();
        if rows.peek().is_none() {
            return Ok(0);
        }

        let write_header = match self.header {
            HeaderPolicy::Never => false,
            HeaderPolicy::IfAbsent => !self.path.exists(),
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| SinkError::Open {
                path: self.path.display().to_string(),
                source,
            })?;

        let mut writer = WriterBuilder::new()
            .has_headers(write_header)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(file);

        let mut written = 0;
        for row in rows {
            writer.serialize(row)?;
            written += 1;
        }
        writer.flush()?;

        tracing::debug!(
            "Appended {} rows to {}{}",
            written,
            self.path.display(),
            if write_header { " (with header)" } else { "" }
        );

        Ok(written)
    }
}

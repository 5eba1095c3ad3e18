use crate::domain::model::{OutputRow, OUTPUT_HEADER};
use crate::domain::ports::OutputSink;
use crate::utils::error::{MatchError, Result};
use csv::{Writer, WriterBuilder};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::debug;

/// Append-only CSV export. Every row is flushed as soon as it is written,
/// so an interrupted run leaves a valid file with the rows matched so far.
pub struct CsvSink<W: Write> {
    writer: Writer<W>,
    rows_written: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) `path`. With `append`, an existing non-empty file
    /// is extended without writing the header again.
    pub fn create<P: AsRef<Path>>(path: P, append: bool) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let resume = append && fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(path)?;

        debug!(
            "Opened output file {} ({})",
            path.display(),
            if resume { "appending" } else { "new" }
        );

        let mut sink = Self::wrap(file);
        if !resume {
            sink.write_header()?;
        }
        Ok(sink)
    }
}

impl<W: Write> CsvSink<W> {
    /// Sink over any writer; the header is written immediately.
    pub fn from_writer(inner: W) -> Result<Self> {
        let mut sink = Self::wrap(inner);
        sink.write_header()?;
        Ok(sink)
    }

    fn wrap(inner: W) -> Self {
        Self {
            writer: WriterBuilder::new().has_headers(false).from_writer(inner),
            rows_written: 0,
        }
    }

    fn write_header(&mut self) -> Result<()> {
        self.writer.write_record(OUTPUT_HEADER)?;
        self.writer.flush()?;
        Ok(())
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| MatchError::IoError(e.into_error()))
    }
}

impl<W: Write + Send> OutputSink for CsvSink<W> {
    fn append(&mut self, row: &OutputRow) -> Result<()> {
        self.writer.serialize(row)?;
        self.writer.flush()?;
        self.rows_written += 1;
        Ok(())
    }
}

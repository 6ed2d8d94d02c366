//! CSV page sink
//!
//! Writes a `URL,Content` header on creation and flushes after every row so a
//! crawl that dies midway still leaves every saved page on disk.

use super::traits::{OutputResult, PageSink};
use std::fs::File;
use std::path::{Path, PathBuf};

/// Column names of the output file
pub const CSV_HEADERS: [&str; 2] = ["URL", "Content"];

/// Sink writing one CSV row per saved page
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
}

impl CsvSink {
    /// Creates (or truncates) the file at `path` and writes the header row
    pub fn create(path: &Path) -> OutputResult<Self> {
        let file = File::create(path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record(CSV_HEADERS)?;
        writer.flush()?;

        tracing::debug!("Opened CSV output at {}", path.display());

        Ok(Self {
            writer,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PageSink for CsvSink {
    fn write_page(&mut self, url: &str, content: &str) -> OutputResult<()> {
        self.writer.write_record([url, content])?;
        self.writer.flush()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

//! CSV directory sink.

use polars::prelude::*;
use saham_traits::{Result, Sheet, SheetSink};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes each sheet to `<dir>/<sheet-title>.csv`.
#[derive(Debug, Clone)]
pub struct CsvSink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl CsvSink {
    /// Create a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn write(&mut self, sheet: &Sheet) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{}.csv", sheet.title()));
        let mut df = sheet.to_dataframe()?;
        let mut file = File::create(&path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)?;
        debug!(path = %path.display(), rows = df.height(), "wrote csv");
        self.written.push(path);
        Ok(())
    }
}

impl SheetSink for CsvSink {
    fn name(&self) -> &str {
        "csv"
    }

    async fn write_sheet(&mut self, sheet: &Sheet) -> Result<()> {
        self.write(sheet)
    }

    async fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

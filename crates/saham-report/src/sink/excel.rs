//! Excel workbook sink.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use saham_traits::{Cell, Result, Sheet, SheetSink};
use std::path::{Path, PathBuf};
use tracing::info;

use super::{file_stem, sink_error};

/// Writes every sheet as a worksheet of one `.xlsx` workbook.
///
/// Sheets are buffered and the workbook is assembled on [`SheetSink::finish`].
#[derive(Debug)]
pub struct ExcelSink {
    path: PathBuf,
    sheets: Vec<Sheet>,
}

impl ExcelSink {
    /// Create a sink writing `<dir>/<title>.xlsx`.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>, title: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.xlsx", file_stem(title))),
            sheets: Vec::new(),
        }
    }

    /// Path of the workbook.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_worksheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<()> {
        let err = |e: XlsxError| sink_error("excel", e);
        let bold = Format::new().set_bold();

        worksheet.set_name(sheet.title()).map_err(err)?;
        for (col, label) in sheet.header.iter().enumerate() {
            worksheet
                .write_string_with_format(0, col as u16, label, &bold)
                .map_err(err)?;
        }
        for (idx, row) in sheet.rows.iter().enumerate() {
            let r = idx as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match cell {
                    Cell::Text(s) => {
                        worksheet.write_string(r, c, s).map_err(err)?;
                    }
                    Cell::Number(v) => {
                        worksheet.write_number(r, c, *v).map_err(err)?;
                    }
                    Cell::Integer(v) => {
                        worksheet.write_number(r, c, *v as f64).map_err(err)?;
                    }
                    Cell::Empty => {}
                }
            }
        }
        worksheet.set_freeze_panes(1, 0).map_err(err)?;
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let mut workbook = Workbook::new();
        for sheet in &self.sheets {
            Self::write_worksheet(workbook.add_worksheet(), sheet)?;
        }
        workbook
            .save(&self.path)
            .map_err(|e| sink_error("excel", e))
    }
}

impl SheetSink for ExcelSink {
    fn name(&self) -> &str {
        "excel"
    }

    async fn write_sheet(&mut self, sheet: &Sheet) -> Result<()> {
        self.sheets.push(sheet.clone());
        Ok(())
    }

    async fn finish(&mut self) -> Result<()> {
        self.save()?;
        info!(path = %self.path.display(), sheets = self.sheets.len(), "saved workbook");
        Ok(())
    }
}

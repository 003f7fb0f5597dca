//! Report assembly.

use saham_traits::{Company, Result, Sheet, SheetKind, SheetSink};
use tracing::{debug, info};

use crate::tabulate::tabulate;

/// The five sheets of one run, in write order.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    sheets: Vec<Sheet>,
}

impl Report {
    /// Tabulate every sheet from `companies`.
    #[must_use]
    pub fn build(companies: &[Company]) -> Self {
        let sheets = SheetKind::WRITE_ORDER
            .into_iter()
            .map(|kind| tabulate(kind, companies))
            .collect();
        Self { sheets }
    }

    /// Sheets in write order.
    #[must_use]
    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    /// The sheet of the given kind.
    #[must_use]
    pub fn sheet(&self, kind: SheetKind) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.kind == kind)
    }

    /// Write every sheet to `sink`, then finish it.
    ///
    /// # Errors
    ///
    /// Returns the first sink error; later sheets are not attempted.
    pub async fn write_to<S: SheetSink>(&self, sink: &mut S) -> Result<()> {
        for sheet in &self.sheets {
            debug!(sink = sink.name(), sheet = sheet.title(), rows = sheet.len(), "writing sheet");
            sink.write_sheet(sheet).await?;
        }
        sink.finish().await?;
        info!(sink = sink.name(), sheets = self.sheets.len(), "report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use saham_traits::{SahamError, Stock};

    #[derive(Debug, Default)]
    struct Recording {
        titles: Vec<&'static str>,
        finished: bool,
        fail_on: Option<SheetKind>,
    }

    impl SheetSink for Recording {
        fn name(&self) -> &str {
            "recording"
        }

        async fn write_sheet(&mut self, sheet: &Sheet) -> Result<()> {
            if self.fail_on == Some(sheet.kind) {
                return Err(SahamError::Sink("quota".to_string()));
            }
            self.titles.push(sheet.title());
            Ok(())
        }

        async fn finish(&mut self) -> Result<()> {
            self.finished = true;
            Ok(())
        }
    }

    fn companies() -> Vec<Company> {
        ["B", "A", "C"]
            .into_iter()
            .map(|t| Company::new(Stock::new(t)))
            .collect()
    }

    #[test]
    fn test_build_write_order() {
        let report = Report::build(&companies());
        let titles: Vec<_> = report.sheets().iter().map(Sheet::title).collect();
        assert_eq!(
            titles,
            vec!["analysis", "idx-stocks", "stock-prices", "key-statistics", "sentiments"]
        );
        assert_eq!(report.sheet(SheetKind::Analysis).unwrap().len(), 3);
        assert!(report.sheet(SheetKind::Sentiments).unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_to_sink() {
        let report = Report::build(&companies());
        let mut sink = Recording::default();
        report.write_to(&mut sink).await.unwrap();
        assert_eq!(sink.titles.len(), 5);
        assert!(sink.finished);
    }

    #[tokio::test]
    async fn test_write_stops_on_sink_error() {
        let report = Report::build(&companies());
        let mut sink = Recording {
            fail_on: Some(SheetKind::StockPrices),
            ..Default::default()
        };
        let err = report.write_to(&mut sink).await.unwrap_err();
        assert!(matches!(err, SahamError::Sink(_)));
        assert_eq!(sink.titles, vec!["analysis", "idx-stocks"]);
        assert!(!sink.finished);
    }
}

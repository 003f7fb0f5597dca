//! Output sink traits.
//!
//! Report-style outputs (workbooks, spreadsheets, CSV) receive whole
//! [`Sheet`]s; record-style outputs (a database) persist one [`Company`] at
//! a time.

use std::future::Future;

use crate::error::Result;
use crate::sheet::Sheet;
use crate::types::Company;

/// A destination that accepts tabulated sheets.
///
/// Sheets arrive in report write order. [`SheetSink::finish`] is called once
/// after the last sheet and is where buffered output gets flushed.
pub trait SheetSink: Send {
    /// Short human-readable sink name for logs.
    fn name(&self) -> &str;

    /// Write one sheet, header first.
    fn write_sheet(&mut self, sheet: &Sheet) -> impl Future<Output = Result<()>> + Send;

    /// Flush and close the destination.
    fn finish(&mut self) -> impl Future<Output = Result<()>> + Send;
}

/// A destination that persists one company at a time.
pub trait RecordSink {
    /// Short human-readable sink name for logs.
    fn name(&self) -> &str;

    /// Persist the listing, fundamentals, analysis, price and sentiments of
    /// one company atomically.
    fn persist(&mut self, company: &Company) -> Result<()>;

    /// Persist many companies, stopping at the first failure.
    fn persist_all(&mut self, companies: &[Company]) -> Result<usize> {
        for company in companies {
            self.persist(company)?;
        }
        Ok(companies.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stock;

    #[derive(Debug, Default)]
    struct Collect(Vec<String>);

    impl RecordSink for Collect {
        fn name(&self) -> &str {
            "collect"
        }

        fn persist(&mut self, company: &Company) -> Result<()> {
            self.0.push(company.ticker().to_string());
            Ok(())
        }
    }

    #[test]
    fn test_persist_all_in_order() {
        let companies = vec![Company::new(Stock::new("A")), Company::new(Stock::new("B"))];
        let mut sink = Collect::default();
        assert_eq!(sink.persist_all(&companies).unwrap(), 2);
        assert_eq!(sink.0, vec!["A", "B"]);
        assert_eq!(sink.name(), "collect");
    }
}

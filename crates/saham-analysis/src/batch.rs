//! Batch derivation across a company universe.

use saham_traits::Company;
use tracing::{debug, info};

use crate::derive::KeyAnalysisEngine;

/// Counts from one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Companies processed.
    pub analysed: usize,
    /// Companies that had no fundamentals and received the zero record.
    pub without_fundamentals: usize,
}

/// Applies the derivation engine to every company of a batch.
///
/// Companies are independent; the batch preserves their input order.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchAnalyser {
    engine: KeyAnalysisEngine,
}

impl BatchAnalyser {
    /// Create a batch analyser around `engine`.
    #[must_use]
    pub const fn new(engine: KeyAnalysisEngine) -> Self {
        Self { engine }
    }

    /// Derive and attach key analysis for every company, in place.
    pub fn run(&self, companies: &mut [Company]) -> BatchSummary {
        self.engine.analyse(companies);

        let without_fundamentals = companies
            .iter()
            .filter(|c| c.fundamental.is_none())
            .count();
        if without_fundamentals > 0 {
            debug!(
                count = without_fundamentals,
                "companies without fundamentals received zero key analysis"
            );
        }

        let summary = BatchSummary {
            analysed: companies.len(),
            without_fundamentals,
        };
        info!(analysed = summary.analysed, "derived key analysis");
        summary
    }
}

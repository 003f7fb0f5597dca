//! Tabular report sheets.
//!
//! A [`Sheet`] is a header row plus data rows of [`Cell`]s. Sinks consume
//! sheets directly; [`Sheet::to_dataframe`] hands the same table to Polars
//! for sinks that want typed columns.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// One value of a sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    /// Text value.
    Text(String),
    /// Floating point value.
    Number(f64),
    /// Integer value.
    Integer(i64),
    /// Blank.
    Empty,
}

impl Cell {
    /// The numeric value of the cell, if it has one.
    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            Self::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(v) => write!(f, "{v}"),
            Self::Integer(v) => write!(f, "{v}"),
            Self::Empty => Ok(()),
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i64> for Cell {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

/// The five report sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SheetKind {
    /// Listing plus price snapshot.
    Stocks,
    /// Raw fundamentals.
    KeyStatistics,
    /// Derived metrics.
    Analysis,
    /// Public posts.
    Sentiments,
    /// Price snapshots.
    StockPrices,
}

impl SheetKind {
    /// Every sheet kind, in the order a report writes them.
    pub const WRITE_ORDER: [Self; 5] = [
        Self::Analysis,
        Self::Stocks,
        Self::StockPrices,
        Self::KeyStatistics,
        Self::Sentiments,
    ];

    /// Sheet title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Stocks => "idx-stocks",
            Self::KeyStatistics => "key-statistics",
            Self::Analysis => "analysis",
            Self::Sentiments => "sentiments",
            Self::StockPrices => "stock-prices",
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A titled table: one header row and zero or more data rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sheet {
    /// Which sheet this is.
    pub kind: SheetKind,
    /// Column headers.
    pub header: Vec<String>,
    /// Data rows, each as long as the header.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    /// Create an empty sheet with the given header.
    #[must_use]
    pub fn new<S: Into<String>>(kind: SheetKind, header: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind,
            header: header.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Sheet title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        self.kind.title()
    }

    /// Number of data rows.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the sheet has no data rows.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.header.len()
    }

    /// All rows with the header as row 1.
    #[must_use]
    pub fn values(&self) -> Vec<Vec<Cell>> {
        let header = self.header.iter().map(|h| Cell::from(h.as_str())).collect();
        std::iter::once(header).chain(self.rows.iter().cloned()).collect()
    }

    /// Convert the sheet into a DataFrame.
    ///
    /// A column whose non-empty cells are all integers becomes `i64`, one
    /// whose non-empty cells are all numeric becomes `f64`, anything else
    /// becomes a string column. Empty cells become nulls.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns = self
            .header
            .iter()
            .enumerate()
            .map(|(idx, name)| self.column(idx, name))
            .collect::<Vec<_>>();
        Ok(DataFrame::new(columns)?)
    }

    fn column(&self, idx: usize, name: &str) -> Column {
        let empty = Cell::Empty;
        let cells: Vec<&Cell> = self
            .rows
            .iter()
            .map(|row| row.get(idx).unwrap_or(&empty))
            .collect();
        let present = || cells.iter().filter(|c| !matches!(c, Cell::Empty));

        if present().all(|c| matches!(c, Cell::Integer(_))) && present().next().is_some() {
            let values: Vec<Option<i64>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Integer(v) => Some(*v),
                    _ => None,
                })
                .collect();
            Column::new(name.into(), values)
        } else if present().all(|c| c.as_f64().is_some()) && present().next().is_some() {
            let values: Vec<Option<f64>> = cells.iter().map(|c| c.as_f64()).collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<String>> = cells
                .iter()
                .map(|c| match c {
                    Cell::Empty => None,
                    other => Some(other.to_string()),
                })
                .collect();
            Column::new(name.into(), values)
        }
    }
}

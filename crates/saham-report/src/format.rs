//! Output format selector.

use saham_traits::SahamError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a run's results are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A shared Google spreadsheet.
    #[default]
    Spreadsheet,
    /// A local Excel workbook.
    Excel,
    /// One CSV file per sheet.
    Csv,
    /// A SQLite database.
    Database,
}

impl OutputFormat {
    /// Every supported selector.
    pub const ALL: [Self; 4] = [Self::Spreadsheet, Self::Excel, Self::Csv, Self::Database];

    /// Selector string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "spreadsheet",
            Self::Excel => "excel",
            Self::Csv => "csv",
            Self::Database => "database",
        }
    }

    /// Whether this format consumes whole sheets rather than records.
    #[must_use]
    pub const fn is_tabular(&self) -> bool {
        !matches!(self, Self::Database)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = SahamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SahamError::UnsupportedOutput(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_formats() {
        assert_eq!("spreadsheet".parse::<OutputFormat>().unwrap(), OutputFormat::Spreadsheet);
        assert_eq!("Excel".parse::<OutputFormat>().unwrap(), OutputFormat::Excel);
        assert_eq!(" csv ".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("database".parse::<OutputFormat>().unwrap(), OutputFormat::Database);
    }

    #[test]
    fn test_unknown_format_is_configuration_error() {
        let err = "pdf".parse::<OutputFormat>().unwrap_err();
        assert!(err.is_configuration());
        assert!(matches!(err, SahamError::UnsupportedOutput(ref s) if s == "pdf"));
    }

    #[test]
    fn test_display_round_trips() {
        for format in OutputFormat::ALL {
            assert_eq!(format.to_string().parse::<OutputFormat>().unwrap(), format);
        }
        assert!(OutputFormat::Excel.is_tabular());
        assert!(!OutputFormat::Database.is_tabular());
    }
}

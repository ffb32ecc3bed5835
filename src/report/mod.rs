//! Per-UF aggregation and report export.
//!
//! [`summarize`] folds the extracted records into saída and entrada
//! totals for each of the 27 UFs and computes the balance owed, offsetting
//! returns where the taxpayer holds an IEST. [`listing_csv`] and
//! [`summary_csv`] render the records and the summary as delimited text.
//!
//! # Example
//!
//! ```ignore
//! use sentinela::report::*;
//!
//! let summary = summarize(&records);
//! let listing = listing_csv(&records, &ReportConfig::default()).unwrap();
//! let balances = summary_csv(&summary, &ReportConfig::default()).unwrap();
//! ```

mod csv_export;
mod summary;

use serde::{Deserialize, Serialize};

use crate::core::AuditError;

pub use csv_export::{listing_csv, summary_csv};
pub use summary::{TaxTotals, UfSummary, balance, summarize};

/// Output formatting for the CSV exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Field separator.
    pub delimiter: char,
    /// Write amounts as `1234,56` instead of `1234.56`.
    pub decimal_comma: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            delimiter: ';',
            decimal_comma: true,
        }
    }
}

impl ReportConfig {
    /// Reject separators that would make the output ambiguous. Amounts are
    /// written unquoted, so a comma separator needs decimal points.
    pub fn validate(&self) -> Result<(), AuditError> {
        if matches!(self.delimiter, '"' | '\r' | '\n') {
            return Err(AuditError::Export(format!(
                "invalid delimiter {:?}",
                self.delimiter
            )));
        }
        if self.decimal_comma && self.delimiter == ',' {
            return Err(AuditError::Export(
                "comma delimiter conflicts with decimal comma".into(),
            ));
        }
        Ok(())
    }
}

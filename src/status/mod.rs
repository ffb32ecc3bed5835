//! Cancelled-key extraction from NF-e status reports.
//!
//! Status reports (e.g. the SIEG export) list one NF-e per row with its
//! access key and its situation. Rows whose situation mentions
//! cancellation become the cancelled-key set fed to
//! [`AuditBatch::with_cancelled`](crate::nfe::AuditBatch) or
//! [`extract`](crate::nfe::extract).
//!
//! # Example
//!
//! ```
//! use sentinela::status::{StatusReportConfig, cancelled_keys_from_csv};
//!
//! let report = "Chave,Situacao\nNFe3524 0112,Autorizada\nNFe3524 0113,CANCELADA\n";
//! let keys = cancelled_keys_from_csv(report, &StatusReportConfig::default()).unwrap();
//! assert!(keys.contains("35240113"));
//! assert_eq!(keys.len(), 1);
//! ```

use csv::{ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::info;

use crate::core::{AuditError, digits_only};

/// Key column position in the SIEG status export.
pub const SIEG_KEY_COLUMN: usize = 10;

/// Situation column position in the SIEG status export.
pub const SIEG_STATUS_COLUMN: usize = 14;

/// Marker searched for (case-insensitively) in the situation column.
pub const CANCELLED_MARKER: &str = "CANCEL";

/// How to read a status report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReportConfig {
    /// Field separator. Must be ASCII.
    pub delimiter: char,
    /// Records to skip before the header (the SIEG spreadsheet export has 2).
    pub skip_rows: usize,
    /// Fixed key column. `None` looks the header up.
    pub key_column: Option<usize>,
    /// Fixed situation column. `None` looks the header up.
    pub status_column: Option<usize>,
}

impl Default for StatusReportConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            skip_rows: 0,
            key_column: None,
            status_column: None,
        }
    }
}

/// Collect the digits-only access keys of every cancelled row.
///
/// Columns come from the config when set, otherwise from the header: the
/// key column is the first whose name contains `CHAVE` or `KEY`, the
/// situation column the first containing `SITUA` or `STATUS`. When the
/// header names neither, the SIEG positions are used if the header is wide
/// enough.
pub fn cancelled_keys_from_csv(
    text: &str,
    config: &StatusReportConfig,
) -> Result<HashSet<String>, AuditError> {
    let text = text.trim_start_matches('\u{feff}');
    let mut records = read_records(text, config.delimiter)?
        .into_iter()
        .skip(config.skip_rows);

    let header = records
        .next()
        .ok_or_else(|| AuditError::StatusReport("report has no header row".into()))?;

    let key_col = column(&header, config.key_column, &["CHAVE", "KEY"], SIEG_KEY_COLUMN)
        .ok_or_else(|| AuditError::StatusReport("no access key column".into()))?;
    let status_col = column(
        &header,
        config.status_column,
        &["SITUA", "STATUS"],
        SIEG_STATUS_COLUMN,
    )
    .ok_or_else(|| AuditError::StatusReport("no situation column".into()))?;

    let mut keys = HashSet::new();
    for row in records {
        let (Some(key), Some(status)) = (row.get(key_col), row.get(status_col)) else {
            continue;
        };
        if !status.to_uppercase().contains(CANCELLED_MARKER) {
            continue;
        }
        let key = digits_only(key);
        if !key.is_empty() {
            keys.insert(key);
        }
    }

    info!(cancelled = keys.len(), "status report read");
    Ok(keys)
}

/// Read every record; rows may differ in width.
fn read_records(text: &str, delimiter: char) -> Result<Vec<StringRecord>, AuditError> {
    let delimiter = u8::try_from(delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            AuditError::StatusReport(format!("delimiter {delimiter:?} is not ASCII"))
        })?;

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| AuditError::StatusReport(format!("unreadable report: {e}")))
}

fn column(
    header: &StringRecord,
    fixed: Option<usize>,
    names: &[&str],
    fallback: usize,
) -> Option<usize> {
    if let Some(idx) = fixed {
        return (idx < header.len()).then_some(idx);
    }
    header
        .iter()
        .position(|h| {
            let h = h.to_uppercase();
            names.iter().any(|n| h.contains(n))
        })
        .or((fallback < header.len()).then_some(fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let header = StringRecord::from(vec!["Número", "chave de acesso", "Situação"]);
        assert_eq!(column(&header, None, &["CHAVE", "KEY"], 10), Some(1));
        assert_eq!(column(&header, None, &["SITUA", "STATUS"], 14), Some(2));
    }

    #[test]
    fn fixed_column_must_exist() {
        let header = StringRecord::from(vec!["a", "b"]);
        assert_eq!(column(&header, Some(1), &["X"], 10), Some(1));
        assert_eq!(column(&header, Some(5), &["X"], 10), None);
    }

    #[test]
    fn falls_back_to_position() {
        let header: StringRecord = (0..15).map(|i| format!("col{i}")).collect();
        assert_eq!(column(&header, None, &["CHAVE"], SIEG_KEY_COLUMN), Some(10));
        let narrow = StringRecord::from(vec!["a"]);
        assert_eq!(column(&narrow, None, &["CHAVE"], SIEG_KEY_COLUMN), None);
    }

    #[test]
    fn records_keep_quoted_delimiters_and_line_breaks() {
        let text = "\"x,y\";\"say \"\"hi\"\"\"\r\n\"multi\nline\";z\n";
        let rows = read_records(text, ';').unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "x,y");
        assert_eq!(&rows[0][1], "say \"hi\"");
        assert_eq!(&rows[1][0], "multi\nline");
    }

    #[test]
    fn records_may_differ_in_width() {
        let rows = read_records("a,b,c\n1\n\n1,2,3,4\n", ',').unwrap();
        let widths: Vec<usize> = rows.iter().map(StringRecord::len).collect();
        assert_eq!(widths, [3, 1, 4]);
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let err = read_records("a§b", '§').unwrap_err();
        assert!(matches!(err, AuditError::StatusReport(_)));
    }
}

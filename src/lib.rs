//! # sentinela
//!
//! Audit library for Brazilian NF-e documents: classifies each line item as
//! saída or entrada for the audited CNPJ, extracts ICMS-ST, DIFAL and FCP
//! amounts, and balances them per UF.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sentinela::nfe::AuditBatch;
//! use sentinela::report::{summarize, summary_csv, ReportConfig};
//! use sentinela::status::{cancelled_keys_from_csv, StatusReportConfig};
//!
//! let cancelled = cancelled_keys_from_csv(&status_report, &StatusReportConfig::default())?;
//! let mut batch = AuditBatch::new("12.345.678/0001-90").with_cancelled(cancelled);
//! for (name, bytes) in files {
//!     batch.ingest(&name, &bytes);
//! }
//! let records = batch.into_records();
//! let csv = summary_csv(&summarize(&records), &ReportConfig::default())?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Record types, UF and CFOP tables, normalization |
//! | `nfe` | NF-e parsing, tag resolution, extraction, batches |
//! | `status` | Cancelled keys from status reports |
//! | `report` | Per-UF summary and CSV export |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "nfe")]
pub mod nfe;

#[cfg(feature = "status")]
pub mod status;

#[cfg(feature = "report")]
pub mod report;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;

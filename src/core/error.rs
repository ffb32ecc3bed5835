use thiserror::Error;

/// Errors that can occur while reading fiscal documents, status reports,
/// or writing audit output.
///
/// Document extraction never returns these to the caller: a malformed
/// NF-e produces no records. Status-report parsing and report export do
/// surface them.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AuditError {
    /// XML could not be parsed into a tree.
    #[error("XML error: {0}")]
    Xml(String),

    /// XML parsed but a required element or attribute is missing.
    #[error("structure error: {0}")]
    Structure(String),

    /// Status report is unreadable or lacks the expected columns.
    #[error("status report error: {0}")]
    StatusReport(String),

    /// Report output could not be produced.
    #[error("export error: {0}")]
    Export(String),
}

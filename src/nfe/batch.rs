use std::collections::HashSet;
use tracing::{debug, info};

use super::extract::extract;
use crate::core::NfeRecord;

/// Document counters for one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    /// Documents passed to [`AuditBatch::ingest`].
    pub documents: usize,
    /// Documents whose key was accepted (new and not cancelled).
    pub accepted: usize,
    /// Unreadable, keyless, cancelled or duplicate documents.
    pub skipped: usize,
    /// Records produced so far.
    pub records: usize,
}

/// One audit run: the audited CNPJ, the keys seen so far, the cancelled
/// keys and the accumulated records.
///
/// Ingesting takes `&mut self`, so the check-then-insert on the seen set
/// can never interleave across documents.
#[derive(Debug, Clone)]
pub struct AuditBatch {
    audited_cnpj: String,
    seen: HashSet<String>,
    cancelled: HashSet<String>,
    records: Vec<NfeRecord>,
    stats: BatchStats,
}

impl AuditBatch {
    /// Start an empty run for the given CNPJ (any formatting).
    pub fn new(audited_cnpj: impl Into<String>) -> Self {
        Self {
            audited_cnpj: audited_cnpj.into(),
            seen: HashSet::new(),
            cancelled: HashSet::new(),
            records: Vec::new(),
            stats: BatchStats::default(),
        }
    }

    /// Exclude the given access keys from the run.
    pub fn with_cancelled(mut self, cancelled: HashSet<String>) -> Self {
        self.cancelled = cancelled;
        self
    }

    /// Extract one document and append its records. Returns how many
    /// records it contributed.
    pub fn ingest(&mut self, name: &str, content: &[u8]) -> usize {
        let before = self.seen.len();
        let found = extract(content, &self.audited_cnpj, &mut self.seen, &self.cancelled);

        self.stats.documents += 1;
        if self.seen.len() > before {
            self.stats.accepted += 1;
        } else {
            self.stats.skipped += 1;
        }
        let count = found.len();
        self.stats.records += count;
        debug!(file = name, records = count, "ingested NF-e");

        self.records.extend(found);
        count
    }

    /// Records accumulated so far, in ingestion order.
    pub fn records(&self) -> &[NfeRecord] {
        &self.records
    }

    /// Access keys of every document accepted so far.
    pub fn seen_keys(&self) -> &HashSet<String> {
        &self.seen
    }

    /// Access keys excluded from this run.
    pub fn cancelled_keys(&self) -> &HashSet<String> {
        &self.cancelled
    }

    /// Counters for the documents ingested so far.
    pub fn stats(&self) -> BatchStats {
        self.stats
    }

    /// Finish the run and hand over the records.
    pub fn into_records(self) -> Vec<NfeRecord> {
        info!(
            documents = self.stats.documents,
            accepted = self.stats.accepted,
            skipped = self.stats.skipped,
            records = self.stats.records,
            "audit batch finished"
        );
        self.records
    }
}

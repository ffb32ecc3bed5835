//! NF-e parsing and ICMS-ST / DIFAL extraction.
//!
//! Each document is decoded leniently, stripped of namespace declarations
//! and parsed into an [`Element`] tree. [`extract`] then classifies it as
//! saída or entrada for the audited CNPJ, resolves the UF the amounts
//! belong to and emits one [`NfeRecord`](crate::core::NfeRecord) per
//! qualifying `det` item.
//!
//! # Example
//!
//! ```no_run
//! use sentinela::nfe::AuditBatch;
//!
//! let mut batch = AuditBatch::new("12.345.678/0001-90");
//! let xml = std::fs::read("35240112345678000190550010000001231000001234-nfe.xml").unwrap();
//! batch.ingest("35240112345678000190550010000001231000001234-nfe.xml", &xml);
//! let records = batch.into_records();
//! ```

mod batch;
mod extract;
mod resolve;
mod tree;

pub use batch::{AuditBatch, BatchStats};
pub use extract::{EXIT_OPERATION, classify_direction, extract, jurisdiction};
pub use resolve::resolve;
pub use tree::{
    Descendants, Element, MAX_DEPTH, local_name, parse_document, parse_tree, strip_namespaces,
};

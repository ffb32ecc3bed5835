//! Core audit types, UF and CFOP tables, and normalization helpers.
//!
//! This module is always compiled; the parsing, status-report and report
//! modules build on it.

pub mod cfop;
mod error;
pub mod normalize;
mod types;
pub mod ufs;

pub use cfop::is_devolution_cfop;
pub use error::*;
pub use normalize::{digits_only, document_key, parse_amount};
pub use types::*;
pub use ufs::{UFS, is_known_uf};

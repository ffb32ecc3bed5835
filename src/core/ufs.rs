//! Brazilian federative unit (UF) codes.
//!
//! The 26 states plus the Federal District, in the order used by the
//! per-jurisdiction summary.

/// UF whose issuers hand the jurisdiction over to the recipient on
/// inbound documents.
pub const PASS_THROUGH_UF: &str = "SP";

/// UF whose DIFAL balance is reduced by the FCP term.
pub const FCP_ADJUSTED_UF: &str = "RJ";

/// Check whether `code` is one of the 27 UF codes.
pub fn is_known_uf(code: &str) -> bool {
    UFS.binary_search(&code).is_ok()
}

/// All 27 UF codes, sorted for binary search.
pub static UFS: &[&str] = &[
    "AC", "AL", "AM", "AP", "BA", "CE", "DF", "ES", "GO", "MA", "MG", "MS", "MT", "PA", "PB", "PE",
    "PI", "PR", "RJ", "RN", "RO", "RR", "RS", "SC", "SE", "SP", "TO",
];

//! Delimited-text output for the record listing and the UF summary.

use rust_decimal::Decimal;

use super::ReportConfig;
use super::summary::{TaxTotals, UfSummary};
use crate::core::{AuditError, NfeRecord};

const LISTING_HEADER: &[&str] = &[
    "CHAVE", "NUM_NF", "TIPO", "UF_FISCAL", "IEST_DOC", "CFOP", "ST", "DIFAL", "FCP", "FCPST",
];

const SUMMARY_HEADER: &[&str] = &[
    "UF",
    "IEST",
    "ST_SAIDA",
    "DIFAL_SAIDA",
    "FCP_SAIDA",
    "FCPST_SAIDA",
    "ST_ENTRADA",
    "DIFAL_ENTRADA",
    "FCP_ENTRADA",
    "FCPST_ENTRADA",
    "ST_SALDO",
    "DIFAL_SALDO",
    "FCP_SALDO",
    "FCPST_SALDO",
];

/// One row per record, in input order.
pub fn listing_csv(records: &[NfeRecord], config: &ReportConfig) -> Result<String, AuditError> {
    config.validate()?;
    let sep = config.delimiter;

    let mut out = String::new();
    header(&mut out, LISTING_HEADER, sep);
    for r in records {
        csv_field_str(&mut out, &r.key);
        out.push(sep);
        csv_field_str(&mut out, &r.number);
        out.push(sep);
        csv_field_str(&mut out, r.direction.label());
        out.push(sep);
        csv_field_str(&mut out, &r.uf);
        out.push(sep);
        csv_field_str(&mut out, &r.iest);
        out.push(sep);
        csv_field_str(&mut out, &r.cfop);
        for amount in [r.st, r.difal, r.fcp, r.fcpst] {
            out.push(sep);
            csv_field_decimal(&mut out, amount, config.decimal_comma);
        }
        out.push_str("\r\n");
    }
    Ok(out)
}

/// One row per UF: saída, entrada and balance totals.
pub fn summary_csv(summary: &[UfSummary], config: &ReportConfig) -> Result<String, AuditError> {
    config.validate()?;
    let sep = config.delimiter;

    let mut out = String::new();
    header(&mut out, SUMMARY_HEADER, sep);
    for s in summary {
        csv_field_str(&mut out, &s.uf);
        out.push(sep);
        csv_field_str(&mut out, &s.iest);
        for totals in [&s.outbound, &s.inbound, &s.balance] {
            totals_fields(&mut out, totals, sep, config.decimal_comma);
        }
        out.push_str("\r\n");
    }
    Ok(out)
}

fn header(out: &mut String, names: &[&str], sep: char) {
    for (i, name) in names.iter().enumerate() {
        if i > 0 {
            out.push(sep);
        }
        csv_field_str(out, name);
    }
    out.push_str("\r\n");
}

fn totals_fields(out: &mut String, totals: &TaxTotals, sep: char, decimal_comma: bool) {
    for amount in [totals.st, totals.difal, totals.fcp, totals.fcpst] {
        out.push(sep);
        csv_field_decimal(out, amount, decimal_comma);
    }
}

fn csv_field_str(out: &mut String, value: &str) {
    out.push('"');
    for ch in value.chars() {
        if ch == '"' {
            out.push_str("\"\"");
        } else {
            out.push(ch);
        }
    }
    out.push('"');
}

fn csv_field_decimal(out: &mut String, d: Decimal, decimal_comma: bool) {
    let s = format!("{:.2}", d.round_dp(2));
    if decimal_comma {
        out.push_str(&s.replace('.', ","));
    } else {
        out.push_str(&s);
    }
}

//! Audit every `.xml` file in a directory.
//!
//! ```text
//! cargo run --example audit_batch --features all -- <CNPJ> <xml-dir> [status-report.csv]
//! ```
//!
//! Writes `listagem.csv` and `saldo_uf.csv` to the current directory.

use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::Path;

use sentinela::nfe::AuditBatch;
use sentinela::report::{ReportConfig, listing_csv, summarize, summary_csv};
use sentinela::status::{StatusReportConfig, cancelled_keys_from_csv};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let mut args = std::env::args().skip(1);
    let cnpj = args.next().ok_or("usage: audit_batch <CNPJ> <xml-dir> [status-report.csv]")?;
    let dir = args.next().unwrap_or_else(|| ".".into());

    let cancelled = match args.next() {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            cancelled_keys_from_csv(&text, &StatusReportConfig::default())?
        }
        None => HashSet::new(),
    };
    if !cancelled.is_empty() {
        println!("{} cancelled NF-e filtered", cancelled.len());
    }

    let mut batch = AuditBatch::new(cnpj).with_cancelled(cancelled);
    for entry in fs::read_dir(Path::new(&dir))? {
        let path = entry?.path();
        let is_xml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"));
        if !is_xml {
            continue;
        }
        let bytes = fs::read(&path)?;
        batch.ingest(&path.display().to_string(), &bytes);
    }

    let stats = batch.stats();
    println!(
        "{} documents, {} accepted, {} skipped, {} records",
        stats.documents, stats.accepted, stats.skipped, stats.records
    );

    let records = batch.into_records();
    let config = ReportConfig::default();
    fs::write("listagem.csv", listing_csv(&records, &config)?)?;

    let summary = summarize(&records);
    fs::write("saldo_uf.csv", summary_csv(&summary, &config)?)?;

    for s in summary.iter().filter(|s| !s.outbound.is_zero() || !s.inbound.is_zero()) {
        println!(
            "{} IEST={:<12} ST={:>12} DIFAL={:>12} FCP={:>12} FCPST={:>12}",
            s.uf,
            s.iest,
            s.balance.st.round_dp(2),
            s.balance.difal.round_dp(2),
            s.balance.fcp.round_dp(2),
            s.balance.fcpst.round_dp(2),
        );
    }
    Ok(())
}

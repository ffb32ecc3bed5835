use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ufs::FCP_ADJUSTED_UF;
use crate::core::{Direction, NfeRecord, UFS};

/// The four audited amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxTotals {
    pub st: Decimal,
    pub difal: Decimal,
    pub fcp: Decimal,
    pub fcpst: Decimal,
}

impl TaxTotals {
    /// Add one record's amounts.
    pub fn add(&mut self, record: &NfeRecord) {
        self.st = self.st.saturating_add(record.st);
        self.difal = self.difal.saturating_add(record.difal);
        self.fcp = self.fcp.saturating_add(record.fcp);
        self.fcpst = self.fcpst.saturating_add(record.fcpst);
    }

    /// Field-wise difference.
    pub fn minus(&self, other: &TaxTotals) -> TaxTotals {
        TaxTotals {
            st: self.st.saturating_sub(other.st),
            difal: self.difal.saturating_sub(other.difal),
            fcp: self.fcp.saturating_sub(other.fcp),
            fcpst: self.fcpst.saturating_sub(other.fcpst),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.st.is_zero() && self.difal.is_zero() && self.fcp.is_zero() && self.fcpst.is_zero()
    }
}

/// Totals and balance of one UF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UfSummary {
    pub uf: String,
    /// IEST of the first record for this UF; empty when there is none.
    pub iest: String,
    /// Saída totals.
    pub outbound: TaxTotals,
    /// Entrada (returns) totals.
    pub inbound: TaxTotals,
    /// Amount due after offsetting returns.
    pub balance: TaxTotals,
}

impl UfSummary {
    /// True when the UF has a substitute registration (IEST), which is
    /// what allows returns to be offset.
    pub fn has_iest(&self) -> bool {
        !self.iest.is_empty()
    }
}

/// Group records by UF and direction over all 27 UFs, in table order.
///
/// Records whose UF is empty or not a Brazilian UF are left out.
pub fn summarize(records: &[NfeRecord]) -> Vec<UfSummary> {
    UFS.iter().map(|&uf| summarize_uf(uf, records)).collect()
}

fn summarize_uf(uf: &str, records: &[NfeRecord]) -> UfSummary {
    let mut iest: Option<&str> = None;
    let mut outbound = TaxTotals::default();
    let mut inbound = TaxTotals::default();

    for record in records.iter().filter(|r| r.uf == uf) {
        iest.get_or_insert(record.iest.as_str());
        match record.direction {
            Direction::Outbound => outbound.add(record),
            Direction::Inbound => inbound.add(record),
        }
    }

    let iest = iest.unwrap_or_default().to_string();
    let balance = balance(uf, !iest.is_empty(), &outbound, &inbound);
    UfSummary {
        uf: uf.to_string(),
        iest,
        outbound,
        inbound,
        balance,
    }
}

/// Balance of one UF.
///
/// Returns are only offset when the taxpayer holds an IEST in that UF;
/// otherwise the balance is the saída total. In RJ the DIFAL balance is
/// further reduced by the FCP balance.
pub fn balance(
    uf: &str,
    has_iest: bool,
    outbound: &TaxTotals,
    inbound: &TaxTotals,
) -> TaxTotals {
    let mut balance = if has_iest {
        outbound.minus(inbound)
    } else {
        *outbound
    };
    if uf == FCP_ADJUSTED_UF {
        balance.difal = balance.difal.saturating_sub(balance.fcp);
    }
    balance
}

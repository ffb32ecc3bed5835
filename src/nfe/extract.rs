use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, trace};

use super::resolve::resolve;
use super::tree::{Element, parse_document};
use crate::core::ufs::PASS_THROUGH_UF;
use crate::core::{
    AuditError, Direction, NfeRecord, digits_only, document_key, is_devolution_cfop, parse_amount,
};

/// `tpNF` value marking an exit (saída) operation.
pub const EXIT_OPERATION: &str = "1";

/// Extract the audit records of one NF-e.
///
/// This never fails. Unreadable documents, documents without an access
/// key, cancelled keys and keys already in `seen` all yield an empty
/// vector. An accepted key is inserted into `seen` before any line item
/// is looked at, so a document with no qualifying items still counts as
/// processed.
///
/// # Example
///
/// ```
/// use std::collections::HashSet;
/// use sentinela::nfe::extract;
///
/// let mut seen = HashSet::new();
/// let records = extract(b"<not-an-nfe/>", "12.345.678/0001-90", &mut seen, &HashSet::new());
/// assert!(records.is_empty());
/// assert!(seen.is_empty());
/// ```
pub fn extract(
    content: &[u8],
    audited_cnpj: &str,
    seen: &mut HashSet<String>,
    cancelled: &HashSet<String>,
) -> Vec<NfeRecord> {
    let tree = match parse_document(content) {
        Ok(tree) => tree,
        Err(e) => {
            debug!(error = %e, "skipping unreadable NF-e");
            return Vec::new();
        }
    };

    let key = match access_key(&tree) {
        Ok(key) => key,
        Err(e) => {
            debug!(error = %e, "skipping NF-e without access key");
            return Vec::new();
        }
    };
    if cancelled.contains(&key) {
        debug!(%key, "skipping cancelled NF-e");
        return Vec::new();
    }
    if !seen.insert(key.clone()) {
        debug!(%key, "skipping duplicate NF-e");
        return Vec::new();
    }

    let header = Header::classify(&tree, key, audited_cnpj);
    tree.find_all("det")
        .filter_map(|det| header.line_record(det))
        .collect()
}

/// Saída only when the audited CNPJ issued the document as an exit
/// operation; anything else is entrada.
pub fn classify_direction(issuer_is_audited: bool, operation: &str) -> Direction {
    if issuer_is_audited && operation == EXIT_OPERATION {
        Direction::Outbound
    } else {
        Direction::Inbound
    }
}

/// UF the document's amounts belong to.
///
/// Saída goes to the recipient's UF. Entrada goes to the issuer's UF,
/// except that issuers in SP pass it on to the recipient.
pub fn jurisdiction(direction: Direction, issuer_uf: &str, recipient_uf: &str) -> String {
    match direction {
        Direction::Outbound => recipient_uf.to_string(),
        Direction::Inbound if issuer_uf == PASS_THROUGH_UF => recipient_uf.to_string(),
        Direction::Inbound => issuer_uf.to_string(),
    }
}

fn access_key(tree: &Element) -> Result<String, AuditError> {
    let inf = tree
        .find("infNFe")
        .ok_or_else(|| AuditError::Structure("missing infNFe".into()))?;
    let key = document_key(inf.attribute("Id").unwrap_or_default());
    if key.is_empty() {
        return Err(AuditError::Structure("infNFe has no access key".into()));
    }
    Ok(key)
}

/// Document-level fields shared by every line item.
struct Header {
    key: String,
    number: String,
    direction: Direction,
    uf: String,
    iest: String,
}

impl Header {
    fn classify(tree: &Element, key: String, audited_cnpj: &str) -> Self {
        let emit = tree.find("emit");
        let dest = tree.find("dest");
        let ide = tree.find("ide");

        let issuer_is_audited = digits_only(&resolve("CNPJ", emit)) == digits_only(audited_cnpj);
        let direction = classify_direction(issuer_is_audited, &resolve("tpNF", ide));
        let uf = jurisdiction(direction, &resolve("UF", emit), &resolve("UF", dest));
        let iest = match direction {
            Direction::Outbound => resolve("IEST", emit),
            Direction::Inbound => resolve("IEST", dest),
        };

        Self {
            key,
            number: resolve("nNF", ide),
            direction,
            uf,
            iest: iest.trim().to_string(),
        }
    }

    fn line_record(&self, det: &Element) -> Option<NfeRecord> {
        let prod = det.child("prod");
        let icms = det.find("ICMS");
        let imposto = det.find("imposto");

        let cfop = resolve("CFOP", prod);
        if self.direction == Direction::Inbound && !is_devolution_cfop(&cfop) {
            trace!(key = %self.key, %cfop, "skipping entrada item that is not a return");
            return None;
        }

        let v_icms_st = amount("vICMSST", icms);
        let v_fcp_st = amount("vFCPST", icms);
        let v_icms_uf_dest = amount("vICMSUFDest", imposto);
        let v_fcp_uf_dest = amount("vFCPUFDest", imposto);

        Some(NfeRecord {
            key: self.key.clone(),
            number: self.number.clone(),
            direction: self.direction,
            uf: self.uf.clone(),
            iest: self.iest.clone(),
            cfop,
            st: v_icms_st.saturating_add(v_fcp_st),
            difal: v_icms_uf_dest.saturating_add(v_fcp_uf_dest),
            fcp: v_fcp_uf_dest,
            fcpst: v_fcp_st,
        })
    }
}

fn amount(tag: &str, subtree: Option<&Element>) -> Decimal {
    parse_amount(&resolve(tag, subtree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const AUDITED: &str = "12.345.678/0001-90";
    const KEY: &str = "35240112345678000190550010000001231000001234";

    fn nfe(emit_cnpj: &str, tp_nf: &str, emit_uf: &str, dest_uf: &str, dets: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<nfeProc xmlns="http://www.portalfiscal.inf.br/nfe" versao="4.00">
  <NFe xmlns="http://www.portalfiscal.inf.br/nfe">
    <infNFe Id="NFe{KEY}" versao="4.00">
      <ide><cUF>35</cUF><nNF>123</nNF><tpNF>{tp_nf}</tpNF></ide>
      <emit><CNPJ>{emit_cnpj}</CNPJ><enderEmit><UF>{emit_uf}</UF></enderEmit><IEST> 111 </IEST></emit>
      <dest><CNPJ>98765432000110</CNPJ><enderDest><UF>{dest_uf}</UF></enderDest><IEST>222</IEST></dest>
      {dets}
    </infNFe>
  </NFe>
</nfeProc>"#
        )
    }

    fn det(cfop: &str) -> String {
        format!(
            "<det nItem=\"1\"><prod><CFOP>{cfop}</CFOP></prod><imposto>\
             <ICMS><ICMS10><vICMSST>10,50</vICMSST><vFCPST>2.00</vFCPST></ICMS10></ICMS>\
             <ICMSUFDest><vFCPUFDest>1.25</vFCPUFDest><vICMSUFDest>7.75</vICMSUFDest></ICMSUFDest>\
             </imposto></det>"
        )
    }

    fn run(xml: &str) -> (Vec<NfeRecord>, HashSet<String>) {
        let mut seen = HashSet::new();
        let records = extract(xml.as_bytes(), AUDITED, &mut seen, &HashSet::new());
        (records, seen)
    }

    #[test]
    fn outbound_sale_yields_summed_amounts() {
        let (records, seen) = run(&nfe("12345678000190", "1", "SP", "RJ", &det("6101")));
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.key, KEY);
        assert_eq!(r.number, "123");
        assert_eq!(r.direction, Direction::Outbound);
        assert_eq!(r.uf, "RJ");
        assert_eq!(r.iest, "111");
        assert_eq!(r.cfop, "6101");
        assert_eq!(r.st, dec!(12.50));
        assert_eq!(r.difal, dec!(9.00));
        assert_eq!(r.fcp, dec!(1.25));
        assert_eq!(r.fcpst, dec!(2.00));
        assert!(seen.contains(KEY));
    }

    #[test]
    fn audited_issuer_with_entry_operation_is_inbound() {
        let (records, _) = run(&nfe("12345678000190", "0", "SP", "RJ", &det("1202")));
        assert_eq!(records[0].direction, Direction::Inbound);
        assert_eq!(records[0].iest, "222");
    }

    #[test]
    fn inbound_non_return_items_are_filtered() {
        let dets = format!("{}{}", det("5102"), det("2202"));
        let (records, seen) = run(&nfe("98765432000110", "1", "PR", "SP", &dets));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cfop, "2202");
        assert_eq!(records[0].uf, "PR");
        assert!(seen.contains(KEY));
    }

    #[test]
    fn key_is_recorded_even_without_qualifying_items() {
        let (records, seen) = run(&nfe("98765432000110", "1", "PR", "SP", &det("5102")));
        assert!(records.is_empty());
        assert!(seen.contains(KEY));
    }

    #[test]
    fn missing_infnfe_yields_nothing() {
        let (records, seen) = run("<nfeProc><NFe/></nfeProc>");
        assert!(records.is_empty());
        assert!(seen.is_empty());
    }

    #[test]
    fn short_id_yields_nothing() {
        let (records, seen) = run(r#"<nfeProc><infNFe Id="NFe"><det/></infNFe></nfeProc>"#);
        assert!(records.is_empty());
        assert!(seen.is_empty());
    }

    #[test]
    fn direction_rule() {
        assert_eq!(classify_direction(true, "1"), Direction::Outbound);
        assert_eq!(classify_direction(true, "0"), Direction::Inbound);
        assert_eq!(classify_direction(false, "1"), Direction::Inbound);
        assert_eq!(classify_direction(true, ""), Direction::Inbound);
    }

    #[test]
    fn jurisdiction_rule() {
        assert_eq!(jurisdiction(Direction::Outbound, "PR", "RJ"), "RJ");
        assert_eq!(jurisdiction(Direction::Inbound, "SP", "MG"), "MG");
        assert_eq!(jurisdiction(Direction::Inbound, "PR", "MG"), "PR");
        assert_eq!(jurisdiction(Direction::Inbound, "", "MG"), "");
    }
}

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Direction of an NF-e relative to the audited taxpayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Saída — issued by the audited taxpayer as an exit operation.
    #[serde(rename = "SAIDA")]
    Outbound,
    /// Entrada — everything else, including returns received.
    #[serde(rename = "ENTRADA")]
    Inbound,
}

impl Direction {
    /// Label used in listings ("SAIDA" / "ENTRADA").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Outbound => "SAIDA",
            Self::Inbound => "ENTRADA",
        }
    }

    /// Parse from a listing label.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "SAIDA" => Some(Self::Outbound),
            "ENTRADA" => Some(Self::Inbound),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One qualifying NF-e line item with its extracted tax amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NfeRecord {
    /// 44-digit access key (chave de acesso).
    pub key: String,
    /// nNF: document number.
    pub number: String,
    /// Saída or entrada relative to the audited CNPJ.
    pub direction: Direction,
    /// UF the amounts are owed to. Empty when the document carries none.
    pub uf: String,
    /// IEST of the counterpart block (emit for saída, dest for entrada).
    pub iest: String,
    /// CFOP of the line item.
    pub cfop: String,
    /// ICMS-ST withheld: vICMSST + vFCPST.
    pub st: Decimal,
    /// DIFAL owed to the destination: vICMSUFDest + vFCPUFDest.
    pub difal: Decimal,
    /// FCP on the destination share: vFCPUFDest.
    pub fcp: Decimal,
    /// FCP withheld by substitution: vFCPST.
    pub fcpst: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_labels() {
        assert_eq!(Direction::Outbound.to_string(), "SAIDA");
        assert_eq!(Direction::from_label("ENTRADA"), Some(Direction::Inbound));
        assert_eq!(Direction::from_label("saida"), None);
    }
}

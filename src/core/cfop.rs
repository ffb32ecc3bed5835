//! CFOP (Código Fiscal de Operações e Prestações) tables.
//!
//! Inbound documents only count towards the audit when they return goods
//! previously sold, which the CFOP identifies.

/// Check whether `code` is a goods-return (devolução) CFOP.
pub fn is_devolution_cfop(code: &str) -> bool {
    DEVOLUTION_CFOPS.binary_search(&code).is_ok()
}

/// Return CFOPs (sorted for binary search).
pub static DEVOLUTION_CFOPS: &[&str] = &[
    "1201", // Devolução de venda de produção do estabelecimento
    "1202", // Devolução de venda de mercadoria adquirida de terceiros
    "1203", // Devolução de venda para ZFM/ALC
    "1204", // Devolução de venda de mercadoria adquirida para ZFM/ALC
    "1410", // Devolução de venda de produção, com ST
    "1411", // Devolução de venda de mercadoria adquirida, com ST
    "1660", // Devolução de venda de combustível para industrialização
    "1661", // Devolução de venda de combustível para comercialização
    "1662", // Devolução de venda de combustível para consumidor final
    "2201",
    "2202",
    "2203",
    "2204",
    "2410",
    "2411",
    "2660",
    "2661",
    "2662",
    "3201", // Devolução de venda de produção (exterior)
    "3202", // Devolução de venda de mercadoria adquirida (exterior)
    "3411", // Devolução de venda em regime de drawback
];

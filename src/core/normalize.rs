//! Identifier and amount normalization shared by the extractor and the
//! status-report reader.

use rust_decimal::Decimal;
use std::str::FromStr;

/// Number of characters in the `Id` attribute prefix of `infNFe` ("NFe").
pub const KEY_PREFIX_LEN: usize = 3;

/// Keep only ASCII digits (CNPJ / access-key normalization).
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Derive the access key from an `infNFe` `Id` attribute by dropping the
/// type prefix. Returns an empty string for ids no longer than the prefix.
pub fn document_key(id: &str) -> String {
    id.chars().skip(KEY_PREFIX_LEN).collect()
}

/// Parse a monetary field, defaulting to zero.
///
/// Every comma becomes a period before parsing, so `"1234,56"` is 1234.56
/// while grouped values like `"1.234,56"` turn into `"1.234.56"` and fall
/// back to zero. Negative values also fall back to zero.
pub fn parse_amount(text: &str) -> Decimal {
    let s = text.trim().replace(',', ".");
    let parsed = Decimal::from_str(&s).or_else(|_| Decimal::from_scientific(&s));
    match parsed {
        Ok(d) if d.is_sign_negative() => Decimal::ZERO,
        Ok(d) => d,
        Err(_) => Decimal::ZERO,
    }
}

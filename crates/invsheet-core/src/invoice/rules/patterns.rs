//! Common regex patterns for invoice row classification.
//!
//! All patterns run against lines already passed through
//! [`normalize_line`](super::lines::normalize_line).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Code prefix isolated on its own line: "VEN-", "SS-"
    pub static ref PREFIX_ONLY: Regex = Regex::new(
        r"^[A-Z]{2,8}-$"
    ).unwrap();

    // Product code token shape; a digit is additionally required by the classifier
    pub static ref CODE_TOKEN: Regex = Regex::new(
        r"^[A-Z0-9][A-Z0-9\-./]{2,}$"
    ).unwrap();

    // Prefix glued to the first description word: "SS-POIGNEE"
    pub static ref MERGED_PREFIX_WORD: Regex = Regex::new(
        r"^(?P<prefix>[A-Z]{2,8}-)(?P<word>[A-Z]{2,})$"
    ).unwrap();

    // Lone code suffix after an isolated prefix: "161.167", "2230002839"
    pub static ref NUMERIC_CODE: Regex = Regex::new(
        r"^\d[\d.]{2,}$"
    ).unwrap();

    // Omnia numeric tail: "100 PZ 1.15 € 115.00 €", optionally preceded by text
    pub static ref OMNIA_NUMERIC_TAIL: Regex = Regex::new(
        r"^(?:(?P<lead>.*?)\s+)?(?P<qty>\d+)\s+PZ\s+(?P<price>\d[\d.,]*)\s*(?:€|EUR)\s+(?P<total>\d[\d.,]*)\s*(?:€|EUR)?$"
    ).unwrap();

    // Start of an Omnia tail whose prices continue on the next line: "100 PZ 1.15 €"
    pub static ref OMNIA_TAIL_START: Regex = Regex::new(
        r"^\d+\s+PZ\b"
    ).unwrap();

    // Supplier markers for the admissibility check
    pub static ref OMNIA_MARKERS: Regex = Regex::new(
        r"(?i)omniacomponents|26vin|product\s+code"
    ).unwrap();
}

/// Column header words printed on Omnia invoices, lowercase.
pub const OMNIA_HEADER_WORDS: &[&str] = &[
    "product",
    "code",
    "description",
    "quantity",
    "qty",
    "price",
    "prezzo",
    "sconto",
    "discount",
    "importo",
    "amount",
    "total",
    "totale",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_only() {
        assert!(PREFIX_ONLY.is_match("VEN-"));
        assert!(PREFIX_ONLY.is_match("SS-"));
        assert!(!PREFIX_ONLY.is_match("V-"));
        assert!(!PREFIX_ONLY.is_match("VEN-161"));
        assert!(!PREFIX_ONLY.is_match("ven-"));
    }

    #[test]
    fn test_numeric_tail_captures() {
        let caps = OMNIA_NUMERIC_TAIL
            .captures("LAMP COVER 40W 100 PZ 1.15 € 115.00 €")
            .unwrap();
        assert_eq!(&caps["lead"], "LAMP COVER 40W");
        assert_eq!(&caps["qty"], "100");
        assert_eq!(&caps["price"], "1.15");
        assert_eq!(&caps["total"], "115.00");

        let caps = OMNIA_NUMERIC_TAIL.captures("2 PZ 8,82€ 17,63").unwrap();
        assert!(caps.name("lead").is_none());
        assert_eq!(&caps["total"], "17,63");

        assert!(!OMNIA_NUMERIC_TAIL.is_match("100 PZ 1.15 €"));
        assert!(OMNIA_TAIL_START.is_match("100 PZ 1.15 €"));
        assert!(!OMNIA_TAIL_START.is_match("100 PZZA"));
    }

    #[test]
    fn test_markers() {
        assert!(OMNIA_MARKERS.is_match("www.OmniaComponents.com"));
        assert!(OMNIA_MARKERS.is_match("PRODUCT CODE"));
        assert!(!OMNIA_MARKERS.is_match("Faktura VAT"));
    }
}

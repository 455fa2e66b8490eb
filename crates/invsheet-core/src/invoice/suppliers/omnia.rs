//! Omnia invoices.
//!
//! Item table columns: PRODUCT CODE, DESCRIPTION, QUANTITY, PREZZO, SCONTO,
//! IMPORTO. Quantities are in `PZ`, prices in euro. The text extractor breaks
//! rows in several ways:
//!
//! ```text
//! 125709 LAMP COVER 40W 100 PZ 1.15 € 115.00 €      one line
//!
//! 125709 LAMP COVER 40W                              code + description,
//! 100 PZ 1.15 € 115.00 €                             tail on the next line
//!
//! VEN-                                               prefix isolated
//! 161.167 D.35.8 SHOWER
//! 1 PZ 1.95 € 1.95 €
//!
//! SS-POIGNEE EQUIPEE C&S MULTI                       prefix glued to the
//! 2230002839                                         first description word
//! 2 PZ 8.82 € 17.63 €
//! ```

use std::time::Instant;

use serde_json::json;
use tracing::info;

use crate::invoice::assembler::RowAssembler;
use crate::invoice::parser::SupplierParser;
use crate::invoice::registry::Supplier;
use crate::invoice::rules::classify::LineClassifier;
use crate::invoice::rules::lines::split_lines;
use crate::invoice::rules::patterns::OMNIA_MARKERS;
use crate::models::config::ParseOptions;
use crate::models::invoice::ParseResult;
use crate::pdf::Table;

/// Diagnostic raised when a document yields no rows.
pub const NO_ITEMS_WARNING: &str =
    "omnia: no items found; check that the PDF contains rows with 'PZ' quantities and € prices";

/// Parser for Omnia invoices.
#[derive(Debug, Clone, Copy, Default)]
pub struct OmniaParser;

impl SupplierParser for OmniaParser {
    fn supplier(&self) -> Supplier {
        Supplier::Omnia
    }

    fn can_parse(&self, pages: &[String], _tables: &[Table]) -> bool {
        pages.iter().any(|page| OMNIA_MARKERS.is_match(page))
    }

    fn parse(&self, pages: &[String], _tables: &[Table], options: &ParseOptions) -> ParseResult {
        let start = Instant::now();
        let lines = split_lines(pages);

        info!("Parsing {} lines from {} pages", lines.len(), pages.len());

        let classifier = LineClassifier::omnia(options);
        let rows = RowAssembler::assemble(classifier, options.clone(), &lines);

        let mut warnings = rows.warnings;
        if rows.items.is_empty() {
            warnings.push(NO_ITEMS_WARNING.to_string());
        }

        let header = json!({
            "supplier": self.key(),
            "pages": pages.len(),
            "lines": lines.len(),
            "processing_time_ms": start.elapsed().as_millis() as u64,
        });

        ParseResult {
            header: header.as_object().cloned().unwrap_or_default(),
            items: rows.items,
            warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pages(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    #[test]
    fn test_can_parse_keywords() {
        assert!(OmniaParser.can_parse(&pages("www.omniacomponents.com"), &[]));
        assert!(OmniaParser.can_parse(&pages("Invoice 26VIN000123"), &[]));
        assert!(OmniaParser.can_parse(&["".to_string(), "PRODUCT CODE".to_string()], &[]));
        assert!(!OmniaParser.can_parse(&pages("FAKTURA VAT nr FV/001/2024"), &[]));
    }

    #[test]
    fn test_no_items_warning() {
        let result = OmniaParser.parse(
            &pages("Invoice\nThank you for your order"),
            &[],
            &ParseOptions::default(),
        );
        assert!(result.items.is_empty());
        assert_eq!(result.warnings, vec![NO_ITEMS_WARNING.to_string()]);
        assert!(result.warnings[0].contains("no items"));
    }

    #[test]
    fn test_empty_pages() {
        let result = OmniaParser.parse(&[String::new(), String::new()], &[], &ParseOptions::default());
        assert!(result.items.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.header["pages"], 2);
        assert_eq!(result.header["lines"], 0);
    }

    #[test]
    fn test_rows_across_pages() {
        let result = OmniaParser.parse(
            &[
                "PRODUCT CODE DESCRIPTION QUANTITY PREZZO\n125709 LAMP COVER".to_string(),
                "PRODUCT CODE DESCRIPTION QUANTITY PREZZO\n100 PZ 1.15 € 115.00 €".to_string(),
            ],
            &[],
            &ParseOptions::default(),
        );
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].product_name, "LAMP COVER");
        assert_eq!(result.header["supplier"], "omnia");
        assert!(result.warnings.is_empty());
    }
}

//! Fallback parser for unknown layouts.

use serde_json::json;
use tracing::debug;

use crate::invoice::parser::SupplierParser;
use crate::invoice::registry::Supplier;
use crate::models::config::ParseOptions;
use crate::models::invoice::ParseResult;
use crate::pdf::Table;

/// Warning returned by every generic parse.
pub const GENERIC_WARNING: &str = "Generic parser selected. No extraction performed.";

/// Accepts any document and extracts nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericParser;

impl SupplierParser for GenericParser {
    fn supplier(&self) -> Supplier {
        Supplier::Generic
    }

    fn can_parse(&self, _pages: &[String], _tables: &[Table]) -> bool {
        true
    }

    fn parse(&self, pages: &[String], tables: &[Table], _options: &ParseOptions) -> ParseResult {
        for (index, page) in pages.iter().enumerate() {
            debug!("Page {}: {} chars", index + 1, page.chars().count());
        }
        debug!("{} table candidates", tables.len());

        let header = json!({
            "source": "generic",
            "pages": pages.len(),
            "tables": tables.len(),
        });

        ParseResult {
            header: header.as_object().cloned().unwrap_or_default(),
            items: Vec::new(),
            warnings: vec![GENERIC_WARNING.to_string()],
        }
    }
}

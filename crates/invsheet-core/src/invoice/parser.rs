//! Supplier parser contract.

use tracing::{info, warn};

use crate::models::config::ParseOptions;
use crate::models::invoice::ParseResult;
use crate::pdf::Table;

use super::registry::Supplier;

/// One supplier's invoice layout.
///
/// Implementations hold no per-document state, so a single instance can
/// serve concurrent documents.
pub trait SupplierParser: Send + Sync {
    /// Which supplier this parser handles.
    fn supplier(&self) -> Supplier;

    /// Registry key.
    fn key(&self) -> &'static str {
        self.supplier().key()
    }

    /// Human-readable name.
    fn display_name(&self) -> &'static str {
        self.supplier().display_name()
    }

    /// Cheap keyword sniffing; advisory only.
    fn can_parse(&self, pages: &[String], tables: &[Table]) -> bool;

    /// Reconstruct invoice rows. Never fails: problems become warnings.
    fn parse(&self, pages: &[String], tables: &[Table], options: &ParseOptions) -> ParseResult;
}

/// Parse a document, treating a failed admissibility check as a warning.
pub fn parse_document(
    parser: &dyn SupplierParser,
    pages: &[String],
    tables: &[Table],
    options: &ParseOptions,
) -> ParseResult {
    info!("Using parser: {} ({})", parser.display_name(), parser.key());

    let admissible = parser.can_parse(pages, tables);
    let mut result = parser.parse(pages, tables, options);

    if !admissible {
        let message = format!(
            "Parser '{}' heuristics say it may not match this document; parsed anyway",
            parser.key()
        );
        warn!("{}", message);
        result.warnings.insert(0, message);
    }

    result
}

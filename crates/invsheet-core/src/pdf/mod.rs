//! PDF processing module.

mod extractor;
mod table;

pub use extractor::PdfExtractor;
pub use table::detect_tables;

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PdfError;

/// A table candidate: rows of cells.
pub type Table = Vec<Vec<String>>;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text content of a PDF, page by page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Text of each page, in order. Empty for pages without a text layer.
    pub pages: Vec<String>,
    /// Table candidates across all pages.
    pub tables: Vec<Table>,
}

impl ExtractedDocument {
    /// Wrap already extracted page texts, detecting tables.
    pub fn from_pages(pages: Vec<String>) -> Self {
        let tables = pages.iter().flat_map(|page| detect_tables(page)).collect();
        Self { pages, tables }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Whether no page carries any text.
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|page| page.trim().is_empty())
    }
}

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract the text of every page.
    fn extract_pages(&self) -> Result<Vec<String>>;

    /// Extract every page once and detect table candidates on the text.
    fn extract_document(&self) -> Result<ExtractedDocument> {
        let document = ExtractedDocument::from_pages(self.extract_pages()?);
        debug!("Detected {} table candidates", document.tables.len());
        Ok(document)
    }
}

/// Read a PDF file and extract its pages and tables.
pub fn extract_document(path: &Path) -> crate::Result<ExtractedDocument> {
    let data = std::fs::read(path)?;
    debug!("Read {} bytes from {}", data.len(), path.display());

    let mut extractor = PdfExtractor::new();
    extractor.load(&data)?;
    Ok(extractor.extract_document()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_from_pages() {
        let doc = ExtractedDocument::from_pages(vec![
            "Code  Description  Qty\n1  Lamp  2\n2  Cover  3".to_string(),
            String::new(),
        ]);
        assert_eq!(doc.page_count(), 2);
        assert_eq!(doc.tables.len(), 1);
        assert!(!doc.is_blank());
    }

    #[test]
    fn test_blank_document() {
        let doc = ExtractedDocument::from_pages(vec![" \n".to_string(), String::new()]);
        assert!(doc.is_blank());
        assert!(doc.tables.is_empty());
    }

    #[test]
    fn test_extract_document_missing_file() {
        let result = extract_document(Path::new("/nonexistent/invoice.pdf"));
        assert!(matches!(result, Err(crate::InvsheetError::Io(_))));
    }
}

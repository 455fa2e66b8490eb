//! Error types for the invsheet-core library.
//!
//! Malformed invoice lines never surface here; the row assembler reports them
//! as warnings. These enums cover structurally invalid calls only.

use thiserror::Error;

/// Main error type for the invsheet library.
#[derive(Error, Debug)]
pub enum InvsheetError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Supplier lookup error.
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Spreadsheet template error.
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to supplier parser lookup.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// No parser is registered under the requested key.
    #[error("unknown supplier key: {key}. Available: {}", available.join(", "))]
    UnknownSupplier { key: String, available: Vec<String> },
}

/// Errors related to spreadsheet templates.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Failed to read the template workbook.
    #[error("failed to read template {path}: {reason}")]
    Read { path: String, reason: String },

    /// Failed to write the output workbook.
    #[error("failed to write output {path}: {reason}")]
    Write { path: String, reason: String },

    /// The workbook has no sheet with the requested name.
    #[error("sheet '{0}' not found in template")]
    SheetNotFound(String),

    /// The workbook contains no sheets at all.
    #[error("template contains no sheets")]
    NoSheets,

    /// No row in the scanned range carries every mapped header label.
    #[error("cannot find header row with required headers in sheet '{sheet}'. Required: {}", required.join(", "))]
    HeaderNotFound { sheet: String, required: Vec<String> },

    /// The column mapping names a field that does not exist.
    #[error("unknown row field '{0}' in column mapping")]
    UnknownField(String),

    /// The column mapping is empty.
    #[error("column mapping is empty")]
    EmptyMapping,
}

/// Result type for the invsheet library.
pub type Result<T> = std::result::Result<T, InvsheetError>;

//! Core library for turning supplier invoice PDFs into spreadsheet rows.
//!
//! This crate provides:
//! - PDF text extraction (per page, plus table candidates)
//! - Line normalization and classification
//! - A row reconstruction state machine tolerant of broken text layout
//! - Supplier parsers behind an explicit registry
//! - Writing rows into an xlsx template below its header row

pub mod convert;
pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod sheet;

pub use convert::{convert, parse_pdf, ConvertRequest};
pub use error::{InvsheetError, PdfError, RegistryError, Result, SheetError};
pub use invoice::{parse_document, ParserRegistry, RowAssembler, Supplier, SupplierParser};
pub use models::config::{ConvertOptions, InvsheetConfig, ParseOptions, RepairQuirk, WriteOptions};
pub use models::invoice::{InvoiceRow, ParseResult, RowField};
pub use pdf::{extract_document, ExtractedDocument, PdfExtractor, PdfProcessor, Table};
pub use sheet::{write_items_to_template, ColumnMapping, WriteSummary};

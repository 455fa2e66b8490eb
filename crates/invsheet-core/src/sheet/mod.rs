//! Spreadsheet template output.

mod mapping;
mod workbook;
mod writer;

pub use mapping::ColumnMapping;
pub use workbook::{write_items_to_template, write_to_book, WorksheetGrid};
pub use writer::{find_header_row, write_rows, CellGrid, WriteSummary};

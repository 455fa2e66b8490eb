//! xlsx templates through umya-spreadsheet.

use std::path::Path;

use tracing::{debug, info};
use umya_spreadsheet::{Spreadsheet, Worksheet};

use super::writer::{write_rows, CellGrid, WriteSummary};
use crate::error::SheetError;
use crate::models::config::WriteOptions;
use crate::models::invoice::InvoiceRow;

/// [`CellGrid`] over a umya worksheet. Values are written as strings.
pub struct WorksheetGrid<'a> {
    sheet: &'a mut Worksheet,
}

impl<'a> WorksheetGrid<'a> {
    pub fn new(sheet: &'a mut Worksheet) -> Self {
        Self { sheet }
    }
}

impl CellGrid for WorksheetGrid<'_> {
    fn value(&self, column: u32, row: u32) -> String {
        self.sheet.get_value((column, row))
    }

    fn set_value(&mut self, column: u32, row: u32, value: &str) {
        self.sheet.get_cell_mut((column, row)).set_value_string(value);
    }

    fn max_row(&self) -> u32 {
        self.sheet.get_highest_row()
    }

    fn max_column(&self) -> u32 {
        self.sheet.get_highest_column()
    }
}

/// Load `template`, write `items` below its header row and save to `output`.
///
/// The template file itself is never modified.
pub fn write_items_to_template(
    template: &Path,
    output: &Path,
    items: &[InvoiceRow],
    options: &WriteOptions,
) -> Result<WriteSummary, SheetError> {
    let mut book = umya_spreadsheet::reader::xlsx::read(template).map_err(|e| SheetError::Read {
        path: template.display().to_string(),
        reason: e.to_string(),
    })?;
    debug!("Loaded template {}", template.display());

    let summary = write_to_book(&mut book, items, options)?;

    umya_spreadsheet::writer::xlsx::write(&book, output).map_err(|e| SheetError::Write {
        path: output.display().to_string(),
        reason: e.to_string(),
    })?;
    info!("Saved output: {}", output.display());

    Ok(summary)
}

/// Write `items` into an already loaded workbook.
pub fn write_to_book(
    book: &mut Spreadsheet,
    items: &[InvoiceRow],
    options: &WriteOptions,
) -> Result<WriteSummary, SheetError> {
    let sheet_name = match &options.sheet_name {
        Some(name) => name.clone(),
        None => book
            .get_sheet_collection()
            .first()
            .map(|sheet| sheet.get_name().to_string())
            .ok_or(SheetError::NoSheets)?,
    };

    let sheet = book
        .get_sheet_by_name_mut(&sheet_name)
        .ok_or_else(|| SheetError::SheetNotFound(sheet_name.clone()))?;

    let mut grid = WorksheetGrid::new(sheet);
    write_rows(&mut grid, &sheet_name, items, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::ColumnMapping;
    use crate::models::invoice::RowField;
    use tempfile::tempdir;

    fn template_book() -> Spreadsheet {
        let mut book = umya_spreadsheet::new_file();
        let sheet = book.get_sheet_by_name_mut("Sheet1").unwrap();
        sheet.get_cell_mut((1, 1)).set_value_string("Supplier import");
        for (index, label) in ColumnMapping::default().labels().enumerate() {
            sheet.get_cell_mut((index as u32 + 1, 4)).set_value_string(label);
        }
        sheet.get_cell_mut((1, 5)).set_value_string("OLD-1");
        sheet.get_cell_mut((2, 5)).set_value_string("old row");
        book
    }

    fn lamp() -> InvoiceRow {
        InvoiceRow {
            product_number: "125709".to_string(),
            product_name: "LAMP COVER 40W".to_string(),
            delivered_qty: "100".to_string(),
            net_unit_price: "1.15".to_string(),
            total_price: "115.00".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_write_to_book_first_sheet() {
        let mut book = template_book();
        let summary = write_to_book(&mut book, &[lamp()], &WriteOptions::default()).unwrap();

        assert_eq!(summary.sheet, "Sheet1");
        assert_eq!(summary.header_row, 4);
        assert_eq!(summary.rows_cleared, 1);

        let sheet = book.get_sheet_by_name("Sheet1").unwrap();
        assert_eq!(sheet.get_value((1, 5)), "125709");
        assert_eq!(sheet.get_value((2, 5)), "LAMP COVER 40W");
        assert_eq!(sheet.get_value((7, 5)), "115.00");
    }

    #[test]
    fn test_missing_sheet() {
        let mut book = template_book();
        let options = WriteOptions {
            sheet_name: Some("Items".to_string()),
            ..Default::default()
        };
        let err = write_to_book(&mut book, &[lamp()], &options).unwrap_err();
        assert!(matches!(err, SheetError::SheetNotFound(name) if name == "Items"));
    }

    #[test]
    fn test_template_round_trip() {
        let dir = tempdir().unwrap();
        let template = dir.path().join("template.xlsx");
        let output = dir.path().join("out.xlsx");
        umya_spreadsheet::writer::xlsx::write(&template_book(), &template).unwrap();

        let options = WriteOptions {
            mapping: ColumnMapping::new()
                .with("Číslo produktu", RowField::ProductNumber)
                .with("Dodané množství", RowField::DeliveredQty),
            ..Default::default()
        };
        write_items_to_template(&template, &output, &[lamp()], &options).unwrap();

        let written = umya_spreadsheet::reader::xlsx::read(&output).unwrap();
        let sheet = written.get_sheet_by_name("Sheet1").unwrap();
        assert_eq!(sheet.get_value((1, 5)), "125709");
        assert_eq!(sheet.get_value((5, 5)), "100");
        assert_eq!(sheet.get_value((2, 5)), "old row");

        let untouched = umya_spreadsheet::reader::xlsx::read(&template).unwrap();
        assert_eq!(
            untouched.get_sheet_by_name("Sheet1").unwrap().get_value((1, 5)),
            "OLD-1"
        );
    }

    #[test]
    fn test_missing_template() {
        let dir = tempdir().unwrap();
        let err = write_items_to_template(
            &dir.path().join("missing.xlsx"),
            &dir.path().join("out.xlsx"),
            &[],
            &WriteOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SheetError::Read { .. }));
    }
}

//! Writing rows below a template's header row.

use serde::Serialize;
use tracing::{debug, info};

use super::ColumnMapping;
use crate::error::SheetError;
use crate::models::config::WriteOptions;
use crate::models::invoice::{InvoiceRow, RowField};

/// A worksheet seen as a grid of text cells. Coordinates are 1-based.
pub trait CellGrid {
    /// Cell text; empty for missing cells.
    fn value(&self, column: u32, row: u32) -> String;

    fn set_value(&mut self, column: u32, row: u32, value: &str);

    /// Blank a cell.
    fn clear(&mut self, column: u32, row: u32) {
        self.set_value(column, row, "");
    }

    /// Highest row holding any cell.
    fn max_row(&self) -> u32;

    /// Highest column holding any cell.
    fn max_column(&self) -> u32;
}

/// What a write did to the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteSummary {
    pub sheet: String,
    pub header_row: u32,
    pub rows_cleared: u32,
    pub rows_written: u32,
}

/// First row within `scan_rows` whose trimmed cells contain every label.
pub fn find_header_row<G, S>(grid: &G, labels: &[S], scan_rows: u32) -> Option<u32>
where
    G: CellGrid + ?Sized,
    S: AsRef<str>,
{
    let last = scan_rows.min(grid.max_row());
    (1..=last).find(|&row| {
        let cells = row_values(grid, row);
        labels
            .iter()
            .all(|label| cells.iter().any(|cell| cell == label.as_ref().trim()))
    })
}

/// Clear previous data and write `items` below the header row.
pub fn write_rows<G>(
    grid: &mut G,
    sheet: &str,
    items: &[InvoiceRow],
    options: &WriteOptions,
) -> Result<WriteSummary, SheetError>
where
    G: CellGrid + ?Sized,
{
    let mapping = &options.mapping;
    if mapping.is_empty() {
        return Err(SheetError::EmptyMapping);
    }

    let labels: Vec<&str> = mapping.labels().collect();
    let header_row = find_header_row(grid, &labels, options.header_scan_rows).ok_or_else(|| {
        SheetError::HeaderNotFound {
            sheet: sheet.to_string(),
            required: labels.iter().map(|l| l.to_string()).collect(),
        }
    })?;
    debug!("Header row found at {} in sheet '{}'", header_row, sheet);

    let columns = column_layout(grid, header_row, mapping);
    let start_row = header_row + 1;

    let mut rows_cleared = 0;
    if options.clear_existing {
        let first_column = columns[0].0;
        for row in start_row..=grid.max_row() {
            if grid.value(first_column, row).trim().is_empty() {
                break;
            }
            for (column, _) in &columns {
                grid.clear(*column, row);
            }
            rows_cleared += 1;
        }
        debug!("Cleared {} previous data rows", rows_cleared);
    }

    for (offset, item) in items.iter().enumerate() {
        let row = start_row + offset as u32;
        for (column, field) in &columns {
            grid.set_value(*column, row, item.field(*field));
        }
    }

    info!("Wrote {} rows to sheet '{}'", items.len(), sheet);

    Ok(WriteSummary {
        sheet: sheet.to_string(),
        header_row,
        rows_cleared,
        rows_written: items.len() as u32,
    })
}

fn row_values<G: CellGrid + ?Sized>(grid: &G, row: u32) -> Vec<String> {
    (1..=grid.max_column())
        .map(|column| grid.value(column, row).trim().to_string())
        .collect()
}

/// Column of each mapped label in the header row, in mapping order.
fn column_layout<G: CellGrid + ?Sized>(
    grid: &G,
    header_row: u32,
    mapping: &ColumnMapping,
) -> Vec<(u32, RowField)> {
    let cells = row_values(grid, header_row);
    mapping
        .iter()
        .filter_map(|(label, field)| {
            cells
                .iter()
                .position(|cell| cell == label)
                .map(|index| (index as u32 + 1, field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct MemoryGrid {
        cells: BTreeMap<(u32, u32), String>,
    }

    impl MemoryGrid {
        fn with_row(mut self, row: u32, values: &[&str]) -> Self {
            for (index, value) in values.iter().enumerate() {
                self.set_value(index as u32 + 1, row, value);
            }
            self
        }
    }

    impl CellGrid for MemoryGrid {
        fn value(&self, column: u32, row: u32) -> String {
            self.cells.get(&(column, row)).cloned().unwrap_or_default()
        }

        fn set_value(&mut self, column: u32, row: u32, value: &str) {
            self.cells.insert((column, row), value.to_string());
        }

        fn max_row(&self) -> u32 {
            self.cells.keys().map(|(_, row)| *row).max().unwrap_or(0)
        }

        fn max_column(&self) -> u32 {
            self.cells.keys().map(|(column, _)| *column).max().unwrap_or(0)
        }
    }

    fn small_options() -> WriteOptions {
        WriteOptions {
            mapping: ColumnMapping::new()
                .with("Code", RowField::ProductNumber)
                .with("Name", RowField::ProductName)
                .with("Qty", RowField::DeliveredQty),
            ..Default::default()
        }
    }

    fn item(code: &str, name: &str, qty: &str) -> InvoiceRow {
        InvoiceRow {
            product_number: code.to_string(),
            product_name: name.to_string(),
            delivered_qty: qty.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_find_header_row() {
        let grid = MemoryGrid::default()
            .with_row(1, &["Import sheet"])
            .with_row(3, &["", " Code ", "Name", "Qty", "Note"]);

        assert_eq!(find_header_row(&grid, &["Code", "Qty"], 50), Some(3));
        assert_eq!(find_header_row(&grid, &["Code", "Price"], 50), None);
        assert_eq!(find_header_row(&grid, &["Code"], 2), None);
    }

    #[test]
    fn test_write_below_header_in_header_order() {
        let mut grid = MemoryGrid::default().with_row(2, &["Note", "Qty", "Code", "Name"]);

        let summary = write_rows(
            &mut grid,
            "Sheet1",
            &[item("125709", "LAMP COVER", "100"), item("VEN-161.167", "SHOWER", "1")],
            &small_options(),
        )
        .unwrap();

        assert_eq!(summary.header_row, 2);
        assert_eq!(summary.rows_written, 2);
        assert_eq!(grid.value(3, 3), "125709");
        assert_eq!(grid.value(4, 3), "LAMP COVER");
        assert_eq!(grid.value(2, 3), "100");
        assert_eq!(grid.value(3, 4), "VEN-161.167");
        assert_eq!(grid.value(1, 3), "");
    }

    #[test]
    fn test_clear_existing_until_first_blank() {
        let mut grid = MemoryGrid::default()
            .with_row(1, &["Code", "Name", "Qty"])
            .with_row(2, &["A1", "old", "1"])
            .with_row(3, &["A2", "old", "2"])
            .with_row(4, &["A3", "old", "3"])
            .with_row(6, &["Totals", "keep", "6"]);

        let summary = write_rows(&mut grid, "Sheet1", &[item("N1", "new", "9")], &small_options()).unwrap();

        assert_eq!(summary.rows_cleared, 3);
        assert_eq!(grid.value(1, 2), "N1");
        assert_eq!(grid.value(1, 3), "");
        assert_eq!(grid.value(2, 4), "");
        assert_eq!(grid.value(1, 6), "Totals");
    }

    #[test]
    fn test_keep_existing_rows() {
        let mut grid = MemoryGrid::default()
            .with_row(1, &["Code", "Name", "Qty"])
            .with_row(2, &["A1", "old", "1"])
            .with_row(3, &["A2", "old", "2"]);
        let options = WriteOptions {
            clear_existing: false,
            ..small_options()
        };

        let summary = write_rows(&mut grid, "Sheet1", &[item("N1", "new", "9")], &options).unwrap();

        assert_eq!(summary.rows_cleared, 0);
        assert_eq!(grid.value(1, 2), "N1");
        assert_eq!(grid.value(1, 3), "A2");
    }

    #[test]
    fn test_header_not_found() {
        let mut grid = MemoryGrid::default().with_row(1, &["Code", "Name"]);
        let err = write_rows(&mut grid, "Data", &[], &small_options()).unwrap_err();

        match err {
            SheetError::HeaderNotFound { sheet, required } => {
                assert_eq!(sheet, "Data");
                assert_eq!(required, vec!["Code", "Name", "Qty"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_mapping() {
        let mut grid = MemoryGrid::default();
        let options = WriteOptions {
            mapping: ColumnMapping::new(),
            ..Default::default()
        };
        assert!(matches!(
            write_rows(&mut grid, "Sheet1", &[], &options),
            Err(SheetError::EmptyMapping)
        ));
    }

    #[test]
    fn test_default_czech_mapping() {
        let labels: Vec<String> = ColumnMapping::default().labels().map(str::to_string).collect();
        let refs: Vec<&str> = labels.iter().map(String::as_str).collect();
        let mut grid = MemoryGrid::default().with_row(5, &refs);

        let row = InvoiceRow {
            product_number: "125709".to_string(),
            product_name: "LAMP COVER 40W".to_string(),
            delivered_qty: "100".to_string(),
            net_unit_price: "1.15".to_string(),
            total_price: "115.00".to_string(),
            ..Default::default()
        };
        write_rows(&mut grid, "Sheet1", &[row], &WriteOptions::default()).unwrap();

        assert_eq!(grid.value(1, 6), "125709");
        assert_eq!(grid.value(3, 6), "");
        assert_eq!(grid.value(5, 6), "100");
        assert_eq!(grid.value(7, 6), "115.00");
    }
}

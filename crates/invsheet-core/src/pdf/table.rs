//! Table candidates from plain page text.

use lazy_static::lazy_static;
use regex::Regex;

use super::Table;

lazy_static! {
    // Column gap: tabs or two or more spaces
    static ref CELL_SEPARATOR: Regex = Regex::new(r"\t+|\s{2,}").unwrap();
}

const MIN_CELLS: usize = 3;
const MIN_ROWS: usize = 2;

/// Find runs of consecutive lines that split into at least three cells.
///
/// A run needs at least two such lines to count as a table.
pub fn detect_tables(page_text: &str) -> Vec<Table> {
    let mut tables = Vec::new();
    let mut current: Table = Vec::new();

    for line in page_text.lines() {
        let cells = split_cells(line);
        if cells.len() >= MIN_CELLS {
            current.push(cells);
        } else {
            flush(&mut current, &mut tables);
        }
    }
    flush(&mut current, &mut tables);

    tables
}

fn split_cells(line: &str) -> Vec<String> {
    CELL_SEPARATOR
        .split(line.trim())
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

fn flush(current: &mut Table, tables: &mut Vec<Table>) {
    if current.len() >= MIN_ROWS {
        tables.push(std::mem::take(current));
    } else {
        current.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_single_table() {
        let text = "Invoice 26VIN0001\n\
                    PRODUCT CODE   DESCRIPTION   QUANTITY\n\
                    125709\tLAMP COVER\t100 PZ\n\
                    Thank you";
        let tables = detect_tables(text);
        assert_eq!(tables.len(), 1);
        assert_eq!(
            tables[0],
            vec![
                vec!["PRODUCT CODE", "DESCRIPTION", "QUANTITY"],
                vec!["125709", "LAMP COVER", "100 PZ"],
            ]
        );
    }

    #[test]
    fn test_single_row_is_not_a_table() {
        assert!(detect_tables("a  b  c\nplain text\nd  e  f").is_empty());
    }

    #[test]
    fn test_two_cells_do_not_count() {
        assert!(detect_tables("a  b\nc  d").is_empty());
        assert!(detect_tables("").is_empty());
    }
}

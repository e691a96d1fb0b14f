//! Minimal CSV reading for the debug runner. Handles quoted cells and
//! escaped quotes, nothing more; production callers plug in their own
//! `RowReader`.

use std::fs;
use std::path::Path;

use common::probes::{RowReadError, RowReader};
use common::row::SourceRow;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvRowReader;

impl RowReader for CsvRowReader {
    fn read_rows(&self, path: &Path) -> Result<Vec<SourceRow>, RowReadError> {
        let content = fs::read_to_string(path)?;
        let mut lines = content.lines();

        let Some(header_line) = lines.next() else {
            return Ok(Vec::new());
        };
        let headers = split_csv_line(header_line);
        if headers.is_empty() {
            return Err(RowReadError::Malformed(
                path.to_path_buf(),
                "empty header row".to_string(),
            ));
        }

        let mut rows = Vec::new();
        for line in lines {
            if line.trim().is_empty() {
                continue;
            }

            let cells = split_csv_line(line);
            rows.push(SourceRow::new(
                headers.iter().cloned().zip(cells.into_iter()),
            ));
        }

        Ok(rows)
    }
}

fn split_csv_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            _ => current.push(ch),
        }
    }
    cells.push(current);

    cells
}

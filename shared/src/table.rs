//! Fixed-column text tables.
//!
//! A table file is a title line, a rule of dashes, then one row per record.
//! Every cell is left-aligned and padded to its column width, counted in
//! characters. Rows are split back into cells by column offsets, so a cell
//! may hold spaces as long as it fits its column.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

const HEADER_LINES: usize = 2;

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub title: &'static str,
    pub width: usize,
}

impl Column {
    pub const fn new(title: &'static str, width: usize) -> Self {
        Self { title, width }
    }
}

/// A record that can be written as one table row.
pub trait Row: Sized {
    const COLUMNS: &'static [Column];

    fn cells(&self) -> Vec<String>;

    fn from_cells(cells: &[&str]) -> Result<Self, String>;
}

fn rule_width(columns: &[Column]) -> usize {
    columns.iter().map(|c| c.width).sum()
}

fn write_line<'a>(out: &mut String, columns: &[Column], cells: impl IntoIterator<Item = &'a str>) {
    for (column, cell) in columns.iter().zip(cells) {
        out.push_str(&format!("{:<width$}", cell, width = column.width));
    }
    out.push('\n');
}

pub fn render<'a, R: Row + 'a>(rows: impl IntoIterator<Item = &'a R>) -> String {
    let mut out = String::new();
    write_line(&mut out, R::COLUMNS, R::COLUMNS.iter().map(|c| c.title));
    out.push_str(&"-".repeat(rule_width(R::COLUMNS)));
    out.push('\n');

    for row in rows {
        let cells = row.cells();
        write_line(&mut out, R::COLUMNS, cells.iter().map(String::as_str));
    }
    out
}

fn split_cells(line: &str, columns: &[Column]) -> Option<Vec<String>> {
    let chars: Vec<char> = line.chars().collect();
    let last_start = rule_width(&columns[..columns.len() - 1]);
    if chars.len() <= last_start {
        return None;
    }

    let mut start = 0;
    let cells = columns.iter().enumerate().map(|(i, column)| {
        let end = if i + 1 == columns.len() { chars.len() } else { start + column.width };
        let cell: String = chars[start..end].iter().collect();
        start = end;
        cell.trim().to_string()
    }).collect();
    Some(cells)
}

/// Parses a whole table. Rows that fail to parse are returned as errors
/// alongside the rows that did.
pub fn parse<R: Row>(text: &str) -> (Vec<R>, Vec<StoreError>) {
    let mut rows = Vec::new();
    let mut issues = Vec::new();

    for (idx, line) in text.lines().enumerate().skip(HEADER_LINES) {
        let line_no = idx + 1;
        if line.trim().is_empty() {
            continue;
        }

        let Some(cells) = split_cells(line, R::COLUMNS) else {
            issues.push(StoreError::malformed(line_no, "row is truncated"));
            continue;
        };
        let cells: Vec<&str> = cells.iter().map(String::as_str).collect();
        match R::from_cells(&cells) {
            Ok(row) => rows.push(row),
            Err(reason) => issues.push(StoreError::malformed(line_no, reason)),
        }
    }
    (rows, issues)
}

/// Reads a table file. `Ok(None)` means the file does not exist yet.
pub fn read(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(StoreError::unavailable(path, e)),
    }
}

/// Replaces the file with `text`. The new content is written to a sibling
/// file first and renamed into place.
pub fn write(path: &Path, text: &str) -> Result<(), StoreError> {
    let staging = staging_path(path);
    fs::write(&staging, text).map_err(|e| StoreError::unavailable(path, e))?;
    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        StoreError::unavailable(path, e)
    })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Pair {
        key: String,
        value: u32,
    }

    impl Row for Pair {
        const COLUMNS: &'static [Column] = &[Column::new("Key", 12), Column::new("Value", 6)];

        fn cells(&self) -> Vec<String> {
            vec![self.key.clone(), self.value.to_string()]
        }

        fn from_cells(cells: &[&str]) -> Result<Self, String> {
            let value = cells[1].parse().map_err(|_| format!("bad value {:?}", cells[1]))?;
            Ok(Pair { key: cells[0].to_string(), value })
        }
    }

    #[test]
    fn renders_header_rule_and_padded_rows() {
        let text = render(&[Pair { key: "two words".into(), value: 7 }]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Key         Value ");
        assert_eq!(lines[1], "-".repeat(18));
        assert_eq!(lines[2], "two words   7     ");
    }

    #[test]
    fn parses_by_offset_and_reports_bad_rows() {
        let text = "Key         Value\n------------------\n\
                    two words   7\n\
                    short\n\
                    \n\
                    key         x\n\
                    spaced out  12   \n";
        let (rows, issues) = parse::<Pair>(text);
        assert_eq!(rows, vec![
            Pair { key: "two words".into(), value: 7 },
            Pair { key: "spaced out".into(), value: 12 },
        ]);
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], StoreError::MalformedRow { line: 4, .. }));
        assert!(matches!(issues[1], StoreError::MalformedRow { line: 6, .. }));
    }

    #[test]
    fn staging_file_sits_next_to_target() {
        assert_eq!(staging_path(Path::new("data/voters.txt")), PathBuf::from("data/voters.txt.tmp"));
    }
}

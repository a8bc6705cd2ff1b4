use std::fs::File;
use std::io::{
    BufRead,
    BufReader,
    Read
};
use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum NumericTableError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error("table is empty: missing header line")]
    MissingHeader,
    #[error("line {line}: cannot parse '{token}' as a number")]
    ParseError { line: usize, token: String },
    #[error("line {line}: expected {expected} columns, found {found}")]
    ColumnCountMismatch { line: usize, expected: usize, found: usize },
    #[error("expected {expected} rows, found {found}")]
    RowCountMismatch { expected: usize, found: usize }
}

/// 一行標頭加上固定列數、欄數的空白分隔數值表。
#[derive(Debug, Clone, PartialEq)]
pub struct NumericTable {
    header: Vec<String>,
    rows: Vec<Vec<f64>>
}

impl NumericTable {
    pub fn from_path(path: impl AsRef<Path>, num_rows: usize, num_cols: usize) -> Result<NumericTable, NumericTableError> {
        let file = File::open(path)?;
        NumericTable::from_reader(file, num_rows, num_cols)
    }

    /// 讀入整張表；空白行略過，列數或欄數不符即回傳錯誤。
    pub fn from_reader(reader: impl Read, num_rows: usize, num_cols: usize) -> Result<NumericTable, NumericTableError> {
        let mut lines = BufReader::new(reader).lines();
        let header_line = lines.next().ok_or(NumericTableError::MissingHeader)??;
        let header = header_line.split_whitespace().map(str::to_owned).collect();

        let mut rows = Vec::with_capacity(num_rows);
        for (offset, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_number = offset + 2;
            let row = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<f64>().map_err(|_| NumericTableError::ParseError {
                        line: line_number,
                        token: token.to_owned()
                    })
                })
                .collect::<Result<Vec<f64>, NumericTableError>>()?;
            if row.len() != num_cols {
                return Err(NumericTableError::ColumnCountMismatch {
                    line: line_number,
                    expected: num_cols,
                    found: row.len()
                });
            }
            rows.push(row);
        }
        if rows.len() != num_rows {
            return Err(NumericTableError::RowCountMismatch { expected: num_rows, found: rows.len() });
        }
        Ok(NumericTable { header, rows })
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}

//! Shared XLSX specification models: column layout, options, report, errors.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use rust_xlsxwriter::XlsxError;
use thiserror::Error;

use crate::conf::C_SHEET_NAME_DEFAULT;

////////////////////////////////////////////////////////////////////////////////
// #region ColumnLayout

/// Cell typing category of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumColumnKind {
    /// Text cell (strings, dates and everything non-numeric).
    #[default]
    Text,
    /// Integer number cell.
    Integer,
    /// Decimal number cell.
    Decimal,
}

impl EnumColumnKind {
    /// Whether cells of this column are emitted as number cells.
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Integer | Self::Decimal)
    }
}

/// One declared column: header name, cell kind, and value accessor.
///
/// The accessor returns the field's string form; numeric columns parse it
/// back into a number at write time.
pub struct SpecColumn<T> {
    /// Header text.
    pub name: &'static str,
    /// Cell typing category.
    pub kind: EnumColumnKind,
    /// Field accessor.
    pub accessor: fn(&T) -> String,
}

impl<T> SpecColumn<T> {
    /// Declare a text column.
    pub fn text(name: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            name,
            kind: EnumColumnKind::Text,
            accessor,
        }
    }

    /// Declare an integer column.
    pub fn integer(name: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            name,
            kind: EnumColumnKind::Integer,
            accessor,
        }
    }

    /// Declare a decimal column.
    pub fn decimal(name: &'static str, accessor: fn(&T) -> String) -> Self {
        Self {
            name,
            kind: EnumColumnKind::Decimal,
            accessor,
        }
    }
}

impl<T> Clone for SpecColumn<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for SpecColumn<T> {}

impl<T> fmt::Debug for SpecColumn<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpecColumn")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

/// Record type with a fixed, ordered column layout.
pub trait TabularRecord: Sized {
    /// Declared columns in output order. Must be stable across calls.
    fn columns() -> Vec<SpecColumn<Self>>;
}

/// Normalized cell value during the write pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum EnumCellValue {
    /// Missing/blank value.
    None,
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region WriteOptions

/// Handling of numeric-column cells whose text does not parse as a number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumNumericParsePolicy {
    /// Leave the cell blank and record it in the report (default).
    #[default]
    SkipAndWarn,
    /// Write the raw text as a text cell and record a warning.
    WriteAsText,
    /// Abort the write with [`XlsxWriteError::NumericCell`].
    Error,
}

/// Writer-wide options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecXlsxWriteOptions {
    /// Worksheet name (sanitized before use).
    pub sheet_name: String,
    /// Numeric parse failure handling.
    pub numeric_parse_policy: EnumNumericParsePolicy,
    /// Reject tables that exceed Excel row/column limits before writing.
    pub if_validate_limits: bool,
}

impl Default for SpecXlsxWriteOptions {
    fn default() -> Self {
        Self {
            sheet_name: C_SHEET_NAME_DEFAULT.to_string(),
            numeric_parse_policy: EnumNumericParsePolicy::SkipAndWarn,
            if_validate_limits: true,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportSpecification

/// Numeric cell left blank because its text did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecSkippedCell {
    /// A1-style cell reference.
    pub cell_ref: String,
    /// Column header name.
    pub column: String,
    /// Raw text that failed to parse.
    pub text: String,
}

/// Per-write call report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual worksheet name in the workbook.
    pub sheet_name: String,
    /// Header names in column order.
    pub columns: Vec<String>,
    /// Number of data rows written (header excluded).
    pub n_rows_data: usize,
    /// Size of the serialized workbook.
    pub n_bytes: usize,
    /// Numeric cells left blank.
    pub cells_skipped: Vec<SpecSkippedCell>,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }

    /// Total sheet rows including the header.
    pub fn n_rows_total(&self) -> usize {
        self.n_rows_data + crate::conf::N_ROWS_HEADER
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_rows".to_string(), self.n_rows_data as u64);
        dict_counts.insert("cnt_cols".to_string(), self.columns.len() as u64);
        dict_counts.insert("cnt_skipped".to_string(), self.cells_skipped.len() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warnings.len() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let dict_counts = self.to_dict();
        format!(
            "{prefix} sheet={} rows={} cols={} skipped={} warnings={}",
            self.sheet_name,
            dict_counts["cnt_rows"],
            dict_counts["cnt_cols"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for SpecXlsxReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[XLSX]"))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Top-level write failures. Nothing is persisted when one is returned.
#[derive(Debug, Error)]
pub enum XlsxWriteError {
    /// Destination file could not be created, written or renamed into place.
    #[error("Failed to write workbook {}: {source}", .path.display())]
    Io {
        /// Destination path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Destination stream rejected the workbook bytes.
    #[error("Failed to write workbook to output stream: {0}")]
    Stream(#[source] std::io::Error),
    /// Workbook assembly failed inside `rust_xlsxwriter`.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] XlsxError),
    /// Numeric cell text did not parse under the strict policy.
    #[error("Column {column:?} expects a number but cell {cell_ref} holds {text:?}.")]
    NumericCell {
        /// A1-style cell reference.
        cell_ref: String,
        /// Column header name.
        column: String,
        /// Raw text that failed to parse.
        text: String,
    },
    /// Table does not fit into one worksheet.
    #[error("Excel limit exceeded: {rows} rows x {cols} columns do not fit into one sheet.")]
    SheetLimit {
        /// Total rows including header.
        rows: usize,
        /// Total columns.
        cols: usize,
    },
    /// Column layout is empty or has duplicated names.
    #[error("Invalid column layout: {0}")]
    InvalidColumns(String),
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_to_dict_and_format() {
        let report = SpecXlsxReport {
            sheet_name: "Rates".to_string(),
            columns: vec!["A".to_string(), "B".to_string()],
            n_rows_data: 4,
            n_bytes: 0,
            cells_skipped: vec![SpecSkippedCell {
                cell_ref: "B3".to_string(),
                column: "B".to_string(),
                text: "n/a".to_string(),
            }],
            warnings: vec!["w".to_string()],
        };

        let dict_counts = report.to_dict();
        assert_eq!(dict_counts["cnt_rows"], 4);
        assert_eq!(dict_counts["cnt_cols"], 2);
        assert_eq!(dict_counts["cnt_skipped"], 1);
        assert_eq!(dict_counts["cnt_warnings"], 1);
        assert_eq!(report.n_rows_total(), 5);

        let txt = report.format("[XLSX]");
        assert_eq!(txt, "[XLSX] sheet=Rates rows=4 cols=2 skipped=1 warnings=1");
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn test_column_kind_numeric_split() {
        assert!(!EnumColumnKind::Text.is_numeric());
        assert!(EnumColumnKind::Integer.is_numeric());
        assert!(EnumColumnKind::Decimal.is_numeric());
    }
}

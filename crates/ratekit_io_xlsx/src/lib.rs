//! `ratekit_io_xlsx` v1:
//! Single-sheet XLSX writer for typed record tables.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : column layout, options, report and errors
//! - `util`   : pure helper functions
//! - `writer` : workbook assembly and atomic persistence
pub mod conf;
pub mod spec;
pub mod util;
pub mod writer;

pub use conf::{
    C_SHEET_NAME_DEFAULT, C_XLSX_EXTENSION, N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX,
    N_NROWS_EXCEL_MAX, N_ROWS_HEADER, TUP_EXCEL_ILLEGAL, derive_default_xlsx_write_options,
    derive_strict_xlsx_write_options,
};
pub use spec::{
    EnumCellValue, EnumColumnKind, EnumNumericParsePolicy, SpecColumn, SpecSkippedCell,
    SpecXlsxReport, SpecXlsxWriteOptions, TabularRecord, XlsxWriteError,
};
pub use util::{
    convert_cell_value, derive_cell_ref, derive_column_name, sanitize_sheet_name,
    validate_sheet_limits, validate_unique_columns,
};
pub use writer::XlsxTableWriter;

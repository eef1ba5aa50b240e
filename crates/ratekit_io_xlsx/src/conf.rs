//! XLSX constants and default preset factories.

use crate::spec::{EnumNumericParsePolicy, SpecXlsxWriteOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];
/// Number of header rows emitted above the data rows.
pub const N_ROWS_HEADER: usize = 1;
/// Sheet name used when the caller does not provide one.
pub const C_SHEET_NAME_DEFAULT: &str = "Sheet1";
/// Workbook file extension.
pub const C_XLSX_EXTENSION: &str = "xlsx";

/// Build default write options.
pub fn derive_default_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions::default()
}

/// Build write options that abort on the first unparsable numeric cell.
pub fn derive_strict_xlsx_write_options() -> SpecXlsxWriteOptions {
    SpecXlsxWriteOptions {
        numeric_parse_policy: EnumNumericParsePolicy::Error,
        ..SpecXlsxWriteOptions::default()
    }
}

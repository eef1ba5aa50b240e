//! Stateless helper utilities used by the XLSX writer kernel.

use std::collections::{BTreeMap, BTreeSet};

use crate::conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, N_ROWS_HEADER,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{EnumCellValue, EnumColumnKind, XlsxWriteError};

////////////////////////////////////////////////////////////////////////////////
// #region CellReferences

/// Spreadsheet column letters for a zero-based column index.
///
/// Bijective base-26: `A..Z`, `AA..AZ`, `BA..ZZ`, `AAA..`.
pub fn derive_column_name(col_idx: usize) -> String {
    let mut v_letters = Vec::new();
    let mut n_rem = col_idx + 1;
    while n_rem > 0 {
        let n_digit = (n_rem - 1) % 26;
        v_letters.push(b'A' + n_digit as u8);
        n_rem = (n_rem - 1) / 26;
    }
    v_letters.reverse();
    String::from_utf8_lossy(&v_letters).into_owned()
}

/// A1-style reference for zero-based `(row_idx, col_idx)`.
pub fn derive_cell_ref(row_idx: usize, col_idx: usize) -> String {
    format!("{}{}", derive_column_name(col_idx), row_idx + 1)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region CellValueConversion

/// Normalize accessor text into a cell value according to column kind.
///
/// Returns `Err(text)` when a numeric column holds text that is not a finite
/// number; the caller decides how to handle it.
pub fn convert_cell_value(text: String, kind: EnumColumnKind) -> Result<EnumCellValue, String> {
    if !kind.is_numeric() {
        return Ok(EnumCellValue::String(text));
    }

    match text.trim().parse::<f64>() {
        Ok(val) if val.is_finite() => Ok(EnumCellValue::Number(val)),
        _ => Err(text),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region LayoutValidation

/// Validate that `columns` is non-empty and has no duplicated names.
pub fn validate_unique_columns(columns: &[String]) -> Result<(), XlsxWriteError> {
    if columns.is_empty() {
        return Err(XlsxWriteError::InvalidColumns(
            "at least one column is required".to_string(),
        ));
    }
    if columns.len() == columns.iter().collect::<BTreeSet<_>>().len() {
        return Ok(());
    }

    let mut dict_pos: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (n_idx, c_name) in columns.iter().enumerate() {
        dict_pos.entry(c_name).or_default().push(n_idx);
    }

    let c_msg = dict_pos
        .iter()
        .filter(|(_, l_pos)| l_pos.len() > 1)
        .map(|(c_name, l_pos)| format!("{c_name:?} x{} at indices {:?}", l_pos.len(), l_pos))
        .collect::<Vec<_>>()
        .join("; ");

    Err(XlsxWriteError::InvalidColumns(format!(
        "duplicate column names detected: {c_msg}"
    )))
}

/// Check that header plus `height_data` rows and `width` columns fit one sheet.
pub fn validate_sheet_limits(height_data: usize, width: usize) -> Result<(), XlsxWriteError> {
    let n_rows_total = height_data.saturating_add(N_ROWS_HEADER);
    if n_rows_total > N_NROWS_EXCEL_MAX || width > N_NCOLS_EXCEL_MAX {
        return Err(XlsxWriteError::SheetLimit {
            rows: n_rows_total,
            cols: width,
        });
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    let c_truncated: String = c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect();
    let c_trimmed = c_truncated.trim().trim_matches('\'').trim();
    if c_trimmed.is_empty() {
        return "Sheet".to_string();
    }
    c_trimmed.to_string()
}

pub(crate) fn cast_row_num(value: usize) -> Result<u32, XlsxWriteError> {
    u32::try_from(value).map_err(|_| XlsxWriteError::SheetLimit {
        rows: value,
        cols: 0,
    })
}

pub(crate) fn cast_col_num(value: usize) -> Result<u16, XlsxWriteError> {
    u16::try_from(value).map_err(|_| XlsxWriteError::SheetLimit {
        rows: 0,
        cols: value,
    })
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

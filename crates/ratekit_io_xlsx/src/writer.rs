//! XLSX writer kernel that turns typed records into a single-sheet workbook.

use std::io::Write;
use std::path::Path;

use rust_xlsxwriter::{Workbook, Worksheet};

use crate::conf::N_ROWS_HEADER;
use crate::spec::{
    EnumCellValue, EnumNumericParsePolicy, SpecSkippedCell, SpecXlsxReport, SpecXlsxWriteOptions,
    TabularRecord, XlsxWriteError,
};
use crate::util::{
    cast_col_num, cast_row_num, convert_cell_value, derive_cell_ref, sanitize_sheet_name,
    validate_sheet_limits, validate_unique_columns,
};

/// Workbook writer for one table of uniformly-typed records.
///
/// The workbook is assembled in memory; nothing touches the destination until
/// every cell has been converted.
#[derive(Debug, Clone, Default)]
pub struct XlsxTableWriter {
    write_options: SpecXlsxWriteOptions,
}

impl XlsxTableWriter {
    /// Create writer bound to write options.
    pub fn new(write_options: SpecXlsxWriteOptions) -> Self {
        Self { write_options }
    }

    /// Return the active write options.
    pub fn write_options(&self) -> &SpecXlsxWriteOptions {
        &self.write_options
    }

    /// Write `records` to `path`, replacing any existing file atomically.
    pub fn write_records_to_path<T: TabularRecord>(
        &self,
        records: &[T],
        path: &Path,
    ) -> Result<SpecXlsxReport, XlsxWriteError> {
        let (v_bytes, report) = self.build_workbook_bytes(records)?;
        persist_bytes_atomically(path, &v_bytes)?;
        Ok(report)
    }

    /// Write `records` as workbook bytes into `writer`.
    pub fn write_records_to_writer<T: TabularRecord, W: Write>(
        &self,
        records: &[T],
        mut writer: W,
    ) -> Result<SpecXlsxReport, XlsxWriteError> {
        let (v_bytes, report) = self.build_workbook_bytes(records)?;
        writer.write_all(&v_bytes).map_err(XlsxWriteError::Stream)?;
        writer.flush().map_err(XlsxWriteError::Stream)?;
        Ok(report)
    }

    /// Assemble the workbook in memory and return its serialized bytes.
    pub fn build_workbook_bytes<T: TabularRecord>(
        &self,
        records: &[T],
    ) -> Result<(Vec<u8>, SpecXlsxReport), XlsxWriteError> {
        let l_columns = T::columns();
        let l_colnames: Vec<String> = l_columns.iter().map(|col| col.name.to_string()).collect();
        validate_unique_columns(&l_colnames)?;
        if self.write_options.if_validate_limits {
            validate_sheet_limits(records.len(), l_columns.len())?;
        }

        let mut report = SpecXlsxReport {
            sheet_name: sanitize_sheet_name(&self.write_options.sheet_name, "_"),
            columns: l_colnames,
            ..Default::default()
        };

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&report.sheet_name)?;

        write_header(worksheet, &report.columns)?;

        for (n_idx_record, record) in records.iter().enumerate() {
            let n_row = N_ROWS_HEADER + n_idx_record;
            for (n_idx_col, column) in l_columns.iter().enumerate() {
                let c_text = (column.accessor)(record);
                let value = match convert_cell_value(c_text, column.kind) {
                    Ok(value) => value,
                    Err(c_text_raw) => self.resolve_unparsed_numeric(
                        n_row,
                        n_idx_col,
                        column.name,
                        c_text_raw,
                        &mut report,
                    )?,
                };
                write_cell(worksheet, n_row, n_idx_col, &value)?;
            }
            report.n_rows_data += 1;
        }

        let v_bytes = workbook.save_to_buffer()?;
        report.n_bytes = v_bytes.len();
        Ok((v_bytes, report))
    }

    fn resolve_unparsed_numeric(
        &self,
        row_idx: usize,
        col_idx: usize,
        column: &str,
        text: String,
        report: &mut SpecXlsxReport,
    ) -> Result<EnumCellValue, XlsxWriteError> {
        let cell_ref = derive_cell_ref(row_idx, col_idx);
        match self.write_options.numeric_parse_policy {
            EnumNumericParsePolicy::Error => Err(XlsxWriteError::NumericCell {
                cell_ref,
                column: column.to_string(),
                text,
            }),
            EnumNumericParsePolicy::WriteAsText => {
                report.warn(format!(
                    "Cell {cell_ref} in numeric column {column:?} written as text: {text:?}"
                ));
                Ok(EnumCellValue::String(text))
            }
            EnumNumericParsePolicy::SkipAndWarn => {
                report.warn(format!(
                    "Cell {cell_ref} in numeric column {column:?} skipped: {text:?} is not a number"
                ));
                report.cells_skipped.push(SpecSkippedCell {
                    cell_ref,
                    column: column.to_string(),
                    text,
                });
                Ok(EnumCellValue::None)
            }
        }
    }
}

fn write_header(worksheet: &mut Worksheet, columns: &[String]) -> Result<(), XlsxWriteError> {
    for (col_idx, c_name) in columns.iter().enumerate() {
        worksheet.write_string(0, cast_col_num(col_idx)?, c_name)?;
    }
    Ok(())
}

fn write_cell(
    worksheet: &mut Worksheet,
    row_idx: usize,
    col_idx: usize,
    value: &EnumCellValue,
) -> Result<(), XlsxWriteError> {
    match value {
        EnumCellValue::None => {}
        EnumCellValue::String(val) => {
            worksheet.write_string(cast_row_num(row_idx)?, cast_col_num(col_idx)?, val)?;
        }
        EnumCellValue::Number(val) => {
            worksheet.write_number(cast_row_num(row_idx)?, cast_col_num(col_idx)?, *val)?;
        }
    }
    Ok(())
}

/// Write `bytes` to a temp file next to `path`, then rename it into place.
///
/// The temp file is removed on every failure path, so `path` is either fully
/// written or left untouched.
fn persist_bytes_atomically(path: &Path, bytes: &[u8]) -> Result<(), XlsxWriteError> {
    let map_io_error = |source: std::io::Error| XlsxWriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let path_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file_tmp = tempfile::Builder::new()
        .prefix(".ratekit-")
        .suffix(".xlsx.part")
        .tempfile_in(path_dir)
        .map_err(map_io_error)?;
    file_tmp.write_all(bytes).map_err(map_io_error)?;
    file_tmp.as_file().sync_all().map_err(map_io_error)?;
    file_tmp
        .persist(path)
        .map_err(|err| map_io_error(err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx};

    use super::*;
    use crate::spec::SpecColumn;

    struct Offer {
        day: &'static str,
        price: String,
        adults: i64,
    }

    impl TabularRecord for Offer {
        fn columns() -> Vec<SpecColumn<Self>> {
            vec![
                SpecColumn::<Self>::text("DAY", |offer| offer.day.to_string()),
                SpecColumn::<Self>::decimal("PRICE", |offer| offer.price.clone()),
                SpecColumn::<Self>::integer("ADULTS", |offer| offer.adults.to_string()),
            ]
        }
    }

    struct Duplicated;

    impl TabularRecord for Duplicated {
        fn columns() -> Vec<SpecColumn<Self>> {
            vec![
                SpecColumn::<Self>::text("X", |_| String::new()),
                SpecColumn::<Self>::text("X", |_| String::new()),
            ]
        }
    }

    fn offer(day: &'static str, price: &str, adults: i64) -> Offer {
        Offer {
            day,
            price: price.to_string(),
            adults,
        }
    }

    fn read_sheet(bytes: Vec<u8>, sheet_name: &str) -> calamine::Range<Data> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).unwrap();
        workbook.worksheet_range(sheet_name).unwrap()
    }

    fn as_f64(value: &Data) -> Option<f64> {
        match value {
            Data::Float(val) => Some(*val),
            Data::Int(val) => Some(*val as f64),
            _ => None,
        }
    }

    fn writer_with(policy: EnumNumericParsePolicy) -> XlsxTableWriter {
        XlsxTableWriter::new(SpecXlsxWriteOptions {
            sheet_name: "Offers".to_string(),
            numeric_parse_policy: policy,
            ..Default::default()
        })
    }

    #[test]
    fn test_build_workbook_writes_header_and_typed_cells() {
        let writer = writer_with(EnumNumericParsePolicy::SkipAndWarn);
        let records = vec![offer("2024-03-10", "150.50", 2), offer("2024-03-11", "99", 1)];

        let (v_bytes, report) = writer.build_workbook_bytes(&records).unwrap();
        assert_eq!(report.n_rows_data, 2);
        assert_eq!(report.columns, vec!["DAY", "PRICE", "ADULTS"]);
        assert!(report.warnings.is_empty());
        assert_eq!(report.n_bytes, v_bytes.len());

        let range = read_sheet(v_bytes, "Offers");
        assert_eq!(range.height(), 3);
        assert_eq!(range.width(), 3);
        assert_eq!(range.get((0, 0)), Some(&Data::String("DAY".to_string())));
        assert_eq!(range.get((0, 2)), Some(&Data::String("ADULTS".to_string())));
        assert_eq!(
            range.get((1, 0)),
            Some(&Data::String("2024-03-10".to_string()))
        );
        assert_eq!(range.get((1, 1)).and_then(as_f64), Some(150.5));
        assert_eq!(range.get((2, 2)).and_then(as_f64), Some(1.0));
    }

    #[test]
    fn test_empty_input_still_writes_header_row() {
        let writer = writer_with(EnumNumericParsePolicy::SkipAndWarn);

        let (v_bytes, report) = writer.build_workbook_bytes::<Offer>(&[]).unwrap();
        assert_eq!(report.n_rows_data, 0);
        assert_eq!(report.n_rows_total(), 1);

        let range = read_sheet(v_bytes, "Offers");
        assert_eq!(range.height(), 1);
        assert_eq!(range.get((0, 1)), Some(&Data::String("PRICE".to_string())));
    }

    #[test]
    fn test_unparsable_numeric_cell_is_skipped_and_reported() {
        let writer = writer_with(EnumNumericParsePolicy::SkipAndWarn);
        let records = vec![offer("2024-03-10", "n/a", 2)];

        let (v_bytes, report) = writer.build_workbook_bytes(&records).unwrap();
        assert_eq!(
            report.cells_skipped,
            vec![SpecSkippedCell {
                cell_ref: "B2".to_string(),
                column: "PRICE".to_string(),
                text: "n/a".to_string(),
            }]
        );
        assert_eq!(report.warnings.len(), 1);

        let range = read_sheet(v_bytes, "Offers");
        assert!(matches!(range.get((1, 1)), None | Some(Data::Empty)));
        assert_eq!(range.get((1, 2)).and_then(as_f64), Some(2.0));
    }

    #[test]
    fn test_unparsable_numeric_cell_written_as_text() {
        let writer = writer_with(EnumNumericParsePolicy::WriteAsText);
        let records = vec![offer("2024-03-10", "n/a", 2)];

        let (v_bytes, report) = writer.build_workbook_bytes(&records).unwrap();
        assert!(report.cells_skipped.is_empty());
        assert_eq!(report.warnings.len(), 1);

        let range = read_sheet(v_bytes, "Offers");
        assert_eq!(range.get((1, 1)), Some(&Data::String("n/a".to_string())));
    }

    #[test]
    fn test_unparsable_numeric_cell_fails_under_strict_policy() {
        let writer = XlsxTableWriter::new(crate::conf::derive_strict_xlsx_write_options());
        assert_eq!(
            writer.write_options().numeric_parse_policy,
            EnumNumericParsePolicy::Error
        );
        let records = vec![offer("2024-03-10", "1.0", 2), offer("2024-03-11", "x", 2)];

        let err = writer.build_workbook_bytes(&records).unwrap_err();
        match err {
            XlsxWriteError::NumericCell { cell_ref, column, .. } => {
                assert_eq!(cell_ref, "B3");
                assert_eq!(column, "PRICE");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_apostrophe_at_truncation_boundary_is_accepted() {
        let writer = XlsxTableWriter::new(SpecXlsxWriteOptions {
            sheet_name: format!("{}'b", "a".repeat(30)),
            ..Default::default()
        });

        let (v_bytes, report) = writer
            .build_workbook_bytes(&[offer("2024-03-10", "1.0", 2)])
            .unwrap();
        assert_eq!(report.sheet_name, "a".repeat(30));
        assert_eq!(read_sheet(v_bytes, &report.sheet_name).height(), 2);
    }

    #[test]
    fn test_duplicated_columns_are_rejected() {
        let writer = XlsxTableWriter::default();
        let err = writer.build_workbook_bytes(&[Duplicated]).unwrap_err();
        assert!(matches!(err, XlsxWriteError::InvalidColumns(_)));
    }

    #[test]
    fn test_write_records_to_path_and_writer() {
        let dir = tempfile::tempdir().unwrap();
        let path_out = dir.path().join("offers.xlsx");
        let writer = writer_with(EnumNumericParsePolicy::SkipAndWarn);
        let records = vec![offer("2024-03-10", "10", 1)];

        let report = writer.write_records_to_path(&records, &path_out).unwrap();
        assert_eq!(report.n_rows_data, 1);
        let v_bytes_file = std::fs::read(&path_out).unwrap();
        assert_eq!(v_bytes_file.len(), report.n_bytes);

        let mut v_bytes_stream = Vec::new();
        writer
            .write_records_to_writer(&records, &mut v_bytes_stream)
            .unwrap();
        assert_eq!(read_sheet(v_bytes_stream, "Offers").height(), 2);

        let l_leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(l_leftovers, vec![std::ffi::OsString::from("offers.xlsx")]);
    }

    #[test]
    fn test_write_to_missing_directory_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path_out = dir.path().join("missing").join("offers.xlsx");
        let writer = XlsxTableWriter::default();

        let err = writer
            .write_records_to_path(&[offer("2024-03-10", "1", 1)], &path_out)
            .unwrap_err();
        assert!(matches!(err, XlsxWriteError::Io { .. }));
        assert!(!path_out.exists());
    }
}

//! Conversion entry points: JSON source in, workbook out.
//!
//! Every entry point decodes to a [`Value`] first and then runs the same
//! extract-then-write pipeline. Extraction finishes before the destination
//! is touched, so a malformed document never leaves a file behind.

use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use ratekit_io_xlsx::XlsxTableWriter;
use serde_json::Value;

use crate::extract::extract_rates_with_scale;
use crate::report::ReportConvert;
use crate::spec::{HotelHeader, RatesError, SpecConvertOptions, SpecRatesDestination};

////////////////////////////////////////////////////////////////////////////////
// #region Loading

/// Parse JSON text.
pub fn load_document_from_str(text: &str) -> Result<Value, RatesError> {
    Ok(serde_json::from_str(text)?)
}

/// Read and parse a JSON file.
pub fn load_document_from_path(path: &Path) -> Result<Value, RatesError> {
    let file = File::open(path).map_err(|source| RatesError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_document_from_reader(file)
}

/// Read and parse JSON from a byte stream.
pub fn load_document_from_reader<R: Read>(reader: R) -> Result<Value, RatesError> {
    Ok(serde_json::from_reader(BufReader::new(reader))?)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Conversion

/// Resolve the output file path for `destination`.
pub fn resolve_destination_path(
    destination: &SpecRatesDestination,
    hotel: &HotelHeader,
) -> PathBuf {
    match destination {
        SpecRatesDestination::File(path) => path.clone(),
        SpecRatesDestination::Directory(dir) => dir.join(hotel.file_hint()),
    }
}

/// Convert a parsed document into a workbook file.
pub fn convert_json_value(
    document: &Value,
    destination: &SpecRatesDestination,
    options: &SpecConvertOptions,
) -> Result<ReportConvert, RatesError> {
    let extracted = extract_rates_with_scale(document, options.price_scale)?;
    let path_out = resolve_destination_path(destination, &extracted.hotel);

    let writer = XlsxTableWriter::new(options.write_options.clone());
    let report_xlsx = writer.write_records_to_path(&extracted.rates, &path_out)?;

    Ok(ReportConvert {
        path_out: Some(path_out),
        hotel: extracted.hotel,
        report_xlsx,
    })
}

/// Convert a parsed document and write the workbook bytes into `writer`.
pub fn convert_json_value_to_writer<W: Write>(
    document: &Value,
    writer: W,
    options: &SpecConvertOptions,
) -> Result<ReportConvert, RatesError> {
    let extracted = extract_rates_with_scale(document, options.price_scale)?;

    let table_writer = XlsxTableWriter::new(options.write_options.clone());
    let report_xlsx = table_writer.write_records_to_writer(&extracted.rates, writer)?;

    Ok(ReportConvert {
        path_out: None,
        hotel: extracted.hotel,
        report_xlsx,
    })
}

/// Convert JSON text.
pub fn convert_json_str(
    text: &str,
    destination: &SpecRatesDestination,
    options: &SpecConvertOptions,
) -> Result<ReportConvert, RatesError> {
    convert_json_value(&load_document_from_str(text)?, destination, options)
}

/// Convert a JSON file.
pub fn convert_json_path(
    path: &Path,
    destination: &SpecRatesDestination,
    options: &SpecConvertOptions,
) -> Result<ReportConvert, RatesError> {
    convert_json_value(&load_document_from_path(path)?, destination, options)
}

/// Convert JSON read from a byte stream.
pub fn convert_json_reader<R: Read>(
    reader: R,
    destination: &SpecRatesDestination,
    options: &SpecConvertOptions,
) -> Result<ReportConvert, RatesError> {
    convert_json_value(&load_document_from_reader(reader)?, destination, options)
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::EnumRatesErrorKind;

    #[test]
    fn test_resolve_destination_path() {
        let hotel = HotelHeader {
            hotel_id: "1".to_string(),
            name: "Inn".to_string(),
        };
        assert_eq!(
            resolve_destination_path(&SpecRatesDestination::File("a/b.xlsx".into()), &hotel),
            PathBuf::from("a/b.xlsx")
        );
        assert_eq!(
            resolve_destination_path(&SpecRatesDestination::Directory("out".into()), &hotel),
            PathBuf::from("out").join("1_Inn.xlsx")
        );
    }

    #[test]
    fn test_missing_input_file_is_io_error() {
        let err = load_document_from_path(Path::new("/nonexistent/hotelrates.json")).unwrap_err();
        assert_eq!(err.kind(), EnumRatesErrorKind::Io);
    }

    #[test]
    fn test_invalid_json_text_is_malformed() {
        let err = load_document_from_str("{\"hotel\": ").unwrap_err();
        assert_eq!(err.kind(), EnumRatesErrorKind::MalformedInput);
    }
}

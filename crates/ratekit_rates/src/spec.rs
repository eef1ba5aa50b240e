//! Rate record model, conversion options and error types.

use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use ratekit_io_xlsx::{SpecColumn, SpecXlsxWriteOptions, TabularRecord, XlsxWriteError};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::conf::{C_FILE_STEM_FALLBACK, TUP_FILE_NAME_ILLEGAL, TUP_RATE_COLUMNS};

////////////////////////////////////////////////////////////////////////////////
// #region RateModel

/// One flattened rate offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateRecord {
    /// Night of arrival (`targetDay`).
    pub arrival_date: NaiveDate,
    /// Arrival plus length of stay.
    pub departure_date: NaiveDate,
    /// Offer price, fixed-point.
    pub price: Decimal,
    /// ISO currency code.
    pub currency: String,
    /// Rate plan name.
    pub rate_name: String,
    /// Number of adults the offer is priced for.
    pub adults: i64,
    /// `1` when a truthy breakfast tag is present, else `0`.
    pub breakfast_included: u8,
}

impl TabularRecord for RateRecord {
    fn columns() -> Vec<SpecColumn<Self>> {
        let [
            c_arrival,
            c_departure,
            c_price,
            c_currency,
            c_rate_name,
            c_adults,
            c_breakfast,
        ] = TUP_RATE_COLUMNS;
        vec![
            SpecColumn::<Self>::text(c_arrival, |rate| rate.arrival_date.to_string()),
            SpecColumn::<Self>::text(c_departure, |rate| rate.departure_date.to_string()),
            SpecColumn::<Self>::decimal(c_price, |rate| rate.price.to_string()),
            SpecColumn::<Self>::text(c_currency, |rate| rate.currency.clone()),
            SpecColumn::<Self>::text(c_rate_name, |rate| rate.rate_name.clone()),
            SpecColumn::<Self>::integer(c_adults, |rate| rate.adults.to_string()),
            SpecColumn::<Self>::integer(c_breakfast, |rate| {
                rate.breakfast_included.to_string()
            }),
        ]
    }
}

/// Top-level `hotel` header fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HotelHeader {
    /// `hotel.hotelID`, rendered as text.
    pub hotel_id: String,
    /// `hotel.name`.
    pub name: String,
}

impl HotelHeader {
    /// Output file name hint: `<hotelID>_<name>.xlsx`, filesystem-safe.
    pub fn file_hint(&self) -> String {
        let c_stem: String = format!("{}_{}", self.hotel_id.trim(), self.name.trim())
            .chars()
            .map(|chr| {
                if chr.is_control() || TUP_FILE_NAME_ILLEGAL.contains(&chr) {
                    '_'
                } else {
                    chr
                }
            })
            .collect();
        let c_stem = c_stem.trim_matches(|chr: char| chr == '_' || chr == '.' || chr == ' ');
        let c_stem = if c_stem.is_empty() {
            C_FILE_STEM_FALLBACK
        } else {
            c_stem
        };
        format!("{c_stem}.{}", ratekit_io_xlsx::C_XLSX_EXTENSION)
    }
}

/// Extractor output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExtractedRates {
    /// Hotel header fields.
    pub hotel: HotelHeader,
    /// One record per offer, in document order.
    pub rates: Vec<RateRecord>,
}

impl ExtractedRates {
    /// See [`HotelHeader::file_hint`].
    pub fn file_hint(&self) -> String {
        self.hotel.file_hint()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Where the workbook goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecRatesDestination {
    /// Exact output file path.
    File(PathBuf),
    /// Directory; the file name is derived from the hotel header.
    Directory(PathBuf),
}

/// Conversion options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecConvertOptions {
    /// Options forwarded to the XLSX writer.
    pub write_options: SpecXlsxWriteOptions,
    /// Minimum decimal places for prices; extra source digits are kept.
    pub price_scale: u32,
}

impl Default for SpecConvertOptions {
    fn default() -> Self {
        crate::conf::derive_default_convert_options()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Errors

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRatesErrorKind {
    /// Required JSON field absent, of the wrong shape, or not JSON at all.
    MalformedInput,
    /// Date/number/boolean value present but unparsable.
    TypeConversion,
    /// Source unreadable or destination unwritable.
    Io,
    /// Workbook could not be assembled.
    Output,
}

impl EnumRatesErrorKind {
    /// Stable snake-case code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MalformedInput => "malformed_input",
            Self::TypeConversion => "type_conversion",
            Self::Io => "io",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for EnumRatesErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conversion failure. No output file exists when one is returned.
#[derive(Debug, Error)]
pub enum RatesError {
    /// JSON text could not be parsed.
    #[error("Invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    /// Required field absent or of the wrong shape.
    #[error("Malformed input at `{path}`: expected {expected}")]
    MalformedInput {
        /// JSON path of the offending field.
        path: String,
        /// Expected shape description.
        expected: String,
    },
    /// Value present but not convertible.
    #[error("Cannot convert `{path}` value {value} to {target}")]
    TypeConversion {
        /// JSON path of the offending field.
        path: String,
        /// Offending JSON value, as JSON text.
        value: String,
        /// Target type description.
        target: String,
    },
    /// Input file unreadable.
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        /// Input path.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Workbook write failed.
    #[error(transparent)]
    Write(#[from] XlsxWriteError),
}

impl RatesError {
    /// Build a [`RatesError::MalformedInput`].
    pub fn malformed(path: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MalformedInput {
            path: path.into(),
            expected: expected.into(),
        }
    }

    /// Build a [`RatesError::TypeConversion`].
    pub fn conversion(
        path: impl Into<String>,
        value: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self::TypeConversion {
            path: path.into(),
            value: value.into(),
            target: target.into(),
        }
    }

    /// Error category.
    pub fn kind(&self) -> EnumRatesErrorKind {
        match self {
            Self::Json(err) if err.is_io() => EnumRatesErrorKind::Io,
            Self::Json(_) | Self::MalformedInput { .. } => EnumRatesErrorKind::MalformedInput,
            Self::TypeConversion { .. } => EnumRatesErrorKind::TypeConversion,
            Self::Io { .. } => EnumRatesErrorKind::Io,
            Self::Write(XlsxWriteError::Io { .. } | XlsxWriteError::Stream(_)) => {
                EnumRatesErrorKind::Io
            }
            Self::Write(XlsxWriteError::NumericCell { .. }) => EnumRatesErrorKind::TypeConversion,
            Self::Write(_) => EnumRatesErrorKind::Output,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_hint_joins_id_and_name() {
        let hotel = HotelHeader {
            hotel_id: "7294".to_string(),
            name: "Hotel Adlon".to_string(),
        };
        assert_eq!(hotel.file_hint(), "7294_Hotel Adlon.xlsx");
    }

    #[test]
    fn test_file_hint_replaces_path_separators() {
        let hotel = HotelHeader {
            hotel_id: "12".to_string(),
            name: "A/B: C?".to_string(),
        };
        assert_eq!(hotel.file_hint(), "12_A_B_ C.xlsx");

        assert_eq!(HotelHeader::default().file_hint(), "hotel_rates.xlsx");
    }

    #[test]
    fn test_rate_record_columns_follow_declared_order() {
        let l_names: Vec<&str> = RateRecord::columns().iter().map(|col| col.name).collect();
        assert_eq!(l_names, TUP_RATE_COLUMNS.to_vec());

        let l_numeric: Vec<bool> = RateRecord::columns()
            .iter()
            .map(|col| col.kind.is_numeric())
            .collect();
        assert_eq!(
            l_numeric,
            vec![false, false, true, false, false, true, true]
        );
    }

    #[test]
    fn test_error_kind_codes() {
        assert_eq!(
            RatesError::malformed("hotelRates", "array").kind(),
            EnumRatesErrorKind::MalformedInput
        );
        assert_eq!(
            RatesError::conversion("hotelRates[0].los", "\"x\"", "integer")
                .kind()
                .as_str(),
            "type_conversion"
        );
        let err_json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(
            RatesError::from(err_json).kind(),
            EnumRatesErrorKind::MalformedInput
        );
    }
}

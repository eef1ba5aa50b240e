//! `ratekit_rates` v1:
//! Hotel rate JSON to single-sheet XLSX conversion.
//!
//! Modules:
//! - `conf`    : constants and default presets
//! - `spec`    : rate record, options and errors
//! - `util`    : path-aware JSON field readers
//! - `extract` : JSON document to rate records
//! - `convert` : input/output entry points
//! - `report`  : conversion report model
pub mod conf;
pub mod convert;
pub mod extract;
pub mod report;
pub mod spec;
pub mod util;

pub use conf::{
    C_SHEET_NAME_RATES, N_PRICE_SCALE_DEFAULT, TUP_RATE_COLUMNS, derive_default_convert_options,
};
pub use convert::{
    convert_json_path, convert_json_reader, convert_json_str, convert_json_value,
    convert_json_value_to_writer, load_document_from_path, load_document_from_reader,
    load_document_from_str, resolve_destination_path,
};
pub use extract::{extract_rates, extract_rates_with_scale};
pub use report::ReportConvert;
pub use spec::{
    EnumRatesErrorKind, ExtractedRates, HotelHeader, RateRecord, RatesError, SpecConvertOptions,
    SpecRatesDestination,
};

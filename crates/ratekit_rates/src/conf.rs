//! Rate conversion constants and default preset factories.

use ratekit_io_xlsx::{SpecXlsxWriteOptions, derive_default_xlsx_write_options};

use crate::spec::SpecConvertOptions;

/// Worksheet name used for rate tables.
pub const C_SHEET_NAME_RATES: &str = "Rates";
/// Minimum decimal places for prices.
pub const N_PRICE_SCALE_DEFAULT: u32 = 2;
/// Tag name marking a breakfast-inclusive offer (compared case-insensitively).
pub const C_TAG_NAME_BREAKFAST: &str = "breakfast";
/// Characters replaced when deriving a file name from hotel header fields.
pub const TUP_FILE_NAME_ILLEGAL: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
/// File stem used when hotel header fields sanitize to nothing.
pub const C_FILE_STEM_FALLBACK: &str = "hotel_rates";

/// Header names of the rate sheet, in column order.
pub const TUP_RATE_COLUMNS: [&str; 7] = [
    "ARRIVAL_DATE",
    "DEPARTURE_DATE",
    "PRICE",
    "CURRENCY",
    "RARENAME",
    "ADULTS",
    "BREAKFAST_INCLUDED",
];

/// Build default conversion options.
pub fn derive_default_convert_options() -> SpecConvertOptions {
    SpecConvertOptions {
        write_options: SpecXlsxWriteOptions {
            sheet_name: C_SHEET_NAME_RATES.to_string(),
            ..derive_default_xlsx_write_options()
        },
        price_scale: N_PRICE_SCALE_DEFAULT,
    }
}

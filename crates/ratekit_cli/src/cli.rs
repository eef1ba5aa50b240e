use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ratekit_io_xlsx::EnumNumericParsePolicy;
use ratekit_rates::{SpecConvertOptions, SpecRatesDestination, derive_default_convert_options};

pub const C_INPUT_STDIN: &str = "-";

pub const CONVERT_AFTER_HELP: &str = "\
Input:
  <INPUT> is a hotel rates JSON file. Use `-` to read stdin.

Output:
  Without --output the workbook goes into --output-dir (default `.`),
  named `<hotelID>_<name>.xlsx` after the hotel header.
  The file is written atomically; a failed run leaves no file behind.

Columns:
  ARRIVAL_DATE, DEPARTURE_DATE, PRICE, CURRENCY, RARENAME, ADULTS, BREAKFAST_INCLUDED
";

#[derive(Debug, Parser)]
#[command(
    name = "hotel-rates-xlsx",
    version,
    about = "convert a hotel rates JSON document into a single-sheet xlsx workbook",
    after_long_help = CONVERT_AFTER_HELP
)]
pub struct Cli {
    /// Hotel rates JSON file, or `-` for stdin
    pub input: String,
    /// Exact output workbook path
    #[arg(long, short = 'o', conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,
    /// Directory for the derived `<hotelID>_<name>.xlsx` file
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
    /// Worksheet name (illegal characters are replaced with `_`)
    #[arg(long)]
    pub sheet_name: Option<String>,
    /// What to do with numeric cells that do not parse as numbers
    #[arg(long, value_enum, default_value_t = NumericErrorArg::Skip)]
    pub on_numeric_error: NumericErrorArg,
    /// Emit the conversion report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NumericErrorArg {
    /// Leave the cell empty and report it
    Skip,
    /// Write the raw text and report it
    Text,
    /// Abort the conversion
    Error,
}

impl From<NumericErrorArg> for EnumNumericParsePolicy {
    fn from(value: NumericErrorArg) -> Self {
        match value {
            NumericErrorArg::Skip => EnumNumericParsePolicy::SkipAndWarn,
            NumericErrorArg::Text => EnumNumericParsePolicy::WriteAsText,
            NumericErrorArg::Error => EnumNumericParsePolicy::Error,
        }
    }
}

impl Cli {
    pub fn is_stdin(&self) -> bool {
        self.input == C_INPUT_STDIN
    }

    pub fn destination(&self) -> SpecRatesDestination {
        match (&self.output, &self.output_dir) {
            (Some(path), _) => SpecRatesDestination::File(path.clone()),
            (None, Some(dir)) => SpecRatesDestination::Directory(dir.clone()),
            (None, None) => SpecRatesDestination::Directory(PathBuf::from(".")),
        }
    }

    pub fn convert_options(&self) -> SpecConvertOptions {
        let mut options = derive_default_convert_options();
        if let Some(sheet_name) = &self.sheet_name {
            options.write_options.sheet_name = sheet_name.clone();
        }
        options.write_options.numeric_parse_policy = self.on_numeric_error.into();
        options
    }
}

#[cfg(test)]
pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

mod cli;
mod stdout_io;

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::{Parser, error::ErrorKind};
use ratekit_rates::{RatesError, ReportConvert, convert_json_path, convert_json_reader};
use stdout_io::{write_stderr_line, write_stdout_line};

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(code) => code,
    }
}

fn run() -> Result<ExitCode, ExitCode> {
    let cli = match cli::Cli::try_parse() {
        Ok(value) => value,
        Err(err) => {
            if matches!(
                err.kind(),
                ErrorKind::DisplayHelp
                    | ErrorKind::DisplayVersion
                    | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
            ) {
                if write_stdout_line(err.to_string().trim_end()).is_err() {
                    return Err(ExitCode::from(2));
                }
                return Ok(ExitCode::SUCCESS);
            }
            let _ = write_stderr_line(err.to_string().trim_end());
            return Err(ExitCode::from(2));
        }
    };

    match convert(&cli) {
        Ok(report) => {
            if print_success(&report, cli.json).is_err() {
                return Err(ExitCode::from(2));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(error) => {
            if print_failure(&error).is_err() {
                return Err(ExitCode::from(2));
            }
            Err(ExitCode::from(1))
        }
    }
}

fn convert(cli: &cli::Cli) -> Result<ReportConvert, RatesError> {
    let destination = cli.destination();
    let options = cli.convert_options();
    if cli.is_stdin() {
        convert_json_reader(io::stdin().lock(), &destination, &options)
    } else {
        convert_json_path(Path::new(&cli.input), &destination, &options)
    }
}

fn print_success(report: &ReportConvert, if_json: bool) -> io::Result<()> {
    let (l_stderr, c_stdout) = render_success(report, if_json).map_err(io::Error::other)?;
    for line in &l_stderr {
        write_stderr_line(line)?;
    }
    write_stdout_line(&c_stdout)
}

/// Stderr lines (one per warning) and the stdout body for a finished run.
fn render_success(
    report: &ReportConvert,
    if_json: bool,
) -> Result<(Vec<String>, String), serde_json::Error> {
    let l_stderr = report
        .warnings()
        .iter()
        .map(|warning| format!("warning: {warning}"))
        .collect();
    let c_stdout = if if_json {
        serde_json::to_string_pretty(&report.to_json())?
    } else {
        report.to_string()
    };
    Ok((l_stderr, c_stdout))
}

fn print_failure(error: &RatesError) -> io::Result<()> {
    write_stderr_line(&format_failure(error))
}

fn format_failure(error: &RatesError) -> String {
    format!("error[{}]: {error}", error.kind())
}

#[cfg(test)]
mod tests {
    use ratekit_io_xlsx::SpecXlsxReport;
    use ratekit_rates::{RatesError, ReportConvert};

    use super::{format_failure, render_success};

    fn report_with_warning() -> ReportConvert {
        let mut report_xlsx = SpecXlsxReport {
            sheet_name: "Rates".to_string(),
            n_rows_data: 1,
            ..Default::default()
        };
        report_xlsx.warn("Cell C2 in numeric column \"PRICE\" skipped");
        ReportConvert {
            report_xlsx,
            ..Default::default()
        }
    }

    #[test]
    fn test_warnings_reach_stderr_in_both_modes() {
        for if_json in [false, true] {
            let (l_stderr, c_stdout) = render_success(&report_with_warning(), if_json).unwrap();
            assert_eq!(
                l_stderr,
                vec!["warning: Cell C2 in numeric column \"PRICE\" skipped".to_string()]
            );
            if if_json {
                let value: serde_json::Value = serde_json::from_str(&c_stdout).unwrap();
                assert_eq!(value["rates"], 1);
                assert_eq!(value["warnings"].as_array().map(Vec::len), Some(1));
            } else {
                assert!(c_stdout.starts_with("[RATES] "));
                assert!(c_stdout.ends_with("warnings=1"));
            }
        }
    }

    #[test]
    fn test_failure_line_names_error_kind() {
        let error = RatesError::malformed("hotelRates", "a required field");
        let line = format_failure(&error);
        assert!(line.starts_with("error[malformed_input]: "));
        assert!(line.contains("`hotelRates`"));
    }
}

//! Conversion report model.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use ratekit_io_xlsx::SpecXlsxReport;
use serde_json::{Value, json};

use crate::spec::HotelHeader;

/// Outcome of one successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportConvert {
    /// Written file; `None` when the workbook went to a stream.
    pub path_out: Option<PathBuf>,
    /// Hotel header fields of the source document.
    pub hotel: HotelHeader,
    /// Writer report for the rate sheet.
    pub report_xlsx: SpecXlsxReport,
}

impl ReportConvert {
    /// Number of rate rows written.
    pub fn rate_count(&self) -> usize {
        self.report_xlsx.n_rows_data
    }

    /// Non-fatal warnings from the writer.
    pub fn warnings(&self) -> &[String] {
        &self.report_xlsx.warnings
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = self.report_xlsx.to_dict();
        dict_counts.insert("cnt_rates".to_string(), self.rate_count() as u64);
        dict_counts
    }

    /// JSON rendering for machine consumers.
    pub fn to_json(&self) -> Value {
        json!({
            "file_out": self.path_out.as_ref().map(|path| path.display().to_string()),
            "hotel": {
                "hotel_id": self.hotel.hotel_id,
                "name": self.hotel.name,
            },
            "sheet_name": self.report_xlsx.sheet_name,
            "columns": self.report_xlsx.columns,
            "rates": self.rate_count(),
            "bytes": self.report_xlsx.n_bytes,
            "cells_skipped": self
                .report_xlsx
                .cells_skipped
                .iter()
                .map(|cell| json!({
                    "cell": cell.cell_ref,
                    "column": cell.column,
                    "text": cell.text,
                }))
                .collect::<Vec<_>>(),
            "warnings": self.report_xlsx.warnings,
        })
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        let c_target = match &self.path_out {
            Some(path) => path.display().to_string(),
            None => "<stream>".to_string(),
        };
        let dict_counts = self.to_dict();
        format!(
            "{prefix} hotel={} rates={} file={c_target} skipped={} warnings={}",
            self.hotel.hotel_id,
            dict_counts["cnt_rates"],
            dict_counts["cnt_skipped"],
            dict_counts["cnt_warnings"]
        )
    }
}

impl fmt::Display for ReportConvert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[RATES]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_convert_format_and_json() {
        let report = ReportConvert {
            path_out: Some(PathBuf::from("out/7294_Adlon.xlsx")),
            hotel: HotelHeader {
                hotel_id: "7294".to_string(),
                name: "Adlon".to_string(),
            },
            report_xlsx: SpecXlsxReport {
                sheet_name: "Rates".to_string(),
                columns: vec!["ARRIVAL_DATE".to_string()],
                n_rows_data: 3,
                n_bytes: 10,
                cells_skipped: vec![],
                warnings: vec![],
            },
        };

        assert_eq!(
            report.to_string(),
            "[RATES] hotel=7294 rates=3 file=out/7294_Adlon.xlsx skipped=0 warnings=0"
        );

        let value = report.to_json();
        assert_eq!(value["rates"], 3);
        assert_eq!(value["hotel"]["name"], "Adlon");
        assert_eq!(value["file_out"], "out/7294_Adlon.xlsx");
    }

    #[test]
    fn test_stream_report_has_no_file() {
        let report = ReportConvert::default();
        assert!(report.format("[RATES]").contains("file=<stream>"));
        assert!(report.to_json()["file_out"].is_null());
    }
}

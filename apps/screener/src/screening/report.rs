//! Report export: turns the ranked shortlist into a downloadable document.
//!
//! `AppState` holds an `Arc<dyn ReportExporter>` so the document format can be
//! swapped without touching the handler. Default: `JsonReportExporter`.

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::screening::ranker::ShortlistRow;

pub const REPORT_TITLE: &str = "ATS Resume Shortlist Report";

/// A rendered document ready to be served as an attachment.
#[derive(Debug, Clone)]
pub struct Report {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

pub trait ReportExporter: Send + Sync {
    fn export(&self, rows: &[ShortlistRow], generated_on: NaiveDate) -> Result<Report, AppError>;
}

pub struct JsonReportExporter;

#[derive(Serialize)]
struct ShortlistDocument<'a> {
    title: &'static str,
    generated_on: NaiveDate,
    rows: &'a [ShortlistRow],
}

impl ReportExporter for JsonReportExporter {
    fn export(&self, rows: &[ShortlistRow], generated_on: NaiveDate) -> Result<Report, AppError> {
        let document = ShortlistDocument {
            title: REPORT_TITLE,
            generated_on,
            rows,
        };
        let bytes = serde_json::to_vec_pretty(&document).context("Failed to render shortlist")?;

        Ok(Report {
            file_name: "ats_shortlist_report.json".to_string(),
            content_type: "application/json",
            bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn test_json_report_contents() {
        let rows = vec![
            ShortlistRow {
                rank: 1,
                file_name: "b.pdf".to_string(),
                score: 91,
            },
            ShortlistRow {
                rank: 2,
                file_name: "a.pdf".to_string(),
                score: 74,
            },
        ];
        let date = NaiveDate::from_ymd_opt(2026, 3, 14).unwrap();

        let report = JsonReportExporter.export(&rows, date).unwrap();
        assert_eq!(report.file_name, "ats_shortlist_report.json");
        assert_eq!(report.content_type, "application/json");

        let value: Value = serde_json::from_slice(&report.bytes).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "ATS Resume Shortlist Report",
                "generated_on": "2026-03-14",
                "rows": [
                    {"rank": 1, "file_name": "b.pdf", "score": 91},
                    {"rank": 2, "file_name": "a.pdf", "score": 74}
                ]
            })
        );
    }

    #[test]
    fn test_empty_shortlist_still_exports() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let report = JsonReportExporter.export(&[], date).unwrap();
        let value: Value = serde_json::from_slice(&report.bytes).unwrap();
        assert_eq!(value["rows"], json!([]));
    }
}

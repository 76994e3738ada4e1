use crate::analytics::AnalyticsReport;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Json => "application/json",
            ExportFormat::Csv => "text/csv; charset=utf-8",
        }
    }
}

pub fn file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "resilience-analytics-{}.{}",
        date.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn render(report: &AnalyticsReport, format: ExportFormat) -> Result<String, serde_json::Error> {
    match format {
        ExportFormat::Json => serde_json::to_string_pretty(report),
        ExportFormat::Csv => Ok(to_csv(report)),
    }
}

pub fn to_csv(report: &AnalyticsReport) -> String {
    let mut out = String::from("Challenge Name,Completion Rate (%)\n");
    for rate in &report.completion_rates {
        let _ = writeln!(out, "{},{}", csv_field(&rate.name), rate.percentage);
    }
    out.push_str("\nDate,Completed Challenges\n");
    for day in &report.daily_completion {
        let _ = writeln!(out, "{},{}", day.date, day.completed);
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

use anyhow::{anyhow, Result};

use crate::models::weekly_report::WeeklyReport;

/// Column order of the weekly report CSV export.
pub const EXPORT_COLUMNS: [&str; 14] = [
    "id",
    "week_start",
    "week_end",
    "interviews",
    "ads_posted",
    "registrations",
    "full_days",
    "stress_level",
    "overtime",
    "messages",
    "tickets_resolved",
    "orders",
    "hiring_issues",
    "created_at",
];

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn export_row(r: &WeeklyReport) -> [String; 14] {
    [
        r.id.to_string(),
        r.week_start.to_string(),
        r.week_end.to_string(),
        cell(r.interviews),
        cell(r.ads_posted),
        cell(r.registrations),
        cell(r.full_days),
        cell(r.stress_level),
        cell(r.overtime),
        cell(r.messages),
        cell(r.tickets_resolved),
        cell(r.orders),
        cell(r.hiring_issues.as_deref()),
        r.created_at.to_rfc3339(),
    ]
}

/// Encodes reports as CSV, newest (highest id) first, nulls as empty cells.
pub fn encode_csv(reports: &[WeeklyReport]) -> Result<String> {
    let mut ordered: Vec<&WeeklyReport> = reports.iter().collect();
    ordered.sort_by(|a, b| b.id.cmp(&a.id));

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_COLUMNS)?;
    for report in ordered {
        writer.write_record(export_row(report))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("failed to flush CSV export: {}", e.error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// `Content-Disposition` filename for an export, optionally scoped to a week.
pub fn export_filename(week_iso: Option<&str>) -> String {
    match week_iso {
        Some(week) => format!("weekly_reports_{week}.csv"),
        None => "weekly_reports.csv".to_string(),
    }
}

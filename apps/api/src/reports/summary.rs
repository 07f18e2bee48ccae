use serde::{Deserialize, Serialize};

use crate::models::weekly_report::WeeklyReport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub count: usize,
    pub interviews: i64,
    pub registrations: i64,
    pub messages: i64,
    pub tickets_resolved: i64,
    pub orders: i64,
    pub avg_stress: f64,
}

fn sum_field(reports: &[WeeklyReport], field: impl Fn(&WeeklyReport) -> Option<i32>) -> i64 {
    reports
        .iter()
        .map(|r| i64::from(field(r).unwrap_or(0)))
        .sum()
}

/// Two decimal places, ties to even (1.125 -> 1.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Sums the headline metrics over `reports` and averages stress.
///
/// Null metrics count as 0, including in the stress average. This is a full
/// scan over whatever the store returned; nothing is cached between calls.
pub fn summarize(reports: &[WeeklyReport]) -> ReportSummary {
    let count = reports.len();
    if count == 0 {
        return ReportSummary::default();
    }

    let stress_total = sum_field(reports, |r| r.stress_level);

    ReportSummary {
        count,
        interviews: sum_field(reports, |r| r.interviews),
        registrations: sum_field(reports, |r| r.registrations),
        messages: sum_field(reports, |r| r.messages),
        tickets_resolved: sum_field(reports, |r| r.tickets_resolved),
        orders: sum_field(reports, |r| r.orders),
        avg_stress: round2(stress_total as f64 / count as f64),
    }
}

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WeekParseError {
    #[error("expected an ISO week like 2024-W01, got '{0}'")]
    Format(String),

    #[error("week {week} does not exist in ISO year {year}")]
    OutOfRange { year: i32, week: u32 },
}

/// The Monday..=Sunday calendar range of one ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn from_iso_week(year: i32, week: u32) -> Result<Self, WeekParseError> {
        let start = NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
            .ok_or(WeekParseError::OutOfRange { year, week })?;
        let end = start
            .checked_add_days(Days::new(6))
            .ok_or(WeekParseError::OutOfRange { year, week })?;
        Ok(Self { start, end })
    }

    /// A report belongs to the week its `week_start` falls in.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl FromStr for WeekRange {
    type Err = WeekParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let format_err = || WeekParseError::Format(trimmed.to_string());

        let (year, week) = trimmed.split_once("-W").ok_or_else(format_err)?;
        if year.len() != 4 || week.len() != 2 {
            return Err(format_err());
        }
        if !year.chars().chain(week.chars()).all(|c| c.is_ascii_digit()) {
            return Err(format_err());
        }

        let year: i32 = year.parse().map_err(|_| format_err())?;
        let week: u32 = week.parse().map_err(|_| format_err())?;
        Self::from_iso_week(year, week)
    }
}

impl fmt::Display for WeekRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iso = self.start.iso_week();
        write!(f, "{}-W{:02}", iso.year(), iso.week())
    }
}

pub mod country_report;
pub mod profile;
pub mod weekly_report;

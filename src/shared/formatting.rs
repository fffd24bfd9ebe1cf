//! Display helpers for spot lists and detail views.
//!
//! Dates use the short German style (`18.10.26`, `18.10.26, 14:05`).
//! Timestamps from the backend are shown in the local time zone.

use chrono::{DateTime, Local, TimeZone};

use crate::features::spots::models::{SpotSeverity, SpotStatus, SpotType};
use crate::shared::constants::{
    SEVERITY_HIGH_COLOR, SEVERITY_LOW_COLOR, SEVERITY_MEDIUM_COLOR, SEVERITY_VERY_HIGH_COLOR,
    STATUS_ACTIVE_COLOR, STATUS_INACTIVE_COLOR, STATUS_PENDING_COLOR,
};

/// Placeholder shown for missing or unparsable dates
pub const MISSING_VALUE: &str = "-";

pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d.%m.%y").to_string()
}

pub fn format_date_time<Tz: TimeZone>(date: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    date.format("%d.%m.%y, %H:%M").to_string()
}

fn parse_local(raw: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|date| date.with_timezone(&Local))
}

/// Format an RFC 3339 timestamp as a local short date, `-` if it does not parse
pub fn format_date_str(raw: &str) -> String {
    parse_local(raw)
        .map(|date| format_date(&date))
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Format an RFC 3339 timestamp as local short date and time, `-` if it does
/// not parse
pub fn format_date_time_str(raw: &str) -> String {
    parse_local(raw)
        .map(|date| format_date_time(&date))
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

/// Local short date and time for an optional timestamp
pub fn format_optional_date_time<Tz: TimeZone>(date: Option<&DateTime<Tz>>) -> String {
    date.map(|date| format_date_time(&date.with_timezone(&Local)))
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

pub fn severity_color(severity: SpotSeverity) -> &'static str {
    match severity {
        SpotSeverity::Low => SEVERITY_LOW_COLOR,
        SpotSeverity::Medium => SEVERITY_MEDIUM_COLOR,
        SpotSeverity::High => SEVERITY_HIGH_COLOR,
        SpotSeverity::VeryHigh => SEVERITY_VERY_HIGH_COLOR,
    }
}

pub fn status_color(status: SpotStatus) -> &'static str {
    match status {
        SpotStatus::Active => STATUS_ACTIVE_COLOR,
        SpotStatus::Inactive => STATUS_INACTIVE_COLOR,
        SpotStatus::Pending => STATUS_PENDING_COLOR,
    }
}

pub fn status_text(status: SpotStatus) -> &'static str {
    match status {
        SpotStatus::Active => "Active",
        SpotStatus::Inactive => "Inactive",
        SpotStatus::Pending => "Pending",
    }
}

pub fn type_label(spot_type: SpotType) -> &'static str {
    match spot_type {
        SpotType::Construction => "Construction",
        SpotType::Uneven => "Uneven",
        SpotType::Narrow => "Narrow",
        SpotType::Danger => "Danger",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_date() {
        let date = Utc.with_ymd_and_hms(2024, 3, 7, 14, 5, 0).unwrap();
        assert_eq!(format_date(&date), "07.03.24");
        assert_eq!(format_date_time(&date), "07.03.24, 14:05");
    }

    #[test]
    fn test_format_keeps_given_offset() {
        let date = DateTime::parse_from_rfc3339("2024-12-31T23:30:00+01:00").unwrap();
        assert_eq!(format_date_time(&date), "31.12.24, 23:30");
        assert_eq!(format_date(&date), "31.12.24");
    }

    #[test]
    fn test_format_str_renders_local_time() {
        let raw = "2024-06-30T22:15:00Z";
        let local = Utc
            .with_ymd_and_hms(2024, 6, 30, 22, 15, 0)
            .unwrap()
            .with_timezone(&Local);

        assert_eq!(format_date_time_str(raw), local.format("%d.%m.%y, %H:%M").to_string());
        assert_eq!(format_date_str(raw), local.format("%d.%m.%y").to_string());
        assert_eq!(
            format_optional_date_time(Some(&local.with_timezone(&Utc))),
            format_date_time_str(raw)
        );
    }

    #[test]
    fn test_invalid_dates_render_placeholder() {
        assert_eq!(format_date_str("yesterday"), "-");
        assert_eq!(format_date_time_str(""), "-");
        assert_eq!(format_optional_date_time::<Utc>(None), "-");
    }

    #[test]
    fn test_severity_colors() {
        assert_eq!(severity_color(SpotSeverity::Low), "#FACC15");
        assert_eq!(severity_color(SpotSeverity::Medium), "#FB923C");
        assert_eq!(severity_color(SpotSeverity::High), "#F87171");
        assert_eq!(severity_color(SpotSeverity::VeryHigh), "#C084FC");
    }

    #[test]
    fn test_status_color_and_text() {
        assert_eq!(status_color(SpotStatus::Active), "#BBF7D0");
        assert_eq!(status_color(SpotStatus::Inactive), "#FECACA");
        assert_eq!(status_color(SpotStatus::Pending), "#FEF08A");
        assert_eq!(status_text(SpotStatus::Active), "Active");
        assert_eq!(status_text(SpotStatus::Inactive), "Inactive");
        assert_eq!(status_text(SpotStatus::Pending), "Pending");
    }

    #[test]
    fn test_type_label() {
        assert_eq!(type_label(SpotType::Construction), "Construction");
        assert_eq!(type_label(SpotType::Danger), "Danger");
    }
}

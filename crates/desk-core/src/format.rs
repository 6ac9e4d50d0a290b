//! Display formatting for durations, timestamps and call summaries

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::models::{Call, CallStatus};

/// Shown in place of a duration that has not been recorded yet
pub const DURATION_PLACEHOLDER: &str = "--:--";

/// `m:ss`, or the placeholder when there is no duration
pub fn format_duration(seconds: Option<u32>) -> String {
    match seconds {
        None => DURATION_PLACEHOLDER.to_string(),
        Some(s) => format!("{}:{:02}", s / 60, s % 60),
    }
}

/// `3m 15s`, used for dashboard averages
pub fn format_minutes_seconds(seconds: u32) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

/// Short date plus 12-hour time in the host's local zone, e.g. `Oct 16, 3:04 PM`
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%b %-d, %-I:%M %p").to_string()
}

/// 12-hour clock time only, e.g. `3:04:05 PM`
pub fn format_clock_time_in<Tz>(timestamp: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(tz).format("%-I:%M:%S %p").to_string()
}

pub fn format_clock_time(timestamp: &DateTime<Utc>) -> String {
    format_clock_time_in(timestamp, &Local)
}

/// Relative age of `then`, rounded down to whole minutes or hours
pub fn format_time_since(then: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let minutes = (*now - *then).num_minutes();

    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes == 1 {
        return "1 minute ago".to_string();
    }
    if minutes < 60 {
        return format!("{} minutes ago", minutes);
    }

    match minutes / 60 {
        1 => "1 hour ago".to_string(),
        hours => format!("{} hours ago", hours),
    }
}

/// Axis label for an hour bucket
pub fn format_hour(hour: u8) -> String {
    format!("{}:00", hour)
}

/// Mock numbers already arrive formatted
pub fn format_phone_number(number: &str) -> String {
    number.to_string()
}

/// First letter of each word, e.g. `John Smith` -> `JS`
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Right-hand column of the recent-calls card
pub fn recent_call_summary(call: &Call) -> String {
    match (call.status, call.duration) {
        (CallStatus::Active, _) => "Active".to_string(),
        (CallStatus::Waiting, _) => "Waiting".to_string(),
        (_, Some(d)) => format_duration(Some(d)),
        (_, None) => "Missed".to_string(),
    }
}

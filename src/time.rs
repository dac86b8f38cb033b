//! Time conversions and human-readable relative durations.

use chrono::{DateTime, Duration, Utc};

pub type ServerTime = DateTime<Utc>;

/// Converts a unix timestamp from Steam into a [`ServerTime`]. Steam reports missing values as
/// `0`, which is treated as absent.
pub fn timestamp_to_server_time(timestamp: i64) -> Option<ServerTime> {
    if timestamp <= 0 {
        return None;
    }

    DateTime::from_timestamp(timestamp, 0)
}

pub fn get_server_time_now() -> ServerTime {
    Utc::now()
}

/// Describes a duration the way people say it, e.g. "a few seconds", "3 hours", "a year".
pub fn humanize(duration: Duration) -> String {
    let seconds = duration.num_seconds().abs();
    let minutes = (seconds as f64 / 60.0).round() as i64;
    let hours = (seconds as f64 / 3_600.0).round() as i64;
    let days = (seconds as f64 / 86_400.0).round() as i64;

    match seconds {
        0..=44 => "a few seconds".into(),
        45..=89 => "a minute".into(),
        90..=2_699 => format!("{minutes} minutes"),
        2_700..=5_399 => "an hour".into(),
        5_400..=79_199 => format!("{hours} hours"),
        79_200..=129_599 => "a day".into(),
        129_600..=2_246_399 => format!("{days} days"),
        2_246_400..=3_887_999 => "a month".into(),
        3_888_000..=27_647_999 => format!("{} months", (days as f64 / 30.4).round() as i64),
        27_648_000..=47_347_199 => "a year".into(),
        _ => format!("{} years", (days as f64 / 365.25).round() as i64),
    }
}

/// Relative time from `then` to `now`, e.g. "5 minutes ago" or "in 2 days".
pub fn time_ago(then: ServerTime, now: ServerTime) -> String {
    let elapsed = now.signed_duration_since(then);

    if elapsed < Duration::zero() {
        format!("in {}", humanize(elapsed))
    } else {
        format!("{} ago", humanize(elapsed))
    }
}

/// Relative time from `then` to `now` without a suffix, e.g. "5 years".
pub fn time_since(then: ServerTime, now: ServerTime) -> String {
    humanize(now.signed_duration_since(then))
}

use chrono::{DateTime, Local};
use std::time::Duration;

pub struct TimeUtils;

impl TimeUtils {
    pub const CLOCK_FORMAT: &str = "%H:%M:%S";

    /// "14:03:22" style local clock string.
    pub fn clock_string(at: &DateTime<Local>) -> String {
        at.format(Self::CLOCK_FORMAT).to_string()
    }

    /// Compact age for status lines: "850ms", "12s", "3m", "2h".
    pub fn format_age(age: Duration) -> String {
        let millis = age.as_millis();
        if millis < 1_000 {
            return format!("{}ms", millis);
        }

        let seconds = age.as_secs();
        if seconds < 60 {
            format!("{}s", seconds)
        } else if seconds < 3_600 {
            format!("{}m", seconds / 60)
        } else {
            format!("{}h", seconds / 3_600)
        }
    }
}

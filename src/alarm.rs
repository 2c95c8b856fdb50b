use std::fmt;

use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type AlarmId = u64;

#[inline]
#[must_use]
pub const fn always_true() -> bool {
    true
}

/// represents a stored alarm
/// the id is stable for the lifetime of the alarm, the rest is what the user can toggle
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AlarmRecord {
    pub id: AlarmId,
    #[serde(with = "toml_datetime_compat")]
    pub time: NaiveTime,
    #[serde(default = "always_true")]
    pub enabled: bool,
    #[serde(default)]
    pub repeating: bool,
}

impl AlarmRecord {
    #[must_use]
    pub const fn new(id: AlarmId, time: NaiveTime) -> Self {
        Self {
            id,
            time,
            enabled: true,
            repeating: false,
        }
    }

    #[must_use]
    pub fn time_label(&self, time_format: &str) -> String {
        self.time.format(time_format).to_string()
    }
}

impl fmt::Display for AlarmRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>3}  {}  {:<3}  {}",
            self.id,
            self.time.format("%H:%M"),
            if self.enabled { "on" } else { "off" },
            if self.repeating { "repeating" } else { "once" }
        )
    }
}

/// parses `HH:MM` (or `HH:MM:SS`) as typed on the command line
///
/// # Errors
/// returns [`Error::InvalidTime`] if the input is neither format
pub fn parse_time(input: &str) -> Result<NaiveTime> {
    let trimmed = input.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| Error::InvalidTime(input.to_string()))
}

/// the next time the wall clock reads `time`, strictly after `now`
#[must_use]
pub fn next_occurrence(time: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(time);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

#[must_use]
pub fn time_until(time: NaiveTime, now: NaiveDateTime) -> Duration {
    next_occurrence(time, now) - now
}

/// human readable remaining time, rounded up to the minute
#[must_use]
pub fn format_time_until(remaining: Duration) -> String {
    let seconds = remaining.num_seconds();
    if seconds < 60 {
        return "less than a minute".to_string();
    }
    let minutes = (seconds + 59) / 60;
    match (minutes / 60, minutes % 60) {
        (0, minutes) => plural(minutes, "minute"),
        (hours, 0) => plural(hours, "hour"),
        (hours, minutes) => format!("{} and {}", plural(hours, "hour"), plural(minutes, "minute")),
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit}")
    } else {
        format!("{count} {unit}s")
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn next_occurrence_rolls_over_to_tomorrow() {
        assert_eq!(next_occurrence(hm(7, 0), at(6, 0, 0)), at(7, 0, 0));
        assert_eq!(
            next_occurrence(hm(7, 0), at(8, 0, 0)),
            at(7, 0, 0) + Duration::days(1)
        );
        // an alarm for right now is tomorrow's alarm
        assert_eq!(
            next_occurrence(hm(7, 0), at(7, 0, 0)),
            at(7, 0, 0) + Duration::days(1)
        );
    }

    #[test]
    fn formats_remaining_time() {
        assert_eq!(format_time_until(time_until(hm(7, 0), at(0, 0, 0))), "7 hours");
        assert_eq!(format_time_until(time_until(hm(7, 0), at(6, 30, 0))), "30 minutes");
        assert_eq!(format_time_until(time_until(hm(7, 0), at(6, 59, 0))), "1 minute");
        assert_eq!(
            format_time_until(time_until(hm(7, 0), at(5, 44, 30))),
            "1 hour and 16 minutes"
        );
        assert_eq!(
            format_time_until(time_until(hm(7, 0), at(6, 59, 30))),
            "less than a minute"
        );
    }

    #[test]
    fn parses_times() {
        assert_eq!(parse_time("07:00").unwrap(), hm(7, 0));
        assert_eq!(parse_time(" 23:15:00 ").unwrap(), hm(23, 15));
        assert!(matches!(parse_time("7am"), Err(Error::InvalidTime(_))));
    }

    #[test]
    fn missing_flags_use_defaults() {
        let record: AlarmRecord = toml::from_str("id = 3\ntime = 07:30:00\n").unwrap();
        assert_eq!(record, AlarmRecord::new(3, hm(7, 30)));
        assert_eq!(record.time_label("%H:%M"), "07:30");
    }
}

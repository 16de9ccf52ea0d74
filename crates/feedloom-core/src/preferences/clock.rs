//! Wall-clock `HH:MM` values used by quiet hours and delivery times.

use chrono::{FixedOffset, NaiveTime, Offset, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Minutes in one day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A 24-hour wall-clock time with minute precision.
///
/// The textual form is strictly `HH:MM` (`00:00` through `23:59`, always two
/// digits each). Stored documents go through [`FromStr`], so a malformed time
/// is rejected when the document is decoded, never inside a decision function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    minutes: u16,
}

impl ClockTime {
    /// Build from hour and minute, `None` when out of range.
    pub fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self {
                minutes: hour as u16 * 60 + minute as u16,
            })
        } else {
            None
        }
    }

    /// Build from minutes since midnight, wrapping past 24 hours.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            minutes: (minutes % MINUTES_PER_DAY as u32) as u16,
        }
    }

    pub(crate) const fn from_minutes_const(minutes: u16) -> Self {
        Self {
            minutes: minutes % MINUTES_PER_DAY,
        }
    }

    pub fn minutes_since_midnight(self) -> u16 {
        self.minutes
    }

    pub fn hour(self) -> u8 {
        (self.minutes / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.minutes % 60) as u8
    }

    pub fn to_naive_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self {
            minutes: (time.hour() * 60 + time.minute()) as u16,
        }
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ValidationError::invalid("time", format!("'{s}' is not a 24-hour HH:MM time"))
        };

        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let hour = (digits[0] - b'0') * 10 + (digits[1] - b'0');
        let minute = (digits[2] - b'0') * 10 + (digits[3] - b'0');
        Self::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

/// Resolve a stored timezone string to a fixed UTC offset.
///
/// Accepts `UTC`, `GMT`, `Z` and numeric offsets such as `+05:00`, `-0330`
/// or `UTC+05:30`. Region names (`Europe/Berlin`) have no fixed offset and
/// are rejected.
pub fn parse_utc_offset(timezone: &str) -> Result<FixedOffset, ValidationError> {
    let trimmed = timezone.trim();
    let upper = trimmed.to_ascii_uppercase();
    let rest = upper
        .strip_prefix("UTC")
        .or_else(|| upper.strip_prefix("GMT"))
        .unwrap_or(&upper);

    if !trimmed.is_empty() && (rest.is_empty() || rest == "Z") {
        return Ok(Utc.fix());
    }
    rest.parse::<FixedOffset>().map_err(|e| {
        ValidationError::invalid(
            "timezone",
            format!("'{timezone}' is not UTC or a fixed offset like +05:00 ({e})"),
        )
    })
}

//! Digest delivery schedule preview.
//!
//! Display logic only: turns digest settings into the lines a settings page
//! shows under "your digest will arrive...". Nothing here schedules anything.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::preferences::{defaults, ChannelSettings, ClockTime, Frequency};

/// Fixed delivery days of the twice-weekly digest.
pub const TWICE_WEEKLY_DAYS: [Weekday; 2] = [Weekday::Mon, Weekday::Thu];

/// How often the digest is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DigestFrequency {
    Daily,
    Weekly,
    TwiceWeekly,
    /// Any value the preview does not know how to render.
    #[serde(other)]
    Unsupported,
}

impl DigestFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            DigestFrequency::Daily => "daily",
            DigestFrequency::Weekly => "weekly",
            DigestFrequency::TwiceWeekly => "twice-weekly",
            DigestFrequency::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for DigestFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestFrequency {
    type Err = std::convert::Infallible;

    /// Unknown strings map to [`DigestFrequency::Unsupported`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "daily" => DigestFrequency::Daily,
            "weekly" => DigestFrequency::Weekly,
            "twice-weekly" => DigestFrequency::TwiceWeekly,
            _ => DigestFrequency::Unsupported,
        })
    }
}

impl From<Frequency> for DigestFrequency {
    fn from(value: Frequency) -> Self {
        match value {
            Frequency::Daily => DigestFrequency::Daily,
            Frequency::Weekly => DigestFrequency::Weekly,
            _ => DigestFrequency::Unsupported,
        }
    }
}

/// Full English name of a weekday, as shown in the preview.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Serde adapter storing a weekday as its lowercase full name (`"monday"`).
///
/// Decoding goes through chrono's parser, so `"Mon"` and `"MONDAY"` are
/// accepted too.
mod weekday_serde {
    use chrono::Weekday;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::weekday_name(*day).to_ascii_lowercase())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<Weekday>()
            .map_err(|_| de::Error::custom(format!("unknown weekday '{raw}'")))
    }
}

/// Digest settings as edited on the settings page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestSettings {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_frequency")]
    pub frequency: DigestFrequency,
    #[serde(default = "default_delivery_time")]
    pub delivery_time: ClockTime,
    #[serde(default = "default_weekly_day", with = "weekday_serde")]
    pub weekly_day: Weekday,
    #[serde(default = "default_max_items")]
    pub max_items: u32,
}

fn default_enabled() -> bool {
    true
}
fn default_frequency() -> DigestFrequency {
    DigestFrequency::Daily
}
fn default_delivery_time() -> ClockTime {
    defaults::DIGEST_DELIVERY_TIME
}
fn default_weekly_day() -> Weekday {
    Weekday::Mon
}
fn default_max_items() -> u32 {
    defaults::DIGEST_MAX_ITEMS
}

impl Default for DigestSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            frequency: default_frequency(),
            delivery_time: default_delivery_time(),
            weekly_day: default_weekly_day(),
            max_items: default_max_items(),
        }
    }
}

impl DigestSettings {
    /// Derive preview settings from a user's digest channel.
    ///
    /// Channel frequencies other than daily and weekly have no digest
    /// rendering and produce an empty preview.
    pub fn from_channel(channel: &ChannelSettings, weekly_day: Weekday, max_items: u32) -> Self {
        Self {
            enabled: channel.enabled,
            frequency: channel.frequency.into(),
            delivery_time: channel.time.unwrap_or(defaults::DIGEST_DELIVERY_TIME),
            weekly_day,
            max_items,
        }
    }
}

/// One line of the schedule preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestPreviewEntry {
    #[serde(rename = "type")]
    pub digest_type: String,
    pub time: String,
    pub items: String,
}

/// `round(max_items * 3.5)` with halves rounded up, in integer arithmetic.
fn twice_weekly_items(max_items: u32) -> u64 {
    (max_items as u64 * 7 + 1) / 2
}

fn items_label(count: u64) -> String {
    format!("Up to {count} items")
}

/// Render the delivery schedule for `settings`.
///
/// Disabled or unsupported settings yield an empty list.
pub fn preview_schedule(settings: &DigestSettings) -> Vec<DigestPreviewEntry> {
    if !settings.enabled {
        return Vec::new();
    }

    let at = settings.delivery_time;
    let entry = match settings.frequency {
        DigestFrequency::Daily => DigestPreviewEntry {
            digest_type: "Daily Digest".to_string(),
            time: format!("Every day at {at}"),
            items: items_label(settings.max_items as u64),
        },
        DigestFrequency::Weekly => DigestPreviewEntry {
            digest_type: "Weekly Digest".to_string(),
            time: format!("Every {} at {at}", weekday_name(settings.weekly_day)),
            items: items_label(settings.max_items as u64 * 7),
        },
        DigestFrequency::TwiceWeekly => DigestPreviewEntry {
            digest_type: "Twice Weekly Digest".to_string(),
            time: format!(
                "Every {} and {} at {at}",
                weekday_name(TWICE_WEEKLY_DAYS[0]),
                weekday_name(TWICE_WEEKLY_DAYS[1])
            ),
            items: items_label(twice_weekly_items(settings.max_items)),
        },
        DigestFrequency::Unsupported => return Vec::new(),
    };

    debug!(frequency = %settings.frequency, items = %entry.items, "digest preview");
    vec![entry]
}

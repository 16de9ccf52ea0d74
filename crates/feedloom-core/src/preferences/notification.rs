//! Per-user notification settings: delivery channels, content-type
//! subscriptions and the quiet-hours blackout window.

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::clock::{parse_utc_offset, ClockTime};
use super::defaults;
use crate::error::ValidationError;

/// How often a channel delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Immediate,
    Hourly,
    Daily,
    Weekly,
    /// Sentinel for "do not deliver" (also returned for disabled or unknown channels).
    Never,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::Immediate,
        Frequency::Hourly,
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Never,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Frequency::Immediate => "immediate",
            Frequency::Hourly => "hourly",
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Never => "never",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Frequency::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "frequency",
                value: s.to_string(),
                expected: "immediate, hourly, daily, weekly, never",
            })
    }
}

/// Notification delivery channel. The set is fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Email,
    Push,
    Digest,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Email, Channel::Push, Channel::Digest];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Email => "email",
            Channel::Push => "push",
            Channel::Digest => "digest",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "channel",
                value: s.to_string(),
                expected: "email, push, digest",
            })
    }
}

/// Settings of a single delivery channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSettings {
    pub enabled: bool,
    pub frequency: Frequency,
    /// Preferred delivery time for scheduled channels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<ClockTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl ChannelSettings {
    fn default_email() -> Self {
        Self {
            enabled: true,
            frequency: Frequency::Daily,
            time: None,
            timezone: None,
        }
    }

    fn default_push() -> Self {
        Self {
            enabled: false,
            frequency: Frequency::Immediate,
            time: None,
            timezone: None,
        }
    }

    fn default_digest() -> Self {
        Self {
            enabled: true,
            frequency: Frequency::Daily,
            time: Some(defaults::DIGEST_DELIVERY_TIME),
            timezone: Some(defaults::DEFAULT_TIMEZONE.to_string()),
        }
    }

    /// Frequency this channel actually delivers at.
    pub fn effective_frequency(&self) -> Frequency {
        if self.enabled {
            self.frequency
        } else {
            Frequency::Never
        }
    }
}

/// The fixed channel set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channels {
    #[serde(default = "ChannelSettings::default_email")]
    pub email: ChannelSettings,
    #[serde(default = "ChannelSettings::default_push")]
    pub push: ChannelSettings,
    #[serde(default = "ChannelSettings::default_digest")]
    pub digest: ChannelSettings,
}

impl Default for Channels {
    fn default() -> Self {
        Self {
            email: ChannelSettings::default_email(),
            push: ChannelSettings::default_push(),
            digest: ChannelSettings::default_digest(),
        }
    }
}

impl Channels {
    pub fn get(&self, channel: Channel) -> &ChannelSettings {
        match channel {
            Channel::Email => &self.email,
            Channel::Push => &self.push,
            Channel::Digest => &self.digest,
        }
    }

    pub fn get_mut(&mut self, channel: Channel) -> &mut ChannelSettings {
        match channel {
            Channel::Email => &mut self.email,
            Channel::Push => &mut self.push,
            Channel::Digest => &mut self.digest,
        }
    }

    /// Look a channel up by name; `None` for names outside the fixed set.
    pub fn by_name(&self, name: &str) -> Option<&ChannelSettings> {
        name.parse::<Channel>().ok().map(|c| self.get(c))
    }
}

/// Which kinds of content the user wants to be notified about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeFlags {
    #[serde(default = "default_true")]
    pub breaking_news: bool,
    #[serde(default = "default_true")]
    pub new_content: bool,
    #[serde(default = "default_true")]
    pub weekly_digest: bool,
    #[serde(default = "default_true")]
    pub system_updates: bool,
}

impl Default for ContentTypeFlags {
    fn default() -> Self {
        Self {
            breaking_news: true,
            new_content: true,
            weekly_digest: true,
            system_updates: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Shape of a quiet-hours window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Start after end, e.g. 22:00 to 08:00.
    Overnight,
    /// Start before end, e.g. 12:00 to 14:00.
    SameDay,
    /// Start equal to end. Treated as no restriction.
    Degenerate,
}

/// Blackout window during which notifications are suppressed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuietHours {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_quiet_start")]
    pub start: ClockTime,
    #[serde(default = "default_quiet_end")]
    pub end: ClockTime,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_quiet_start() -> ClockTime {
    defaults::QUIET_HOURS_START
}

fn default_quiet_end() -> ClockTime {
    defaults::QUIET_HOURS_END
}

fn default_timezone() -> String {
    defaults::DEFAULT_TIMEZONE.to_string()
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: defaults::QUIET_HOURS_START,
            end: defaults::QUIET_HOURS_END,
            timezone: default_timezone(),
        }
    }
}

impl QuietHours {
    pub fn window_kind(&self) -> WindowKind {
        use std::cmp::Ordering;
        match self.start.cmp(&self.end) {
            Ordering::Greater => WindowKind::Overnight,
            Ordering::Less => WindowKind::SameDay,
            Ordering::Equal => WindowKind::Degenerate,
        }
    }

    /// Whether `time` falls inside the blackout window.
    ///
    /// The window is half-open: `start` is blocked, `end` is not.
    pub fn is_blocked(&self, time: ClockTime) -> bool {
        if !self.enabled {
            return false;
        }

        let s = self.start.minutes_since_midnight();
        let e = self.end.minutes_since_midnight();
        let t = time.minutes_since_midnight();

        match self.window_kind() {
            WindowKind::Overnight => t >= s || t < e,
            WindowKind::SameDay => s <= t && t < e,
            WindowKind::Degenerate => false,
        }
    }

    /// Whether a notification may fire at `time`.
    ///
    /// `time` is a wall-clock time already expressed in [`QuietHours::timezone`].
    pub fn is_notification_allowed(&self, time: ClockTime) -> bool {
        let blocked = self.is_blocked(time);
        if blocked {
            debug!(
                time = %time,
                start = %self.start,
                end = %self.end,
                "notification suppressed by quiet hours"
            );
        }
        !blocked
    }

    /// Like [`QuietHours::is_notification_allowed`], evaluated at the local
    /// wall-clock time of a timezone-aware instant.
    pub fn is_notification_allowed_at<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        self.is_notification_allowed(ClockTime::from(instant.time()))
    }

    /// Fixed offset of [`QuietHours::timezone`].
    ///
    /// # Errors
    /// Returns an error when the timezone is not UTC or a numeric offset.
    pub fn utc_offset(&self) -> Result<FixedOffset, ValidationError> {
        parse_utc_offset(&self.timezone)
    }

    /// Evaluate a UTC instant after converting it into the quiet-hours timezone.
    ///
    /// # Errors
    /// Fails instead of guessing when the stored timezone cannot be resolved.
    pub fn is_notification_allowed_utc(&self, now: &DateTime<Utc>) -> Result<bool, ValidationError> {
        let offset = self.utc_offset()?;
        Ok(self.is_notification_allowed_at(&now.with_timezone(&offset)))
    }
}

/// Notification preferences for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub user_id: String,
    #[serde(default)]
    pub channels: Channels,
    #[serde(default)]
    pub content_types: ContentTypeFlags,
    #[serde(default)]
    pub quiet_hours: QuietHours,
}

impl NotificationSettings {
    /// Settings seeded with the shared defaults.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            channels: Channels::default(),
            content_types: ContentTypeFlags::default(),
            quiet_hours: QuietHours::default(),
        }
    }

    /// Defaults with `timezone` for quiet hours and the digest channel.
    pub fn with_timezone(user_id: impl Into<String>, timezone: impl Into<String>) -> Self {
        let timezone = timezone.into();
        let mut settings = Self::new(user_id);
        settings.channels.digest.timezone = Some(timezone.clone());
        settings.quiet_hours.timezone = timezone;
        settings
    }

    /// Effective delivery frequency for a channel name.
    ///
    /// Disabled and unknown channels resolve to [`Frequency::Never`].
    pub fn get_channel_frequency(&self, channel: &str) -> Frequency {
        self.channels
            .by_name(channel)
            .map(ChannelSettings::effective_frequency)
            .unwrap_or(Frequency::Never)
    }

    pub fn channel_frequency(&self, channel: Channel) -> Frequency {
        self.channels.get(channel).effective_frequency()
    }

    pub fn is_notification_allowed(&self, time: ClockTime) -> bool {
        self.quiet_hours.is_notification_allowed(time)
    }

    pub fn is_notification_allowed_at<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        self.quiet_hours.is_notification_allowed_at(instant)
    }

    pub fn is_notification_allowed_utc(&self, now: &DateTime<Utc>) -> Result<bool, ValidationError> {
        self.quiet_hours.is_notification_allowed_utc(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn quiet(start: &str, end: &str) -> QuietHours {
        QuietHours {
            enabled: true,
            start: t(start),
            end: t(end),
            timezone: "UTC".to_string(),
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let settings = NotificationSettings::new("u1");
        assert!(settings.channels.email.enabled);
        assert_eq!(settings.channels.email.frequency, Frequency::Daily);
        assert!(!settings.channels.push.enabled);
        assert_eq!(settings.channels.push.frequency, Frequency::Immediate);
        assert!(settings.channels.digest.enabled);
        assert_eq!(settings.channels.digest.frequency, Frequency::Daily);
        assert_eq!(settings.channels.digest.time, Some(t("09:00")));
        assert_eq!(settings.channels.digest.timezone.as_deref(), Some("UTC"));
        assert_eq!(settings.content_types, ContentTypeFlags::default());
        assert!(!settings.quiet_hours.enabled);
        assert_eq!(settings.quiet_hours.start, t("22:00"));
        assert_eq!(settings.quiet_hours.end, t("08:00"));
    }

    #[test]
    fn disabled_quiet_hours_always_allow() {
        let mut q = quiet("22:00", "08:00");
        q.enabled = false;
        assert!(q.is_notification_allowed(t("23:00")));
        assert!(q.is_notification_allowed(t("02:00")));
    }

    #[test]
    fn overnight_window() {
        let q = quiet("22:00", "08:00");
        assert_eq!(q.window_kind(), WindowKind::Overnight);
        assert!(!q.is_notification_allowed(t("23:00")));
        assert!(!q.is_notification_allowed(t("02:00")));
        assert!(q.is_notification_allowed(t("10:00")));
        assert!(!q.is_notification_allowed(t("22:00")));
        assert!(q.is_notification_allowed(t("08:00")));
        assert!(!q.is_notification_allowed(t("07:59")));
        assert!(q.is_notification_allowed(t("21:59")));
    }

    #[test]
    fn same_day_window() {
        let q = quiet("12:00", "14:00");
        assert_eq!(q.window_kind(), WindowKind::SameDay);
        assert!(q.is_notification_allowed(t("11:59")));
        assert!(!q.is_notification_allowed(t("12:00")));
        assert!(!q.is_notification_allowed(t("13:30")));
        assert!(q.is_notification_allowed(t("14:00")));
    }

    #[test]
    fn degenerate_window_never_blocks() {
        let q = quiet("09:00", "09:00");
        assert_eq!(q.window_kind(), WindowKind::Degenerate);
        assert!(q.is_notification_allowed(t("09:00")));
        assert!(q.is_notification_allowed(t("00:00")));
        assert!(q.is_notification_allowed(t("23:59")));
    }

    #[test]
    fn allowed_at_uses_local_wall_clock() {
        let q = quiet("22:00", "08:00");
        // 20:30 UTC is 23:30 at +03:00.
        let utc = Utc.with_ymd_and_hms(2026, 3, 1, 20, 30, 0).unwrap();
        assert!(q.is_notification_allowed_at(&utc));
        let offset = FixedOffset::east_opt(3 * 3600).unwrap();
        assert!(!q.is_notification_allowed_at(&utc.with_timezone(&offset)));
    }

    #[test]
    fn channel_frequency_resolution() {
        let mut settings = NotificationSettings::new("u1");
        assert_eq!(settings.get_channel_frequency("email"), Frequency::Daily);
        assert_eq!(settings.get_channel_frequency("push"), Frequency::Never);
        assert_eq!(settings.get_channel_frequency("digest"), Frequency::Daily);
        assert_eq!(settings.get_channel_frequency("sms"), Frequency::Never);
        assert_eq!(settings.get_channel_frequency("Email"), Frequency::Never);

        settings.channels.push.enabled = true;
        assert_eq!(settings.get_channel_frequency("push"), Frequency::Immediate);
        assert_eq!(settings.channel_frequency(Channel::Push), Frequency::Immediate);
    }

    #[test]
    fn parse_enums() {
        assert_eq!("weekly".parse::<Frequency>().unwrap(), Frequency::Weekly);
        assert!("monthly".parse::<Frequency>().is_err());
        assert_eq!("digest".parse::<Channel>().unwrap(), Channel::Digest);
        assert!("sms".parse::<Channel>().is_err());
    }

    #[test]
    fn deserializes_camel_case_document_with_missing_sections() {
        let json = r#"{
            "userId": "u42",
            "channels": { "push": { "enabled": true, "frequency": "hourly" } },
            "quietHours": { "enabled": true, "start": "23:00", "end": "06:30" }
        }"#;
        let settings: NotificationSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.user_id, "u42");
        assert_eq!(settings.get_channel_frequency("push"), Frequency::Hourly);
        assert_eq!(settings.get_channel_frequency("email"), Frequency::Daily);
        assert_eq!(settings.quiet_hours.timezone, "UTC");
        assert!(settings.content_types.breaking_news);
        assert!(!settings.is_notification_allowed(t("05:00")));
    }

    #[test]
    fn rejects_malformed_time_in_document() {
        let json = r#"{ "userId": "u1", "quietHours": { "enabled": true, "start": "7pm", "end": "08:00" } }"#;
        assert!(serde_json::from_str::<NotificationSettings>(json).is_err());
    }

    #[test]
    fn rejects_unknown_frequency_in_document() {
        let json = r#"{ "userId": "u1", "channels": { "email": { "enabled": true, "frequency": "monthly" } } }"#;
        assert!(serde_json::from_str::<NotificationSettings>(json).is_err());
    }

    #[test]
    fn utc_instant_is_converted_into_stored_offset() {
        let mut qh = quiet("22:00", "08:00");
        qh.timezone = "+05:00".to_string();
        // 20:00 UTC is 01:00 at +05:00.
        let evening = Utc.with_ymd_and_hms(2026, 1, 10, 20, 0, 0).unwrap();
        assert_eq!(qh.is_notification_allowed_utc(&evening), Ok(false));
        // 04:00 UTC is 09:00 at +05:00.
        let morning = Utc.with_ymd_and_hms(2026, 1, 10, 4, 0, 0).unwrap();
        assert_eq!(qh.is_notification_allowed_utc(&morning), Ok(true));
    }

    #[test]
    fn unresolvable_timezone_is_an_error() {
        let mut settings = NotificationSettings::new("u1");
        settings.quiet_hours.enabled = true;
        settings.quiet_hours.timezone = "Europe/Berlin".to_string();
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert!(settings.is_notification_allowed_utc(&now).is_err());
    }

    #[test]
    fn with_timezone_seeds_quiet_hours_and_digest() {
        let settings = NotificationSettings::with_timezone("u1", "-03:00");
        assert_eq!(settings.quiet_hours.timezone, "-03:00");
        assert_eq!(settings.channels.digest.timezone.as_deref(), Some("-03:00"));
        assert_eq!(settings.channels.email, NotificationSettings::new("u1").channels.email);
    }
}

//! Combined per-user view over both preference documents.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::adaptive::{AdaptiveContext, AdaptiveThresholds};
use crate::error::ValidationError;
use crate::preferences::{
    ClockTime, Frequency, LengthTier, NotificationSettings, SummaryParameters, SummaryPreferences,
};

/// Answer for a delivery collaborator about to dispatch on a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDecision {
    pub channel: String,
    /// Outside quiet hours.
    pub allowed: bool,
    pub frequency: Frequency,
    /// `allowed` and the channel delivers at all.
    pub deliver: bool,
}

/// The two independent per-user aggregates, composed for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectiveConfiguration {
    pub notification: NotificationSettings,
    pub summary: SummaryPreferences,
}

impl EffectiveConfiguration {
    pub fn new(notification: NotificationSettings, summary: SummaryPreferences) -> Self {
        Self {
            notification,
            summary,
        }
    }

    pub fn user_id(&self) -> &str {
        &self.notification.user_id
    }

    /// Quiet-hours and frequency check in one call.
    pub fn notification_decision(&self, channel: &str, time: ClockTime) -> NotificationDecision {
        let allowed = self.notification.is_notification_allowed(time);
        let frequency = self.notification.get_channel_frequency(channel);
        NotificationDecision {
            channel: channel.to_string(),
            allowed,
            frequency,
            deliver: allowed && frequency != Frequency::Never,
        }
    }

    /// Same as [`EffectiveConfiguration::notification_decision`] at the local
    /// time of a timezone-aware instant.
    pub fn notification_decision_at<Tz: TimeZone>(
        &self,
        channel: &str,
        instant: &DateTime<Tz>,
    ) -> NotificationDecision {
        self.notification_decision(channel, ClockTime::from(instant.time()))
    }

    /// Decision for a UTC instant, converted into the user's quiet-hours timezone.
    ///
    /// # Errors
    /// Returns an error when the stored timezone is not a fixed offset.
    pub fn notification_decision_utc(
        &self,
        channel: &str,
        now: &DateTime<Utc>,
    ) -> Result<NotificationDecision, ValidationError> {
        let offset = self.notification.quiet_hours.utc_offset()?;
        Ok(self.notification_decision_at(channel, &now.with_timezone(&offset)))
    }

    /// Summary shape with the tier chosen by the adaptive calculation.
    pub fn adaptive_summary_parameters(
        &self,
        thresholds: &AdaptiveThresholds,
        content_type: &str,
        context: &AdaptiveContext,
    ) -> SummaryParameters {
        let tier: LengthTier =
            self.summary
                .calculate_adaptive_length_with(thresholds, content_type, context);
        self.summary.get_summary_parameters(content_type, Some(tier))
    }
}

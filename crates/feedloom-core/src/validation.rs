//! Range validation of stored preference documents.
//!
//! [`SummaryPreferences::validate_configuration`] is the plain string list
//! the API layer surfaces as field errors. The `*_report` functions return a
//! structured result with separate blocking errors and advisory warnings.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::preferences::{
    parse_utc_offset, LengthTier, NotificationSettings, SummaryPreferences, WindowKind,
};

/// Validation constraints for preference values.
pub mod constraints {
    /// Minimum words per summary tier.
    pub const MAX_WORDS_MIN: u32 = 20;
    /// Maximum words per summary tier.
    pub const MAX_WORDS_MAX: u32 = 1000;
    /// Minimum sentences per summary tier.
    pub const MAX_SENTENCES_MIN: u32 = 1;
    /// Maximum sentences per summary tier.
    pub const MAX_SENTENCES_MAX: u32 = 50;
    /// Slowest plausible reading speed (wpm).
    pub const READING_SPEED_MIN: u32 = 50;
    /// Fastest plausible reading speed (wpm).
    pub const READING_SPEED_MAX: u32 = 1000;
    pub const ENGAGEMENT_MIN: f64 = 0.0;
    pub const ENGAGEMENT_MAX: f64 = 1.0;
}

/// A validation finding with field path and message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldIssue {
    /// Field path (dot-separated, e.g. "lengthParameters.brief.maxWords").
    pub field: String,
    /// Human-readable message.
    pub message: String,
    /// Rule that failed.
    pub rule: String,
}

/// Result of document validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the document may be saved.
    pub is_valid: bool,
    /// Blocking problems (empty if valid).
    pub errors: Vec<FieldIssue>,
    /// Non-blocking issues.
    pub warnings: Vec<FieldIssue>,
}

impl ValidationResult {
    fn from_parts(errors: Vec<FieldIssue>, warnings: Vec<FieldIssue>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }
}

fn word_range_message(tier: LengthTier) -> String {
    use constraints::*;
    format!(
        "Invalid maxWords for {tier}: must be between {MAX_WORDS_MIN} and {MAX_WORDS_MAX}"
    )
}

fn sentence_range_message(tier: LengthTier) -> String {
    use constraints::*;
    format!(
        "Invalid maxSentences for {tier}: must be between {MAX_SENTENCES_MIN} and {MAX_SENTENCES_MAX}"
    )
}

impl SummaryPreferences {
    /// Check every tier's limits against their allowed ranges.
    ///
    /// Returns one message per violated bound, shortest tier first. An empty
    /// list means the configuration is valid.
    pub fn validate_configuration(&self) -> Vec<String> {
        use constraints::*;

        let mut messages = Vec::new();
        for (tier, params) in self.length_parameters.iter() {
            if !(MAX_WORDS_MIN..=MAX_WORDS_MAX).contains(&params.max_words) {
                messages.push(word_range_message(tier));
            }
            if !(MAX_SENTENCES_MIN..=MAX_SENTENCES_MAX).contains(&params.max_sentences) {
                messages.push(sentence_range_message(tier));
            }
        }

        if !messages.is_empty() {
            warn!(
                user_id = %self.user_id,
                violations = messages.len(),
                "summary length parameters out of range"
            );
        }
        messages
    }

    /// Check the stored behavior metrics against their allowed ranges.
    ///
    /// [`SummaryPreferences::update_behavior_metrics`] always clamps, so this
    /// only fires for documents edited or decoded directly.
    pub fn validate_behavior_metrics(&self) -> Vec<String> {
        use constraints::*;

        let metrics = &self.user_behavior_metrics;
        let mut messages = Vec::new();
        if !(READING_SPEED_MIN..=READING_SPEED_MAX).contains(&metrics.average_reading_speed) {
            messages.push(format!(
                "Invalid averageReadingSpeed: must be between {READING_SPEED_MIN} and {READING_SPEED_MAX}"
            ));
        }
        if !(ENGAGEMENT_MIN..=ENGAGEMENT_MAX).contains(&metrics.engagement_with_summaries) {
            messages.push(format!(
                "Invalid engagementWithSummaries: must be between {ENGAGEMENT_MIN} and {ENGAGEMENT_MAX}"
            ));
        }
        messages
    }

    /// Everything that blocks a write: length parameters, then behavior metrics.
    pub fn write_violations(&self) -> Vec<String> {
        let mut messages = self.validate_configuration();
        messages.extend(self.validate_behavior_metrics());
        messages
    }

    /// Structured validation: range violations as errors, tiers that do not
    /// grow with the tier order as warnings.
    pub fn configuration_report(&self) -> ValidationResult {
        use constraints::*;

        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        for (tier, params) in self.length_parameters.iter() {
            if !(MAX_WORDS_MIN..=MAX_WORDS_MAX).contains(&params.max_words) {
                errors.push(FieldIssue {
                    field: format!("lengthParameters.{tier}.maxWords"),
                    message: word_range_message(tier),
                    rule: "range".to_string(),
                });
            }
            if !(MAX_SENTENCES_MIN..=MAX_SENTENCES_MAX).contains(&params.max_sentences) {
                errors.push(FieldIssue {
                    field: format!("lengthParameters.{tier}.maxSentences"),
                    message: sentence_range_message(tier),
                    rule: "range".to_string(),
                });
            }
        }

        let metrics = &self.user_behavior_metrics;
        if !(READING_SPEED_MIN..=READING_SPEED_MAX).contains(&metrics.average_reading_speed) {
            errors.push(FieldIssue {
                field: "userBehaviorMetrics.averageReadingSpeed".to_string(),
                message: format!(
                    "Invalid averageReadingSpeed: must be between {READING_SPEED_MIN} and {READING_SPEED_MAX}"
                ),
                rule: "range".to_string(),
            });
        }
        if !(ENGAGEMENT_MIN..=ENGAGEMENT_MAX).contains(&metrics.engagement_with_summaries) {
            errors.push(FieldIssue {
                field: "userBehaviorMetrics.engagementWithSummaries".to_string(),
                message: format!(
                    "Invalid engagementWithSummaries: must be between {ENGAGEMENT_MIN} and {ENGAGEMENT_MAX}"
                ),
                rule: "range".to_string(),
            });
        }

        let tiers: Vec<_> = self.length_parameters.iter().collect();
        for pair in tiers.windows(2) {
            let (shorter, a) = pair[0];
            let (longer, b) = pair[1];
            if b.max_words <= a.max_words || b.max_sentences <= a.max_sentences {
                warnings.push(FieldIssue {
                    field: format!("lengthParameters.{longer}"),
                    message: format!("{longer} limits should exceed {shorter} limits"),
                    rule: "monotonic".to_string(),
                });
            }
        }

        ValidationResult::from_parts(errors, warnings)
    }
}

impl NotificationSettings {
    /// Structured validation of notification settings.
    ///
    /// Time formats and enum values are already enforced when the document is
    /// decoded; this covers what the types cannot express.
    pub fn validate(&self) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        if self.user_id.trim().is_empty() {
            errors.push(FieldIssue {
                field: "userId".to_string(),
                message: "User id is required".to_string(),
                rule: "required".to_string(),
            });
        }

        if self.quiet_hours.timezone.trim().is_empty() {
            errors.push(FieldIssue {
                field: "quietHours.timezone".to_string(),
                message: "Quiet hours timezone cannot be empty".to_string(),
                rule: "required".to_string(),
            });
        }

        if self.quiet_hours.enabled && self.quiet_hours.window_kind() == WindowKind::Degenerate {
            warnings.push(FieldIssue {
                field: "quietHours".to_string(),
                message: "Quiet hours start and end are equal; no time will be blocked".to_string(),
                rule: "recommendation".to_string(),
            });
        }

        let timezone = &self.quiet_hours.timezone;
        if !timezone.trim().is_empty() && parse_utc_offset(timezone).is_err() {
            warnings.push(FieldIssue {
                field: "quietHours.timezone".to_string(),
                message: format!(
                    "'{timezone}' is not a fixed offset; callers must pass local times explicitly"
                ),
                rule: "recommendation".to_string(),
            });
        }

        let digest = &self.channels.digest;
        if digest.enabled && digest.time.is_none() {
            warnings.push(FieldIssue {
                field: "channels.digest.time".to_string(),
                message: "Digest is enabled without a delivery time".to_string(),
                rule: "recommendation".to_string(),
            });
        }

        ValidationResult::from_parts(errors, warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let prefs = SummaryPreferences::new("u1");
        assert!(prefs.validate_configuration().is_empty());
        let report = prefs.configuration_report();
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn oversized_brief_words() {
        let mut prefs = SummaryPreferences::new("u1");
        prefs.length_parameters.brief.max_words = 1500;
        let messages = prefs.validate_configuration();
        assert_eq!(
            messages,
            vec!["Invalid maxWords for brief: must be between 20 and 1000".to_string()]
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut prefs = SummaryPreferences::new("u1");
        prefs.length_parameters.brief.max_words = 20;
        prefs.length_parameters.brief.max_sentences = 1;
        prefs.length_parameters.comprehensive.max_words = 1000;
        prefs.length_parameters.comprehensive.max_sentences = 50;
        assert!(prefs.validate_configuration().is_empty());
    }

    #[test]
    fn one_message_per_violated_bound_in_tier_order() {
        let mut prefs = SummaryPreferences::new("u1");
        prefs.length_parameters.detailed.max_sentences = 0;
        prefs.length_parameters.standard.max_words = 19;
        prefs.length_parameters.standard.max_sentences = 51;
        assert_eq!(
            prefs.validate_configuration(),
            vec![
                "Invalid maxWords for standard: must be between 20 and 1000".to_string(),
                "Invalid maxSentences for standard: must be between 1 and 50".to_string(),
                "Invalid maxSentences for detailed: must be between 1 and 50".to_string(),
            ]
        );
    }

    #[test]
    fn report_flags_fields_and_monotonicity() {
        let mut prefs = SummaryPreferences::new("u1");
        prefs.length_parameters.standard.max_words = 40;
        let report = prefs.configuration_report();
        assert!(report.is_valid);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].field, "lengthParameters.standard");

        prefs.length_parameters.detailed.max_words = 2000;
        let report = prefs.configuration_report();
        assert!(!report.is_valid);
        assert_eq!(report.errors[0].field, "lengthParameters.detailed.maxWords");
        assert_eq!(report.errors[0].rule, "range");
    }

    #[test]
    fn notification_defaults_are_valid() {
        let report = NotificationSettings::new("u1").validate();
        assert!(report.is_valid);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn notification_errors_and_warnings() {
        let mut settings = NotificationSettings::new(" ");
        settings.quiet_hours.timezone = String::new();
        settings.quiet_hours.enabled = true;
        settings.quiet_hours.end = settings.quiet_hours.start;
        settings.channels.digest.time = None;

        let report = settings.validate();
        assert!(!report.is_valid);
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["userId", "quietHours.timezone"]);
        let warnings: Vec<_> = report.warnings.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(warnings, vec!["quietHours", "channels.digest.time"]);
    }

    #[test]
    fn behavior_metrics_out_of_range() {
        let mut prefs = SummaryPreferences::new("u1");
        assert!(prefs.validate_behavior_metrics().is_empty());

        prefs.user_behavior_metrics.average_reading_speed = 5;
        prefs.user_behavior_metrics.engagement_with_summaries = 7.5;
        assert_eq!(
            prefs.validate_behavior_metrics(),
            vec![
                "Invalid averageReadingSpeed: must be between 50 and 1000".to_string(),
                "Invalid engagementWithSummaries: must be between 0 and 1".to_string(),
            ]
        );
        assert!(prefs.validate_configuration().is_empty());
        assert_eq!(prefs.write_violations().len(), 2);

        let report = prefs.configuration_report();
        assert!(!report.is_valid);
        let fields: Vec<_> = report.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "userBehaviorMetrics.averageReadingSpeed",
                "userBehaviorMetrics.engagementWithSummaries"
            ]
        );

        prefs.user_behavior_metrics.engagement_with_summaries = f64::NAN;
        assert_eq!(prefs.validate_behavior_metrics().len(), 2);
    }

    #[test]
    fn region_timezone_is_a_warning() {
        let mut settings = NotificationSettings::new("u1");
        settings.quiet_hours.timezone = "Europe/Berlin".to_string();
        let report = settings.validate();
        assert!(report.is_valid);
        assert_eq!(report.warnings[0].field, "quietHours.timezone");

        settings.quiet_hours.timezone = "+01:00".to_string();
        assert!(settings.validate().warnings.is_empty());
    }
}

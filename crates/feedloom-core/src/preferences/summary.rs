//! Per-user summary preferences: length tiers, content-type shapes,
//! adaptive settings and observed reading behavior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use super::defaults;
use crate::error::ValidationError;
use crate::validation::constraints;

/// Summary length tier, ordered from shortest to longest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthTier {
    Brief,
    Standard,
    Detailed,
    Comprehensive,
}

impl LengthTier {
    pub const ALL: [LengthTier; 4] = [
        LengthTier::Brief,
        LengthTier::Standard,
        LengthTier::Detailed,
        LengthTier::Comprehensive,
    ];

    /// Highest ordinal.
    pub const MAX_INDEX: i32 = 3;

    /// Ordinal position, 0 (brief) through 3 (comprehensive).
    pub fn index(self) -> i32 {
        match self {
            LengthTier::Brief => 0,
            LengthTier::Standard => 1,
            LengthTier::Detailed => 2,
            LengthTier::Comprehensive => 3,
        }
    }

    /// Tier at an ordinal, clamping out-of-range values to the nearest end.
    pub fn from_index(index: i32) -> Self {
        match index.clamp(0, Self::MAX_INDEX) {
            0 => LengthTier::Brief,
            1 => LengthTier::Standard,
            2 => LengthTier::Detailed,
            _ => LengthTier::Comprehensive,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LengthTier::Brief => "brief",
            LengthTier::Standard => "standard",
            LengthTier::Detailed => "detailed",
            LengthTier::Comprehensive => "comprehensive",
        }
    }
}

impl fmt::Display for LengthTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LengthTier {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LengthTier::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownVariant {
                kind: "length tier",
                value: s.to_string(),
                expected: "brief, standard, detailed, comprehensive",
            })
    }
}

/// Word and sentence budget of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LengthParameters {
    pub max_words: u32,
    pub max_sentences: u32,
}

impl LengthParameters {
    pub const fn new(max_words: u32, max_sentences: u32) -> Self {
        Self {
            max_words,
            max_sentences,
        }
    }
}

/// Length parameters for every tier. Always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthParameterTable {
    #[serde(default = "brief_parameters")]
    pub brief: LengthParameters,
    #[serde(default = "standard_parameters")]
    pub standard: LengthParameters,
    #[serde(default = "detailed_parameters")]
    pub detailed: LengthParameters,
    #[serde(default = "comprehensive_parameters")]
    pub comprehensive: LengthParameters,
}

fn brief_parameters() -> LengthParameters {
    defaults::BRIEF_PARAMETERS
}
fn standard_parameters() -> LengthParameters {
    defaults::STANDARD_PARAMETERS
}
fn detailed_parameters() -> LengthParameters {
    defaults::DETAILED_PARAMETERS
}
fn comprehensive_parameters() -> LengthParameters {
    defaults::COMPREHENSIVE_PARAMETERS
}

impl Default for LengthParameterTable {
    fn default() -> Self {
        Self {
            brief: defaults::BRIEF_PARAMETERS,
            standard: defaults::STANDARD_PARAMETERS,
            detailed: defaults::DETAILED_PARAMETERS,
            comprehensive: defaults::COMPREHENSIVE_PARAMETERS,
        }
    }
}

impl LengthParameterTable {
    pub fn get(&self, tier: LengthTier) -> LengthParameters {
        match tier {
            LengthTier::Brief => self.brief,
            LengthTier::Standard => self.standard,
            LengthTier::Detailed => self.detailed,
            LengthTier::Comprehensive => self.comprehensive,
        }
    }

    pub fn get_mut(&mut self, tier: LengthTier) -> &mut LengthParameters {
        match tier {
            LengthTier::Brief => &mut self.brief,
            LengthTier::Standard => &mut self.standard,
            LengthTier::Detailed => &mut self.detailed,
            LengthTier::Comprehensive => &mut self.comprehensive,
        }
    }

    /// Tiers paired with their parameters, shortest first.
    pub fn iter(&self) -> impl Iterator<Item = (LengthTier, LengthParameters)> + '_ {
        LengthTier::ALL.into_iter().map(|tier| (tier, self.get(tier)))
    }
}

/// Built-in content categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Article,
    Paper,
    Podcast,
    Social,
}

impl ContentType {
    pub const ALL: [ContentType; 4] = [
        ContentType::Article,
        ContentType::Paper,
        ContentType::Podcast,
        ContentType::Social,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::Article => "article",
            ContentType::Paper => "paper",
            ContentType::Podcast => "podcast",
            ContentType::Social => "social",
        }
    }

    /// Summary shape a new user gets for this content type.
    pub fn default_preference(self) -> ContentTypePreference {
        match self {
            ContentType::Article => ContentTypePreference::generic(LengthTier::Standard),
            ContentType::Paper => ContentTypePreference {
                length: LengthTier::Detailed,
                include_key_insights: true,
                include_references: true,
                include_methodology: true,
                include_results: true,
                include_timestamps: false,
                include_context: false,
            },
            ContentType::Podcast => ContentTypePreference {
                length: LengthTier::Standard,
                include_key_insights: true,
                include_references: false,
                include_methodology: false,
                include_results: false,
                include_timestamps: true,
                include_context: false,
            },
            ContentType::Social => ContentTypePreference {
                length: LengthTier::Brief,
                include_key_insights: true,
                include_references: false,
                include_methodology: false,
                include_results: false,
                include_timestamps: false,
                include_context: true,
            },
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary shape for one content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypePreference {
    pub length: LengthTier,
    #[serde(default)]
    pub include_key_insights: bool,
    #[serde(default)]
    pub include_references: bool,
    #[serde(default)]
    pub include_methodology: bool,
    #[serde(default)]
    pub include_results: bool,
    #[serde(default)]
    pub include_timestamps: bool,
    #[serde(default)]
    pub include_context: bool,
}

impl ContentTypePreference {
    /// Flag set used for content types without a stored preference:
    /// key insights and references on, everything else off.
    pub fn generic(length: LengthTier) -> Self {
        Self {
            length,
            include_key_insights: true,
            include_references: true,
            include_methodology: false,
            include_results: false,
            include_timestamps: false,
            include_context: false,
        }
    }
}

fn default_content_type_preferences() -> BTreeMap<String, ContentTypePreference> {
    ContentType::ALL
        .into_iter()
        .map(|ct| (ct.as_str().to_string(), ct.default_preference()))
        .collect()
}

/// Which behavioral signals may move the summary length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub based_on_reading_speed: bool,
    #[serde(default)]
    pub based_on_engagement: bool,
    #[serde(default)]
    pub based_on_time_available: bool,
}

fn default_true() -> bool {
    true
}

impl Default for AdaptiveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            based_on_reading_speed: false,
            based_on_engagement: false,
            based_on_time_available: false,
        }
    }
}

/// Reading behavior observed for a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorMetrics {
    /// Words per minute, kept within [50, 1000].
    pub average_reading_speed: u32,
    pub preferred_summary_length: LengthTier,
    /// Fraction of summaries engaged with, kept within [0, 1].
    pub engagement_with_summaries: f64,
    pub last_updated: DateTime<Utc>,
}

impl BehaviorMetrics {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            average_reading_speed: defaults::AVERAGE_READING_SPEED,
            preferred_summary_length: defaults::DEFAULT_LENGTH,
            engagement_with_summaries: defaults::ENGAGEMENT_WITH_SUMMARIES,
            last_updated: now,
        }
    }
}

impl Default for BehaviorMetrics {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

/// Partial behavior observation. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BehaviorUpdate {
    /// Signed so that bogus negative samples can be clamped instead of rejected.
    #[serde(default)]
    pub average_reading_speed: Option<i64>,
    #[serde(default)]
    pub preferred_summary_length: Option<LengthTier>,
    #[serde(default)]
    pub engagement_with_summaries: Option<f64>,
}

impl BehaviorUpdate {
    pub fn is_empty(&self) -> bool {
        self.average_reading_speed.is_none()
            && self.preferred_summary_length.is_none()
            && self.engagement_with_summaries.is_none()
    }
}

/// Resolved shape of a summary to generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryParameters {
    pub length: LengthTier,
    pub max_words: u32,
    pub max_sentences: u32,
    pub include_key_insights: bool,
    pub include_references: bool,
    pub include_methodology: bool,
    pub include_results: bool,
    pub include_timestamps: bool,
    pub include_context: bool,
}

/// Summary preferences for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryPreferences {
    pub user_id: String,
    #[serde(default = "default_length")]
    pub default_length: LengthTier,
    #[serde(default = "default_content_type_preferences")]
    pub content_type_preferences: BTreeMap<String, ContentTypePreference>,
    #[serde(default)]
    pub length_parameters: LengthParameterTable,
    #[serde(default)]
    pub adaptive_settings: AdaptiveSettings,
    #[serde(default)]
    pub user_behavior_metrics: BehaviorMetrics,
}

fn default_length() -> LengthTier {
    defaults::DEFAULT_LENGTH
}

impl SummaryPreferences {
    /// Preferences seeded with the shared defaults.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::new_at(user_id, Utc::now())
    }

    /// Like [`SummaryPreferences::new`] with an explicit creation time.
    pub fn new_at(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            default_length: defaults::DEFAULT_LENGTH,
            content_type_preferences: default_content_type_preferences(),
            length_parameters: LengthParameterTable::default(),
            adaptive_settings: AdaptiveSettings::default(),
            user_behavior_metrics: BehaviorMetrics::new(now),
        }
    }

    /// The stored preference for a content type, if any.
    pub fn content_type_preference(&self, content_type: &str) -> Option<&ContentTypePreference> {
        self.content_type_preferences.get(content_type)
    }

    /// Tier a content type starts from before any adjustment.
    pub fn base_length(&self, content_type: &str) -> LengthTier {
        self.content_type_preference(content_type)
            .map(|p| p.length)
            .unwrap_or(self.default_length)
    }

    /// Resolve the summary shape for a content type.
    ///
    /// The tier is `length_override`, else the content type's stored length,
    /// else [`SummaryPreferences::default_length`]. Unknown content types get
    /// the generic flag set.
    pub fn get_summary_parameters(
        &self,
        content_type: &str,
        length_override: Option<LengthTier>,
    ) -> SummaryParameters {
        let preference = self
            .content_type_preference(content_type)
            .copied()
            .unwrap_or_else(|| ContentTypePreference::generic(self.default_length));
        let length = length_override.unwrap_or(preference.length);
        let limits = self.length_parameters.get(length);

        SummaryParameters {
            length,
            max_words: limits.max_words,
            max_sentences: limits.max_sentences,
            include_key_insights: preference.include_key_insights,
            include_references: preference.include_references,
            include_methodology: preference.include_methodology,
            include_results: preference.include_results,
            include_timestamps: preference.include_timestamps,
            include_context: preference.include_context,
        }
    }

    /// Fold an observation into the stored behavior metrics.
    ///
    /// Reading speed is clamped to [50, 1000] wpm and engagement to [0, 1]
    /// (NaN counts as 0). `last_updated` moves to `now` only when the update
    /// carries at least one field. Returns whether anything was applied.
    pub fn update_behavior_metrics(&mut self, update: BehaviorUpdate, now: DateTime<Utc>) -> bool {
        if update.is_empty() {
            return false;
        }

        let metrics = &mut self.user_behavior_metrics;
        if let Some(speed) = update.average_reading_speed {
            metrics.average_reading_speed = speed.clamp(
                constraints::READING_SPEED_MIN as i64,
                constraints::READING_SPEED_MAX as i64,
            ) as u32;
        }
        if let Some(length) = update.preferred_summary_length {
            metrics.preferred_summary_length = length;
        }
        if let Some(engagement) = update.engagement_with_summaries {
            metrics.engagement_with_summaries = if engagement.is_nan() {
                constraints::ENGAGEMENT_MIN
            } else {
                engagement.clamp(constraints::ENGAGEMENT_MIN, constraints::ENGAGEMENT_MAX)
            };
        }
        metrics.last_updated = now;

        debug!(
            user_id = %self.user_id,
            reading_speed = metrics.average_reading_speed,
            engagement = metrics.engagement_with_summaries,
            "behavior metrics updated"
        );
        true
    }

    /// Value-returning form of [`SummaryPreferences::update_behavior_metrics`].
    pub fn with_behavior_update(mut self, update: BehaviorUpdate, now: DateTime<Utc>) -> Self {
        self.update_behavior_metrics(update, now);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, hour, 0, 0).unwrap()
    }

    #[test]
    fn tier_ordinals_and_ordering() {
        assert!(LengthTier::Brief < LengthTier::Standard);
        assert!(LengthTier::Detailed < LengthTier::Comprehensive);
        for tier in LengthTier::ALL {
            assert_eq!(LengthTier::from_index(tier.index()), tier);
        }
        assert_eq!(LengthTier::from_index(-4), LengthTier::Brief);
        assert_eq!(LengthTier::from_index(9), LengthTier::Comprehensive);
    }

    #[test]
    fn seeded_content_types() {
        let prefs = SummaryPreferences::new_at("u1", at(8));
        assert_eq!(prefs.content_type_preferences.len(), 4);

        let paper = prefs.content_type_preference("paper").unwrap();
        assert_eq!(paper.length, LengthTier::Detailed);
        assert!(paper.include_methodology && paper.include_results);

        let social = prefs.content_type_preference("social").unwrap();
        assert_eq!(social.length, LengthTier::Brief);
        assert!(!social.include_references);
        assert!(social.include_context);

        assert_eq!(prefs.base_length("article"), LengthTier::Standard);
        assert_eq!(prefs.base_length("podcast"), LengthTier::Standard);
    }

    #[test]
    fn parameters_for_known_type() {
        let prefs = SummaryPreferences::new_at("u1", at(8));
        let params = prefs.get_summary_parameters("paper", None);
        assert_eq!(params.length, LengthTier::Detailed);
        assert_eq!(params.max_words, 300);
        assert_eq!(params.max_sentences, 15);
        assert!(params.include_methodology);
        assert!(params.include_results);
        assert!(!params.include_timestamps);
    }

    #[test]
    fn override_wins_but_keeps_type_flags() {
        let prefs = SummaryPreferences::new_at("u1", at(8));
        let params = prefs.get_summary_parameters("podcast", Some(LengthTier::Comprehensive));
        assert_eq!(params.length, LengthTier::Comprehensive);
        assert_eq!(params.max_words, 500);
        assert_eq!(params.max_sentences, 25);
        assert!(params.include_timestamps);
    }

    #[test]
    fn unknown_type_uses_default_length_and_generic_flags() {
        let mut prefs = SummaryPreferences::new_at("u1", at(8));
        prefs.default_length = LengthTier::Brief;
        let params = prefs.get_summary_parameters("newsletter", None);
        assert_eq!(params.length, LengthTier::Brief);
        assert_eq!(params.max_words, 50);
        assert!(params.include_key_insights);
        assert!(params.include_references);
        assert!(!params.include_methodology);
        assert!(!params.include_results);
        assert!(!params.include_timestamps);
        assert!(!params.include_context);
    }

    #[test]
    fn behavior_update_clamps() {
        let mut prefs = SummaryPreferences::new_at("u1", at(8));
        let applied = prefs.update_behavior_metrics(
            BehaviorUpdate {
                average_reading_speed: Some(5000),
                engagement_with_summaries: Some(-0.4),
                preferred_summary_length: Some(LengthTier::Detailed),
            },
            at(9),
        );
        assert!(applied);
        let m = &prefs.user_behavior_metrics;
        assert_eq!(m.average_reading_speed, 1000);
        assert_eq!(m.engagement_with_summaries, 0.0);
        assert_eq!(m.preferred_summary_length, LengthTier::Detailed);
        assert_eq!(m.last_updated, at(9));

        prefs.update_behavior_metrics(
            BehaviorUpdate {
                average_reading_speed: Some(-20),
                engagement_with_summaries: Some(3.0),
                ..Default::default()
            },
            at(10),
        );
        assert_eq!(prefs.user_behavior_metrics.average_reading_speed, 50);
        assert_eq!(prefs.user_behavior_metrics.engagement_with_summaries, 1.0);
    }

    #[test]
    fn nan_engagement_is_stored_as_zero() {
        let mut prefs = SummaryPreferences::new_at("u1", at(8));
        prefs.update_behavior_metrics(
            BehaviorUpdate {
                engagement_with_summaries: Some(f64::NAN),
                ..Default::default()
            },
            at(9),
        );
        assert_eq!(prefs.user_behavior_metrics.engagement_with_summaries, 0.0);
    }

    #[test]
    fn empty_update_leaves_timestamp() {
        let mut prefs = SummaryPreferences::new_at("u1", at(8));
        assert!(!prefs.update_behavior_metrics(BehaviorUpdate::default(), at(12)));
        assert_eq!(prefs.user_behavior_metrics.last_updated, at(8));
    }

    #[test]
    fn with_behavior_update_returns_new_value() {
        let prefs = SummaryPreferences::new_at("u1", at(8));
        let updated = prefs.clone().with_behavior_update(
            BehaviorUpdate {
                average_reading_speed: Some(320),
                ..Default::default()
            },
            at(9),
        );
        assert_eq!(prefs.user_behavior_metrics.average_reading_speed, 200);
        assert_eq!(updated.user_behavior_metrics.average_reading_speed, 320);
    }

    #[test]
    fn document_roundtrip_uses_camel_case() {
        let prefs = SummaryPreferences::new_at("u1", at(8));
        let json = serde_json::to_value(&prefs).unwrap();
        assert_eq!(json["defaultLength"], "standard");
        assert_eq!(json["lengthParameters"]["brief"]["maxWords"], 50);
        assert_eq!(json["adaptiveSettings"]["enabled"], true);
        assert_eq!(json["userBehaviorMetrics"]["averageReadingSpeed"], 200);
        let back: SummaryPreferences = serde_json::from_value(json).unwrap();
        assert_eq!(back, prefs);
    }

    #[test]
    fn sparse_document_fills_defaults() {
        let prefs: SummaryPreferences =
            serde_json::from_str(r#"{ "userId": "u7", "defaultLength": "detailed" }"#).unwrap();
        assert_eq!(prefs.default_length, LengthTier::Detailed);
        assert_eq!(prefs.length_parameters, LengthParameterTable::default());
        assert!(prefs.adaptive_settings.enabled);
        assert!(prefs.content_type_preference("social").is_some());
    }

    #[test]
    fn unknown_tier_is_rejected() {
        assert!("huge".parse::<LengthTier>().is_err());
        assert!(serde_json::from_str::<SummaryPreferences>(
            r#"{ "userId": "u7", "defaultLength": "huge" }"#
        )
        .is_err());
    }
}

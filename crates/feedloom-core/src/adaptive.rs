//! Adaptive summary length.
//!
//! Each enabled behavioral signal casts a vote of -1, 0 or +1 on the base
//! tier of a content type. Votes are summed and the result is clamped to the
//! tier range, so the outcome does not depend on signal order and never
//! leaves `brief..=comprehensive`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::preferences::{LengthTier, SummaryPreferences};

/// Cut-off values for the adaptive votes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveThresholds {
    /// Reading speed above this (wpm) votes for a longer summary.
    #[serde(default = "default_fast_reading_wpm")]
    pub fast_reading_wpm: u32,
    /// Reading speed below this (wpm) votes for a shorter summary.
    #[serde(default = "default_slow_reading_wpm")]
    pub slow_reading_wpm: u32,
    /// Engagement above this votes for a longer summary.
    #[serde(default = "default_high_engagement")]
    pub high_engagement: f64,
    /// Engagement below this votes for a shorter summary.
    #[serde(default = "default_low_engagement")]
    pub low_engagement: f64,
    /// Available time at or below this (minutes) votes for a shorter summary.
    #[serde(default = "default_short_time_minutes")]
    pub short_time_minutes: u32,
    /// Available time at or above this (minutes) votes for a longer summary.
    #[serde(default = "default_long_time_minutes")]
    pub long_time_minutes: u32,
}

fn default_fast_reading_wpm() -> u32 {
    250
}
fn default_slow_reading_wpm() -> u32 {
    150
}
fn default_high_engagement() -> f64 {
    0.7
}
fn default_low_engagement() -> f64 {
    0.3
}
fn default_short_time_minutes() -> u32 {
    2
}
fn default_long_time_minutes() -> u32 {
    15
}

impl Default for AdaptiveThresholds {
    fn default() -> Self {
        Self {
            fast_reading_wpm: default_fast_reading_wpm(),
            slow_reading_wpm: default_slow_reading_wpm(),
            high_engagement: default_high_engagement(),
            low_engagement: default_low_engagement(),
            short_time_minutes: default_short_time_minutes(),
            long_time_minutes: default_long_time_minutes(),
        }
    }
}

/// Per-request context for the adaptive calculation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveContext {
    /// Minutes the reader has right now, when known.
    #[serde(default)]
    pub available_time_minutes: Option<u32>,
}

impl AdaptiveContext {
    pub fn with_available_time(minutes: u32) -> Self {
        Self {
            available_time_minutes: Some(minutes),
        }
    }
}

/// Behavioral signal that can move the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    ReadingSpeed,
    Engagement,
    TimeAvailable,
}

/// One signal's contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub signal: Signal,
    /// -1, 0 or +1.
    pub delta: i32,
}

/// Full breakdown of an adaptive length decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdaptiveDecision {
    pub base: LengthTier,
    pub adaptive_enabled: bool,
    /// Votes of the consulted signals, in evaluation order.
    pub votes: Vec<Vote>,
    /// Sum of all votes before clamping.
    pub delta: i32,
    pub result: LengthTier,
}

impl AdaptiveThresholds {
    fn reading_speed_vote(&self, wpm: u32) -> i32 {
        if wpm > self.fast_reading_wpm {
            1
        } else if wpm < self.slow_reading_wpm {
            -1
        } else {
            0
        }
    }

    fn engagement_vote(&self, engagement: f64) -> i32 {
        if engagement > self.high_engagement {
            1
        } else if engagement < self.low_engagement {
            -1
        } else {
            0
        }
    }

    fn time_vote(&self, minutes: u32) -> i32 {
        if minutes <= self.short_time_minutes {
            -1
        } else if minutes >= self.long_time_minutes {
            1
        } else {
            0
        }
    }
}

impl SummaryPreferences {
    /// Adaptive tier for a content type using the default thresholds.
    pub fn calculate_adaptive_length(
        &self,
        content_type: &str,
        context: &AdaptiveContext,
    ) -> LengthTier {
        self.explain_adaptive_length(&AdaptiveThresholds::default(), content_type, context)
            .result
    }

    /// Adaptive tier for a content type with explicit thresholds.
    pub fn calculate_adaptive_length_with(
        &self,
        thresholds: &AdaptiveThresholds,
        content_type: &str,
        context: &AdaptiveContext,
    ) -> LengthTier {
        self.explain_adaptive_length(thresholds, content_type, context)
            .result
    }

    /// Run the vote-and-clamp calculation and return every intermediate step.
    pub fn explain_adaptive_length(
        &self,
        thresholds: &AdaptiveThresholds,
        content_type: &str,
        context: &AdaptiveContext,
    ) -> AdaptiveDecision {
        let base = self.base_length(content_type);
        let settings = &self.adaptive_settings;

        if !settings.enabled {
            return AdaptiveDecision {
                base,
                adaptive_enabled: false,
                votes: Vec::new(),
                delta: 0,
                result: base,
            };
        }

        let metrics = &self.user_behavior_metrics;
        let mut votes = Vec::with_capacity(3);

        if settings.based_on_reading_speed {
            votes.push(Vote {
                signal: Signal::ReadingSpeed,
                delta: thresholds.reading_speed_vote(metrics.average_reading_speed),
            });
        }
        if settings.based_on_engagement {
            votes.push(Vote {
                signal: Signal::Engagement,
                delta: thresholds.engagement_vote(metrics.engagement_with_summaries),
            });
        }
        if settings.based_on_time_available {
            if let Some(minutes) = context.available_time_minutes {
                votes.push(Vote {
                    signal: Signal::TimeAvailable,
                    delta: thresholds.time_vote(minutes),
                });
            }
        }

        let delta: i32 = votes.iter().map(|v| v.delta).sum();
        let result = LengthTier::from_index(base.index() + delta);

        debug!(
            content_type,
            base = %base,
            delta,
            result = %result,
            "adaptive summary length"
        );

        AdaptiveDecision {
            base,
            adaptive_enabled: true,
            votes,
            delta,
            result,
        }
    }
}

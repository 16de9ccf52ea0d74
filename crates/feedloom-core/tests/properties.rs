//! Property tests for the decision functions.

use chrono::{TimeZone, Utc};
use feedloom_core::{
    AdaptiveContext, AdaptiveSettings, BehaviorUpdate, Channel, ClockTime, Frequency, LengthTier,
    NotificationSettings, QuietHours, SummaryPreferences,
};
use proptest::prelude::*;

const DAY: u32 = 24 * 60;

fn quiet_hours(start: u32, end: u32) -> QuietHours {
    QuietHours {
        enabled: true,
        start: ClockTime::from_minutes(start),
        end: ClockTime::from_minutes(end),
        timezone: "UTC".to_string(),
    }
}

fn arb_tier() -> impl Strategy<Value = LengthTier> {
    prop::sample::select(LengthTier::ALL.to_vec())
}

fn arb_frequency() -> impl Strategy<Value = Frequency> {
    prop::sample::select(Frequency::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn overnight_boundary_is_half_open(start in 1..DAY, end in 0..DAY) {
        prop_assume!(start > end);
        let qh = quiet_hours(start, end);
        prop_assert!(!qh.is_notification_allowed(ClockTime::from_minutes(start)));
        prop_assert!(qh.is_notification_allowed(ClockTime::from_minutes(end)));
    }

    #[test]
    fn same_day_window_blocks_exactly_inside(start in 0..DAY, end in 0..DAY, t in 0..DAY) {
        prop_assume!(start < end);
        let qh = quiet_hours(start, end);
        let inside = start <= t && t < end;
        prop_assert_eq!(qh.is_notification_allowed(ClockTime::from_minutes(t)), !inside);
    }

    #[test]
    fn channel_frequency_respects_enabled(
        enabled in any::<bool>(),
        frequency in arb_frequency(),
        channel in prop::sample::select(Channel::ALL.to_vec()),
    ) {
        let mut settings = NotificationSettings::new("u1");
        let slot = settings.channels.get_mut(channel);
        slot.enabled = enabled;
        slot.frequency = frequency;

        let expected = if enabled { frequency } else { Frequency::Never };
        prop_assert_eq!(settings.get_channel_frequency(channel.as_str()), expected);
    }

    #[test]
    fn unknown_channels_never_deliver(name in "[a-z]{1,12}") {
        prop_assume!(name.parse::<Channel>().is_err());
        prop_assert_eq!(NotificationSettings::new("u1").get_channel_frequency(&name), Frequency::Never);
    }

    #[test]
    fn disabled_adaptation_returns_base(
        base in arb_tier(),
        speed in 0u32..5000,
        engagement in 0.0f64..1.0,
        minutes in prop::option::of(0u32..600),
    ) {
        let mut prefs = SummaryPreferences::new("u1");
        prefs.default_length = base;
        prefs.adaptive_settings = AdaptiveSettings {
            enabled: false,
            based_on_reading_speed: true,
            based_on_engagement: true,
            based_on_time_available: true,
        };
        prefs.user_behavior_metrics.average_reading_speed = speed;
        prefs.user_behavior_metrics.engagement_with_summaries = engagement;
        let ctx = AdaptiveContext { available_time_minutes: minutes };
        prop_assert_eq!(prefs.calculate_adaptive_length("unknown-type", &ctx), base);
    }

    #[test]
    fn adaptive_length_moves_at_most_one_tier_per_signal(
        base in arb_tier(),
        flags in any::<(bool, bool, bool)>(),
        speed in 0u32..5000,
        engagement in 0.0f64..1.0,
        minutes in prop::option::of(0u32..600),
    ) {
        let mut prefs = SummaryPreferences::new("u1");
        prefs.default_length = base;
        prefs.adaptive_settings = AdaptiveSettings {
            enabled: true,
            based_on_reading_speed: flags.0,
            based_on_engagement: flags.1,
            based_on_time_available: flags.2,
        };
        prefs.user_behavior_metrics.average_reading_speed = speed;
        prefs.user_behavior_metrics.engagement_with_summaries = engagement;
        let ctx = AdaptiveContext { available_time_minutes: minutes };

        let result = prefs.calculate_adaptive_length("unknown-type", &ctx);
        let signals = [flags.0, flags.1, flags.2 && minutes.is_some()]
            .iter()
            .filter(|f| **f)
            .count() as i32;
        prop_assert!((result.index() - base.index()).abs() <= signals);
        prop_assert!((0..=LengthTier::MAX_INDEX).contains(&result.index()));
    }

    #[test]
    fn behavior_metrics_stay_in_range(
        speed in prop::option::of(any::<i64>()),
        engagement in prop::option::of(any::<f64>()),
    ) {
        let mut prefs = SummaryPreferences::new("u1");
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        prefs.update_behavior_metrics(
            BehaviorUpdate {
                average_reading_speed: speed,
                preferred_summary_length: None,
                engagement_with_summaries: engagement,
            },
            now,
        );
        let metrics = &prefs.user_behavior_metrics;
        prop_assert!((50..=1000).contains(&metrics.average_reading_speed));
        prop_assert!((0.0..=1.0).contains(&metrics.engagement_with_summaries));
    }

    #[test]
    fn validation_flags_each_out_of_range_tier(
        words in prop::array::uniform4(0u32..2000),
        sentences in prop::array::uniform4(0u32..100),
    ) {
        let mut prefs = SummaryPreferences::new("u1");
        for (i, tier) in LengthTier::ALL.into_iter().enumerate() {
            let params = prefs.length_parameters.get_mut(tier);
            params.max_words = words[i];
            params.max_sentences = sentences[i];
        }

        let expected = words.iter().filter(|w| !(20..=1000).contains(*w)).count()
            + sentences.iter().filter(|s| !(1..=50).contains(*s)).count();
        prop_assert_eq!(prefs.validate_configuration().len(), expected);
    }
}

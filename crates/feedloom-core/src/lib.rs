//! # Feedloom Core Library
//!
//! Per-user personalization rules for a content aggregation service: when a
//! user may be notified, how often each channel delivers, and how long a
//! generated summary should be. Everything a delivery or summarization
//! worker asks is answered here from two stored documents per user.
//!
//! ## Architecture
//!
//! - **Preferences**: The two per-user documents and their decision
//!   functions (quiet hours, channel frequency, summary parameters)
//! - **Adaptive**: Vote-and-clamp adjustment of the summary length tier
//! - **Validation**: Range checks applied before a summary document is saved
//! - **Digest**: Human-readable preview of the digest delivery schedule
//! - **Storage**: SQLite document storage and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`NotificationSettings`]: Channels, content toggles, quiet hours
//! - [`SummaryPreferences`]: Length tiers, per-content-type defaults, behavior metrics
//! - [`PreferenceDb`]: Get-or-create persistence of both documents
//! - [`Config`]: Application configuration management

pub mod adaptive;
pub mod digest;
pub mod effective;
pub mod error;
pub mod preferences;
pub mod storage;
pub mod validation;

pub use adaptive::{AdaptiveContext, AdaptiveDecision, AdaptiveThresholds, Signal, Vote};
pub use digest::{
    preview_schedule, weekday_name, DigestFrequency, DigestPreviewEntry, DigestSettings,
};
pub use effective::{EffectiveConfiguration, NotificationDecision};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use preferences::{
    parse_utc_offset, AdaptiveSettings, BehaviorMetrics, BehaviorUpdate, Channel,
    ChannelSettings, Channels, ClockTime, ContentType, ContentTypeFlags, ContentTypePreference,
    Frequency, LengthParameterTable, LengthParameters, LengthTier, NotificationSettings,
    QuietHours, SummaryParameters, SummaryPreferences, WindowKind,
};
pub use storage::{Config, PreferenceDb};
pub use validation::{FieldIssue, ValidationResult};

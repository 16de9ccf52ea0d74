mod clock;
pub mod defaults;
mod notification;
mod summary;

pub use clock::{parse_utc_offset, ClockTime, MINUTES_PER_DAY};
pub use notification::{
    Channel, ChannelSettings, Channels, ContentTypeFlags, Frequency, NotificationSettings,
    QuietHours, WindowKind,
};
pub use summary::{
    AdaptiveSettings, BehaviorMetrics, BehaviorUpdate, ContentType, ContentTypePreference,
    LengthParameterTable, LengthParameters, LengthTier, SummaryParameters, SummaryPreferences,
};

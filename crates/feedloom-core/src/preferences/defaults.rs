//! Shared default configuration.
//!
//! Every default a new user is seeded with lives here. Storage get-or-create,
//! serde field defaults, the CLI and the digest preview all read from this
//! module so the values cannot drift apart.

use super::clock::ClockTime;
use super::summary::{LengthParameters, LengthTier};

/// Timezone assumed when a document does not name one.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Default digest delivery time (09:00).
pub const DIGEST_DELIVERY_TIME: ClockTime = clock(9, 0);

/// Default quiet hours window (22:00 to 08:00, disabled).
pub const QUIET_HOURS_START: ClockTime = clock(22, 0);
pub const QUIET_HOURS_END: ClockTime = clock(8, 0);

/// Default summary tier when no content-type preference applies.
pub const DEFAULT_LENGTH: LengthTier = LengthTier::Standard;

/// Reading speed assumed before any behavior has been observed (words per minute).
pub const AVERAGE_READING_SPEED: u32 = 200;
/// Engagement assumed before any behavior has been observed.
pub const ENGAGEMENT_WITH_SUMMARIES: f64 = 0.5;

/// Per-tier summary limits. Strictly increasing by tier.
pub const BRIEF_PARAMETERS: LengthParameters = LengthParameters::new(50, 3);
pub const STANDARD_PARAMETERS: LengthParameters = LengthParameters::new(150, 8);
pub const DETAILED_PARAMETERS: LengthParameters = LengthParameters::new(300, 15);
pub const COMPREHENSIVE_PARAMETERS: LengthParameters = LengthParameters::new(500, 25);

/// Default number of items in a digest preview.
pub const DIGEST_MAX_ITEMS: u32 = 10;

const fn clock(hour: u16, minute: u16) -> ClockTime {
    ClockTime::from_minutes_const(hour * 60 + minute)
}

pub mod config;
pub mod digest;
pub mod notify;
pub mod prefs;
pub mod summary;

use feedloom_core::{Config, PreferenceDb};

/// Open the preference database, seeding new users with the configured timezone.
fn open_db(config: &Config) -> Result<PreferenceDb, feedloom_core::CoreError> {
    Ok(PreferenceDb::open()?.with_default_timezone(config.default_timezone.clone()))
}

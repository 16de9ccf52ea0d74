use clap::{Subcommand, ValueEnum};
use feedloom_core::storage::edit_document;
use feedloom_core::Config;
use serde_json::json;

use super::open_db;

#[derive(Clone, Copy, ValueEnum)]
pub enum Document {
    Notification,
    Summary,
}

#[derive(Subcommand)]
pub enum PrefsAction {
    /// Show both preference documents
    Show {
        /// User id
        #[arg(long)]
        user: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set one field of a preference document
    Set {
        /// User id
        #[arg(long)]
        user: String,
        /// Document to edit
        #[arg(value_enum)]
        document: Document,
        /// Dot-separated field path (e.g. "quietHours.start")
        key: String,
        /// New value
        value: String,
    },
    /// Validate the stored documents
    Validate {
        /// User id
        #[arg(long)]
        user: String,
    },
    /// Drop the stored documents so the defaults apply again
    Reset {
        /// User id
        #[arg(long)]
        user: String,
    },
}

pub fn run(action: PrefsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db(&Config::load()?)?;

    match action {
        PrefsAction::Show { user, json } => {
            let cfg = db.effective_configuration(&user)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&cfg)?);
                return Ok(());
            }

            let quiet = &cfg.notification.quiet_hours;
            println!("User: {}", cfg.user_id());
            for channel in ["email", "push", "digest"] {
                println!(
                    "  {channel:<7} {}",
                    cfg.notification.get_channel_frequency(channel)
                );
            }
            if quiet.enabled {
                println!("  Quiet hours: {}-{} ({})", quiet.start, quiet.end, quiet.timezone);
            } else {
                println!("  Quiet hours: off");
            }
            println!("  Default length: {}", cfg.summary.default_length);
            for (content_type, pref) in &cfg.summary.content_type_preferences {
                println!("  {content_type:<7} {}", pref.length);
            }
            println!(
                "  Adaptive: {}",
                if cfg.summary.adaptive_settings.enabled { "on" } else { "off" }
            );
        }
        PrefsAction::Set {
            user,
            document,
            key,
            value,
        } => {
            match document {
                Document::Notification => {
                    let settings = db.notification_settings(&user)?;
                    let edited = edit_document(&settings, &key, &value)?;
                    if edited.user_id != settings.user_id {
                        return Err("userId cannot be changed".into());
                    }
                    db.replace_notification_settings(&edited)?;
                }
                Document::Summary => {
                    let prefs = db.summary_preferences(&user)?;
                    let edited = edit_document(&prefs, &key, &value)?;
                    if edited.user_id != prefs.user_id {
                        return Err("userId cannot be changed".into());
                    }
                    db.replace_summary_preferences(&edited)?;
                }
            }
            println!("ok");
        }
        PrefsAction::Validate { user } => {
            let cfg = db.effective_configuration(&user)?;
            let notification = cfg.notification.validate();
            let summary = cfg.summary.configuration_report();
            let valid = notification.is_valid && summary.is_valid;
            let report = json!({
                "valid": valid,
                "notification": notification,
                "summary": summary,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !valid {
                return Err("preferences are invalid".into());
            }
        }
        PrefsAction::Reset { user } => {
            if db.reset(&user)? {
                println!("preferences reset to defaults");
            } else {
                println!("no stored preferences");
            }
        }
    }
    Ok(())
}

use chrono::{DateTime, FixedOffset, Utc};
use clap::Subcommand;
use feedloom_core::{ClockTime, Config};

use super::open_db;

#[derive(Subcommand)]
pub enum NotifyAction {
    /// Check whether a notification may be sent right now
    Check {
        /// User id
        #[arg(long)]
        user: String,
        /// Channel name (email, push, digest)
        #[arg(long)]
        channel: String,
        /// Local time in the quiet-hours timezone (HH:MM)
        #[arg(long, conflicts_with = "at")]
        time: Option<ClockTime>,
        /// Instant to evaluate (RFC 3339, default: now), converted into the
        /// stored quiet-hours timezone
        #[arg(long)]
        at: Option<DateTime<FixedOffset>>,
    },
    /// Effective delivery frequency of a channel
    Frequency {
        /// User id
        #[arg(long)]
        user: String,
        /// Channel name (email, push, digest)
        #[arg(long)]
        channel: String,
    },
}

pub fn run(action: NotifyAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = open_db(&Config::load()?)?;

    match action {
        NotifyAction::Check {
            user,
            channel,
            time,
            at,
        } => {
            let cfg = db.effective_configuration(&user)?;
            let decision = match time {
                Some(time) => cfg.notification_decision(&channel, time),
                None => {
                    let now = at.map_or_else(Utc::now, |at| at.with_timezone(&Utc));
                    cfg.notification_decision_utc(&channel, &now)?
                }
            };
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        NotifyAction::Frequency { user, channel } => {
            let settings = db.notification_settings(&user)?;
            println!("{}", settings.get_channel_frequency(&channel));
        }
    }
    Ok(())
}

use chrono::Weekday;
use clap::Subcommand;
use feedloom_core::{preview_schedule, ClockTime, Config, DigestFrequency, DigestSettings};

use super::open_db;

#[derive(Subcommand)]
pub enum DigestAction {
    /// Preview the digest delivery schedule
    Preview {
        /// Start from this user's digest channel instead of the configured defaults
        #[arg(long)]
        user: Option<String>,
        /// daily, weekly or twice-weekly
        #[arg(long)]
        frequency: Option<DigestFrequency>,
        /// Delivery day for weekly digests
        #[arg(long)]
        day: Option<Weekday>,
        /// Delivery time (HH:MM)
        #[arg(long)]
        time: Option<ClockTime>,
        /// Items per daily digest
        #[arg(long)]
        max_items: Option<u32>,
        /// Preview with the digest turned off
        #[arg(long)]
        disabled: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(action: DigestAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DigestAction::Preview {
            user,
            frequency,
            day,
            time,
            max_items,
            disabled,
            json,
        } => {
            let config = Config::load()?;
            let mut settings = match user {
                Some(user) => {
                    let db = open_db(&config)?;
                    let notification = db.notification_settings(&user)?;
                    DigestSettings::from_channel(
                        &notification.channels.digest,
                        config.digest.weekly_day,
                        config.digest.max_items,
                    )
                }
                None => config.digest,
            };

            if let Some(frequency) = frequency {
                settings.frequency = frequency;
            }
            if let Some(day) = day {
                settings.weekly_day = day;
            }
            if let Some(time) = time {
                settings.delivery_time = time;
            }
            if let Some(max_items) = max_items {
                settings.max_items = max_items;
            }
            if disabled {
                settings.enabled = false;
            }

            let preview = preview_schedule(&settings);
            if json {
                println!("{}", serde_json::to_string_pretty(&preview)?);
            } else if preview.is_empty() {
                println!("No digest scheduled");
            } else {
                for entry in &preview {
                    println!("{}: {} ({})", entry.digest_type, entry.time, entry.items);
                }
            }
        }
    }
    Ok(())
}

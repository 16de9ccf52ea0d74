use chrono::Utc;
use clap::Subcommand;
use feedloom_core::{AdaptiveContext, BehaviorUpdate, Config, LengthTier};

use super::open_db;

#[derive(Subcommand)]
pub enum SummaryAction {
    /// Resolved summary parameters for a content type
    Params {
        /// User id
        #[arg(long)]
        user: String,
        /// Content type (article, paper, podcast, social, ...)
        #[arg(long)]
        content_type: String,
        /// Force a length tier
        #[arg(long)]
        length: Option<LengthTier>,
    },
    /// Length tier after behavioral adjustment
    Adaptive {
        /// User id
        #[arg(long)]
        user: String,
        /// Content type (article, paper, podcast, social, ...)
        #[arg(long)]
        content_type: String,
        /// Minutes the reader has available
        #[arg(long)]
        minutes: Option<u32>,
        /// Print every vote instead of just the tier
        #[arg(long)]
        explain: bool,
    },
    /// Record observed reading behavior
    Behavior {
        /// User id
        #[arg(long)]
        user: String,
        /// Average reading speed in words per minute
        #[arg(long, allow_negative_numbers = true)]
        reading_speed: Option<i64>,
        /// Engagement with summaries (0.0 - 1.0)
        #[arg(long, allow_negative_numbers = true)]
        engagement: Option<f64>,
        /// Preferred summary length
        #[arg(long)]
        preferred: Option<LengthTier>,
    },
}

pub fn run(action: SummaryAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let db = open_db(&config)?;

    match action {
        SummaryAction::Params {
            user,
            content_type,
            length,
        } => {
            let prefs = db.summary_preferences(&user)?;
            let params = prefs.get_summary_parameters(&content_type, length);
            println!("{}", serde_json::to_string_pretty(&params)?);
        }
        SummaryAction::Adaptive {
            user,
            content_type,
            minutes,
            explain,
        } => {
            let prefs = db.summary_preferences(&user)?;
            let context = AdaptiveContext {
                available_time_minutes: minutes,
            };
            let decision = prefs.explain_adaptive_length(&config.adaptive, &content_type, &context);
            if explain {
                println!("{}", serde_json::to_string_pretty(&decision)?);
            } else {
                println!("{}", decision.result);
            }
        }
        SummaryAction::Behavior {
            user,
            reading_speed,
            engagement,
            preferred,
        } => {
            let update = BehaviorUpdate {
                average_reading_speed: reading_speed,
                preferred_summary_length: preferred,
                engagement_with_summaries: engagement,
            };
            let mut prefs = db.summary_preferences(&user)?;
            if prefs.update_behavior_metrics(update, Utc::now()) {
                db.replace_summary_preferences(&prefs)?;
            } else {
                eprintln!("nothing to update");
            }
            println!("{}", serde_json::to_string_pretty(&prefs.user_behavior_metrics)?);
        }
    }
    Ok(())
}

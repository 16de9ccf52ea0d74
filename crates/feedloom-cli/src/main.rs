use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "feedloom", version, about = "Feedloom personalization CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Notification delivery checks
    Notify {
        #[command(subcommand)]
        action: commands::notify::NotifyAction,
    },
    /// Summary shape and behavior metrics
    Summary {
        #[command(subcommand)]
        action: commands::summary::SummaryAction,
    },
    /// Stored per-user preference documents
    Prefs {
        #[command(subcommand)]
        action: commands::prefs::PrefsAction,
    },
    /// Digest schedule preview
    Digest {
        #[command(subcommand)]
        action: commands::digest::DigestAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("FEEDLOOM_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Notify { action } => commands::notify::run(action),
        Commands::Summary { action } => commands::summary::run(action),
        Commands::Prefs { action } => commands::prefs::run(action),
        Commands::Digest { action } => commands::digest::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod context;

use context::Context;

#[derive(Parser)]
#[command(name = "keepsake", version, about = "Keepsake CLI")]
struct Cli {
    /// Directory holding config.toml and keepsake.db (default: ~/.config/keepsake)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sound/haptic feedback gate
    Feedback {
        #[command(subcommand)]
        action: commands::feedback::FeedbackAction,
    },
    /// Time together, anniversaries and countdowns
    Time {
        #[command(subcommand)]
        action: commands::time::TimeAction,
    },
    /// Streaks, high scores and unlocked notes
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    let ctx = Context::new(cli.data_dir);

    let level = ctx
        .load_config()
        .map(|cfg| cfg.logging.level)
        .unwrap_or_else(|_| "warn".to_string());
    init_tracing(&level);

    let result = match cli.command {
        Commands::Feedback { action } => commands::feedback::run(&ctx, action),
        Commands::Time { action } => commands::time::run(&ctx, action),
        Commands::Progress { action } => commands::progress::run(&ctx, action),
        Commands::Config { action } => commands::config::run(&ctx, action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

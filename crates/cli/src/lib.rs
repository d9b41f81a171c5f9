pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use huddle_core::config::{AppConfig, LoadOptions, LogFormat};

#[derive(Debug, Parser)]
#[command(
    name = "huddle",
    about = "Huddle team randomizer CLI",
    long_about = "Shuffle hackathon participant rosters into random groups and inspect grouping configuration.",
    after_help = "Examples:\n  huddle randomize --member U001 --member U002 --member U003\n  huddle randomize --roster members.txt\n  huddle config\n  huddle check --pool-size 17"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Partition a member roster into random groups within the configured bounds")]
    Randomize {
        #[arg(long = "member", value_name = "ID", help = "Member identifier (repeatable)")]
        members: Vec<String>,
        #[arg(long, value_name = "FILE", help = "Newline-delimited roster file")]
        roster: Option<PathBuf>,
    },
    #[command(about = "Inspect effective configuration values")]
    Config,
    #[command(about = "Validate configuration and report the strategy for a given pool size")]
    Check {
        #[arg(long, value_name = "N", help = "Hypothetical pool size to probe")]
        pool_size: Option<usize>,
    },
}

fn init_logging(config: &AppConfig) {
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        LogFormat::Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        LogFormat::Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Best effort: a broken config still reaches the command handlers,
    // which report it as a structured failure payload.
    if let Ok(config) = AppConfig::load(LoadOptions::default()) {
        init_logging(&config);
    }

    let result = match cli.command {
        Command::Randomize { members, roster } => commands::randomize::run(members, roster),
        Command::Config => commands::config::run(),
        Command::Check { pool_size } => commands::check::run(pool_size),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

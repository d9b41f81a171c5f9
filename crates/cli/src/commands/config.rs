use huddle_core::config::{AppConfig, LoadOptions, LogFormat};
use serde::Serialize;

use crate::commands::{serialize_payload, CommandResult};

#[derive(Debug, Serialize)]
struct ConfigOutput {
    command: String,
    status: String,
    precedence: String,
    min_group_size: usize,
    max_group_size: usize,
    randomizer_threshold: usize,
    excluded_members: Vec<String>,
    log_level: String,
    log_format: String,
}

/// Render the effective configuration after the full load pipeline
/// (defaults, `huddle.toml`, `HUDDLE_*` env vars).
pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "config",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let payload = ConfigOutput {
        command: "config".to_string(),
        status: "ok".to_string(),
        precedence: "overrides > env > file > default".to_string(),
        min_group_size: config.grouping.min_group_size,
        max_group_size: config.grouping.max_group_size,
        randomizer_threshold: config.grouping.randomizer_threshold,
        excluded_members: config.roster.excluded_members,
        log_level: config.logging.level,
        log_format: match config.logging.format {
            LogFormat::Compact => "compact".to_string(),
            LogFormat::Pretty => "pretty".to_string(),
            LogFormat::Json => "json".to_string(),
        },
    };

    CommandResult { exit_code: 0, output: serialize_payload(&payload) }
}

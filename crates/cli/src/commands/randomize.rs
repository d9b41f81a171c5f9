use std::fs;
use std::path::PathBuf;

use huddle_core::config::{AppConfig, LoadOptions};
use huddle_core::GroupingEngine;
use serde::Serialize;

use crate::commands::{serialize_payload, CommandResult};

#[derive(Debug, Serialize)]
struct RandomizeOutput {
    command: String,
    status: String,
    pool_size: usize,
    excluded: usize,
    group_count: usize,
    groups: Vec<Vec<String>>,
}

/// Shuffle the supplied roster into random groups within the configured
/// size bounds. Members named in `roster.excluded_members` (bot, admin,
/// organizer accounts) are dropped before grouping.
pub fn run(members: Vec<String>, roster: Option<PathBuf>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "randomize",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let mut pool = members;
    if let Some(path) = roster {
        match fs::read_to_string(&path) {
            Ok(raw) => pool.extend(
                raw.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_owned),
            ),
            Err(error) => {
                return CommandResult::failure(
                    "randomize",
                    "roster_read",
                    format!("could not read roster file `{}`: {error}", path.display()),
                    2,
                );
            }
        }
    }

    let supplied = pool.len();
    pool.retain(|member| !config.roster.excluded_members.contains(member));
    let excluded = supplied - pool.len();

    let engine = GroupingEngine::new(config.grouping);
    match engine.assign(&pool) {
        Ok(groups) => {
            let payload = RandomizeOutput {
                command: "randomize".to_string(),
                status: "ok".to_string(),
                pool_size: pool.len(),
                excluded,
                group_count: groups.len(),
                groups,
            };
            CommandResult { exit_code: 0, output: serialize_payload(&payload) }
        }
        Err(error) => CommandResult::failure("randomize", "grouping", error.to_string(), 3),
    }
}

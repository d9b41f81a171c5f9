use huddle_core::bounded_compositions;
use huddle_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

use crate::commands::{serialize_payload, CommandResult};

#[derive(Debug, Serialize)]
struct CheckOutput {
    command: String,
    status: String,
    message: String,
    pool_size: Option<usize>,
    strategy: Option<String>,
    candidate_compositions: Option<usize>,
}

/// Validate the configuration and, when a hypothetical pool size is given,
/// report which strategy would run and how many size shapes the
/// enumeration path would choose from.
pub fn run(pool_size: Option<usize>) -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult::failure(
                "check",
                "config_validation",
                format!("configuration issue: {error}"),
                2,
            );
        }
    };

    let (strategy, candidate_compositions) = match pool_size {
        None => (None, None),
        Some(0) => {
            return CommandResult::failure(
                "check",
                "invalid_pool_size",
                "pool size must be at least 1",
                2,
            );
        }
        Some(size) if size <= config.grouping.randomizer_threshold => {
            let candidates = bounded_compositions(
                size,
                config.grouping.min_group_size,
                config.grouping.max_group_size,
            )
            .count();
            (Some("enumeration".to_string()), Some(candidates))
        }
        Some(_) => (Some("balanced".to_string()), None),
    };

    let payload = CheckOutput {
        command: "check".to_string(),
        status: "ok".to_string(),
        message: "configuration is valid".to_string(),
        pool_size,
        strategy,
        candidate_compositions,
    };

    CommandResult { exit_code: 0, output: serialize_payload(&payload) }
}

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Largest allowed switchover threshold. Enumeration cost grows roughly
/// geometrically with pool size, so the cap keeps the exact-uniform path
/// inside interactive latency budgets.
pub const MAX_RANDOMIZER_THRESHOLD: usize = 32;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub grouping: GroupingConfig,
    pub roster: RosterConfig,
    pub logging: LoggingConfig,
}

/// Size bounds and strategy switchover for the grouping engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupingConfig {
    pub min_group_size: usize,
    pub max_group_size: usize,
    /// Pool sizes up to this value use exact composition enumeration;
    /// larger pools use the closed-form balanced allocation.
    pub randomizer_threshold: usize,
}

/// Caller-side roster policy: identifiers stripped from the pool before the
/// engine ever sees it (bot, admin, and organizer accounts).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RosterConfig {
    pub excluded_members: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub min_group_size: Option<usize>,
    pub max_group_size: Option<usize>,
    pub randomizer_threshold: Option<usize>,
    pub excluded_members: Option<Vec<String>>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            // 3..5 accommodates every pool size >= 3 (max >= 2*min - 1);
            // 23 keeps full enumeration comfortably interactive.
            grouping: GroupingConfig {
                min_group_size: 3,
                max_group_size: 5,
                randomizer_threshold: 23,
            },
            roster: RosterConfig::default(),
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("huddle.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(grouping) = patch.grouping {
            if let Some(min_group_size) = grouping.min_group_size {
                self.grouping.min_group_size = min_group_size;
            }
            if let Some(max_group_size) = grouping.max_group_size {
                self.grouping.max_group_size = max_group_size;
            }
            if let Some(randomizer_threshold) = grouping.randomizer_threshold {
                self.grouping.randomizer_threshold = randomizer_threshold;
            }
        }

        if let Some(roster) = patch.roster {
            if let Some(excluded_members) = roster.excluded_members {
                self.roster.excluded_members = excluded_members;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("HUDDLE_MIN_GROUP_SIZE") {
            self.grouping.min_group_size = parse_usize("HUDDLE_MIN_GROUP_SIZE", &value)?;
        }
        if let Some(value) = read_env("HUDDLE_MAX_GROUP_SIZE") {
            self.grouping.max_group_size = parse_usize("HUDDLE_MAX_GROUP_SIZE", &value)?;
        }
        if let Some(value) = read_env("HUDDLE_RANDOMIZER_THRESHOLD") {
            self.grouping.randomizer_threshold = parse_usize("HUDDLE_RANDOMIZER_THRESHOLD", &value)?;
        }

        if let Some(value) = read_env("HUDDLE_EXCLUDED_MEMBERS") {
            self.roster.excluded_members = value
                .split(',')
                .map(str::trim)
                .filter(|member| !member.is_empty())
                .map(str::to_owned)
                .collect();
        }

        if let Some(value) = read_env("HUDDLE_LOG_LEVEL") {
            self.logging.level = value;
        }
        if let Some(value) = read_env("HUDDLE_LOG_FORMAT") {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(min_group_size) = overrides.min_group_size {
            self.grouping.min_group_size = min_group_size;
        }
        if let Some(max_group_size) = overrides.max_group_size {
            self.grouping.max_group_size = max_group_size;
        }
        if let Some(randomizer_threshold) = overrides.randomizer_threshold {
            self.grouping.randomizer_threshold = randomizer_threshold;
        }
        if let Some(excluded_members) = overrides.excluded_members {
            self.roster.excluded_members = excluded_members;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_grouping(&self.grouping)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn validate_grouping(grouping: &GroupingConfig) -> Result<(), ConfigError> {
    if grouping.min_group_size == 0 {
        return Err(ConfigError::Validation(
            "grouping.min_group_size must be greater than zero".to_string(),
        ));
    }

    if grouping.max_group_size < grouping.min_group_size {
        return Err(ConfigError::Validation(format!(
            "grouping.max_group_size ({}) must be >= grouping.min_group_size ({})",
            grouping.max_group_size, grouping.min_group_size
        )));
    }

    // Required for the balanced-allocation guarantee: with max >= 2*min - 1
    // every pool size >= min decomposes into sizes within bounds.
    let decomposable_floor = grouping.min_group_size.saturating_mul(2).saturating_sub(1);
    if grouping.max_group_size < decomposable_floor {
        return Err(ConfigError::Validation(format!(
            "grouping.max_group_size ({}) must be >= 2 * min_group_size - 1 ({decomposable_floor}) so every pool decomposes within bounds",
            grouping.max_group_size
        )));
    }

    if grouping.randomizer_threshold == 0
        || grouping.randomizer_threshold > MAX_RANDOMIZER_THRESHOLD
    {
        return Err(ConfigError::Validation(format!(
            "grouping.randomizer_threshold must be in range 1..={MAX_RANDOMIZER_THRESHOLD}"
        )));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("huddle.toml"), PathBuf::from("config/huddle.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    toml::from_str::<ConfigPatch>(&raw)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_usize(key: &str, value: &str) -> Result<usize, ConfigError> {
    value.parse::<usize>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    grouping: Option<GroupingPatch>,
    roster: Option<RosterPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct GroupingPatch {
    min_group_size: Option<usize>,
    max_group_size: Option<usize>,
    randomizer_threshold: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
struct RosterPatch {
    excluded_members: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    use tempfile::TempDir;

    use super::{AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat};

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    #[test]
    fn defaults_match_the_hackathon_constants() {
        let _guard = env_lock();
        clear_vars(&[
            "HUDDLE_MIN_GROUP_SIZE",
            "HUDDLE_MAX_GROUP_SIZE",
            "HUDDLE_RANDOMIZER_THRESHOLD",
        ]);

        let config = AppConfig::default();
        assert_eq!(config.grouping.min_group_size, 3);
        assert_eq!(config.grouping.max_group_size, 5);
        assert_eq!(config.grouping.randomizer_threshold, 23);
        assert!(config.roster.excluded_members.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn precedence_is_defaults_then_file_then_env_then_overrides() {
        let _guard = env_lock();
        env::set_var("HUDDLE_MAX_GROUP_SIZE", "7");

        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("huddle.toml");
        fs::write(
            &path,
            r#"
[grouping]
min_group_size = 4
max_group_size = 9

[roster]
excluded_members = ["UBOT", "UADMIN"]

[logging]
level = "warn"
"#,
        )
        .expect("write config file");

        let config = AppConfig::load(LoadOptions {
            config_path: Some(path),
            overrides: ConfigOverrides {
                min_group_size: Some(3),
                log_level: Some("debug".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        clear_vars(&["HUDDLE_MAX_GROUP_SIZE"]);

        let config = config.expect("config load");
        assert_eq!(config.grouping.min_group_size, 3, "explicit override wins");
        assert_eq!(config.grouping.max_group_size, 7, "env wins over file");
        assert_eq!(config.grouping.randomizer_threshold, 23, "default survives");
        assert_eq!(config.roster.excluded_members, vec!["UBOT", "UADMIN"]);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn excluded_members_env_var_is_comma_separated() {
        let _guard = env_lock();
        env::set_var("HUDDLE_EXCLUDED_MEMBERS", "UBOT, UORG1 ,UORG2");

        let config = AppConfig::load(LoadOptions::default());
        clear_vars(&["HUDDLE_EXCLUDED_MEMBERS"]);

        let config = config.expect("config load");
        assert_eq!(config.roster.excluded_members, vec!["UBOT", "UORG1", "UORG2"]);
    }

    #[test]
    fn rejects_bounds_that_break_the_balanced_guarantee() {
        let _guard = env_lock();

        // min=4, max=6 violates max >= 2*min - 1 (7): pool size 7 would be
        // undecomposable on the balanced path.
        let result = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                min_group_size: Some(4),
                max_group_size: Some(6),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let error = result.expect_err("validation must fail");
        assert!(matches!(
            error,
            ConfigError::Validation(ref message) if message.contains("2 * min_group_size - 1")
        ));
    }

    #[test]
    fn rejects_inverted_bounds_and_oversized_threshold() {
        let _guard = env_lock();

        let inverted = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                min_group_size: Some(5),
                max_group_size: Some(3),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        assert!(matches!(inverted, Err(ConfigError::Validation(_))));

        let oversized = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                randomizer_threshold: Some(1000),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });
        assert!(matches!(oversized, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn invalid_env_value_is_reported_with_key_and_value() {
        let _guard = env_lock();
        env::set_var("HUDDLE_MIN_GROUP_SIZE", "three");

        let result = AppConfig::load(LoadOptions::default());
        clear_vars(&["HUDDLE_MIN_GROUP_SIZE"]);

        let error = result.expect_err("parse must fail");
        assert!(matches!(
            error,
            ConfigError::InvalidEnvOverride { ref key, ref value }
                if key == "HUDDLE_MIN_GROUP_SIZE" && value == "three"
        ));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let _guard = env_lock();

        let result = AppConfig::load(LoadOptions {
            config_path: Some("does-not-exist.toml".into()),
            require_file: true,
            ..LoadOptions::default()
        });
        assert!(matches!(result, Err(ConfigError::MissingConfigFile(_))));
    }

    #[test]
    fn log_format_parses_known_names_only() {
        assert_eq!("json".parse::<LogFormat>().ok(), Some(LogFormat::Json));
        assert_eq!("Pretty".parse::<LogFormat>().ok(), Some(LogFormat::Pretty));
        assert!("verbose".parse::<LogFormat>().is_err());
    }
}

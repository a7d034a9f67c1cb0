use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rewards::DEFAULT_DESCRIPTION;

/// Largest trailing window the service will compute, in months.
pub const MAX_SUPPORTED_MONTHS_BACK: u32 = 240;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub rewards: RewardsConfig,
    pub store: StoreConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct RewardsConfig {
    pub default_months_back: u32,
    pub max_months_back: u32,
    pub description: String,
}

#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    pub fixtures_path: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub default_months_back: Option<u32>,
    pub fixtures_path: Option<PathBuf>,
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
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rewards: RewardsConfig {
                default_months_back: 3,
                max_months_back: MAX_SUPPORTED_MONTHS_BACK,
                description: DEFAULT_DESCRIPTION.to_string(),
            },
            store: StoreConfig::default(),
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
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("rewards.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(rewards) = patch.rewards {
            if let Some(default_months_back) = rewards.default_months_back {
                self.rewards.default_months_back = default_months_back;
            }
            if let Some(max_months_back) = rewards.max_months_back {
                self.rewards.max_months_back = max_months_back;
            }
            if let Some(description) = rewards.description {
                self.rewards.description = description;
            }
        }

        if let Some(store) = patch.store {
            if let Some(fixtures_path) = store.fixtures_path {
                self.store.fixtures_path = Some(fixtures_path);
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
        if let Some(value) = read_env("REWARDS_DEFAULT_MONTHS_BACK") {
            self.rewards.default_months_back = parse_u32("REWARDS_DEFAULT_MONTHS_BACK", &value)?;
        }
        if let Some(value) = read_env("REWARDS_MAX_MONTHS_BACK") {
            self.rewards.max_months_back = parse_u32("REWARDS_MAX_MONTHS_BACK", &value)?;
        }
        if let Some(value) = read_env("REWARDS_DESCRIPTION") {
            self.rewards.description = value;
        }

        if let Some(value) = read_env("REWARDS_STORE_FIXTURES_PATH") {
            self.store.fixtures_path = Some(PathBuf::from(value));
        }

        let log_level =
            read_env("REWARDS_LOGGING_LEVEL").or_else(|| read_env("REWARDS_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("REWARDS_LOGGING_FORMAT").or_else(|| read_env("REWARDS_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(default_months_back) = overrides.default_months_back {
            self.rewards.default_months_back = default_months_back;
        }
        if let Some(fixtures_path) = overrides.fixtures_path {
            self.store.fixtures_path = Some(fixtures_path);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_rewards(&self.rewards)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("rewards.toml"), PathBuf::from("config/rewards.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_rewards(rewards: &RewardsConfig) -> Result<(), ConfigError> {
    if rewards.max_months_back == 0 || rewards.max_months_back > MAX_SUPPORTED_MONTHS_BACK {
        return Err(ConfigError::Validation(format!(
            "rewards.max_months_back must be in range 1..={MAX_SUPPORTED_MONTHS_BACK}"
        )));
    }

    if rewards.default_months_back == 0 || rewards.default_months_back > rewards.max_months_back {
        return Err(ConfigError::Validation(format!(
            "rewards.default_months_back must be in range 1..={}",
            rewards.max_months_back
        )));
    }

    if rewards.description.trim().is_empty() {
        return Err(ConfigError::Validation("rewards.description must not be empty".to_string()));
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

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.trim().parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    rewards: Option<RewardsPatch>,
    store: Option<StorePatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct RewardsPatch {
    default_months_back: Option<u32>,
    max_months_back: Option<u32>,
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct StorePatch {
    fixtures_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

//! Configuration loading utilities

use crate::{ConfigValidationError, Settings};
use config::{Config, ConfigError, Environment, File};
use thiserror::Error;

/// Default configuration file, without extension
pub const DEFAULT_CONFIG_PATH: &str = "config/config";

/// Prefix of environment variables overriding file values, e.g.
/// `PERF_ROLLUP__GRACE_PERIOD_HOURS=12`
pub const ENV_PREFIX: &str = "PERF";

#[derive(Debug, Error)]
pub enum ConfigLoadError {
	#[error("Failed to read configuration: {0}")]
	Config(#[from] ConfigError),

	#[error("Invalid configuration: {0}")]
	Validation(#[from] ConfigValidationError),
}

/// Load configuration from the default config file and the environment
pub fn load_config() -> Result<Settings, ConfigLoadError> {
	load_config_from(DEFAULT_CONFIG_PATH)
}

/// Load configuration from `path` (optional) and the environment, then validate it
pub fn load_config_from(path: &str) -> Result<Settings, ConfigLoadError> {
	let s = Config::builder()
		.add_source(File::with_name(path).required(false))
		.add_source(
			Environment::with_prefix(ENV_PREFIX)
				.prefix_separator("_")
				.separator("__"),
		)
		.build()?;

	let settings: Settings = s.try_deserialize()?;
	settings.validate()?;
	Ok(settings)
}

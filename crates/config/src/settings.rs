//! Configuration settings structures

use perf_types::{Machine, Metric, Registry, RegistryError, Target};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors found while checking loaded settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
	#[error("rollup.resummarize_interval_minutes must be greater than zero")]
	ZeroInterval,

	#[error("rollup.grace_period_hours must not be negative (got {hours})")]
	NegativeGracePeriod { hours: i64 },

	#[error("logging.level '{level}' is empty or malformed")]
	InvalidLogLevel { level: String },

	#[error("Registry configuration error: {0}")]
	Registry(#[from] RegistryError),
}

/// Main application settings
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
	pub logging: LoggingSettings,
	pub rollup: RollupSettings,
	pub registry: RegistrySettings,
}

/// Logging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingSettings {
	/// Filter directive, e.g. `info` or `perf_service=debug,info`
	pub level: String,
	pub format: LogFormat,
	pub structured: bool,
}

/// Log format options
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	Json,
	Pretty,
	Compact,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: "info".to_string(),
			format: LogFormat::Pretty,
			structured: false,
		}
	}
}

/// Rollup scheduling configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RollupSettings {
	/// Minimum age of a value before it is rolled up
	pub grace_period_hours: i64,
	pub resummarize_interval_minutes: u64,
	/// Run one resummarize pass as soon as the service starts
	pub run_on_startup: bool,
}

impl Default for RollupSettings {
	fn default() -> Self {
		Self {
			grace_period_hours: 6,
			resummarize_interval_minutes: 60,
			run_on_startup: true,
		}
	}
}

/// Known metrics, machines and targets
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RegistrySettings {
	pub metrics: Vec<MetricConfig>,
	pub machines: Vec<MachineConfig>,
	pub targets: Vec<TargetConfig>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MetricConfig {
	pub name: String,
	pub description: Option<String>,
	pub units: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MachineConfig {
	pub name: String,
	/// Seconds added to every pull time reported by this machine
	#[serde(default)]
	pub time_adjust_sec: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TargetConfig {
	pub name: String,
	pub machine: String,
}

impl From<MetricConfig> for Metric {
	fn from(config: MetricConfig) -> Self {
		let mut metric = Metric::new(config.name);
		metric.description = config.description;
		metric.units = config.units;
		metric
	}
}

impl From<MachineConfig> for Machine {
	fn from(config: MachineConfig) -> Self {
		Machine::new(config.name).with_time_adjust(config.time_adjust_sec)
	}
}

impl From<TargetConfig> for Target {
	fn from(config: TargetConfig) -> Self {
		Target::new(config.name, config.machine)
	}
}

impl Settings {
	/// Check the settings for values the service cannot run with
	pub fn validate(&self) -> Result<(), ConfigValidationError> {
		if self.rollup.resummarize_interval_minutes == 0 {
			return Err(ConfigValidationError::ZeroInterval);
		}
		if self.rollup.grace_period_hours < 0 {
			return Err(ConfigValidationError::NegativeGracePeriod {
				hours: self.rollup.grace_period_hours,
			});
		}
		let level = self.logging.level.trim();
		if level.is_empty() || level.contains(char::is_whitespace) {
			return Err(ConfigValidationError::InvalidLogLevel {
				level: self.logging.level.clone(),
			});
		}
		self.build_registry()?;
		Ok(())
	}

	/// Build the registry injected into the services
	///
	/// Machines are registered first so targets can reference them in any order.
	pub fn build_registry(&self) -> Result<Registry, ConfigValidationError> {
		let mut registry = Registry::new();
		for machine in &self.registry.machines {
			registry.add_machine(machine.clone().into())?;
		}
		for target in &self.registry.targets {
			registry.add_target(target.clone().into())?;
		}
		for metric in &self.registry.metrics {
			registry.add_metric(metric.clone().into())?;
		}
		Ok(registry)
	}

	/// Grace period as a chrono duration
	pub fn grace_period(&self) -> chrono::Duration {
		chrono::Duration::hours(self.rollup.grace_period_hours)
	}

	/// Interval between scheduled resummarize passes
	pub fn resummarize_interval(&self) -> std::time::Duration {
		std::time::Duration::from_secs(self.rollup.resummarize_interval_minutes * 60)
	}
}

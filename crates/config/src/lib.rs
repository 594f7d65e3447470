//! Perf Configuration
//!
//! Configuration management and startup utilities for the perf rollup service.

pub mod loader;
pub mod settings;
pub mod startup_logger;

pub use loader::{load_config, load_config_from, ConfigLoadError};
pub use settings::{
	ConfigValidationError, LogFormat, LoggingSettings, MachineConfig, MetricConfig,
	RegistrySettings, RollupSettings, Settings, TargetConfig,
};
pub use startup_logger::{log_service_info, log_service_shutdown, log_startup_complete};

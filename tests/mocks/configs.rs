//! Test configurations

use perf_rollup::config::{MachineConfig, MetricConfig, Settings, TargetConfig};

use super::entities::{BUILDER, LAPTOP, METRIC, OTHER_METRIC, OTHER_TARGET, TARGET};

/// Settings describing the fixture registry
#[allow(dead_code)]
pub fn test_settings() -> Settings {
	let mut settings = Settings::default();
	settings.logging.level = "debug".to_string();
	settings.rollup.resummarize_interval_minutes = 1;

	settings.registry.machines = vec![
		MachineConfig {
			name: BUILDER.to_string(),
			time_adjust_sec: 0,
		},
		MachineConfig {
			name: LAPTOP.to_string(),
			time_adjust_sec: -3600,
		},
	];
	settings.registry.targets = vec![
		TargetConfig {
			name: TARGET.to_string(),
			machine: BUILDER.to_string(),
		},
		TargetConfig {
			name: OTHER_TARGET.to_string(),
			machine: LAPTOP.to_string(),
		},
	];
	settings.registry.metrics = vec![
		MetricConfig {
			name: METRIC.to_string(),
			description: Some("Time until the first frame is drawn".to_string()),
			units: Some("ms".to_string()),
		},
		MetricConfig {
			name: OTHER_METRIC.to_string(),
			description: None,
			units: Some("MB".to_string()),
		},
	];
	settings
}

//! Service startup logging for the perf rollup service

use std::env;
use tracing::info;

use crate::Settings;

/// Logs service information at startup
pub fn log_service_info(settings: &Settings) {
	// Use the root package name, not the current crate
	let service_name = "perf-rollup";
	let service_version = env!("CARGO_PKG_VERSION");

	info!("=== Perf Rollup Service Starting ===");
	info!("🚀 Service: {} v{}", service_name, service_version);
	info!("💻 Platform: {} ({})", env::consts::OS, env::consts::ARCH);

	if let Ok(cwd) = env::current_dir() {
		info!("📁 Working Directory: {}", cwd.display());
	}

	if let Ok(rust_log) = env::var("RUST_LOG") {
		info!("🔧 Log Level: {}", rust_log);
	} else {
		info!("🔧 Log Level: {}", settings.logging.level);
	}

	info!(
		"📋 Registry: {} metrics, {} machines, {} targets",
		settings.registry.metrics.len(),
		settings.registry.machines.len(),
		settings.registry.targets.len()
	);
	info!(
		"🕒 Started at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs service shutdown information
pub fn log_service_shutdown() {
	info!("🛑 Perf Rollup Service Shutting Down");
	info!(
		"🕒 Shutdown at: {}",
		chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
	);
}

/// Logs the active resummarize schedule once startup is done
pub fn log_startup_complete(settings: &Settings) {
	info!("✅ Perf Rollup Service Started Successfully");
	info!(
		"⏱️ Resummarizing every {} minutes with a {} hour grace period",
		settings.rollup.resummarize_interval_minutes, settings.rollup.grace_period_hours
	);
}

//! Perf Rollup Library
//!
//! Multi-resolution rollup of performance measurements: raw values reported
//! by test machines are aggregated into 6-hour, day, week and month summaries
//! that can be queried without rescanning raw history.

use std::sync::Arc;

use perf_service::{
	BackgroundJob, BackgroundJobHandler, Clock, JobRunner, ResummarizeHandler, SystemClock,
};
use tracing::info;

// Core domain types
pub use perf_types::{
	chrono, Granularity, GroupBy, Machine, Metric, MetricReading, RawValue, Registry,
	RegistryError, Report, ReportError, ReportSubmission, ReportValidationError, SummaryRow,
	Target, TimeRange,
};

// Service layer
pub use perf_service::{
	Cascade, JobError, ReportService, ResummarizeReport, RollupEngine, RollupError, RollupLevel,
	RollupSource, SeriesData, SeriesQuery,
};

// Storage layer
pub use perf_storage::{
	traits::{SeriesFilter, StorageError, StorageResult},
	MemoryStore, Storage,
};

// Config
pub use perf_config::{load_config, log_service_info, log_startup_complete, Settings};

// Module aliases
pub mod models {
	pub use perf_types::*;
}

pub mod storage {
	pub use perf_storage::*;
}

pub mod config {
	pub use perf_config::*;
}

pub mod service {
	pub use perf_service::*;
}

// Re-export for custom storage backends
pub use async_trait;

/// How the service runs once built
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
	/// One resummarize pass, then exit
	Once,
	/// Recurring resummarize passes until interrupted
	Service,
}

/// Fully wired services
pub struct RollupApp {
	pub settings: Settings,
	pub storage: Arc<dyn Storage>,
	pub engine: Arc<RollupEngine>,
	pub reports: ReportService,
	pub jobs: JobRunner,
}

impl RollupApp {
	/// Run one resummarize pass now
	pub async fn run_once(&self) -> Result<(), JobError> {
		self.jobs.run_now(BackgroundJob::Resummarize).await
	}

	/// Schedule the recurring resummarize job from the rollup settings
	pub async fn start_jobs(&self) -> Result<(), JobError> {
		self.jobs
			.schedule_recurring(
				self.settings.resummarize_interval(),
				BackgroundJob::Resummarize,
				self.settings.rollup.run_on_startup,
			)
			.await
	}

	/// Stop scheduled jobs and close storage
	pub async fn shutdown(&self) -> Result<(), Box<dyn std::error::Error>> {
		self.jobs.shutdown().await?;
		self.storage.close().await?;
		Ok(())
	}
}

/// Builder pattern for configuring the rollup service
pub struct RollupBuilder<S = MemoryStore>
where
	S: Storage + Clone + 'static,
{
	settings: Option<Settings>,
	storage: S,
	registry: Option<Registry>,
	clock: Option<Arc<dyn Clock>>,
}

impl<S> RollupBuilder<S>
where
	S: Storage + Clone + 'static,
{
	/// Create a new builder with the provided storage
	pub fn with_storage(storage: S) -> Self {
		Self {
			settings: None,
			storage,
			registry: None,
			clock: None,
		}
	}
}

// Default constructor using MemoryStore for convenience
impl Default for RollupBuilder<MemoryStore> {
	fn default() -> Self {
		Self::new()
	}
}

impl RollupBuilder<MemoryStore> {
	/// Create a new builder with default memory storage
	pub fn new() -> Self {
		Self::with_storage(MemoryStore::new())
	}
}

impl<S> RollupBuilder<S>
where
	S: Storage + Clone + 'static,
{
	pub fn with_settings(mut self, settings: Settings) -> Self {
		self.settings = Some(settings);
		self
	}

	/// Use this registry instead of the one described by the settings
	pub fn with_registry(mut self, registry: Registry) -> Self {
		self.registry = Some(registry);
		self
	}

	/// Use this time source for scheduled resummarize passes
	pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
		self.clock = Some(clock);
		self
	}

	/// Get the current settings
	pub fn settings(&self) -> Option<&Settings> {
		self.settings.as_ref()
	}

	/// Initialize tracing with configuration-based settings
	fn init_tracing_from_settings(settings: &Settings) -> Result<(), Box<dyn std::error::Error>> {
		use perf_config::LogFormat;

		// Create env filter using config level or environment variable
		let log_level = &settings.logging.level;
		let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
			.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

		match settings.logging.format {
			LogFormat::Json => {
				let subscriber = tracing_subscriber::fmt().json().with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Pretty => {
				let subscriber = tracing_subscriber::fmt()
					.pretty()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
			LogFormat::Compact => {
				let subscriber = tracing_subscriber::fmt()
					.compact()
					.with_env_filter(env_filter);

				if settings.logging.structured {
					subscriber.with_target(true).with_thread_ids(true).init();
				} else {
					subscriber.init();
				}
			},
		}

		info!(
			"Logging configuration applied: level={}, format={:?}, structured={}",
			settings.logging.level, settings.logging.format, settings.logging.structured
		);

		Ok(())
	}

	/// Wire storage, registry, engine, report service and job runner
	pub fn build(self) -> Result<RollupApp, Box<dyn std::error::Error>> {
		let settings = self.settings.unwrap_or_default();
		settings.validate()?;

		let registry = match self.registry {
			Some(registry) => registry,
			None => settings.build_registry()?,
		};
		let registry = Arc::new(registry);
		info!(
			"Registry loaded: {} metrics, {} targets",
			registry.metrics().count(),
			registry.targets().count()
		);

		let storage: Arc<dyn Storage> = Arc::new(self.storage);
		let engine = Arc::new(
			RollupEngine::new(Arc::clone(&storage), Arc::clone(&registry))
				.with_grace_period(settings.grace_period()),
		);
		let reports = ReportService::new(Arc::clone(&storage), registry);

		let clock = self.clock.unwrap_or_else(|| Arc::new(SystemClock));
		let handler = BackgroundJobHandler::new(ResummarizeHandler::new(Arc::clone(&engine), clock));
		let jobs = JobRunner::new(Arc::new(handler));

		Ok(RollupApp {
			settings,
			storage,
			engine,
			reports,
			jobs,
		})
	}

	/// Run the service with all defaults and setup:
	/// - Loading .env file
	/// - Loading configuration with defaults
	/// - Initializing tracing
	/// - Running one pass or the recurring schedule
	pub async fn start_service(mut self, mode: RunMode) -> Result<(), Box<dyn std::error::Error>> {
		// Load .env file if it exists
		dotenvy::dotenv().ok();

		let using_provided_settings = self.settings.is_some();
		let settings = match self.settings.take() {
			Some(settings) => settings,
			None => load_config()?,
		};

		Self::init_tracing_from_settings(&settings)?;
		log_service_info(&settings);
		info!(
			"Using configuration: loaded from {}",
			if using_provided_settings {
				"provided settings"
			} else {
				"config file or defaults"
			}
		);

		let app = self.with_settings(settings).build()?;

		match mode {
			RunMode::Once => {
				info!("Running a single resummarize pass");
				app.run_once().await?;
			},
			RunMode::Service => {
				app.start_jobs().await?;
				log_startup_complete(&app.settings);
				tokio::signal::ctrl_c().await?;
				perf_config::log_service_shutdown();
			},
		}

		app.shutdown().await
	}
}

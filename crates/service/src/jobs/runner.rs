//! Runs background jobs once or on a fixed interval

use async_trait::async_trait;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use super::types::{BackgroundJob, JobError, JobResult};

/// Trait for handling different types of background jobs
#[async_trait]
pub trait JobHandler: Send + Sync {
	/// Handle a background job
	async fn handle(&self, job: BackgroundJob) -> JobResult;
}

/// Counters of finished job executions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobRunStats {
	pub completed: u64,
	pub failed: u64,
}

#[derive(Debug, Default)]
struct Counters {
	completed: AtomicU64,
	failed: AtomicU64,
}

/// Executes jobs through a handler, either on demand or on a recurring
/// schedule
///
/// Recurring jobs skip missed ticks, so a run that takes longer than the
/// interval delays the next run instead of queueing a burst of them.
pub struct JobRunner {
	handler: Arc<dyn JobHandler>,
	shutdown: watch::Sender<bool>,
	tasks: Mutex<Vec<JoinHandle<()>>>,
	counters: Arc<Counters>,
}

impl JobRunner {
	/// Create a runner executing jobs with the given handler
	pub fn new(handler: Arc<dyn JobHandler>) -> Self {
		let (shutdown, _) = watch::channel(false);
		Self {
			handler,
			shutdown,
			tasks: Mutex::new(Vec::new()),
			counters: Arc::new(Counters::default()),
		}
	}

	/// Run a job immediately and wait for it to finish
	pub async fn run_now(&self, job: BackgroundJob) -> JobResult {
		if self.is_shutting_down() {
			return Err(JobError::ShuttingDown);
		}
		Self::execute(&self.handler, &self.counters, job).await
	}

	/// Run `job` every `every`, starting right away when `run_immediately`
	/// is set and after one interval otherwise
	pub async fn schedule_recurring(
		&self,
		every: Duration,
		job: BackgroundJob,
		run_immediately: bool,
	) -> JobResult {
		if every.is_zero() {
			return Err(JobError::InvalidConfig(
				"recurring job interval must be greater than zero".to_string(),
			));
		}
		if self.is_shutting_down() {
			return Err(JobError::ShuttingDown);
		}

		info!(
			"Scheduling '{}' every {:?} (run immediately: {})",
			job.description(),
			every,
			run_immediately
		);

		let handler = Arc::clone(&self.handler);
		let counters = Arc::clone(&self.counters);
		let shutdown = self.shutdown.subscribe();
		let handle = tokio::spawn(async move {
			Self::recurring_loop(handler, counters, job, every, run_immediately, shutdown).await;
		});
		self.tasks.lock().await.push(handle);
		Ok(())
	}

	/// Snapshot of execution counters
	pub fn stats(&self) -> JobRunStats {
		JobRunStats {
			completed: self.counters.completed.load(Ordering::Relaxed),
			failed: self.counters.failed.load(Ordering::Relaxed),
		}
	}

	pub fn is_shutting_down(&self) -> bool {
		*self.shutdown.borrow()
	}

	/// Stop every recurring job, waiting for a run in progress to finish
	pub async fn shutdown(&self) -> JobResult {
		info!("Shutting down job runner...");
		self.shutdown.send_replace(true);

		let tasks: Vec<JoinHandle<()>> = self.tasks.lock().await.drain(..).collect();
		for (i, task) in tasks.into_iter().enumerate() {
			if let Err(e) = task.await {
				error!("Recurring job {} failed to shutdown cleanly: {}", i, e);
			} else {
				debug!("Recurring job {} shutdown cleanly", i);
			}
		}

		info!("Job runner shutdown complete");
		Ok(())
	}

	async fn recurring_loop(
		handler: Arc<dyn JobHandler>,
		counters: Arc<Counters>,
		job: BackgroundJob,
		every: Duration,
		run_immediately: bool,
		mut shutdown: watch::Receiver<bool>,
	) {
		let mut ticker = if run_immediately {
			interval(every)
		} else {
			interval_at(Instant::now() + every, every)
		};
		ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

		loop {
			tokio::select! {
				changed = shutdown.changed() => {
					if changed.is_err() || *shutdown.borrow() {
						debug!("Stopping recurring job '{}'", job.description());
						break;
					}
				},
				_ = ticker.tick() => {
					// Failures are counted and logged; the schedule keeps going
					let _ = Self::execute(&handler, &counters, job.clone()).await;
				},
			}
		}
	}

	async fn execute(
		handler: &Arc<dyn JobHandler>,
		counters: &Counters,
		job: BackgroundJob,
	) -> JobResult {
		let description = job.description();
		let start_time = std::time::Instant::now();
		debug!("Running job: {}", description);

		// Use panic protection so a bad run does not take the schedule down
		let fut = handler.handle(job);
		let result = match AssertUnwindSafe(fut).catch_unwind().await {
			Ok(result) => result,
			Err(_) => {
				error!("Job handler panicked for job: {}", description);
				Err(JobError::ProcessingFailed {
					message: "Job handler panicked".to_string(),
				})
			},
		};

		match &result {
			Ok(()) => {
				counters.completed.fetch_add(1, Ordering::Relaxed);
				debug!("Completed job: {} (took {:?})", description, start_time.elapsed());
			},
			Err(e) => {
				counters.failed.fetch_add(1, Ordering::Relaxed);
				warn!("Job failed: {} - {}", description, e);
			},
		}
		result
	}
}

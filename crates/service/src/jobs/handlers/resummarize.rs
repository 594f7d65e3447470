//! Resummarize job handler

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::clock::Clock;
use crate::engine::{ResummarizeReport, RollupEngine};
use crate::jobs::types::{JobError, JobResult};

/// Handler that advances every summary level
pub struct ResummarizeHandler {
	engine: Arc<RollupEngine>,
	clock: Arc<dyn Clock>,
}

impl ResummarizeHandler {
	pub fn new(engine: Arc<RollupEngine>, clock: Arc<dyn Clock>) -> Self {
		Self { engine, clock }
	}

	/// Resummarize using the clock's current time and the engine's grace period
	pub async fn handle(&self) -> JobResult<ResummarizeReport> {
		let now = self.clock.now();
		let report = self
			.engine
			.run_resummarize(now)
			.await
			.map_err(|e| JobError::Rollup(e.to_string()))?;
		self.log(&report);
		Ok(report)
	}

	/// Resummarize up to an explicit cutoff
	pub async fn handle_until(&self, cutoff: DateTime<Utc>) -> JobResult<ResummarizeReport> {
		let report = self
			.engine
			.resummarize_until(cutoff)
			.await
			.map_err(|e| JobError::Rollup(e.to_string()))?;
		self.log(&report);
		Ok(report)
	}

	fn log(&self, report: &ResummarizeReport) {
		for level in &report.levels {
			if level.written > 0 || level.conflicts > 0 {
				info!(
					"{} summaries: {} written, {} already present",
					level.granularity, level.written, level.conflicts
				);
			}
		}
	}
}

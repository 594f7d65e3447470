//! Background job types and definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during job processing
#[derive(Debug, Error)]
pub enum JobError {
	#[error("Job processing failed: {message}")]
	ProcessingFailed { message: String },

	#[error("Job runner is shutting down")]
	ShuttingDown,

	#[error("Rollup error: {0}")]
	Rollup(String),

	#[error("Invalid job configuration: {0}")]
	InvalidConfig(String),
}

/// Result type for job operations
pub type JobResult<T = ()> = Result<T, JobError>;

/// Background job types that can be processed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BackgroundJob {
	/// Advance every summary level using the grace-period cutoff
	Resummarize,

	/// Advance every summary level up to an explicit cutoff, ignoring the
	/// grace period
	ResummarizeUntil { cutoff: DateTime<Utc> },
}

impl BackgroundJob {
	/// Get a human-readable description of the job
	pub fn description(&self) -> String {
		match self {
			BackgroundJob::Resummarize => "Resummarize all levels".to_string(),
			BackgroundJob::ResummarizeUntil { cutoff } => {
				format!("Resummarize all levels up to {}", cutoff)
			},
		}
	}
}

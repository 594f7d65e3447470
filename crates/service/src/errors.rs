//! Error types for the rollup engine

use chrono::{DateTime, Utc};
use perf_types::{Granularity, RegistryError, StorageError};
use thiserror::Error;

/// Rollup engine errors
#[derive(Debug, Error)]
pub enum RollupError {
	#[error(
		"Input for {granularity} rollup not ordered by (metric, target, time): \
		 {metric}/{target}@{time} arrived after {previous}"
	)]
	UnsortedInput {
		granularity: Granularity,
		metric: String,
		target: String,
		time: DateTime<Utc>,
		previous: String,
	},

	#[error("Invalid rollup cascade: {reason}")]
	InvalidCascade { reason: String },

	#[error("Granularity {granularity} is not part of the cascade")]
	UnknownLevel { granularity: Granularity },

	#[error("Lookup failed: {0}")]
	Registry(#[from] RegistryError),

	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

/// Result type for rollup operations
pub type RollupResult<T> = Result<T, RollupError>;

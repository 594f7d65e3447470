//! Reports submitted by machines and the validation applied to them

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::RegistryError;
use crate::storage::StorageError;

/// Validation errors for an incoming report
#[derive(Debug, Error)]
pub enum ReportValidationError {
	#[error("Can't find target '{name}'")]
	UnknownTarget { name: String },

	#[error("unknown metric '{name}'")]
	UnknownMetric { name: String },

	#[error("Property 'revision' doesn't have the expected format")]
	InvalidRevision,

	#[error("Value for metric '{metric}' is not a finite number")]
	NonFiniteValue { metric: String },

	#[error("Registry error: {0}")]
	Registry(#[from] RegistryError),
}

/// Report operation errors
#[derive(Debug, Error)]
pub enum ReportError {
	#[error("Report validation failed: {0}")]
	Validation(#[from] ReportValidationError),

	#[error("Storage error: {0}")]
	Storage(#[from] StorageError),
}

/// One metric value inside a submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricReading {
	pub name: String,
	pub value: f64,
}

impl MetricReading {
	pub fn new(name: impl Into<String>, value: f64) -> Self {
		Self {
			name: name.into(),
			value,
		}
	}
}

/// A report as received from a machine, before validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSubmission {
	pub target: String,
	/// Hex-encoded 64 character revision of the tested tree
	pub revision: String,
	/// Pull time according to the machine's own clock
	pub pull_time: DateTime<Utc>,
	/// Set when the test run failed; such reports carry no values
	pub error: Option<String>,
	#[serde(default)]
	pub metrics: Vec<MetricReading>,
}

impl ReportSubmission {
	/// A successful run reporting the given readings
	pub fn success(
		target: impl Into<String>,
		revision: impl Into<String>,
		pull_time: DateTime<Utc>,
		metrics: Vec<MetricReading>,
	) -> Self {
		Self {
			target: target.into(),
			revision: revision.into(),
			pull_time,
			error: None,
			metrics,
		}
	}

	/// A failed run
	pub fn failure(
		target: impl Into<String>,
		revision: impl Into<String>,
		pull_time: DateTime<Utc>,
		error: impl Into<String>,
	) -> Self {
		Self {
			target: target.into(),
			revision: revision.into(),
			pull_time,
			error: Some(error.into()),
			metrics: Vec::new(),
		}
	}

	pub fn is_error(&self) -> bool {
		self.error.is_some()
	}

	/// Check that the revision is a 64 character lowercase hex digest
	pub fn validate_revision(&self) -> Result<(), ReportValidationError> {
		let valid = self.revision.len() == 64
			&& self
				.revision
				.bytes()
				.all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
		if valid {
			Ok(())
		} else {
			Err(ReportValidationError::InvalidRevision)
		}
	}
}

/// A stored report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
	pub id: Uuid,
	pub target: String,
	pub revision: String,
	/// Pull time after the machine's clock adjustment
	pub pull_time: DateTime<Utc>,
	pub error: Option<String>,
	pub received_at: DateTime<Utc>,
}

impl Report {
	/// Create a new report with a fresh id
	pub fn new(
		target: impl Into<String>,
		revision: impl Into<String>,
		pull_time: DateTime<Utc>,
		error: Option<String>,
	) -> Self {
		Self {
			id: Uuid::new_v4(),
			target: target.into(),
			revision: revision.into(),
			pull_time,
			error,
			received_at: Utc::now(),
		}
	}

	/// Failed reports are excluded from aggregation
	pub fn is_error(&self) -> bool {
		self.error.is_some()
	}
}

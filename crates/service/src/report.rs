//! Report service
//!
//! Validates reports submitted by machines and stores them together with
//! their values.

use std::sync::Arc;

use perf_storage::Storage;
use perf_types::{
	RawValue, Registry, Report, ReportError, ReportSubmission, ReportValidationError, Target,
	TimeRange,
};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Clone)]
pub struct ReportService {
	storage: Arc<dyn Storage>,
	registry: Arc<Registry>,
}

impl ReportService {
	pub fn new(storage: Arc<dyn Storage>, registry: Arc<Registry>) -> Self {
		Self { storage, registry }
	}

	/// Validate, adjust and persist a submission, returning the stored report
	pub async fn submit(&self, submission: ReportSubmission) -> Result<Report, ReportError> {
		// 1. Resolve the target and its machine's clock correction
		let target = self.resolve_target(&submission.target)?;
		let adjustment = self
			.registry
			.clock_adjustment(target)
			.map_err(ReportValidationError::from)?;

		// 2. Check the payload
		submission.validate_revision()?;
		if !submission.is_error() {
			for reading in &submission.metrics {
				if self.registry.metric(&reading.name).is_err() {
					return Err(ReportValidationError::UnknownMetric {
						name: reading.name.clone(),
					}
					.into());
				}
				if !reading.value.is_finite() {
					return Err(ReportValidationError::NonFiniteValue {
						metric: reading.name.clone(),
					}
					.into());
				}
			}
		}

		// 3. Build the report; failed runs keep no values
		let pull_time = submission.pull_time + adjustment;
		let report = Report::new(
			target.name.clone(),
			submission.revision,
			pull_time,
			submission.error,
		);
		let values: Vec<RawValue> = if report.is_error() {
			Vec::new()
		} else {
			submission
				.metrics
				.into_iter()
				.map(|reading| RawValue {
					report_id: report.id,
					metric: reading.name,
					target: report.target.clone(),
					timestamp: pull_time,
					value: reading.value,
				})
				.collect()
		};

		debug!(
			"Storing report {} for '{}' ({} values, error: {})",
			report.id,
			report.target,
			values.len(),
			report.is_error()
		);
		self.storage.add_report(report.clone(), values).await?;
		info!("Accepted report {} for target '{}'", report.id, report.target);
		Ok(report)
	}

	/// Retrieve a stored report by id
	pub async fn get_report(&self, report_id: Uuid) -> Result<Option<Report>, ReportError> {
		Ok(self.storage.get_report(report_id).await?)
	}

	/// Pull time range covered by successful reports, optionally for one target
	pub async fn time_range(&self, target: Option<&str>) -> Result<Option<TimeRange>, ReportError> {
		if let Some(name) = target {
			self.resolve_target(name)?;
		}
		Ok(self.storage.report_time_range(target).await?)
	}

	/// Most recent failed report of a target
	pub async fn latest_error(&self, target: &str) -> Result<Option<Report>, ReportError> {
		self.resolve_target(target)?;
		Ok(self.storage.latest_error_report(target).await?)
	}

	fn resolve_target(&self, name: &str) -> Result<&Target, ReportValidationError> {
		self.registry
			.target(name)
			.map_err(|_| ReportValidationError::UnknownTarget {
				name: name.to_string(),
			})
	}
}

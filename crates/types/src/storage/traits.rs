//! Storage traits for pluggable storage implementations
//!
//! Every query returns rows ordered by (metric, target, time). The rollup
//! engine streams over these results and relies on that order.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::StorageResult;
use crate::{Granularity, RawValue, Report, SummaryRow, TimeRange};

/// Range and identity restrictions shared by value and summary queries
///
/// `start` is inclusive and `end` exclusive; `None` leaves that side unbounded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesFilter {
	pub start: Option<DateTime<Utc>>,
	pub end: Option<DateTime<Utc>>,
	pub target: Option<String>,
	pub metric: Option<String>,
}

impl SeriesFilter {
	pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
		Self {
			start,
			end,
			target: None,
			metric: None,
		}
	}

	pub fn with_target(mut self, target: Option<String>) -> Self {
		self.target = target;
		self
	}

	pub fn with_metric(mut self, metric: Option<String>) -> Self {
		self.metric = metric;
		self
	}

	/// Whether a row with the given identity and time passes the filter
	pub fn matches(&self, metric: &str, target: &str, time: DateTime<Utc>) -> bool {
		self.start.map_or(true, |start| time >= start)
			&& self.end.map_or(true, |end| time < end)
			&& self.metric.as_deref().map_or(true, |m| m == metric)
			&& self.target.as_deref().map_or(true, |t| t == target)
	}

	/// Whether the filter can match nothing because its range is empty
	pub fn is_empty_range(&self) -> bool {
		matches!((self.start, self.end), (Some(start), Some(end)) if start >= end)
	}
}

/// Statistics about storage usage
#[derive(Debug, Clone, Default)]
pub struct StorageStats {
	pub total_reports: usize,
	pub error_reports: usize,
	pub total_values: usize,
	pub summaries: BTreeMap<Granularity, usize>,
}

/// Trait for report storage operations
#[async_trait]
pub trait ReportStorageTrait: Send + Sync {
	/// Store a report together with the values it carried
	async fn add_report(&self, report: Report, values: Vec<RawValue>) -> StorageResult<()>;

	/// Get a report by ID
	async fn get_report(&self, report_id: Uuid) -> StorageResult<Option<Report>>;

	/// Earliest and latest pull time over reports without an error
	async fn report_time_range(&self, target: Option<&str>) -> StorageResult<Option<TimeRange>>;

	/// Most recent failed report for a target
	async fn latest_error_report(&self, target: &str) -> StorageResult<Option<Report>>;

	/// Get report count
	async fn report_count(&self) -> StorageResult<usize>;
}

/// Trait for reading raw values
#[async_trait]
pub trait RawValueStorageTrait: Send + Sync {
	/// Values matching the filter, ordered by (metric, target, time).
	/// Values of failed reports are never returned.
	async fn query_values(&self, filter: &SeriesFilter) -> StorageResult<Vec<RawValue>>;

	/// Get value count
	async fn value_count(&self) -> StorageResult<usize>;
}

/// Trait for summary storage operations
#[async_trait]
pub trait SummaryStorageTrait: Send + Sync {
	/// Persist a new summary row. Fails with `StorageError::Duplicate` when a
	/// row with the same key already exists; the stored row is left untouched.
	async fn insert_summary(&self, row: SummaryRow) -> StorageResult<()>;

	/// Rows of one granularity matching the filter, ordered by
	/// (metric, target, time)
	async fn query_summaries(
		&self,
		granularity: Granularity,
		filter: &SeriesFilter,
	) -> StorageResult<Vec<SummaryRow>>;

	/// Bucket start of the latest persisted row of a granularity
	async fn last_summary_start(
		&self,
		granularity: Granularity,
	) -> StorageResult<Option<DateTime<Utc>>>;

	/// Number of persisted rows of a granularity
	async fn summary_count(&self, granularity: Granularity) -> StorageResult<usize>;
}

/// Main storage trait that combines all storage operations
#[async_trait]
pub trait StorageTrait: ReportStorageTrait + RawValueStorageTrait + SummaryStorageTrait {
	/// Health check for the storage system
	async fn health_check(&self) -> StorageResult<bool>;

	/// Get overall storage statistics
	async fn stats(&self) -> StorageResult<StorageStats>;

	/// Close the storage connection
	async fn close(&self) -> StorageResult<()>;
}

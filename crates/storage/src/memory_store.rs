//! In-memory storage implementation using DashMap

use crate::traits::{
	RawValueStorage, ReportStorage, SeriesFilter, Storage, StorageError, StorageResult,
	StorageStats, SummaryStorage,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use perf_types::{Granularity, RawValue, Report, SummaryKey, SummaryRow, TimeRange};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// In-memory storage for reports, raw values and summaries
///
/// Summaries are keyed by (granularity, metric, target, bucket start), so a
/// second insert for the same bucket is rejected rather than stored twice.
#[derive(Clone, Default)]
pub struct MemoryStore {
	pub reports: Arc<DashMap<Uuid, Report>>,
	/// Values grouped by the report that carried them
	pub values: Arc<DashMap<Uuid, Vec<RawValue>>>,
	pub summaries: Arc<DashMap<SummaryKey, SummaryRow>>,
}

impl MemoryStore {
	/// Create a new memory store instance
	pub fn new() -> Self {
		Self::default()
	}

	/// Get all stored summaries of a granularity, ordered by (metric, target, time)
	pub fn all_summaries(&self, granularity: Granularity) -> Vec<SummaryRow> {
		let mut rows: Vec<SummaryRow> = self
			.summaries
			.iter()
			.filter(|entry| entry.key().granularity == granularity)
			.map(|entry| entry.value().clone())
			.collect();
		rows.sort_by(SummaryRow::cmp_series);
		rows
	}

	/// Remove every summary row, keeping reports and values
	pub fn clear_summaries(&self) -> usize {
		let removed = self.summaries.len();
		self.summaries.clear();
		if removed > 0 {
			info!("Cleared {} summary rows", removed);
		}
		removed
	}
}

// Trait implementations for pluggable storage

#[async_trait]
impl ReportStorage for MemoryStore {
	async fn add_report(&self, report: Report, values: Vec<RawValue>) -> StorageResult<()> {
		if self.reports.contains_key(&report.id) {
			return Err(StorageError::Duplicate {
				key: report.id.to_string(),
			});
		}
		debug!(
			"Storing report {} for target '{}' with {} values",
			report.id,
			report.target,
			values.len()
		);
		self.values.insert(report.id, values);
		self.reports.insert(report.id, report);
		Ok(())
	}

	async fn get_report(&self, report_id: Uuid) -> StorageResult<Option<Report>> {
		Ok(self.reports.get(&report_id).map(|r| r.clone()))
	}

	async fn report_time_range(&self, target: Option<&str>) -> StorageResult<Option<TimeRange>> {
		let mut range: Option<TimeRange> = None;
		for entry in self.reports.iter() {
			let report = entry.value();
			if report.is_error() || target.is_some_and(|t| t != report.target) {
				continue;
			}
			range = Some(match range {
				Some(r) => {
					TimeRange::new(r.start.min(report.pull_time), r.end.max(report.pull_time))
				},
				None => TimeRange::new(report.pull_time, report.pull_time),
			});
		}
		Ok(range)
	}

	async fn latest_error_report(&self, target: &str) -> StorageResult<Option<Report>> {
		Ok(self
			.reports
			.iter()
			.filter(|entry| entry.value().is_error() && entry.value().target == target)
			.max_by_key(|entry| entry.value().pull_time)
			.map(|entry| entry.value().clone()))
	}

	async fn report_count(&self) -> StorageResult<usize> {
		Ok(self.reports.len())
	}
}

#[async_trait]
impl RawValueStorage for MemoryStore {
	async fn query_values(&self, filter: &SeriesFilter) -> StorageResult<Vec<RawValue>> {
		if filter.is_empty_range() {
			return Ok(Vec::new());
		}

		let mut values = Vec::new();
		for entry in self.reports.iter() {
			let report = entry.value();
			if report.is_error() {
				continue;
			}
			if let Some(report_values) = self.values.get(&report.id) {
				values.extend(
					report_values
						.iter()
						.filter(|v| filter.matches(&v.metric, &v.target, v.timestamp))
						.cloned(),
				);
			}
		}
		values.sort_by(RawValue::cmp_series);
		Ok(values)
	}

	async fn value_count(&self) -> StorageResult<usize> {
		Ok(self.values.iter().map(|entry| entry.value().len()).sum())
	}
}

#[async_trait]
impl SummaryStorage for MemoryStore {
	async fn insert_summary(&self, row: SummaryRow) -> StorageResult<()> {
		match self.summaries.entry(row.key()) {
			Entry::Occupied(entry) => Err(StorageError::Duplicate {
				key: entry.key().to_string(),
			}),
			Entry::Vacant(entry) => {
				entry.insert(row);
				Ok(())
			},
		}
	}

	async fn query_summaries(
		&self,
		granularity: Granularity,
		filter: &SeriesFilter,
	) -> StorageResult<Vec<SummaryRow>> {
		if filter.is_empty_range() {
			return Ok(Vec::new());
		}

		let mut rows: Vec<SummaryRow> = self
			.summaries
			.iter()
			.filter_map(|entry| {
				let row = entry.value();
				if row.granularity == granularity
					&& filter.matches(&row.metric, &row.target, row.time)
				{
					Some(row.clone())
				} else {
					None
				}
			})
			.collect();
		rows.sort_by(SummaryRow::cmp_series);
		Ok(rows)
	}

	async fn last_summary_start(
		&self,
		granularity: Granularity,
	) -> StorageResult<Option<DateTime<Utc>>> {
		Ok(self
			.summaries
			.iter()
			.filter(|entry| entry.key().granularity == granularity)
			.map(|entry| entry.key().time)
			.max())
	}

	async fn summary_count(&self, granularity: Granularity) -> StorageResult<usize> {
		Ok(self
			.summaries
			.iter()
			.filter(|entry| entry.key().granularity == granularity)
			.count())
	}
}

#[async_trait]
impl Storage for MemoryStore {
	async fn health_check(&self) -> StorageResult<bool> {
		// For in-memory storage, just check if the maps are accessible
		Ok(true)
	}

	async fn stats(&self) -> StorageResult<StorageStats> {
		let total_reports = self.report_count().await?;
		let error_reports = self
			.reports
			.iter()
			.filter(|entry| entry.value().is_error())
			.count();
		let total_values = self.value_count().await?;

		let mut summaries = std::collections::BTreeMap::new();
		for granularity in Granularity::ALL {
			summaries.insert(granularity, self.summary_count(granularity).await?);
		}

		Ok(StorageStats {
			total_reports,
			error_reports,
			total_values,
			summaries,
		})
	}

	async fn close(&self) -> StorageResult<()> {
		// For memory store, there's nothing to close
		Ok(())
	}
}

//! Rollup engine: incremental resummarize and query assembly
//!
//! The resummarize pass persists every bucket whose finer data is final, level
//! by level in cascade order. Queries read the persisted rows and compute the
//! not-yet-persisted tail on the fly, so results never lag the scheduler.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::{BoxFuture, FutureExt};
use perf_storage::Storage;
use perf_types::{Granularity, GroupBy, RawValue, Registry, SeriesFilter, SummaryRow};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cascade::{Cascade, RollupLevel, RollupSource};
use crate::errors::RollupResult;
use crate::rollup::{summarize, CollectSink, PersistSink};

/// Default age a value must reach before it is rolled up
pub const DEFAULT_GRACE_PERIOD_HOURS: i64 = 6;

/// Restrictions for a series query; `start` inclusive, `end` exclusive
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesQuery {
	pub start: Option<DateTime<Utc>>,
	pub end: Option<DateTime<Utc>>,
	pub target: Option<String>,
	pub metric: Option<String>,
}

impl SeriesQuery {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
		self.start = Some(start);
		self.end = Some(end);
		self
	}

	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = Some(target.into());
		self
	}

	pub fn with_metric(mut self, metric: impl Into<String>) -> Self {
		self.metric = Some(metric.into());
		self
	}

	fn to_filter(&self) -> SeriesFilter {
		SeriesFilter::new(self.start, self.end)
			.with_target(self.target.clone())
			.with_metric(self.metric.clone())
	}
}

/// Result of a grouped query
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
	Values(Vec<RawValue>),
	Summaries(Vec<SummaryRow>),
}

impl SeriesData {
	pub fn len(&self) -> usize {
		match self {
			SeriesData::Values(values) => values.len(),
			SeriesData::Summaries(rows) => rows.len(),
		}
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Outcome of one level within a resummarize pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelReport {
	pub granularity: Granularity,
	/// First bucket considered, `None` when the level had no rows yet
	pub start: Option<DateTime<Utc>>,
	/// Exclusive end of the range considered
	pub end: DateTime<Utc>,
	pub written: usize,
	pub conflicts: usize,
}

/// Outcome of a resummarize pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResummarizeReport {
	pub cutoff: DateTime<Utc>,
	pub levels: Vec<LevelReport>,
}

impl ResummarizeReport {
	pub fn total_written(&self) -> usize {
		self.levels.iter().map(|l| l.written).sum()
	}

	pub fn total_conflicts(&self) -> usize {
		self.levels.iter().map(|l| l.conflicts).sum()
	}
}

/// Multi-resolution rollup engine
pub struct RollupEngine {
	storage: Arc<dyn Storage>,
	registry: Arc<Registry>,
	cascade: Cascade,
	grace_period: Duration,
	/// Serializes resummarize passes
	resummarize_lock: Mutex<()>,
}

impl RollupEngine {
	/// Create an engine with the standard cascade and a 6 hour grace period
	pub fn new(storage: Arc<dyn Storage>, registry: Arc<Registry>) -> Self {
		Self {
			storage,
			registry,
			cascade: Cascade::standard(),
			grace_period: Duration::hours(DEFAULT_GRACE_PERIOD_HOURS),
			resummarize_lock: Mutex::new(()),
		}
	}

	pub fn with_cascade(mut self, cascade: Cascade) -> Self {
		self.cascade = cascade;
		self
	}

	pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
		self.grace_period = grace_period;
		self
	}

	pub fn grace_period(&self) -> Duration {
		self.grace_period
	}

	pub fn cascade(&self) -> &Cascade {
		&self.cascade
	}

	pub fn registry(&self) -> &Registry {
		&self.registry
	}

	/// Bring every level up to date with data older than the grace period
	pub async fn run_resummarize(&self, now: DateTime<Utc>) -> RollupResult<ResummarizeReport> {
		self.resummarize_until(now - self.grace_period).await
	}

	/// Persist every complete bucket that ends at or before `cutoff`
	pub async fn resummarize_until(
		&self,
		cutoff: DateTime<Utc>,
	) -> RollupResult<ResummarizeReport> {
		let _guard = self.resummarize_lock.lock().await;

		let mut levels = Vec::with_capacity(self.cascade.levels().len());
		for level in self.cascade.levels() {
			levels.push(self.resummarize_level(*level, cutoff).await?);
		}

		let report = ResummarizeReport { cutoff, levels };
		info!(
			"Resummarized up to {}: {} rows written, {} conflicts",
			cutoff,
			report.total_written(),
			report.total_conflicts()
		);
		Ok(report)
	}

	async fn resummarize_level(
		&self,
		level: RollupLevel,
		cutoff: DateTime<Utc>,
	) -> RollupResult<LevelReport> {
		let granularity = level.granularity;
		let start = self
			.storage
			.last_summary_start(granularity)
			.await?
			.map(|last| granularity.next(last));
		let end = granularity.truncate(cutoff);
		let filter = SeriesFilter::new(start, Some(end));

		let mut report = LevelReport {
			granularity,
			start,
			end,
			written: 0,
			conflicts: 0,
		};
		if filter.is_empty_range() {
			debug!("{} summaries already current up to {}", granularity, end);
			return Ok(report);
		}

		let mut sink = PersistSink::new(self.storage.as_ref());
		match level.source {
			RollupSource::RawValues => {
				let values = self.storage.query_values(&filter).await?;
				summarize(granularity, values, &mut sink).await?;
			},
			RollupSource::Summaries(finer) => {
				let rows = self.storage.query_summaries(finer, &filter).await?;
				summarize(granularity, rows, &mut sink).await?;
			},
		}

		report.written = sink.written();
		report.conflicts = sink.conflicts();
		debug!(
			"{} summaries: wrote {} rows for [{:?}, {})",
			granularity, report.written, start, end
		);
		Ok(report)
	}

	/// Summaries of `granularity` for the query, persisted rows followed by
	/// freshly computed rows for the range past the last persisted bucket,
	/// ordered by (metric, target, time)
	pub async fn get_summaries(
		&self,
		granularity: Granularity,
		query: &SeriesQuery,
	) -> RollupResult<Vec<SummaryRow>> {
		self.check_names(query)?;
		let level = self.cascade.level(granularity)?;
		self.assemble(level, query.to_filter()).await
	}

	/// Raw values for the query, ordered by (metric, target, time)
	pub async fn get_values(&self, query: &SeriesQuery) -> RollupResult<Vec<RawValue>> {
		self.check_names(query)?;
		Ok(self.storage.query_values(&query.to_filter()).await?)
	}

	/// Raw values or summaries depending on `group_by`
	pub async fn query(&self, group_by: GroupBy, query: &SeriesQuery) -> RollupResult<SeriesData> {
		match group_by {
			GroupBy::None => self.get_values(query).await.map(SeriesData::Values),
			GroupBy::Summary(granularity) => self
				.get_summaries(granularity, query)
				.await
				.map(SeriesData::Summaries),
		}
	}

	fn check_names(&self, query: &SeriesQuery) -> RollupResult<()> {
		if let Some(target) = &query.target {
			self.registry.target(target)?;
		}
		if let Some(metric) = &query.metric {
			self.registry.metric(metric)?;
		}
		Ok(())
	}

	fn assemble(
		&self,
		level: RollupLevel,
		filter: SeriesFilter,
	) -> BoxFuture<'_, RollupResult<Vec<SummaryRow>>> {
		async move {
			let granularity = level.granularity;
			let bounded = SeriesFilter {
				start: filter.start.map(|start| granularity.truncate(start)),
				end: filter.end.map(|end| granularity.ceil(end)),
				..filter
			};

			// Persisted and computed ranges split at the end of the last
			// persisted bucket, read once so concurrent writes cannot move it
			let persisted_end = self
				.storage
				.last_summary_start(granularity)
				.await?
				.map(|last| granularity.next(last));

			let mut rows = match persisted_end {
				Some(persisted_end) => {
					let persisted = SeriesFilter {
						end: Some(bounded.end.map_or(persisted_end, |end| end.min(persisted_end))),
						..bounded.clone()
					};
					if persisted.is_empty_range() {
						Vec::new()
					} else {
						self.storage.query_summaries(granularity, &persisted).await?
					}
				},
				None => Vec::new(),
			};

			let gap_start = match persisted_end {
				Some(persisted_end) => {
					Some(bounded.start.map_or(persisted_end, |start| start.max(persisted_end)))
				},
				None => bounded.start,
			};
			let gap = SeriesFilter {
				start: gap_start,
				..bounded
			};
			if gap.is_empty_range() {
				return Ok(rows);
			}

			let mut sink = CollectSink::new();
			match level.source {
				RollupSource::RawValues => {
					let values = self.storage.query_values(&gap).await?;
					summarize(granularity, values, &mut sink).await?;
				},
				RollupSource::Summaries(finer) => {
					let finer_level = self.cascade.level(finer)?;
					let finer_rows = self.assemble(finer_level, gap).await?;
					summarize(granularity, finer_rows, &mut sink).await?;
				},
			}

			let tail = sink.into_rows();
			if !tail.is_empty() {
				debug!(
					"Computed {} unpersisted {} rows from {:?}",
					tail.len(),
					granularity,
					gap_start
				);
				rows.extend(tail);
				rows.sort_by(SummaryRow::cmp_series);
			}
			Ok(rows)
		}
		.boxed()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;
	use perf_storage::MemoryStore;
	use perf_types::{
		Machine, Metric, RawValueStorageTrait, Report, ReportStorageTrait, StorageResult,
		StorageStats, StorageTrait, SummaryStorageTrait, Target, TimeRange,
	};

	fn at(month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(2024, month, day, hour, minute, 0).unwrap()
	}

	fn registry() -> Arc<Registry> {
		let mut registry = Registry::new();
		registry.add_machine(Machine::new("m1")).unwrap();
		registry.add_target(Target::new("T", "m1")).unwrap();
		registry.add_target(Target::new("U", "m1")).unwrap();
		registry.add_metric(Metric::new("M")).unwrap();
		registry.add_metric(Metric::new("N")).unwrap();
		Arc::new(registry)
	}

	async fn add_value(
		store: &MemoryStore,
		target: &str,
		metric: &str,
		time: DateTime<Utc>,
		value: f64,
	) {
		let report = Report::new(target, "0".repeat(64), time, None);
		let raw = RawValue {
			report_id: report.id,
			metric: metric.to_string(),
			target: target.to_string(),
			timestamp: time,
			value,
		};
		store.add_report(report, vec![raw]).await.unwrap();
	}

	fn engine(store: &MemoryStore) -> RollupEngine {
		RollupEngine::new(Arc::new(store.clone()), registry())
	}

	#[tokio::test]
	async fn test_six_hour_and_day_rollup() {
		let store = MemoryStore::new();
		add_value(&store, "T", "M", at(1, 1, 0, 10), 10.0).await;
		add_value(&store, "T", "M", at(1, 1, 0, 5), 10.0).await;
		add_value(&store, "T", "M", at(1, 1, 5, 50), 20.0).await;

		let engine = engine(&store);
		engine.run_resummarize(at(1, 3, 0, 0)).await.unwrap();

		let six = store.all_summaries(Granularity::Hour6);
		assert_eq!(six.len(), 1);
		assert_eq!(six[0].time, at(1, 1, 0, 0));
		assert_eq!((six[0].min_value, six[0].max_value, six[0].count), (10.0, 20.0, 3));
		assert!((six[0].avg_value - 13.333_333).abs() < 1e-3);

		let day = store.all_summaries(Granularity::Day);
		assert_eq!(day.len(), 1);
		assert_eq!(day[0].time, at(1, 1, 0, 0));
		assert_eq!(
			(day[0].min_value, day[0].max_value, day[0].count),
			(six[0].min_value, six[0].max_value, 3)
		);
		assert!((day[0].avg_value - six[0].avg_value).abs() < 1e-9);
	}

	#[tokio::test]
	async fn test_grace_period_holds_back_recent_data() {
		let store = MemoryStore::new();
		add_value(&store, "T", "M", at(1, 1, 7, 0), 1.0).await;

		// cutoff = 09:00, two hours after the value; its bucket ends at 12:00
		let report = engine(&store).run_resummarize(at(1, 1, 15, 0)).await.unwrap();
		assert_eq!(report.cutoff, at(1, 1, 9, 0));
		assert_eq!(report.total_written(), 0);
		assert!(store.all_summaries(Granularity::Hour6).is_empty());
	}

	#[tokio::test]
	async fn test_resummarize_is_idempotent() {
		let store = MemoryStore::new();
		for day in 1..=10 {
			add_value(&store, "T", "M", at(1, day, 3, 0), day as f64).await;
			add_value(&store, "U", "M", at(1, day, 13, 0), 2.0 * day as f64).await;
		}

		let engine = engine(&store);
		let now = at(1, 20, 0, 0);
		let first = engine.run_resummarize(now).await.unwrap();
		assert!(first.total_written() > 0);
		let stats = store.stats().await.unwrap();

		let second = engine.run_resummarize(now).await.unwrap();
		assert_eq!(second.total_written(), 0);
		assert_eq!(second.total_conflicts(), 0);
		assert_eq!(store.stats().await.unwrap().summaries, stats.summaries);

		// An earlier cutoff must not write anything either
		let earlier = engine.run_resummarize(at(1, 12, 0, 0)).await.unwrap();
		assert_eq!(earlier.total_written(), 0);
	}

	#[tokio::test]
	async fn test_week_and_month_are_built_from_days() {
		let store = MemoryStore::new();
		// Monday 2024-01-29 through Sunday 2024-02-04
		for day in 29..=31 {
			add_value(&store, "T", "M", at(1, day, 12, 0), 1.0).await;
		}
		for day in 1..=4 {
			add_value(&store, "T", "M", at(2, day, 12, 0), 3.0).await;
		}

		engine(&store).run_resummarize(at(3, 2, 0, 0)).await.unwrap();

		let weeks = store.all_summaries(Granularity::Week);
		assert_eq!(weeks.len(), 1);
		assert_eq!(weeks[0].time, at(1, 29, 0, 0));
		assert_eq!(weeks[0].count, 7);
		assert!((weeks[0].avg_value - 15.0 / 7.0).abs() < 1e-9);

		let months = store.all_summaries(Granularity::Month);
		let summary: Vec<(DateTime<Utc>, u64)> = months.iter().map(|r| (r.time, r.count)).collect();
		assert_eq!(summary, vec![(at(1, 1, 0, 0), 3), (at(2, 1, 0, 0), 4)]);
	}

	#[tokio::test]
	async fn test_query_blends_persisted_and_unpersisted_rows() {
		let store = MemoryStore::new();
		add_value(&store, "T", "M", at(1, 1, 1, 0), 1.0).await;
		add_value(&store, "T", "M", at(1, 1, 8, 0), 2.0).await;
		add_value(&store, "T", "M", at(1, 1, 14, 0), 3.0).await;

		let engine = engine(&store);
		// Persists only the 00:00 and 06:00 six-hour buckets
		engine.resummarize_until(at(1, 1, 12, 0)).await.unwrap();
		assert_eq!(store.all_summaries(Granularity::Hour6).len(), 2);

		let rows = engine
			.get_summaries(Granularity::Hour6, &SeriesQuery::new())
			.await
			.unwrap();
		let times: Vec<DateTime<Utc>> = rows.iter().map(|r| r.time).collect();
		assert_eq!(times, vec![at(1, 1, 0, 0), at(1, 1, 6, 0), at(1, 1, 12, 0)]);

		let days = engine
			.get_summaries(Granularity::Day, &SeriesQuery::new())
			.await
			.unwrap();
		assert_eq!(days.len(), 1);
		assert_eq!(days[0].count, 3);
		assert_eq!(days[0].avg_value, 2.0);

		// Nothing unpersisted was written
		assert_eq!(store.all_summaries(Granularity::Hour6).len(), 2);
		assert!(store.all_summaries(Granularity::Day).is_empty());
	}

	#[tokio::test]
	async fn test_query_end_inside_bucket_includes_whole_bucket() {
		let store = MemoryStore::new();
		add_value(&store, "T", "M", at(1, 2, 1, 0), 1.0).await;
		add_value(&store, "T", "M", at(1, 2, 23, 0), 5.0).await;
		add_value(&store, "T", "M", at(1, 3, 1, 0), 9.0).await;

		let query = SeriesQuery::new().between(at(1, 1, 0, 0), at(1, 2, 1, 30));
		let rows = engine(&store)
			.get_summaries(Granularity::Day, &query)
			.await
			.unwrap();

		assert_eq!(rows.len(), 1);
		assert_eq!(rows[0].time, at(1, 2, 0, 0));
		assert_eq!(rows[0].count, 2);
		assert_eq!(rows[0].max_value, 5.0);
	}

	#[tokio::test]
	async fn test_query_start_before_persisted_end_is_not_counted_twice() {
		let store = MemoryStore::new();
		for hour in [1, 7, 13, 19] {
			add_value(&store, "T", "M", at(1, 1, hour, 0), 1.0).await;
		}

		let engine = engine(&store);
		engine.resummarize_until(at(1, 1, 12, 0)).await.unwrap();

		let query = SeriesQuery::new().between(at(1, 1, 0, 0), at(1, 2, 0, 0));
		let rows = engine
			.get_summaries(Granularity::Hour6, &query)
			.await
			.unwrap();
		assert_eq!(rows.len(), 4);
		assert!(rows.iter().all(|r| r.count == 1));
	}

	#[tokio::test]
	async fn test_query_filters_and_orders_series() {
		let store = MemoryStore::new();
		add_value(&store, "U", "N", at(1, 1, 1, 0), 1.0).await;
		add_value(&store, "T", "N", at(1, 1, 2, 0), 2.0).await;
		add_value(&store, "T", "M", at(1, 1, 3, 0), 3.0).await;

		let engine = engine(&store);
		let rows = engine
			.get_summaries(Granularity::Hour6, &SeriesQuery::new())
			.await
			.unwrap();
		let series: Vec<(&str, &str)> = rows
			.iter()
			.map(|r| (r.metric.as_str(), r.target.as_str()))
			.collect();
		assert_eq!(series, vec![("M", "T"), ("N", "T"), ("N", "U")]);

		let only_t = engine
			.get_summaries(Granularity::Hour6, &SeriesQuery::new().with_target("T").with_metric("N"))
			.await
			.unwrap();
		assert_eq!(only_t.len(), 1);
		assert_eq!(only_t[0].avg_value, 2.0);
	}

	#[tokio::test]
	async fn test_empty_store_returns_nothing() {
		let store = MemoryStore::new();
		let engine = engine(&store);
		let data = engine
			.query(GroupBy::Summary(Granularity::Month), &SeriesQuery::new())
			.await
			.unwrap();
		assert!(data.is_empty());

		let report = engine.run_resummarize(at(6, 1, 0, 0)).await.unwrap();
		assert_eq!(report.total_written(), 0);
	}

	#[tokio::test]
	async fn test_unknown_names_are_rejected() {
		let store = MemoryStore::new();
		let engine = engine(&store);
		let result = engine
			.get_values(&SeriesQuery::new().with_target("nope"))
			.await;
		assert!(matches!(result, Err(crate::errors::RollupError::Registry(_))));
	}

	#[tokio::test]
	async fn test_level_outside_cascade_is_rejected() {
		let store = MemoryStore::new();
		let cascade = Cascade::new(vec![RollupLevel::from_raw(Granularity::Day)]).unwrap();
		let engine = engine(&store).with_cascade(cascade);
		let result = engine
			.get_summaries(Granularity::Hour6, &SeriesQuery::new())
			.await;
		assert!(matches!(
			result,
			Err(crate::errors::RollupError::UnknownLevel { .. })
		));
	}

	#[tokio::test]
	async fn test_raw_values_query() {
		let store = MemoryStore::new();
		add_value(&store, "T", "M", at(1, 1, 2, 0), 2.0).await;
		add_value(&store, "T", "M", at(1, 1, 1, 0), 1.0).await;

		let data = engine(&store)
			.query(GroupBy::None, &SeriesQuery::new().with_metric("M"))
			.await
			.unwrap();
		match data {
			SeriesData::Values(values) => {
				assert_eq!(values.iter().map(|v| v.value).collect::<Vec<_>>(), vec![1.0, 2.0]);
			},
			other => panic!("expected raw values, got {:?}", other),
		}
	}

	/// Memory store that persists `pending` right after the first summary read
	/// of its granularity, as a concurrent resummarize pass would
	struct InterleavedWriteStore {
		inner: MemoryStore,
		pending: std::sync::Mutex<Option<SummaryRow>>,
	}

	#[async_trait::async_trait]
	impl ReportStorageTrait for InterleavedWriteStore {
		async fn add_report(&self, report: Report, values: Vec<RawValue>) -> StorageResult<()> {
			self.inner.add_report(report, values).await
		}

		async fn get_report(&self, report_id: uuid::Uuid) -> StorageResult<Option<Report>> {
			self.inner.get_report(report_id).await
		}

		async fn report_time_range(&self, target: Option<&str>) -> StorageResult<Option<TimeRange>> {
			self.inner.report_time_range(target).await
		}

		async fn latest_error_report(&self, target: &str) -> StorageResult<Option<Report>> {
			self.inner.latest_error_report(target).await
		}

		async fn report_count(&self) -> StorageResult<usize> {
			self.inner.report_count().await
		}
	}

	#[async_trait::async_trait]
	impl RawValueStorageTrait for InterleavedWriteStore {
		async fn query_values(&self, filter: &SeriesFilter) -> StorageResult<Vec<RawValue>> {
			self.inner.query_values(filter).await
		}

		async fn value_count(&self) -> StorageResult<usize> {
			self.inner.value_count().await
		}
	}

	#[async_trait::async_trait]
	impl SummaryStorageTrait for InterleavedWriteStore {
		async fn insert_summary(&self, row: SummaryRow) -> StorageResult<()> {
			self.inner.insert_summary(row).await
		}

		async fn query_summaries(
			&self,
			granularity: Granularity,
			filter: &SeriesFilter,
		) -> StorageResult<Vec<SummaryRow>> {
			let rows = self.inner.query_summaries(granularity, filter).await?;
			let pending = {
				let mut pending = self.pending.lock().unwrap();
				match pending.as_ref() {
					Some(row) if row.granularity == granularity => pending.take(),
					_ => None,
				}
			};
			if let Some(row) = pending {
				self.inner.insert_summary(row).await?;
			}
			Ok(rows)
		}

		async fn last_summary_start(
			&self,
			granularity: Granularity,
		) -> StorageResult<Option<DateTime<Utc>>> {
			self.inner.last_summary_start(granularity).await
		}

		async fn summary_count(&self, granularity: Granularity) -> StorageResult<usize> {
			self.inner.summary_count(granularity).await
		}
	}

	#[async_trait::async_trait]
	impl StorageTrait for InterleavedWriteStore {
		async fn health_check(&self) -> StorageResult<bool> {
			self.inner.health_check().await
		}

		async fn stats(&self) -> StorageResult<StorageStats> {
			self.inner.stats().await
		}

		async fn close(&self) -> StorageResult<()> {
			self.inner.close().await
		}
	}

	#[tokio::test]
	async fn test_query_keeps_bucket_persisted_during_query() {
		let store = MemoryStore::new();
		add_value(&store, "T", "M", at(1, 1, 1, 0), 1.0).await;
		add_value(&store, "T", "M", at(1, 1, 7, 0), 2.0).await;
		engine(&store).resummarize_until(at(1, 1, 6, 0)).await.unwrap();
		assert_eq!(store.summary_count(Granularity::Hour6).await.unwrap(), 1);

		let late_row = SummaryRow {
			granularity: Granularity::Hour6,
			target: "T".to_string(),
			metric: "M".to_string(),
			time: at(1, 1, 6, 0),
			min_value: 2.0,
			max_value: 2.0,
			avg_value: 2.0,
			count: 1,
		};
		let interleaved = InterleavedWriteStore {
			inner: store.clone(),
			pending: std::sync::Mutex::new(Some(late_row.clone())),
		};
		let engine = RollupEngine::new(Arc::new(interleaved), registry());

		let rows = engine
			.get_summaries(Granularity::Hour6, &SeriesQuery::new())
			.await
			.unwrap();

		assert_eq!(
			rows.iter().map(|r| r.time).collect::<Vec<_>>(),
			vec![at(1, 1, 0, 0), at(1, 1, 6, 0)]
		);
		assert_eq!(rows[1], late_row);
		assert_eq!(store.summary_count(Granularity::Hour6).await.unwrap(), 2);
	}
}

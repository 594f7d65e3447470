//! Streaming aggregation of ordered records into summary rows
//!
//! Records arrive ordered by (metric, target, time). Consecutive records that
//! share a metric, a target and a bucket are folded into one open bucket; when
//! the key changes the open bucket is flushed to a [`SummarySink`]. Only the
//! open bucket is held in memory.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use perf_types::{Granularity, RawValue, SummaryRow, SummaryStorageTrait};
use tracing::warn;

use crate::errors::{RollupError, RollupResult};

/// One contribution to a bucket: a raw value or a finer summary
#[derive(Debug, Clone, PartialEq)]
pub struct RollupInput {
	pub metric: String,
	pub target: String,
	pub time: DateTime<Utc>,
	pub min_value: f64,
	pub max_value: f64,
	pub avg_value: f64,
	pub count: u64,
}

impl From<RawValue> for RollupInput {
	fn from(value: RawValue) -> Self {
		Self {
			metric: value.metric,
			target: value.target,
			time: value.timestamp,
			min_value: value.value,
			max_value: value.value,
			avg_value: value.value,
			count: 1,
		}
	}
}

impl From<SummaryRow> for RollupInput {
	fn from(row: SummaryRow) -> Self {
		Self {
			metric: row.metric,
			target: row.target,
			time: row.time,
			min_value: row.min_value,
			max_value: row.max_value,
			avg_value: row.avg_value,
			count: row.count,
		}
	}
}

/// Running totals for the bucket currently being built
#[derive(Debug, Clone)]
struct OpenBucket {
	metric: String,
	target: String,
	bucket: DateTime<Utc>,
	last_time: DateTime<Utc>,
	min_value: f64,
	max_value: f64,
	weighted_sum: f64,
	count: u64,
}

impl OpenBucket {
	fn seed(input: RollupInput, bucket: DateTime<Utc>) -> Self {
		Self {
			weighted_sum: input.avg_value * input.count as f64,
			min_value: input.min_value,
			max_value: input.max_value,
			count: input.count,
			last_time: input.time,
			bucket,
			metric: input.metric,
			target: input.target,
		}
	}

	fn fold(&mut self, input: &RollupInput) {
		self.min_value = self.min_value.min(input.min_value);
		self.max_value = self.max_value.max(input.max_value);
		self.weighted_sum += input.avg_value * input.count as f64;
		self.count += input.count;
		self.last_time = input.time;
	}

	fn same_series(&self, input: &RollupInput) -> bool {
		self.metric == input.metric && self.target == input.target
	}

	fn into_row(self, granularity: Granularity) -> Option<SummaryRow> {
		if self.count == 0 {
			return None;
		}
		Some(SummaryRow {
			granularity,
			target: self.target,
			metric: self.metric,
			time: self.bucket,
			min_value: self.min_value,
			max_value: self.max_value,
			avg_value: self.weighted_sum / self.count as f64,
			count: self.count,
		})
	}
}

/// Group-by accumulator for one granularity
///
/// Rejects input that goes backwards in (metric, target, time) order instead
/// of silently producing split or duplicated buckets.
#[derive(Debug)]
pub struct BucketAccumulator {
	granularity: Granularity,
	open: Option<OpenBucket>,
}

impl BucketAccumulator {
	pub fn new(granularity: Granularity) -> Self {
		Self {
			granularity,
			open: None,
		}
	}

	/// Fold one record in, returning the previous bucket if this record closed it
	pub fn push(&mut self, input: RollupInput) -> RollupResult<Option<SummaryRow>> {
		let bucket = self.granularity.truncate(input.time);

		if let Some(open) = self.open.as_mut() {
			Self::check_order(self.granularity, open, &input)?;
			if open.same_series(&input) && open.bucket == bucket {
				open.fold(&input);
				return Ok(None);
			}
		}

		let closed = self.open.replace(OpenBucket::seed(input, bucket));
		Ok(closed.and_then(|open| open.into_row(self.granularity)))
	}

	/// Flush the last open bucket
	pub fn finish(self) -> Option<SummaryRow> {
		let granularity = self.granularity;
		self.open.and_then(|open| open.into_row(granularity))
	}

	fn check_order(
		granularity: Granularity,
		open: &OpenBucket,
		input: &RollupInput,
	) -> RollupResult<()> {
		let series = (input.metric.as_str(), input.target.as_str());
		let previous = (open.metric.as_str(), open.target.as_str());
		let in_order = if series == previous {
			input.time >= open.last_time
		} else {
			series > previous
		};

		if in_order {
			Ok(())
		} else {
			Err(RollupError::UnsortedInput {
				granularity,
				metric: input.metric.clone(),
				target: input.target.clone(),
				time: input.time,
				previous: format!(
					"{}/{}@{}",
					open.metric,
					open.target,
					open.last_time.format("%Y-%m-%d %H:%M:%S")
				),
			})
		}
	}
}

/// Destination of flushed summary rows
#[async_trait]
pub trait SummarySink: Send {
	async fn accept(&mut self, row: SummaryRow) -> RollupResult<()>;
}

/// Keeps flushed rows in memory without persisting them
#[derive(Debug, Default)]
pub struct CollectSink {
	rows: Vec<SummaryRow>,
}

impl CollectSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn into_rows(self) -> Vec<SummaryRow> {
		self.rows
	}
}

#[async_trait]
impl SummarySink for CollectSink {
	async fn accept(&mut self, row: SummaryRow) -> RollupResult<()> {
		self.rows.push(row);
		Ok(())
	}
}

/// Writes flushed rows to summary storage
///
/// A row rejected as a duplicate is already stored with the same content, so
/// the conflict is logged and counted instead of failing the run. Any other
/// storage error is returned.
pub struct PersistSink<'a, S: SummaryStorageTrait + ?Sized> {
	storage: &'a S,
	written: usize,
	conflicts: usize,
}

impl<'a, S: SummaryStorageTrait + ?Sized> PersistSink<'a, S> {
	pub fn new(storage: &'a S) -> Self {
		Self {
			storage,
			written: 0,
			conflicts: 0,
		}
	}

	/// Rows written by this sink
	pub fn written(&self) -> usize {
		self.written
	}

	/// Rows skipped because the bucket was already stored
	pub fn conflicts(&self) -> usize {
		self.conflicts
	}
}

#[async_trait]
impl<'a, S: SummaryStorageTrait + ?Sized> SummarySink for PersistSink<'a, S> {
	async fn accept(&mut self, row: SummaryRow) -> RollupResult<()> {
		let key = row.key();
		match self.storage.insert_summary(row).await {
			Ok(()) => {
				self.written += 1;
				Ok(())
			},
			Err(e) if e.is_duplicate() => {
				warn!("Summary {} already stored, skipping", key);
				self.conflicts += 1;
				Ok(())
			},
			Err(e) => Err(RollupError::Storage(e)),
		}
	}
}

/// Aggregate ordered records into `granularity` buckets, flushing every
/// completed bucket into `sink`. Returns the number of rows flushed.
pub async fn summarize<I, S>(granularity: Granularity, records: I, sink: &mut S) -> RollupResult<usize>
where
	I: IntoIterator,
	I::Item: Into<RollupInput>,
	I::IntoIter: Send,
	S: SummarySink + ?Sized,
{
	let mut accumulator = BucketAccumulator::new(granularity);
	let mut flushed = 0;

	for record in records {
		if let Some(row) = accumulator.push(record.into())? {
			sink.accept(row).await?;
			flushed += 1;
		}
	}

	if let Some(row) = accumulator.finish() {
		sink.accept(row).await?;
		flushed += 1;
	}

	Ok(flushed)
}

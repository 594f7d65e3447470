//! Summary rows produced by the rollup cascade

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::granularity::Granularity;

/// Aggregate of every contribution to one (granularity, metric, target) bucket
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SummaryRow {
	pub granularity: Granularity,
	pub target: String,
	pub metric: String,
	/// Bucket start; always truncated to `granularity`
	pub time: DateTime<Utc>,
	pub min_value: f64,
	pub max_value: f64,
	/// Count-weighted mean of the contributing values
	pub avg_value: f64,
	pub count: u64,
}

impl SummaryRow {
	/// Uniqueness key of this row within the summary store
	pub fn key(&self) -> SummaryKey {
		SummaryKey {
			granularity: self.granularity,
			metric: self.metric.clone(),
			target: self.target.clone(),
			time: self.time,
		}
	}

	/// Start of the bucket after this one
	pub fn end(&self) -> DateTime<Utc> {
		self.granularity.next(self.time)
	}

	/// Series order: (metric, target, time)
	pub fn cmp_series(&self, other: &Self) -> Ordering {
		self.metric
			.cmp(&other.metric)
			.then_with(|| self.target.cmp(&other.target))
			.then_with(|| self.time.cmp(&other.time))
	}
}

/// Identity of a summary bucket: at most one row exists per key
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SummaryKey {
	pub granularity: Granularity,
	pub metric: String,
	pub target: String,
	pub time: DateTime<Utc>,
}

impl std::fmt::Display for SummaryKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}/{}/{}@{}",
			self.granularity,
			self.metric,
			self.target,
			self.time.format("%Y-%m-%d %H:%M:%S")
		)
	}
}

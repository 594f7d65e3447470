//! Raw reported values

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use uuid::Uuid;

/// One measurement of one metric, taken from one report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawValue {
	/// Report this value arrived in
	pub report_id: Uuid,
	pub metric: String,
	pub target: String,
	/// Pull time of the report, after clock adjustment
	pub timestamp: DateTime<Utc>,
	pub value: f64,
}

impl RawValue {
	/// Series order: (metric, target, time)
	pub fn cmp_series(&self, other: &Self) -> Ordering {
		self.metric
			.cmp(&other.metric)
			.then_with(|| self.target.cmp(&other.target))
			.then_with(|| self.timestamp.cmp(&other.timestamp))
	}
}

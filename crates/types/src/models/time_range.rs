//! Half-open time ranges

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Time range representation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeRange {
	/// Start of the time range (inclusive)
	pub start: DateTime<Utc>,
	/// End of the time range (exclusive)
	pub end: DateTime<Utc>,
}

impl TimeRange {
	/// Create a new time range
	pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
		Self { start, end }
	}

	/// Check if a timestamp falls within this range
	pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
		timestamp >= self.start && timestamp < self.end
	}

	/// Get the duration of this time range
	pub fn duration(&self) -> Duration {
		self.end - self.start
	}
}

//! Target and machine identities

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// A reporting machine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Machine {
	pub name: String,
	/// Seconds added to every pull time reported by this machine to correct
	/// for a skewed clock
	pub time_adjust_sec: i64,
}

impl Machine {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			time_adjust_sec: 0,
		}
	}

	pub fn with_time_adjust(mut self, seconds: i64) -> Self {
		self.time_adjust_sec = seconds;
		self
	}

	/// Clock correction applied to this machine's reports
	pub fn clock_adjustment(&self) -> Duration {
		Duration::seconds(self.time_adjust_sec)
	}
}

/// A machine/partition/tree/testset combination values are reported for
///
/// The name is opaque to the rollup engine; only the owning machine is needed
/// to correct report timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Target {
	pub name: String,
	pub machine: String,
}

impl Target {
	pub fn new(name: impl Into<String>, machine: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			machine: machine.into(),
		}
	}
}

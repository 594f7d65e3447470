//! Time bucket granularities for the rollup cascade
//!
//! Each granularity is a pair of pure functions: `truncate` maps a timestamp to
//! the start of the bucket containing it, and `next` maps a bucket start to the
//! start of the following bucket. All arithmetic is in UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an unknown granularity name
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid group type: {name}")]
pub struct ParseGranularityError {
	pub name: String,
}

/// Resolution level of a summary
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
	/// Blocks starting at 00:00, 06:00, 12:00 and 18:00
	Hour6,
	/// Calendar days starting at midnight
	Day,
	/// Weeks starting Monday at midnight
	Week,
	/// Calendar months starting on day 1 at midnight
	Month,
}

impl Granularity {
	/// Every granularity, finest first
	pub const ALL: [Granularity; 4] = [
		Granularity::Hour6,
		Granularity::Day,
		Granularity::Week,
		Granularity::Month,
	];

	/// Get string representation
	pub fn as_str(&self) -> &'static str {
		match self {
			Granularity::Hour6 => "hour6",
			Granularity::Day => "day",
			Granularity::Week => "week",
			Granularity::Month => "month",
		}
	}

	/// Start of the bucket containing `timestamp`
	pub fn truncate(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
		let midnight = midnight_of(timestamp.date_naive());
		match self {
			Granularity::Hour6 => {
				let hour = timestamp.hour() - timestamp.hour() % 6;
				midnight + Duration::hours(hour as i64)
			},
			Granularity::Day => midnight,
			Granularity::Week => {
				let days_since_monday = timestamp.weekday().num_days_from_monday();
				midnight - Duration::days(days_since_monday as i64)
			},
			Granularity::Month => {
				midnight - Duration::days(timestamp.day0() as i64)
			},
		}
	}

	/// Start of the bucket following the one starting at `bucket_start`
	///
	/// `bucket_start` must already be truncated for this granularity. Saturates
	/// at the end of the representable range.
	pub fn next(&self, bucket_start: DateTime<Utc>) -> DateTime<Utc> {
		match self {
			Granularity::Hour6 => saturating_add(bucket_start, Duration::hours(6)),
			Granularity::Day => saturating_add(bucket_start, Duration::days(1)),
			Granularity::Week => saturating_add(bucket_start, Duration::weeks(1)),
			Granularity::Month => {
				let (year, month) = if bucket_start.month() == 12 {
					(bucket_start.year() + 1, 1)
				} else {
					(bucket_start.year(), bucket_start.month() + 1)
				};
				NaiveDate::from_ymd_opt(year, month, 1)
					.map(midnight_of)
					.unwrap_or(DateTime::<Utc>::MAX_UTC)
			},
		}
	}

	/// Whether `timestamp` is the start of a bucket
	pub fn is_boundary(&self, timestamp: DateTime<Utc>) -> bool {
		self.truncate(timestamp) == timestamp
	}

	/// Round `timestamp` up to the nearest bucket boundary
	///
	/// A timestamp falling mid-bucket yields the end of that bucket, so a range
	/// ending there covers the whole bucket.
	pub fn ceil(&self, timestamp: DateTime<Utc>) -> DateTime<Utc> {
		let truncated = self.truncate(timestamp);
		if truncated == timestamp {
			truncated
		} else {
			self.next(truncated)
		}
	}

	/// Whether every bucket boundary of `self` is also a boundary of `finer`,
	/// so that summaries of `finer` roll up into `self` without splitting.
	pub fn is_built_from(&self, finer: Granularity) -> bool {
		match (finer, self) {
			(Granularity::Hour6, Granularity::Day)
			| (Granularity::Hour6, Granularity::Week)
			| (Granularity::Hour6, Granularity::Month)
			| (Granularity::Day, Granularity::Week)
			| (Granularity::Day, Granularity::Month) => true,
			// A month isn't a whole number of weeks
			_ => false,
		}
	}
}

fn midnight_of(date: NaiveDate) -> DateTime<Utc> {
	date.and_time(NaiveTime::MIN).and_utc()
}

fn saturating_add(timestamp: DateTime<Utc>, step: Duration) -> DateTime<Utc> {
	timestamp
		.checked_add_signed(step)
		.unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl fmt::Display for Granularity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_str())
	}
}

impl FromStr for Granularity {
	type Err = ParseGranularityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"hour6" => Ok(Granularity::Hour6),
			"day" => Ok(Granularity::Day),
			"week" => Ok(Granularity::Week),
			"month" => Ok(Granularity::Month),
			_ => Err(ParseGranularityError {
				name: s.to_string(),
			}),
		}
	}
}

/// How a series query groups its values: raw, or summarized at a granularity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupBy {
	#[default]
	None,
	Summary(Granularity),
}

impl FromStr for GroupBy {
	type Err = ParseGranularityError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"none" => Ok(GroupBy::None),
			other => other.parse().map(GroupBy::Summary),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::TimeZone;

	fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
		Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
	}

	#[test]
	fn test_next_saturates_at_end_of_range() {
		let last = DateTime::<Utc>::MAX_UTC;
		for g in Granularity::ALL {
			assert_eq!(g.next(last), last);
		}
	}

	#[test]
	fn test_hour6_truncate_and_next() {
		let g = Granularity::Hour6;
		assert_eq!(g.truncate(at(2024, 1, 1, 5, 50)), at(2024, 1, 1, 0, 0));
		assert_eq!(g.truncate(at(2024, 1, 1, 6, 0)), at(2024, 1, 1, 6, 0));
		assert_eq!(g.truncate(at(2024, 1, 1, 23, 59)), at(2024, 1, 1, 18, 0));
		assert_eq!(g.next(at(2024, 1, 1, 18, 0)), at(2024, 1, 2, 0, 0));
	}

	#[test]
	fn test_truncate_drops_subseconds() {
		let t = at(2024, 3, 5, 13, 7) + Duration::milliseconds(250);
		assert_eq!(Granularity::Hour6.truncate(t), at(2024, 3, 5, 12, 0));
		assert_eq!(Granularity::Day.truncate(t), at(2024, 3, 5, 0, 0));
	}

	#[test]
	fn test_week_starts_on_monday() {
		let g = Granularity::Week;
		// 2024-01-07 is a Sunday, 2024-01-08 a Monday
		assert_eq!(g.truncate(at(2024, 1, 7, 22, 0)), at(2024, 1, 1, 0, 0));
		assert_eq!(g.truncate(at(2024, 1, 8, 0, 0)), at(2024, 1, 8, 0, 0));
		// Week crossing a year boundary
		assert_eq!(g.truncate(at(2025, 1, 1, 12, 0)), at(2024, 12, 30, 0, 0));
		assert_eq!(g.next(at(2024, 12, 30, 0, 0)), at(2025, 1, 6, 0, 0));
	}

	#[test]
	fn test_month_rolls_over_year() {
		let g = Granularity::Month;
		assert_eq!(g.truncate(at(2024, 2, 29, 10, 0)), at(2024, 2, 1, 0, 0));
		assert_eq!(g.next(at(2024, 2, 1, 0, 0)), at(2024, 3, 1, 0, 0));
		assert_eq!(g.next(at(2024, 12, 1, 0, 0)), at(2025, 1, 1, 0, 0));
	}

	#[test]
	fn test_bucket_contract_holds_for_all_granularities() {
		let samples = [
			at(2023, 12, 31, 23, 59),
			at(2024, 1, 1, 0, 0),
			at(2024, 2, 29, 12, 30),
			at(2024, 6, 15, 6, 1),
			at(2024, 12, 1, 0, 0),
		];
		for g in Granularity::ALL {
			for t in samples {
				let start = g.truncate(t);
				assert_eq!(g.truncate(start), start, "{} truncate not idempotent", g);
				assert!(start <= t);
				let next = g.next(start);
				assert!(next > start);
				assert!(next > t);
				assert_eq!(g.truncate(next), next, "{} next not on a boundary", g);
			}
		}
	}

	#[test]
	fn test_ceil_includes_partial_bucket() {
		let g = Granularity::Day;
		assert_eq!(g.ceil(at(2024, 1, 1, 0, 0)), at(2024, 1, 1, 0, 0));
		assert_eq!(g.ceil(at(2024, 1, 1, 0, 1)), at(2024, 1, 2, 0, 0));
	}

	#[test]
	fn test_is_built_from() {
		assert!(Granularity::Day.is_built_from(Granularity::Hour6));
		assert!(Granularity::Week.is_built_from(Granularity::Day));
		assert!(Granularity::Month.is_built_from(Granularity::Day));
		assert!(!Granularity::Month.is_built_from(Granularity::Week));
		assert!(!Granularity::Day.is_built_from(Granularity::Day));
		assert!(!Granularity::Hour6.is_built_from(Granularity::Day));
	}

	#[test]
	fn test_parse_group_names() {
		assert_eq!("hour6".parse::<Granularity>(), Ok(Granularity::Hour6));
		assert_eq!("month".parse::<GroupBy>(), Ok(GroupBy::Summary(Granularity::Month)));
		assert_eq!("none".parse::<GroupBy>(), Ok(GroupBy::None));
		assert!("year".parse::<Granularity>().is_err());
	}
}

//! Rollup cascade: which level each granularity is built from
//!
//! The dependency chain is plain data. Each level names its source explicitly
//! and levels are kept in the order they have to be brought up to date.

use perf_types::Granularity;

use crate::errors::{RollupError, RollupResult};

/// Where a rollup level reads its input from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollupSource {
	/// Raw reported values
	RawValues,
	/// Persisted summaries of a finer granularity
	Summaries(Granularity),
}

/// One granularity bound to its finer source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RollupLevel {
	pub granularity: Granularity,
	pub source: RollupSource,
}

impl RollupLevel {
	pub fn from_raw(granularity: Granularity) -> Self {
		Self {
			granularity,
			source: RollupSource::RawValues,
		}
	}

	pub fn from_summaries(granularity: Granularity, finer: Granularity) -> Self {
		Self {
			granularity,
			source: RollupSource::Summaries(finer),
		}
	}
}

/// Ordered list of rollup levels, finest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cascade {
	levels: Vec<RollupLevel>,
}

impl Cascade {
	/// Build a cascade, checking that every level's source is listed before it
	/// and that each coarse bucket is made of whole finer buckets
	pub fn new(levels: Vec<RollupLevel>) -> RollupResult<Self> {
		for (index, level) in levels.iter().enumerate() {
			let earlier = &levels[..index];
			if earlier.iter().any(|l| l.granularity == level.granularity) {
				return Err(RollupError::InvalidCascade {
					reason: format!("granularity {} listed twice", level.granularity),
				});
			}

			if let RollupSource::Summaries(finer) = level.source {
				if !earlier.iter().any(|l| l.granularity == finer) {
					return Err(RollupError::InvalidCascade {
						reason: format!(
							"{} is built from {} which is not an earlier level",
							level.granularity, finer
						),
					});
				}
				if !level.granularity.is_built_from(finer) {
					return Err(RollupError::InvalidCascade {
						reason: format!(
							"{} buckets are not made of whole {} buckets",
							level.granularity, finer
						),
					});
				}
			}
		}

		Ok(Self { levels })
	}

	/// 6-hour from raw values, day from 6-hour, week and month both from day
	pub fn standard() -> Self {
		Self {
			levels: vec![
				RollupLevel::from_raw(Granularity::Hour6),
				RollupLevel::from_summaries(Granularity::Day, Granularity::Hour6),
				RollupLevel::from_summaries(Granularity::Week, Granularity::Day),
				RollupLevel::from_summaries(Granularity::Month, Granularity::Day),
			],
		}
	}

	/// Levels in update order
	pub fn levels(&self) -> &[RollupLevel] {
		&self.levels
	}

	/// The level that produces `granularity`
	pub fn level(&self, granularity: Granularity) -> RollupResult<RollupLevel> {
		self.levels
			.iter()
			.find(|l| l.granularity == granularity)
			.copied()
			.ok_or(RollupError::UnknownLevel { granularity })
	}
}

impl Default for Cascade {
	fn default() -> Self {
		Self::standard()
	}
}

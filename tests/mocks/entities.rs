//! Test entities and helpers

#![allow(dead_code)]

use std::sync::Arc;

use perf_rollup::chrono::{DateTime, Duration, TimeZone, Utc};
use perf_rollup::service::Clock;
use perf_rollup::{
	MemoryStore, MetricReading, ReportService, ReportSubmission, RollupApp, RollupBuilder,
};

use super::configs::test_settings;

pub const BUILDER: &str = "builder";
pub const LAPTOP: &str = "laptop";
pub const TARGET: &str = "builder/ssd/gnome/desktop";
pub const OTHER_TARGET: &str = "laptop/nvme/gnome/desktop";
pub const METRIC: &str = "gedit-startup";
pub const OTHER_METRIC: &str = "resident-memory";

/// Clock frozen at a given instant
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
	fn now(&self) -> DateTime<Utc> {
		self.0
	}
}

pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
	Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

pub fn revision() -> String {
	"4f2c9e1ab7d3".repeat(6)[..64].to_string()
}

/// Services over a fresh memory store, with the store handle for inspection
pub fn app_with_store(now: DateTime<Utc>) -> (RollupApp, MemoryStore) {
	let store = MemoryStore::new();
	let app = RollupBuilder::with_storage(store.clone())
		.with_settings(test_settings())
		.with_clock(Arc::new(FixedClock(now)))
		.build()
		.unwrap();
	(app, store)
}

/// Submit one successful report carrying a single reading
pub async fn submit(
	reports: &ReportService,
	target: &str,
	metric: &str,
	time: DateTime<Utc>,
	value: f64,
) {
	reports
		.submit(ReportSubmission::success(
			target,
			revision(),
			time,
			vec![MetricReading::new(metric, value)],
		))
		.await
		.unwrap();
}

/// Deterministic series: one reading every `step_minutes` from `start`
pub async fn submit_series(
	reports: &ReportService,
	target: &str,
	metric: &str,
	start: DateTime<Utc>,
	step_minutes: i64,
	count: usize,
) {
	for i in 0..count {
		let time = start + Duration::minutes(step_minutes * i as i64);
		let value = ((i * 37 + 11) % 101) as f64 + 0.25;
		submit(reports, target, metric, time, value).await;
	}
}

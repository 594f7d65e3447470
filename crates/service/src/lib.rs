//! Perf Service
//!
//! Rollup engine, report ingestion and background jobs.

pub mod cascade;
pub mod clock;
pub mod engine;
pub mod errors;
pub mod jobs;
pub mod report;
pub mod rollup;

pub use cascade::{Cascade, RollupLevel, RollupSource};
pub use clock::{Clock, SystemClock};
pub use engine::{
	LevelReport, ResummarizeReport, RollupEngine, SeriesData, SeriesQuery,
	DEFAULT_GRACE_PERIOD_HOURS,
};
pub use errors::{RollupError, RollupResult};
pub use jobs::{
	BackgroundJob, BackgroundJobHandler, JobError, JobHandler, JobResult, JobRunStats, JobRunner,
	ResummarizeHandler,
};
pub use report::ReportService;
pub use rollup::{summarize, BucketAccumulator, CollectSink, PersistSink, RollupInput, SummarySink};

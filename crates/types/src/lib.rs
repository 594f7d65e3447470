//! Perf Types
//!
//! Shared models and traits for the perf rollup service.
//! This crate contains the domain models, the granularity descriptors and the
//! storage traits implemented by the storage backends.

pub mod granularity;
pub mod models;
pub mod storage;

// Re-export chrono for convenience
pub use chrono;

pub use granularity::{Granularity, GroupBy, ParseGranularityError};

pub use models::{
	Machine, Metric, MetricReading, RawValue, Registry, RegistryError, Report, ReportError,
	ReportSubmission, ReportValidationError, SummaryKey, SummaryRow, Target, TimeRange,
};

pub use storage::{
	RawValueStorageTrait, ReportStorageTrait, SeriesFilter, StorageError, StorageResult,
	StorageStats, StorageTrait, SummaryStorageTrait,
};

//! Storage traits for pluggable storage implementations

// Re-export the storage traits from types crate
pub use perf_types::storage::{
	RawValueStorageTrait as RawValueStorage, ReportStorageTrait as ReportStorage, SeriesFilter,
	StorageError, StorageResult, StorageStats, StorageTrait as Storage,
	SummaryStorageTrait as SummaryStorage,
};

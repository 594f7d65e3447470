//! Domain models shared across the workspace

pub mod metric;
pub mod registry;
pub mod report;
pub mod summary;
pub mod target;
pub mod time_range;
pub mod value;

pub use metric::Metric;
pub use registry::{Registry, RegistryError};
pub use report::{MetricReading, Report, ReportError, ReportSubmission, ReportValidationError};
pub use summary::{SummaryKey, SummaryRow};
pub use target::{Machine, Target};
pub use time_range::TimeRange;
pub use value::RawValue;

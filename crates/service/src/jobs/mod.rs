//! Background job processing
//!
//! Jobs are plain values dispatched to a handler, either immediately or on a
//! recurring interval.

pub mod handlers;
pub mod runner;
pub mod types;

pub use handlers::{BackgroundJobHandler, ResummarizeHandler};
pub use runner::{JobHandler, JobRunStats, JobRunner};
pub use types::{BackgroundJob, JobError, JobResult};

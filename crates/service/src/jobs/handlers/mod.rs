//! Job handler implementations

use async_trait::async_trait;

use super::runner::JobHandler;
use super::types::{BackgroundJob, JobResult};

pub mod resummarize;

pub use resummarize::ResummarizeHandler;

/// Handler for background jobs, dispatching each job type
pub struct BackgroundJobHandler {
	resummarize_handler: ResummarizeHandler,
}

impl BackgroundJobHandler {
	/// Create a new background job handler
	pub fn new(resummarize_handler: ResummarizeHandler) -> Self {
		Self {
			resummarize_handler,
		}
	}
}

#[async_trait]
impl JobHandler for BackgroundJobHandler {
	async fn handle(&self, job: BackgroundJob) -> JobResult {
		match job {
			BackgroundJob::Resummarize => self.resummarize_handler.handle().await.map(|_| ()),
			BackgroundJob::ResummarizeUntil { cutoff } => self
				.resummarize_handler
				.handle_until(cutoff)
				.await
				.map(|_| ()),
		}
	}
}

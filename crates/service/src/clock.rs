//! Time source for scheduled work

use chrono::{DateTime, Utc};

/// Supplies the current time
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync {
	fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
	fn now(&self) -> DateTime<Utc> {
		Utc::now()
	}
}

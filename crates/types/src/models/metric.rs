//! Metric identity

use serde::{Deserialize, Serialize};

/// A named quantity that machines report values for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metric {
	pub name: String,
	pub description: Option<String>,
	pub units: Option<String>,
}

impl Metric {
	/// Create a metric with no descriptive metadata
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: None,
			units: None,
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn with_units(mut self, units: impl Into<String>) -> Self {
		self.units = Some(units.into());
		self
	}
}

//! Registry of known metrics, machines and targets
//!
//! The registry is built once from configuration and handed to the services
//! that need to resolve names; nothing reads it through global state.

use std::collections::BTreeMap;

use chrono::Duration;
use thiserror::Error;

use super::{Machine, Metric, Target};

/// Errors raised while building or querying the registry
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
	#[error("No such metric: {name}")]
	UnknownMetric { name: String },

	#[error("No such target: {name}")]
	UnknownTarget { name: String },

	#[error("No machine named {name}")]
	UnknownMachine { name: String },

	#[error("Duplicate {kind} '{name}'")]
	Duplicate { kind: &'static str, name: String },
}

/// Known metric, machine and target identities, keyed by name
#[derive(Debug, Clone, Default)]
pub struct Registry {
	metrics: BTreeMap<String, Metric>,
	machines: BTreeMap<String, Machine>,
	targets: BTreeMap<String, Target>,
}

impl Registry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a metric
	pub fn add_metric(&mut self, metric: Metric) -> Result<(), RegistryError> {
		if self.metrics.contains_key(&metric.name) {
			return Err(RegistryError::Duplicate {
				kind: "metric",
				name: metric.name,
			});
		}
		self.metrics.insert(metric.name.clone(), metric);
		Ok(())
	}

	/// Register a machine
	pub fn add_machine(&mut self, machine: Machine) -> Result<(), RegistryError> {
		if self.machines.contains_key(&machine.name) {
			return Err(RegistryError::Duplicate {
				kind: "machine",
				name: machine.name,
			});
		}
		self.machines.insert(machine.name.clone(), machine);
		Ok(())
	}

	/// Register a target; its machine must already be registered
	pub fn add_target(&mut self, target: Target) -> Result<(), RegistryError> {
		if !self.machines.contains_key(&target.machine) {
			return Err(RegistryError::UnknownMachine {
				name: target.machine,
			});
		}
		if self.targets.contains_key(&target.name) {
			return Err(RegistryError::Duplicate {
				kind: "target",
				name: target.name,
			});
		}
		self.targets.insert(target.name.clone(), target);
		Ok(())
	}

	/// Look up a metric by name
	pub fn metric(&self, name: &str) -> Result<&Metric, RegistryError> {
		self.metrics
			.get(name)
			.ok_or_else(|| RegistryError::UnknownMetric {
				name: name.to_string(),
			})
	}

	/// Look up a target by name
	pub fn target(&self, name: &str) -> Result<&Target, RegistryError> {
		self.targets
			.get(name)
			.ok_or_else(|| RegistryError::UnknownTarget {
				name: name.to_string(),
			})
	}

	/// Look up a machine by name
	pub fn machine(&self, name: &str) -> Result<&Machine, RegistryError> {
		self.machines
			.get(name)
			.ok_or_else(|| RegistryError::UnknownMachine {
				name: name.to_string(),
			})
	}

	/// Clock correction for reports of the given target
	pub fn clock_adjustment(&self, target: &Target) -> Result<Duration, RegistryError> {
		self.machine(&target.machine).map(Machine::clock_adjustment)
	}

	/// All metrics, ordered by name
	pub fn metrics(&self) -> impl Iterator<Item = &Metric> {
		self.metrics.values()
	}

	/// All targets, ordered by name
	pub fn targets(&self) -> impl Iterator<Item = &Target> {
		self.targets.values()
	}

	/// All machines, ordered by name
	pub fn machines(&self) -> impl Iterator<Item = &Machine> {
		self.machines.values()
	}
}

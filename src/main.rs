//! Perf Rollup Service
//!
//! Main entry point. `--once` runs a single resummarize pass and exits;
//! without it the resummarize job runs on its schedule until Ctrl-C.

use perf_rollup::{RollupBuilder, RunMode};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let mode = if std::env::args().skip(1).any(|arg| arg == "--once") {
		RunMode::Once
	} else {
		RunMode::Service
	};

	RollupBuilder::new().start_service(mode).await
}

//! Benchmark Harness
//!
//! Launches a configurable number of client workload processes (and, in
//! self-contained mode, the server under test), collects the latency samples
//! every client prints on its standard output and reduces them to a mean and
//! population standard deviation.

pub mod app;
pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod process;
pub mod stats;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use models::{LatencySample, RunConfig, RunMode, RunResult, SampleSet};
pub use collector::CollectionOrchestrator;
pub use executor::RunController;
pub use process::{OsProcessSpawner, ProcessSpawner};
pub use stats::reduce;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const BUILD_TIME: &str = env!("BUILD_TIME");
pub const GIT_COMMIT: &str = env!("GIT_COMMIT");
pub const TARGET_TRIPLE: &str = env!("TARGET_TRIPLE");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_CLIENT_PROGRAM: &str = "./yael-benchmark-client";
    pub const DEFAULT_SERVER_PROGRAM: &str = "./yael-benchmark-server";
    pub const DEFAULT_SELF_CONTAINED_CLIENTS: usize = 50;
    pub const DEFAULT_SELF_CONTAINED_ADDRESS: &str = "localhost";
    pub const DEFAULT_STARTUP_GRACE: Duration = Duration::from_millis(100);
    pub const DEFAULT_ENABLE_COLOR: bool = true;
}

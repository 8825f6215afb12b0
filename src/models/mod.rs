//! Data models for the benchmark harness

pub mod config;
pub mod report;
pub mod sample;

// Re-export main model types
pub use config::{RunConfig, RunMode};
pub use report::RunResult;
pub use sample::{LatencySample, SampleSet};

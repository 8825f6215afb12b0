//! Report emission
//!
//! The text report is exactly two lines on standard output, `Mean: <v>` and
//! `Deviation: <v>`. Everything else the harness prints goes to standard
//! error.

use crate::{
    error::Result,
    models::{RunConfig, RunResult},
};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::Duration;

/// Report rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Mean:` and `Deviation:` lines
    #[default]
    Text,
    /// One JSON object
    Json,
}

/// Render a float the way the report expects: shortest round-trip digits,
/// always with a fractional part (`1.0`, not `1`).
pub fn format_value(value: f64) -> String {
    format!("{:?}", value)
}

/// Writes the final numbers of a run
pub struct ReportEmitter {
    format: OutputFormat,
}

impl ReportEmitter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.output_format)
    }

    /// Render the report body
    pub fn render(&self, result: &RunResult) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(format!(
                "Mean: {}\nDeviation: {}\n",
                format_value(result.mean),
                format_value(result.std_dev)
            )),
            OutputFormat::Json => {
                let mut json = serde_json::to_string(result)
                    .map_err(|e| crate::error::AppError::internal(format!("failed to serialize report: {}", e)))?;
                json.push('\n');
                Ok(json)
            }
        }
    }

    /// Write the report to `out`
    pub fn emit<W: Write>(&self, result: &RunResult, out: &mut W) -> Result<()> {
        out.write_all(self.render(result)?.as_bytes())?;
        out.flush()?;
        Ok(())
    }

    /// Write the report to standard output
    pub fn emit_stdout(&self, result: &RunResult) -> Result<()> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.emit(result, &mut handle)
    }
}

/// Human readable run summary for verbose mode
pub fn render_summary(config: &RunConfig, result: &RunResult, elapsed: Duration, use_color: bool) -> String {
    let title = if use_color {
        use colored::Colorize;
        "Benchmark summary".bold().to_string()
    } else {
        "Benchmark summary".to_string()
    };

    let mut summary = format!("{}\n", title);
    summary.push_str(&format!("  Mode: {}\n", config.mode.as_str()));
    summary.push_str(&format!("  Address: {}\n", config.address));
    summary.push_str(&format!("  Clients: {}\n", result.client_count));
    summary.push_str(&format!("  Samples: {}\n", result.sample_count));
    if let Some(cv) = result.coefficient_of_variation() {
        summary.push_str(&format!("  Coefficient of variation: {:.2}%\n", cv * 100.0));
    }
    summary.push_str(&format!("  Elapsed: {:.3}s", elapsed.as_secs_f64()));
    summary
}

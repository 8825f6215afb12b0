//! Command-line interfaces of the two harness binaries
//!
//! Both are thin adapters: they only produce a `RunConfig`.

use crate::error::{AppError, Result};
use crate::models::RunConfig;
use crate::output::OutputFormat;
use clap::{Args, Parser};
use std::path::PathBuf;

/// Output and verbosity flags shared by both binaries
#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    /// Report format written to standard output
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Force colored diagnostics
    #[arg(long)]
    pub color: bool,

    /// Disable colored diagnostics
    #[arg(long)]
    pub no_color: bool,

    /// Log run progress to standard error
    #[arg(long)]
    pub verbose: bool,

    /// Log every process event as JSON to standard error
    #[arg(long)]
    pub debug: bool,
}

impl DisplayArgs {
    /// Validate flag combinations
    pub fn validate(&self) -> Result<()> {
        if self.color && self.no_color {
            return Err(AppError::invalid_config("Cannot specify both --color and --no-color"));
        }
        Ok(())
    }

    /// Color choice before any configuration is resolved
    pub fn wants_color(&self) -> bool {
        self.color || (!self.no_color && supports_color())
    }

    /// Apply these flags on top of a configuration
    pub fn apply(&self, config: &mut RunConfig) {
        config.output_format = self.format;
        if self.color {
            config.enable_color = true;
        } else if self.no_color {
            config.enable_color = false;
        } else if !supports_color() {
            config.enable_color = false;
        }
        config.verbose = self.verbose;
        config.debug = self.debug;
    }
}

/// Run N benchmark clients against an already running server
#[derive(Parser, Debug, Clone)]
#[command(name = "run-benchmark")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Number of client processes to launch
    pub num_clients: usize,

    /// Address of the running server, passed to every client
    pub server_name: String,

    /// Client workload executable
    #[arg(long, value_name = "PATH")]
    pub client_bin: Option<PathBuf>,

    #[command(flatten)]
    pub display: DisplayArgs,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<()> {
        self.display.validate()?;
        if self.server_name.trim().is_empty() {
            return Err(AppError::invalid_config("server_name cannot be empty"));
        }
        Ok(())
    }
}

/// Start a server, run benchmark clients against it, then stop it
#[derive(Parser, Debug, Clone)]
#[command(name = "run-benchmark-selfcontained")]
#[command(version, about, long_about = None)]
pub struct SelfContainedCli {
    /// Number of client processes to launch
    #[arg(long)]
    pub clients: Option<usize>,

    /// Address the server binds to and the clients connect to
    #[arg(long)]
    pub address: Option<String>,

    /// Client workload executable
    #[arg(long, value_name = "PATH")]
    pub client_bin: Option<PathBuf>,

    /// Server-under-test executable
    #[arg(long, value_name = "PATH")]
    pub server_bin: Option<PathBuf>,

    /// Milliseconds to wait after starting the server
    #[arg(long, value_name = "MS")]
    pub grace_ms: Option<u64>,

    #[command(flatten)]
    pub display: DisplayArgs,
}

impl SelfContainedCli {
    pub fn validate(&self) -> Result<()> {
        self.display.validate()?;
        if let Some(address) = &self.address {
            if address.trim().is_empty() {
                return Err(AppError::invalid_config("--address cannot be empty"));
            }
        }
        Ok(())
    }
}

/// Check if the terminal supports colors
pub fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    // Diagnostics go to stderr, so that is the stream that matters
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}

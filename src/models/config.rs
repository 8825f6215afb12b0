//! Run configuration data model and validation

use crate::error::{AppError, ErrorContext, Result};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Deployment shape of one benchmark run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunMode {
    /// A server is already listening at the target address
    External,
    /// The harness starts and stops the server itself
    SelfContained,
}

impl RunMode {
    /// Whether this mode owns a server process
    pub fn manages_server(&self) -> bool {
        matches!(self, RunMode::SelfContained)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RunMode::External => "external-server",
            RunMode::SelfContained => "self-contained",
        }
    }
}

/// Input to one benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of client processes to launch
    pub num_clients: usize,

    /// Address handed to every client (and to the server as its bind address)
    pub address: String,

    /// Deployment shape
    pub mode: RunMode,

    /// Client workload executable
    #[serde(default = "default_client_program")]
    pub client_program: PathBuf,

    /// Server-under-test executable, only used in self-contained mode
    #[serde(default = "default_server_program")]
    pub server_program: PathBuf,

    /// Delay between spawning the server and spawning the clients
    #[serde(default = "default_startup_grace_ms")]
    pub startup_grace_ms: u64,

    /// Report rendering
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Enable colored diagnostics
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl RunConfig {
    /// Configuration for a run against an already running server
    pub fn external<S: Into<String>>(num_clients: usize, address: S) -> Self {
        Self::with_mode(RunMode::External, num_clients, address.into())
    }

    /// Configuration for a run that starts its own server
    pub fn self_contained<S: Into<String>>(num_clients: usize, address: S) -> Self {
        Self::with_mode(RunMode::SelfContained, num_clients, address.into())
    }

    fn with_mode(mode: RunMode, num_clients: usize, address: String) -> Self {
        Self {
            num_clients,
            address,
            mode,
            client_program: default_client_program(),
            server_program: default_server_program(),
            startup_grace_ms: default_startup_grace_ms(),
            output_format: OutputFormat::default(),
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }

    /// Get the server startup grace period as Duration
    pub fn startup_grace(&self) -> Duration {
        Duration::from_millis(self.startup_grace_ms)
    }

    /// Validate the configuration before any process is touched.
    ///
    /// A client count of zero is accepted here; it surfaces later as an
    /// empty sample set.
    pub fn validate(&self) -> Result<()> {
        if self.address.trim().is_empty() {
            return Err(AppError::invalid_config("Server address cannot be empty"));
        }

        if self.client_program.as_os_str().is_empty() {
            return Err(AppError::invalid_config("Client executable path cannot be empty"));
        }

        if self.mode.manages_server() && self.server_program.as_os_str().is_empty() {
            return Err(AppError::invalid_config("Server executable path cannot be empty"));
        }

        Ok(())
    }

    /// Merge variables supplied by `lookup` into this configuration
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(client_bin) = lookup("BENCH_CLIENT_BIN") {
            self.client_program = PathBuf::from(client_bin.trim());
        }

        if let Some(server_bin) = lookup("BENCH_SERVER_BIN") {
            self.server_program = PathBuf::from(server_bin.trim());
        }

        if let Some(grace) = lookup("BENCH_GRACE_MS") {
            self.startup_grace_ms = grace.trim().parse::<u64>()
                .with_context(|| format!("Invalid BENCH_GRACE_MS value '{}'", grace))?;
        }

        // Client count and address are positional arguments in external mode
        if self.mode.manages_server() {
            if let Some(clients) = lookup("BENCH_NUM_CLIENTS") {
                self.num_clients = clients.trim().parse::<usize>()
                    .with_context(|| format!("Invalid BENCH_NUM_CLIENTS value '{}'", clients))?;
            }

            if let Some(address) = lookup("BENCH_ADDRESS") {
                self.address = address.trim().to_string();
            }
        }

        if let Some(enable_color) = lookup("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse::<bool>()
                .with_context(|| format!("Invalid ENABLE_COLOR value '{}'", enable_color))?;
        }

        Ok(())
    }
}

// Default value functions for serde
fn default_client_program() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_CLIENT_PROGRAM)
}

fn default_server_program() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_SERVER_PROGRAM)
}

fn default_startup_grace_ms() -> u64 {
    crate::defaults::DEFAULT_STARTUP_GRACE.as_millis() as u64
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

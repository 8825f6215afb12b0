//! Process supervision for clients and the server under test
//!
//! The orchestrator and run controller only talk to the traits in this module.
//! `OsProcessSpawner` is the real implementation backed by `tokio::process`.

mod os;

#[cfg(test)]
pub(crate) mod testing;

pub use os::{ClientHandle, OsProcessSpawner, ServerHandle};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Everything a client left behind once it exited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOutput {
    /// OS process id, if it was still known at exit
    pub pid: Option<u32>,
    /// Exit code, `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Whether the process reported success
    pub success: bool,
    /// Captured standard output, split into lines
    pub lines: Vec<String>,
}

impl ClientOutput {
    /// Split raw stdout into lines, rejecting output that is not UTF-8
    pub fn from_stdout(pid: Option<u32>, exit_code: Option<i32>, success: bool, stdout: Vec<u8>) -> Result<Self> {
        let text = String::from_utf8(stdout).map_err(|e| {
            crate::error::AppError::malformed_sample(format!(
                "client output is not valid UTF-8 (byte offset {})",
                e.utf8_error().valid_up_to()
            ))
        })?;

        Ok(Self {
            pid,
            exit_code,
            success,
            lines: text.lines().map(str::to_string).collect(),
        })
    }

    /// Human readable exit status for logging
    pub fn describe_exit(&self) -> String {
        match self.exit_code {
            Some(code) => format!("exit code {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// A spawned client whose stdout is owned until it exits
#[async_trait]
pub trait ClientProcess: Send {
    /// OS process id
    fn id(&self) -> Option<u32>;

    /// Block until the process exits and drain its stdout.
    ///
    /// Consumes the handle, so the output pipe is drained exactly once.
    async fn wait(self) -> Result<ClientOutput>;
}

/// The server under test, never read from
pub trait ServerProcess: Send {
    /// OS process id
    fn id(&self) -> Option<u32>;

    /// Send a termination signal without waiting for the process to exit.
    ///
    /// Only the first call signals the process; later calls are no-ops.
    fn terminate(&mut self) -> Result<()>;
}

/// Creates client and server processes
pub trait ProcessSpawner: Send + Sync {
    type Client: ClientProcess;
    type Server: ServerProcess;

    /// Start one client against `address`; fails with `ProcessStart`
    fn spawn_client(&self, program: &Path, address: &str) -> Result<Self::Client>;

    /// Start the server bound to `address`; fails with `ProcessStart`
    fn spawn_server(&self, program: &Path, address: &str) -> Result<Self::Server>;
}

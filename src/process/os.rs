//! Child processes backed by `tokio::process`

use super::{ClientOutput, ClientProcess, ProcessSpawner, ServerProcess};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::Path;
use std::process::Stdio;
use tokio::process::{Child, Command};

/// Spawns real OS processes.
///
/// Every child is created with `kill_on_drop`, so a handle dropped on an
/// error path takes its process down with it.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsProcessSpawner;

impl OsProcessSpawner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessSpawner for OsProcessSpawner {
    type Client = ClientHandle;
    type Server = ServerHandle;

    fn spawn_client(&self, program: &Path, address: &str) -> Result<ClientHandle> {
        let child = Command::new(program)
            .arg(address)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::process_start(format!("failed to start client '{}': {}", program.display(), e)))?;

        Ok(ClientHandle::new(child))
    }

    fn spawn_server(&self, program: &Path, address: &str) -> Result<ServerHandle> {
        let child = Command::new(program)
            .arg(address)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| AppError::process_start(format!("failed to start server '{}': {}", program.display(), e)))?;

        Ok(ServerHandle::new(child))
    }
}

/// One running client process and its stdout pipe
#[derive(Debug)]
pub struct ClientHandle {
    child: Child,
    pid: Option<u32>,
}

impl ClientHandle {
    fn new(child: Child) -> Self {
        let pid = child.id();
        Self { child, pid }
    }
}

#[async_trait]
impl ClientProcess for ClientHandle {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    async fn wait(self) -> Result<ClientOutput> {
        let pid = self.pid;
        let output = self
            .child
            .wait_with_output()
            .await
            .map_err(|e| AppError::io(format!("failed to collect output of client {:?}: {}", pid, e)))?;

        ClientOutput::from_stdout(pid, output.status.code(), output.status.success(), output.stdout)
    }
}

/// The server under test.
///
/// Held for the whole run and terminated once by the run controller.
#[derive(Debug)]
pub struct ServerHandle {
    child: Child,
    pid: Option<u32>,
    terminated: bool,
}

impl ServerHandle {
    fn new(child: Child) -> Self {
        let pid = child.id();
        Self { child, pid, terminated: false }
    }

    /// Whether `terminate` has already been called
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Poll the process without blocking
    pub fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }
}

impl ServerProcess for ServerHandle {
    fn id(&self) -> Option<u32> {
        self.pid
    }

    fn terminate(&mut self) -> Result<()> {
        if self.terminated {
            return Ok(());
        }
        self.terminated = true;

        match self.child.start_kill() {
            Ok(()) => Ok(()),
            // Already exited and reaped
            Err(e) if e.kind() == ErrorKind::InvalidInput => Ok(()),
            Err(e) => Err(AppError::io(format!("failed to terminate server {:?}: {}", self.pid, e))),
        }
    }
}

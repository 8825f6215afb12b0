//! In-memory process fakes for orchestrator and controller tests

use super::{ClientOutput, ClientProcess, ProcessSpawner, ServerProcess};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the next spawned fake client does
#[derive(Debug, Clone)]
pub enum FakeClientScript {
    /// Exit with `code`, having printed `lines`
    Exits { code: i32, lines: Vec<String> },
    /// Refuse to start
    FailsToStart,
}

impl FakeClientScript {
    pub fn prints(lines: &[&str]) -> Self {
        Self::Exits { code: 0, lines: lines.iter().map(|l| l.to_string()).collect() }
    }

    pub fn prints_and_fails(code: i32, lines: &[&str]) -> Self {
        Self::Exits { code, lines: lines.iter().map(|l| l.to_string()).collect() }
    }
}

/// Observable state shared between a fake spawner and the test
#[derive(Debug, Default)]
pub struct SpawnRecord {
    pub clients_spawned: AtomicUsize,
    pub clients_waited: AtomicUsize,
    pub servers_spawned: AtomicUsize,
    pub server_terminations: AtomicUsize,
    pub server_running: AtomicBool,
    /// Clients spawned before the first `wait`
    pub spawned_before_first_wait: AtomicUsize,
    pub addresses: Mutex<Vec<String>>,
}

impl SpawnRecord {
    pub fn clients_spawned(&self) -> usize {
        self.clients_spawned.load(Ordering::SeqCst)
    }

    pub fn servers_spawned(&self) -> usize {
        self.servers_spawned.load(Ordering::SeqCst)
    }

    pub fn server_terminations(&self) -> usize {
        self.server_terminations.load(Ordering::SeqCst)
    }

    pub fn server_running(&self) -> bool {
        self.server_running.load(Ordering::SeqCst)
    }
}

/// Spawner whose clients replay scripted outputs in spawn order
pub struct FakeSpawner {
    scripts: Mutex<VecDeque<FakeClientScript>>,
    server_fails: bool,
    record: Arc<SpawnRecord>,
}

impl FakeSpawner {
    pub fn new(scripts: Vec<FakeClientScript>) -> Self {
        Self {
            scripts: Mutex::new(scripts.into()),
            server_fails: false,
            record: Arc::new(SpawnRecord::default()),
        }
    }

    /// Every client prints the given lines
    pub fn uniform(clients: usize, lines: &[&str]) -> Self {
        Self::new(vec![FakeClientScript::prints(lines); clients])
    }

    pub fn with_failing_server(mut self) -> Self {
        self.server_fails = true;
        self
    }

    pub fn record(&self) -> Arc<SpawnRecord> {
        Arc::clone(&self.record)
    }
}

impl ProcessSpawner for FakeSpawner {
    type Client = FakeClient;
    type Server = FakeServer;

    fn spawn_client(&self, program: &Path, address: &str) -> Result<FakeClient> {
        let script = self
            .scripts
            .lock()
            .map_err(|_| AppError::internal("fake script queue poisoned"))?
            .pop_front()
            .unwrap_or_else(|| FakeClientScript::prints(&[]));

        match script {
            FakeClientScript::FailsToStart => Err(AppError::process_start(format!(
                "failed to start client '{}': No such file or directory",
                program.display()
            ))),
            FakeClientScript::Exits { code, lines } => {
                let pid = self.record.clients_spawned.fetch_add(1, Ordering::SeqCst) as u32 + 1000;
                if let Ok(mut addresses) = self.record.addresses.lock() {
                    addresses.push(address.to_string());
                }
                Ok(FakeClient { pid, code, lines, record: Arc::clone(&self.record) })
            }
        }
    }

    fn spawn_server(&self, program: &Path, address: &str) -> Result<FakeServer> {
        if self.server_fails {
            return Err(AppError::process_start(format!(
                "failed to start server '{}': No such file or directory",
                program.display()
            )));
        }
        self.record.servers_spawned.fetch_add(1, Ordering::SeqCst);
        self.record.server_running.store(true, Ordering::SeqCst);
        if let Ok(mut addresses) = self.record.addresses.lock() {
            addresses.push(address.to_string());
        }
        Ok(FakeServer { record: Arc::clone(&self.record), terminated: false })
    }
}

pub struct FakeClient {
    pid: u32,
    code: i32,
    lines: Vec<String>,
    record: Arc<SpawnRecord>,
}

#[async_trait]
impl ClientProcess for FakeClient {
    fn id(&self) -> Option<u32> {
        Some(self.pid)
    }

    async fn wait(self) -> Result<ClientOutput> {
        if self.record.clients_waited.fetch_add(1, Ordering::SeqCst) == 0 {
            let spawned = self.record.clients_spawned.load(Ordering::SeqCst);
            self.record.spawned_before_first_wait.store(spawned, Ordering::SeqCst);
        }
        Ok(ClientOutput {
            pid: Some(self.pid),
            exit_code: Some(self.code),
            success: self.code == 0,
            lines: self.lines,
        })
    }
}

pub struct FakeServer {
    record: Arc<SpawnRecord>,
    terminated: bool,
}

impl ServerProcess for FakeServer {
    fn id(&self) -> Option<u32> {
        Some(1)
    }

    fn terminate(&mut self) -> Result<()> {
        if !self.terminated {
            self.terminated = true;
            self.record.server_terminations.fetch_add(1, Ordering::SeqCst);
            self.record.server_running.store(false, Ordering::SeqCst);
        }
        Ok(())
    }
}

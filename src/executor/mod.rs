//! Run controller
//!
//! Wires the process supervisor, the collection orchestrator and the
//! statistics reducer together for one run, in either deployment shape.

use crate::{
    collector::CollectionOrchestrator,
    error::{AppError, Result},
    logging::RunLogger,
    models::{RunConfig, RunResult},
    process::{ProcessSpawner, ServerProcess},
    stats::StatisticsReducer,
};
use std::time::{Duration, Instant};

/// Outcome of a successful run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOutcome {
    pub result: RunResult,
    /// Wall time from validation to reduction
    pub elapsed: Duration,
}

/// Executes one benchmark run end to end
pub struct RunController<S: ProcessSpawner> {
    spawner: S,
    logger: RunLogger,
}

impl<S: ProcessSpawner> RunController<S> {
    pub fn new(spawner: S, logger: RunLogger) -> Self {
        Self { spawner, logger }
    }

    /// Run the benchmark described by `config`.
    ///
    /// In self-contained mode the server is started first and is terminated
    /// exactly once after collection, whether collection succeeded or not.
    /// A run with no clients fails before any process is started.
    pub async fn run(&self, config: &RunConfig) -> Result<RunOutcome> {
        let outcome = self.run_inner(config).await;
        if let Err(error) = &outcome {
            self.logger.log_run_failed(error).await;
        }
        outcome
    }

    async fn run_inner(&self, config: &RunConfig) -> Result<RunOutcome> {
        config.validate()?;
        if config.num_clients == 0 {
            return Err(AppError::empty_sample_set("no clients requested"));
        }
        let started = Instant::now();
        self.logger.log_run_started(config).await;

        let collected = if config.mode.manages_server() {
            let mut server = self.spawner.spawn_server(&config.server_program, &config.address)?;
            self.logger.log_server_spawned(server.id(), config).await;

            // No readiness handshake: the server is assumed to be listening
            // once the grace period is over.
            tokio::time::sleep(config.startup_grace()).await;

            let collected = self.collect(config).await;

            let terminated = server.terminate();
            self.logger.log_server_terminated(server.id(), &terminated).await;
            // A collection error outranks a failure to signal the server
            let collected = collected?;
            terminated?;
            collected
        } else {
            self.collect(config).await?
        };

        let result = StatisticsReducer::new().reduce(&collected)?;
        let elapsed = started.elapsed();
        self.logger.log_run_finished(&result, elapsed).await;

        Ok(RunOutcome { result, elapsed })
    }

    async fn collect(&self, config: &RunConfig) -> Result<crate::models::SampleSet> {
        CollectionOrchestrator::new(&self.spawner, &self.logger)
            .run_clients(config)
            .await
    }
}

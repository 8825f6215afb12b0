//! Collection orchestrator
//!
//! Fans out all clients before waiting on any of them, then fans their
//! outputs back in, in spawn order, into one `SampleSet`.

use crate::{
    error::{AppError, Result},
    logging::RunLogger,
    models::{LatencySample, RunConfig, SampleSet},
    process::{ClientOutput, ClientProcess, ProcessSpawner},
};

/// Drives the process supervisor for the client side of a run
pub struct CollectionOrchestrator<'a, S: ProcessSpawner> {
    spawner: &'a S,
    logger: &'a RunLogger,
}

impl<'a, S: ProcessSpawner> CollectionOrchestrator<'a, S> {
    pub fn new(spawner: &'a S, logger: &'a RunLogger) -> Self {
        Self { spawner, logger }
    }

    /// Run every client of `config` to completion and collect their samples.
    ///
    /// All clients are started before the first wait so they run
    /// concurrently. A non-zero client exit keeps whatever the client printed;
    /// a malformed line aborts the run. On any error the remaining handles are
    /// dropped, which kills their processes.
    pub async fn run_clients(&self, config: &RunConfig) -> Result<SampleSet> {
        let clients = self.spawn_all(config).await?;

        let mut samples = SampleSet::new();
        for (index, client) in clients.into_iter().enumerate() {
            let output = client.wait().await?;
            self.logger.log_client_completed(index, &output).await;

            let parsed = parse_client_output(index, &output)?;
            samples.extend_from_client(parsed);
        }

        Ok(samples)
    }

    async fn spawn_all(&self, config: &RunConfig) -> Result<Vec<S::Client>> {
        let mut clients = Vec::with_capacity(config.num_clients);
        for index in 0..config.num_clients {
            let client = self.spawner.spawn_client(&config.client_program, &config.address)?;
            self.logger.log_client_spawned(index, client.id()).await;
            clients.push(client);
        }
        Ok(clients)
    }
}

/// Parse every line one client printed, in emission order
pub fn parse_client_output(index: usize, output: &ClientOutput) -> Result<Vec<LatencySample>> {
    output
        .lines
        .iter()
        .enumerate()
        .map(|(line_no, line)| {
            LatencySample::parse_line(line).map_err(|e| match e {
                AppError::MalformedSample(reason) => AppError::malformed_sample(format!(
                    "client {} (pid {}), line {}: {}",
                    index,
                    output.pid.map_or_else(|| "?".to_string(), |pid| pid.to_string()),
                    line_no + 1,
                    reason
                )),
                other => other,
            })
        })
        .collect()
}

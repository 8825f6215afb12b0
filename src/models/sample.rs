//! Latency samples and the per-run sample set

use crate::error::{AppError, ErrorContext, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One latency measurement reported by a client.
///
/// Always finite and non-negative. The unit is whatever the client
/// collaborators use; the harness only aggregates.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct LatencySample(f64);

impl LatencySample {
    /// Validate a raw value. Negative zero is stored as `0.0`.
    pub fn new(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(AppError::malformed_sample(format!("latency must be finite, got {}", value)));
        }
        if value < 0.0 {
            return Err(AppError::malformed_sample(format!("latency must be non-negative, got {}", value)));
        }
        Ok(Self(value + 0.0))
    }

    /// Parse one line of client output.
    ///
    /// Surrounding whitespace (including a trailing `\r`) is ignored. Empty
    /// lines, non-numeric text, `inf`/`nan` and negative values are rejected.
    pub fn parse_line(line: &str) -> Result<Self> {
        let text = line.trim();
        if text.is_empty() {
            return Err(AppError::malformed_sample("empty line"));
        }

        let value = text
            .parse::<f64>()
            .with_context(|| format!("'{}' is not a decimal number", text))?;

        Self::new(value)
            .map_err(|_| AppError::malformed_sample(format!("'{}' is not a finite, non-negative latency", text)))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for LatencySample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

/// Every latency value collected during one run, in collection order.
///
/// Grows one client at a time; the orchestrator hands it out by value once
/// the last client has been drained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleSet {
    samples: Vec<LatencySample>,
    clients: usize,
}

impl SampleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all samples of one client, preserving its emission order
    pub fn extend_from_client<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = LatencySample>,
    {
        self.samples.extend(samples);
        self.clients += 1;
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of clients whose output was appended
    pub fn client_count(&self) -> usize {
        self.clients
    }

    pub fn samples(&self) -> &[LatencySample] {
        &self.samples
    }

    /// Iterate over the raw values
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(LatencySample::value)
    }
}

impl FromIterator<LatencySample> for SampleSet {
    /// Collect samples as if they came from a single client
    fn from_iter<T: IntoIterator<Item = LatencySample>>(iter: T) -> Self {
        let mut set = SampleSet::new();
        set.extend_from_client(iter);
        set
    }
}

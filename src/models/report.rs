//! Aggregate result of one benchmark run

use serde::{Deserialize, Serialize};

/// Mean and population standard deviation over a run's full sample set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// Arithmetic mean of all samples
    pub mean: f64,
    /// Population standard deviation (divisor n)
    #[serde(rename = "deviation")]
    pub std_dev: f64,
    /// Number of samples reduced
    #[serde(rename = "samples")]
    pub sample_count: usize,
    /// Number of clients that contributed output
    #[serde(rename = "clients")]
    pub client_count: usize,
}

impl RunResult {
    /// Coefficient of variation, `std_dev / mean`
    pub fn coefficient_of_variation(&self) -> Option<f64> {
        if self.mean > 0.0 {
            Some(self.std_dev / self.mean)
        } else {
            None
        }
    }
}

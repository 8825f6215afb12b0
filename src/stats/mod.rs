//! Statistical reduction of a run's latency samples

use crate::{
    error::{AppError, Result},
    models::{RunResult, SampleSet},
};

/// Reduce a sample set to its mean and population standard deviation.
///
/// Fails with `EmptySampleSet` when there is nothing to reduce, so no
/// division by zero is ever attempted.
pub fn reduce(samples: &SampleSet) -> Result<RunResult> {
    StatisticsReducer::new().reduce(samples)
}

/// Statistics engine over an immutable sample set
#[derive(Debug, Default, Clone, Copy)]
pub struct StatisticsReducer;

impl StatisticsReducer {
    pub fn new() -> Self {
        Self
    }

    /// Compute mean and population standard deviation (divisor n, not n - 1)
    pub fn reduce(&self, samples: &SampleSet) -> Result<RunResult> {
        if samples.is_empty() {
            return Err(AppError::empty_sample_set(format!(
                "{} client(s) reported no latency samples",
                samples.client_count()
            )));
        }

        let mean = Self::mean(samples);
        let std_dev = Self::population_std_dev(samples, mean);

        Ok(RunResult {
            mean,
            std_dev,
            sample_count: samples.len(),
            client_count: samples.client_count(),
        })
    }

    /// Plain left-to-right floating point summation
    fn mean(samples: &SampleSet) -> f64 {
        let sum: f64 = samples.values().sum();
        sum / samples.len() as f64
    }

    fn population_std_dev(samples: &SampleSet, mean: f64) -> f64 {
        let variance_sum: f64 = samples
            .values()
            .map(|value| (value - mean) * (value - mean))
            .sum();
        (variance_sum / samples.len() as f64).sqrt()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LatencySample;

    fn set_of(clients: &[&[f64]]) -> SampleSet {
        let mut set = SampleSet::new();
        for values in clients {
            set.extend_from_client(values.iter().map(|&v| LatencySample::new(v).unwrap()));
        }
        set
    }

    #[test]
    fn test_identical_samples_have_zero_deviation() {
        let result = reduce(&set_of(&[&[1.0], &[1.0], &[1.0]])).unwrap();
        assert_eq!(result.mean, 1.0);
        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.sample_count, 3);
        assert_eq!(result.client_count, 3);
    }

    #[test]
    fn test_population_deviation_uses_n() {
        let result = reduce(&set_of(&[&[1.0], &[2.0], &[3.0]])).unwrap();
        assert_eq!(result.mean, 2.0);
        assert!((result.std_dev - (2.0f64 / 3.0).sqrt()).abs() < 1e-12);
        assert!((result.std_dev - 0.8165).abs() < 1e-4);
    }

    #[test]
    fn test_single_sample() {
        let result = reduce(&set_of(&[&[42.5]])).unwrap();
        assert_eq!(result.mean, 42.5);
        assert_eq!(result.std_dev, 0.0);
    }

    #[test]
    fn test_empty_set_is_an_error() {
        let err = reduce(&SampleSet::new()).unwrap_err();
        assert!(matches!(err, AppError::EmptySampleSet(_)));
    }

    #[test]
    fn test_clients_without_output_are_still_empty() {
        let err = reduce(&set_of(&[&[], &[]])).unwrap_err();
        assert!(matches!(err, AppError::EmptySampleSet(_)));
        assert!(err.to_string().contains("2 client(s)"));
    }
}

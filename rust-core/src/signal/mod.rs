//! Sampled signal and its time axis

pub mod loader;

pub use loader::{load_signal, load_json, load_mat, load_wav, FieldNames};

use crate::error::{AnalysisError, Result};

/// Real-valued recording with a uniform time axis
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    samples: Vec<f64>,
    times: Vec<f64>,
    sample_rate: f64,
}

impl Signal {
    /// Build from samples and their time stamps.
    ///
    /// The sample rate is derived as N / max(t).
    pub fn with_time_axis(samples: Vec<f64>, times: Vec<f64>) -> Result<Self> {
        if samples.is_empty() {
            return Err(AnalysisError::config("signal has no samples"));
        }
        if samples.len() != times.len() {
            return Err(AnalysisError::config(format!(
                "time axis has {} entries but the signal has {} samples",
                times.len(),
                samples.len()
            )));
        }

        let duration = times.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let sample_rate = samples.len() as f64 / duration;
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::config(format!(
                "cannot derive a sample rate from a time axis ending at {duration}"
            )));
        }

        Ok(Self {
            samples,
            times,
            sample_rate,
        })
    }

    /// Build from samples at a known rate; t[i] = i / sample_rate
    pub fn with_sample_rate(samples: Vec<f64>, sample_rate: f64) -> Result<Self> {
        if samples.is_empty() {
            return Err(AnalysisError::config("signal has no samples"));
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::config(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }

        let times = (0..samples.len())
            .map(|i| i as f64 / sample_rate)
            .collect();

        Ok(Self {
            samples,
            times,
            sample_rate,
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Duration in seconds
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate
    }

    /// Largest sample value
    pub fn max_value(&self) -> f64 {
        self.samples.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_from_time_axis() {
        let samples = vec![0.0; 8192];
        let times: Vec<f64> = (1..=8192).map(|i| i as f64 / 8192.0).collect();
        let signal = Signal::with_time_axis(samples, times).unwrap();

        assert!((signal.sample_rate() - 8192.0).abs() < 1e-9);
        assert!((signal.duration() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_axis_from_rate() {
        let signal = Signal::with_sample_rate(vec![1.0, -2.0, 0.5, 0.25], 4.0).unwrap();
        assert_eq!(signal.times(), &[0.0, 0.25, 0.5, 0.75]);
        assert_eq!(signal.max_value(), 1.0);
        assert_eq!(signal.len(), 4);
    }

    #[test]
    fn test_invalid_signals() {
        assert!(matches!(
            Signal::with_time_axis(vec![1.0, 2.0], vec![0.1]),
            Err(AnalysisError::Configuration(_))
        ));
        assert!(matches!(
            Signal::with_time_axis(vec![1.0, 2.0], vec![0.0, 0.0]),
            Err(AnalysisError::Configuration(_))
        ));
        assert!(matches!(
            Signal::with_sample_rate(Vec::new(), 8000.0),
            Err(AnalysisError::Configuration(_))
        ));
        assert!(matches!(
            Signal::with_sample_rate(vec![1.0], f64::NAN),
            Err(AnalysisError::Configuration(_))
        ));
    }
}

//! Global Fourier transform of the whole signal
//!
//! The full N-point complex spectrum is kept so that thresholding can be
//! applied to every bin, negative frequencies included.

use super::fft::ComplexFft;
use crate::error::{AnalysisError, Result};
use num_complex::Complex;

/// One-sided magnitude view for plotting
#[derive(Debug, Clone, PartialEq)]
pub struct OneSidedSpectrum {
    /// Frequencies k / (dt * N) in Hz
    pub frequencies: Vec<f64>,
    /// |F[k]|
    pub magnitudes: Vec<f64>,
}

/// DFT of an entire signal
#[derive(Clone)]
pub struct GlobalSpectrum {
    bins: Vec<Complex<f64>>,
    sample_rate: f64,
    fft: ComplexFft,
}

impl GlobalSpectrum {
    /// Compute the full complex spectrum of `signal`
    ///
    /// # Arguments
    /// * `signal` - Input samples
    /// * `sample_rate` - Sample rate in Hz
    pub fn compute(signal: &[f64], sample_rate: f64) -> Result<Self> {
        if signal.is_empty() {
            return Err(AnalysisError::InsufficientData { window: 1, signal: 0 });
        }
        if !(sample_rate.is_finite() && sample_rate > 0.0) {
            return Err(AnalysisError::config(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }

        let fft = ComplexFft::new(signal.len());
        let bins = fft.forward_real(signal);

        tracing::debug!(len = bins.len(), sample_rate, "computed global spectrum");

        Ok(Self {
            bins,
            sample_rate,
            fft,
        })
    }

    /// Complex spectrum F[0..N]
    pub fn bins(&self) -> &[Complex<f64>] {
        &self.bins
    }

    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// |F[k]| for every bin
    pub fn magnitudes(&self) -> Vec<f64> {
        self.bins.iter().map(|c| c.norm()).collect()
    }

    /// Frequency resolution 1 / (dt * N) in Hz
    pub fn bin_spacing(&self) -> f64 {
        self.sample_rate / self.bins.len() as f64
    }

    /// Magnitudes for bins 0..N/2 (integer half, Nyquist excluded for even N)
    pub fn one_sided(&self) -> OneSidedSpectrum {
        let half = self.bins.len() / 2;
        let spacing = self.bin_spacing();
        OneSidedSpectrum {
            frequencies: (0..half).map(|k| k as f64 * spacing).collect(),
            magnitudes: self.bins[..half].iter().map(|c| c.norm()).collect(),
        }
    }

    /// Inverse DFT of an arbitrary spectrum of the same length
    pub(crate) fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<Complex<f64>> {
        self.fft.inverse(spectrum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_constant_signal() {
        let spectrum = GlobalSpectrum::compute(&[5.0; 8], 8.0).unwrap();
        let mags = spectrum.magnitudes();

        assert_eq!(mags.len(), 8);
        assert!((mags[0] - 40.0).abs() < 1e-12);
        for &m in &mags[1..] {
            assert!(m < 1e-12);
        }
    }

    #[test]
    fn test_one_sided_view() {
        let sample_rate = 64.0;
        let signal: Vec<f64> = (0..64)
            .map(|n| (2.0 * PI * 5.0 * n as f64 / sample_rate).cos())
            .collect();
        let spectrum = GlobalSpectrum::compute(&signal, sample_rate).unwrap();
        let view = spectrum.one_sided();

        assert_eq!(view.frequencies.len(), 32);
        assert_eq!(view.magnitudes.len(), 32);
        assert_eq!(view.frequencies[5], 5.0);
        assert!((view.magnitudes[5] - 32.0).abs() < 1e-9);
        assert!((spectrum.bin_spacing() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_hermitian_symmetry() {
        let signal: Vec<f64> = (0..50).map(|n| ((n * n) % 13) as f64 * 0.1).collect();
        let spectrum = GlobalSpectrum::compute(&signal, 1.0).unwrap();
        let bins = spectrum.bins();
        let n = bins.len();

        for k in 1..n {
            let diff = bins[k] - bins[n - k].conj();
            assert!(diff.norm() < 1e-9, "bin {k}");
        }
    }

    #[test]
    fn test_empty_signal() {
        assert!(matches!(
            GlobalSpectrum::compute(&[], 1.0),
            Err(AnalysisError::InsufficientData { .. })
        ));
        assert!(matches!(
            GlobalSpectrum::compute(&[1.0], -1.0),
            Err(AnalysisError::Configuration(_))
        ));
    }
}

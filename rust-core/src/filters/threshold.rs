//! Global spectral filter: magnitude threshold mask and inverse transform
//!
//! The mask is evaluated on all N bins. For a real input |F[k]| equals
//! |F[N-k]|, so conjugate pairs share a mask value and the reconstruction
//! stays real up to rounding.

use crate::error::{AnalysisError, Result};
use crate::spectrum::analysis::GlobalSpectrum;
use num_complex::Complex;
use serde::{Deserialize, Serialize};

/// Which side of the threshold survives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThresholdDirection {
    /// Keep bins with |F| > threshold
    KeepAbove,
    /// Keep bins with |F| < threshold
    KeepBelow,
}

impl ThresholdDirection {
    #[inline]
    pub fn keeps(&self, magnitude: f64, threshold: f64) -> bool {
        match self {
            ThresholdDirection::KeepAbove => magnitude > threshold,
            ThresholdDirection::KeepBelow => magnitude < threshold,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThresholdDirection::KeepAbove => "keep-above",
            ThresholdDirection::KeepBelow => "keep-below",
        }
    }
}

/// Per-bin keep/reject decision
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeMask {
    keep: Vec<bool>,
    threshold: f64,
    direction: ThresholdDirection,
}

impl MagnitudeMask {
    pub fn new(spectrum: &[Complex<f64>], threshold: f64, direction: ThresholdDirection) -> Result<Self> {
        if threshold.is_nan() {
            return Err(AnalysisError::config("threshold must not be NaN"));
        }
        let keep = spectrum
            .iter()
            .map(|c| direction.keeps(c.norm(), threshold))
            .collect();
        Ok(Self {
            keep,
            threshold,
            direction,
        })
    }

    pub fn keep(&self) -> &[bool] {
        &self.keep
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn direction(&self) -> ThresholdDirection {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.keep.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keep.is_empty()
    }

    /// Number of bins that pass
    pub fn kept(&self) -> usize {
        self.keep.iter().filter(|&&k| k).count()
    }

    /// F'[i] = F[i] where the mask passes, 0 elsewhere
    pub fn apply(&self, spectrum: &[Complex<f64>]) -> Vec<Complex<f64>> {
        spectrum
            .iter()
            .zip(self.keep.iter())
            .map(|(&c, &k)| if k { c } else { Complex::new(0.0, 0.0) })
            .collect()
    }
}

/// Time-domain signal rebuilt from a masked spectrum
#[derive(Debug, Clone)]
pub struct Reconstruction {
    samples: Vec<Complex<f64>>,
    mask: MagnitudeMask,
}

impl Reconstruction {
    /// Complex samples as produced by the inverse DFT
    pub fn samples(&self) -> &[Complex<f64>] {
        &self.samples
    }

    pub fn mask(&self) -> &MagnitudeMask {
        &self.mask
    }

    /// Real part, for plotting and playback
    pub fn real_part(&self) -> Vec<f64> {
        self.samples.iter().map(|c| c.re).collect()
    }

    /// Largest |imaginary part|; rounding noise for a real input
    pub fn max_imaginary(&self) -> f64 {
        self.samples.iter().map(|c| c.im.abs()).fold(0.0, f64::max)
    }
}

/// Threshold filter settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpectralFilter {
    pub threshold: f64,
    pub direction: ThresholdDirection,
}

impl SpectralFilter {
    pub fn new(threshold: f64, direction: ThresholdDirection) -> Self {
        Self { threshold, direction }
    }

    /// Mask `spectrum` and transform back to the time domain
    pub fn apply(&self, spectrum: &GlobalSpectrum) -> Result<Reconstruction> {
        let mask = MagnitudeMask::new(spectrum.bins(), self.threshold, self.direction)?;
        let masked = mask.apply(spectrum.bins());
        let samples = spectrum.inverse(&masked);

        tracing::debug!(
            threshold = self.threshold,
            direction = self.direction.name(),
            kept = mask.kept(),
            total = mask.len(),
            "applied spectral threshold"
        );

        Ok(Reconstruction { samples, mask })
    }
}

/// FFT, threshold and inverse FFT in one call
///
/// # Arguments
/// * `signal` - Input samples
/// * `sample_rate` - Sample rate in Hz
/// * `threshold` - Magnitude threshold θ
/// * `direction` - Keep bins above or below θ
pub fn threshold_filter(
    signal: &[f64],
    sample_rate: f64,
    threshold: f64,
    direction: ThresholdDirection,
) -> Result<Reconstruction> {
    let spectrum = GlobalSpectrum::compute(signal, sample_rate)?;
    SpectralFilter::new(threshold, direction).apply(&spectrum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn test_signal() -> Vec<f64> {
        (0..256)
            .map(|n| {
                let t = n as f64 / 256.0;
                3.0 * (2.0 * PI * 10.0 * t).sin() + 0.2 * (2.0 * PI * 60.0 * t).cos() + 0.5
            })
            .collect()
    }

    #[test]
    fn test_constant_signal_masks() {
        let signal = vec![5.0; 8];

        let above = threshold_filter(&signal, 8.0, 1.0, ThresholdDirection::KeepAbove).unwrap();
        assert_eq!(above.mask().kept(), 1);
        for s in above.real_part() {
            assert!((s - 5.0).abs() < 1e-12);
        }

        let below = threshold_filter(&signal, 8.0, 1.0, ThresholdDirection::KeepBelow).unwrap();
        assert_eq!(below.mask().kept(), 7);
        for s in below.real_part() {
            assert!(s.abs() < 1e-12);
        }
    }

    #[test]
    fn test_round_trip_with_all_true_mask() {
        let signal = test_signal();
        let rebuilt = threshold_filter(&signal, 256.0, -1.0, ThresholdDirection::KeepAbove).unwrap();

        assert_eq!(rebuilt.mask().kept(), signal.len());
        for (orig, back) in signal.iter().zip(rebuilt.real_part()) {
            assert!((orig - back).abs() < 1e-9);
        }
    }

    #[test]
    fn test_mask_complementarity() {
        let signal = test_signal();
        let spectrum = GlobalSpectrum::compute(&signal, 256.0).unwrap();
        let threshold = 50.0;

        let above = MagnitudeMask::new(spectrum.bins(), threshold, ThresholdDirection::KeepAbove).unwrap();
        let below = MagnitudeMask::new(spectrum.bins(), threshold, ThresholdDirection::KeepBelow).unwrap();
        let mags = spectrum.magnitudes();

        for i in 0..mags.len() {
            let either = above.keep()[i] || below.keep()[i];
            assert_eq!(either, mags[i] != threshold);
            assert!(!(above.keep()[i] && below.keep()[i]));
        }
    }

    #[test]
    fn test_exact_threshold_rejected_by_both() {
        // Constant 5 over 8 samples puts exactly 40 in the DC bin
        let spectrum = GlobalSpectrum::compute(&[5.0; 8], 8.0).unwrap();
        let above = MagnitudeMask::new(spectrum.bins(), 40.0, ThresholdDirection::KeepAbove).unwrap();
        let below = MagnitudeMask::new(spectrum.bins(), 40.0, ThresholdDirection::KeepBelow).unwrap();
        assert!(!above.keep()[0]);
        assert!(!below.keep()[0]);
    }

    #[test]
    fn test_separates_loud_and_quiet_components() {
        let signal = test_signal();
        let spectrum = GlobalSpectrum::compute(&signal, 256.0).unwrap();

        // 10 Hz sine: |F| = 3 * 128 = 384; 60 Hz: 0.2 * 128 = 25.6; DC: 128
        let loud = SpectralFilter::new(100.0, ThresholdDirection::KeepAbove).apply(&spectrum).unwrap();
        let quiet = SpectralFilter::new(100.0, ThresholdDirection::KeepBelow).apply(&spectrum).unwrap();

        assert_eq!(loud.mask().kept(), 3);
        let loud_samples = loud.real_part();
        let quiet_samples = quiet.real_part();
        for n in 0..signal.len() {
            let t = n as f64 / 256.0;
            let expected_loud = 3.0 * (2.0 * PI * 10.0 * t).sin() + 0.5;
            let expected_quiet = 0.2 * (2.0 * PI * 60.0 * t).cos();
            assert!((loud_samples[n] - expected_loud).abs() < 1e-9);
            assert!((quiet_samples[n] - expected_quiet).abs() < 1e-9);
        }
    }

    #[test]
    fn test_masked_spectrum_stays_hermitian() {
        let signal: Vec<f64> = (0..101).map(|n| ((n * 17) % 23) as f64 - 11.0).collect();
        let spectrum = GlobalSpectrum::compute(&signal, 1.0).unwrap();
        let mags = spectrum.magnitudes();
        let n = mags.len();

        // Pick a threshold between distinct magnitudes, away from any bin
        let mut sorted = mags.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let mid = sorted.len() / 2;
        let threshold = sorted
            .windows(2)
            .skip(mid)
            .find(|w| w[1] - w[0] > 1e-6)
            .map(|w| (w[0] + w[1]) / 2.0)
            .unwrap();

        let mask = MagnitudeMask::new(spectrum.bins(), threshold, ThresholdDirection::KeepAbove).unwrap();
        for k in 1..n {
            assert_eq!(mask.keep()[k], mask.keep()[n - k], "bin {k}");
        }

        let masked = mask.apply(spectrum.bins());
        for k in 1..n {
            assert!((masked[k] - masked[n - k].conj()).norm() < 1e-9);
        }

        let rebuilt = SpectralFilter::new(threshold, ThresholdDirection::KeepAbove)
            .apply(&spectrum)
            .unwrap();
        assert!(rebuilt.max_imaginary() < 1e-9);
    }

    #[test]
    fn test_nan_threshold() {
        let result = threshold_filter(&[1.0, 2.0], 2.0, f64::NAN, ThresholdDirection::KeepBelow);
        assert!(matches!(result, Err(AnalysisError::Configuration(_))));
    }
}

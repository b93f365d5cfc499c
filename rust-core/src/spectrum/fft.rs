//! FFT engines
//!
//! `FftEngine` wraps realfft for the short per-segment transforms of a
//! spectrogram. `ComplexFft` wraps rustfft for the full-length forward and
//! inverse transforms used by the global spectral filter.

use crate::error::{AnalysisError, Result};
use num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// FFT engine for real-valued segments
pub struct FftEngine {
    /// FFT size (number of samples)
    fft_size: usize,

    /// Real FFT processor
    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (complex spectrum)
    output_buffer: Vec<Complex<f64>>,

    /// Scratch space for the transform
    scratch: Vec<Complex<f64>>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples, any length)
    pub fn new(fft_size: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        let input_buffer = r2c.make_input_vec();
        let output_buffer = r2c.make_output_vec();
        let scratch = r2c.make_scratch_vec();

        Self {
            fft_size,
            r2c,
            input_buffer,
            output_buffer,
            scratch,
        }
    }

    /// Compute FFT magnitudes of a segment into `out`
    ///
    /// # Arguments
    /// * `segment` - Input samples (zero-padded if shorter than fft_size)
    /// * `out` - Destination for |X[k]|, k = 0..=fft_size/2
    pub fn magnitude_into(&mut self, segment: &[f64], out: &mut [f64]) -> Result<()> {
        let copy_len = segment.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&segment[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        self.r2c
            .process_with_scratch(&mut self.input_buffer, &mut self.output_buffer, &mut self.scratch)
            .map_err(|e| AnalysisError::Transform(e.to_string()))?;

        for (dst, c) in out.iter_mut().zip(self.output_buffer.iter()) {
            *dst = c.norm();
        }
        Ok(())
    }

    /// Compute FFT and return magnitude spectrum for positive frequencies
    pub fn compute_magnitude(&mut self, segment: &[f64]) -> Result<Vec<f64>> {
        let mut magnitude = vec![0.0; self.num_bins()];
        self.magnitude_into(segment, &mut magnitude)?;
        Ok(magnitude)
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Get number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Frequency of a bin in Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }

    /// Frequency axis in Hz, 0 to sample_rate/2
    pub fn frequency_axis_hz(&self, sample_rate: f64) -> Vec<f64> {
        (0..self.num_bins())
            .map(|bin| self.bin_to_hz(bin, sample_rate))
            .collect()
    }
}

/// Full-length complex FFT pair
#[derive(Clone)]
pub struct ComplexFft {
    len: usize,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
}

impl ComplexFft {
    pub fn new(len: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(len);
        let ifft = planner.plan_fft_inverse(len);
        Self { len, fft, ifft }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Forward DFT of a real signal (full N-point spectrum)
    pub fn forward_real(&self, signal: &[f64]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = signal
            .iter()
            .take(self.len)
            .map(|&s| Complex::new(s, 0.0))
            .collect();
        buffer.resize(self.len, Complex::new(0.0, 0.0));
        self.fft.process(&mut buffer);
        buffer
    }

    /// Inverse DFT, scaled by 1/N
    pub fn inverse(&self, spectrum: &[Complex<f64>]) -> Vec<Complex<f64>> {
        let mut buffer: Vec<Complex<f64>> = spectrum.iter().take(self.len).copied().collect();
        buffer.resize(self.len, Complex::new(0.0, 0.0));
        self.ifft.process(&mut buffer);

        let scale = 1.0 / self.len as f64;
        for c in buffer.iter_mut() {
            *c *= scale;
        }
        buffer
    }
}

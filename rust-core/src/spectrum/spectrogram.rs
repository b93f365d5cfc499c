//! Windowed short-time spectral estimate (spectrogram)
//!
//! The window slides over the signal in steps of `M - overlap` samples.
//! Positive overlap oversamples the time axis, negative overlap leaves gaps
//! between segments. Either way each column is the magnitude of the DFT of
//! one windowed segment.

use super::fft::FftEngine;
use super::windowing::{apply_window_into, segment_count, segment_starts};
use crate::error::{AnalysisError, Result};
use ndarray::{Array2, Axis};

/// Magnitude grid indexed by (segment, frequency bin)
#[derive(Debug, Clone)]
pub struct Spectrogram {
    magnitudes: Array2<f64>,
    times: Vec<f64>,
    frequencies: Vec<f64>,
    window_len: usize,
    step: usize,
    overlap: isize,
    sample_rate: f64,
}

impl Spectrogram {
    /// Magnitudes, shape (num_segments, num_bins)
    pub fn magnitudes(&self) -> &Array2<f64> {
        &self.magnitudes
    }

    /// Segment centre times in seconds
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Bin frequencies in Hz, 0 to sample_rate/2
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn num_segments(&self) -> usize {
        self.magnitudes.nrows()
    }

    pub fn num_bins(&self) -> usize {
        self.magnitudes.ncols()
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    /// Samples advanced between segment starts
    pub fn step(&self) -> usize {
        self.step
    }

    pub fn overlap(&self) -> isize {
        self.overlap
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Magnitudes in dB: 20*log10(|X|), floored at -200 dB
    pub fn to_db(&self) -> Array2<f64> {
        self.magnitudes.mapv(|m| 20.0 * m.max(1e-10).log10())
    }

    /// Frequency of the strongest bin in each segment
    pub fn dominant_frequencies(&self) -> Vec<f64> {
        self.magnitudes
            .axis_iter(Axis(0))
            .map(|column| {
                let (bin, _) = column.iter().enumerate().fold(
                    (0, f64::NEG_INFINITY),
                    |best, (k, &m)| if m > best.1 { (k, m) } else { best },
                );
                self.frequencies[bin]
            })
            .collect()
    }

    /// Rows as plain vectors, one per segment
    pub fn rows(&self) -> Vec<Vec<f64>> {
        self.magnitudes
            .axis_iter(Axis(0))
            .map(|row| row.to_vec())
            .collect()
    }
}

/// Compute a spectrogram
///
/// # Arguments
/// * `signal` - Input samples (length N)
/// * `window` - Window weights (length M)
/// * `sample_rate` - Sample rate in Hz
/// * `overlap` - Samples shared by consecutive segments; may be negative
///
/// # Returns
/// Grid with floor((N - M) / (M - overlap)) + 1 segments of M/2 + 1 bins
pub fn compute_spectrogram(
    signal: &[f64],
    window: &[f64],
    sample_rate: f64,
    overlap: isize,
) -> Result<Spectrogram> {
    let window_len = window.len();

    if window_len == 0 {
        return Err(AnalysisError::config("spectrogram window is empty"));
    }
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Err(AnalysisError::config(format!(
            "sample rate must be positive, got {sample_rate}"
        )));
    }
    let step = match isize::try_from(window_len)
        .ok()
        .and_then(|m| m.checked_sub(overlap))
    {
        Some(step) if step > 0 => step as usize,
        Some(_) => {
            return Err(AnalysisError::config(format!(
                "overlap {overlap} must be smaller than the window length {window_len}"
            )))
        }
        None => {
            return Err(AnalysisError::config(format!(
                "overlap {overlap} is out of range for a window of {window_len} samples"
            )))
        }
    };

    if window_len > signal.len() {
        return Err(AnalysisError::InsufficientData {
            window: window_len,
            signal: signal.len(),
        });
    }

    let mut engine = FftEngine::new(window_len);
    let num_segments = segment_count(signal.len(), window_len, step);
    let mut magnitudes = Array2::<f64>::zeros((num_segments, engine.num_bins()));
    let mut windowed = vec![0.0; window_len];
    let mut times = Vec::with_capacity(num_segments);

    for (row, start) in segment_starts(signal.len(), window_len, step).enumerate() {
        apply_window_into(&signal[start..start + window_len], window, &mut windowed);

        let mut column = magnitudes.row_mut(row);
        match column.as_slice_mut() {
            Some(out) => engine.magnitude_into(&windowed, out)?,
            None => {
                let mags = engine.compute_magnitude(&windowed)?;
                column.iter_mut().zip(mags).for_each(|(dst, m)| *dst = m);
            }
        }

        times.push((start as f64 + window_len as f64 / 2.0) / sample_rate);
    }

    tracing::debug!(
        segments = num_segments,
        bins = engine.num_bins(),
        window_len,
        step,
        "computed spectrogram"
    );

    Ok(Spectrogram {
        magnitudes,
        times,
        frequencies: engine.frequency_axis_hz(sample_rate),
        window_len,
        step,
        overlap,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn alternating(repeats: usize) -> Vec<f64> {
        [1.0, 0.0, -1.0, 0.0].repeat(repeats)
    }

    #[test]
    fn test_quarter_rate_tone() {
        let signal = alternating(4);
        let spec = compute_spectrogram(&signal, &[1.0; 4], 16.0, 0).unwrap();

        assert_eq!(spec.num_segments(), 4);
        assert_eq!(spec.num_bins(), 3);
        assert_eq!(spec.frequencies(), &[0.0, 4.0, 8.0]);

        for f in spec.dominant_frequencies() {
            assert!((f - 4.0).abs() < 1e-12);
        }
        for row in spec.rows() {
            assert!(row[0].abs() < 1e-12);
            assert!((row[1] - 2.0).abs() < 1e-12);
            assert!(row[2].abs() < 1e-12);
        }
    }

    #[test]
    fn test_segment_times() {
        let signal = alternating(4);
        let spec = compute_spectrogram(&signal, &[1.0; 4], 16.0, 0).unwrap();
        assert_eq!(spec.times(), &[0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn test_column_count_formula() {
        let signal: Vec<f64> = (0..1000).map(|i| (i as f64 * 0.1).sin()).collect();
        let window = vec![1.0; 100];

        for overlap in [0isize, 50, 99, -50, -500] {
            let spec = compute_spectrogram(&signal, &window, 1000.0, overlap).unwrap();
            let step = (100 - overlap) as usize;
            assert_eq!(spec.num_segments(), (1000 - 100) / step + 1, "overlap {overlap}");
            assert_eq!(spec.step(), step);
            assert_eq!(spec.num_bins(), 51);
        }
    }

    #[test]
    fn test_window_equals_signal() {
        let signal = vec![0.5; 64];
        let spec = compute_spectrogram(&signal, &[1.0; 64], 64.0, 0).unwrap();
        assert_eq!(spec.num_segments(), 1);
        assert!((spec.magnitudes()[[0, 0]] - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_window_weights_are_applied() {
        let signal = vec![1.0; 8];
        let weights = vec![0.0, 1.0, 0.0, 1.0];
        let spec = compute_spectrogram(&signal, &weights, 8.0, 0).unwrap();

        // DC bin is the sum of the weights
        assert_eq!(spec.num_segments(), 2);
        assert!((spec.magnitudes()[[0, 0]] - 2.0).abs() < 1e-12);
        assert!((spec.magnitudes()[[1, 2]] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_tone_tracking_with_gaussian_window() {
        use crate::filters::windows::{generate_window, Support, WindowShape};

        let sample_rate = 1000.0;
        let signal: Vec<f64> = (0..2000)
            .map(|n| (2.0 * PI * 120.0 * n as f64 / sample_rate).sin())
            .collect();
        let window = generate_window(
            WindowShape::Gaussian { width: 10.0, peak_scale: None },
            Support::new(0.0, 1.0, 0.01),
        )
        .unwrap();

        let spec = compute_spectrogram(&signal, window.weights(), sample_rate, 50).unwrap();
        for f in spec.dominant_frequencies() {
            assert!((f - 120.0).abs() <= 10.0, "dominant {f}");
        }
    }

    #[test]
    fn test_db_view() {
        let signal = vec![1.0; 4];
        let spec = compute_spectrogram(&signal, &[1.0; 4], 4.0, 0).unwrap();
        let db = spec.to_db();
        assert!((db[[0, 0]] - 20.0 * 4.0_f64.log10()).abs() < 1e-9);
        assert!((db[[0, 1]] + 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_errors() {
        let signal = vec![0.0; 10];

        let too_long = compute_spectrogram(&signal, &[1.0; 11], 10.0, 0);
        assert!(matches!(
            too_long,
            Err(AnalysisError::InsufficientData { window: 11, signal: 10 })
        ));

        let stuck = compute_spectrogram(&signal, &[1.0; 4], 10.0, 4);
        assert!(matches!(stuck, Err(AnalysisError::Configuration(_))));

        let empty = compute_spectrogram(&signal, &[], 10.0, 0);
        assert!(matches!(empty, Err(AnalysisError::Configuration(_))));

        let bad_rate = compute_spectrogram(&signal, &[1.0; 4], 0.0, 0);
        assert!(matches!(bad_rate, Err(AnalysisError::Configuration(_))));
    }

    #[test]
    fn test_extreme_overlap_is_a_config_error() {
        let signal = vec![0.0; 10];

        let huge_gap = compute_spectrogram(&signal, &[1.0; 4], 10.0, isize::MIN);
        assert!(matches!(huge_gap, Err(AnalysisError::Configuration(_))));

        let huge_overlap = compute_spectrogram(&signal, &[1.0; 4], 10.0, isize::MAX);
        assert!(matches!(huge_overlap, Err(AnalysisError::Configuration(_))));
    }
}

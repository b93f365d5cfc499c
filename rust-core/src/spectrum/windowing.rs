//! Applying window weights to signal segments before the FFT

/// Apply window weights to a segment
///
/// # Arguments
/// * `segment` - Input samples
/// * `weights` - Window weights (same length as `segment`)
///
/// # Returns
/// Windowed segment, truncated to the shorter of the two inputs
pub fn apply_window(segment: &[f64], weights: &[f64]) -> Vec<f64> {
    segment
        .iter()
        .zip(weights.iter())
        .map(|(&s, &w)| s * w)
        .collect()
}

/// Apply window weights into a reusable buffer
pub fn apply_window_into(segment: &[f64], weights: &[f64], out: &mut [f64]) {
    for ((o, &s), &w) in out.iter_mut().zip(segment.iter()).zip(weights.iter()) {
        *o = s * w;
    }
}

/// Segment start offsets for a window of `window_len` samples advancing by
/// `step` samples through a signal of `signal_len` samples.
///
/// Only segments that fit entirely inside the signal are produced.
pub fn segment_starts(signal_len: usize, window_len: usize, step: usize) -> impl Iterator<Item = usize> {
    let count = segment_count(signal_len, window_len, step);
    (0..count).map(move |j| j * step)
}

/// Number of whole segments: floor((N - M) / step) + 1, or 0 when M > N
pub fn segment_count(signal_len: usize, window_len: usize, step: usize) -> usize {
    if window_len == 0 || step == 0 || window_len > signal_len {
        return 0;
    }
    (signal_len - window_len) / step + 1
}

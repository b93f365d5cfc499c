//! Python bindings for spectrogram computation

use crate::spectrum::compute_spectrogram;
use numpy::{PyArray1, PyArray2, PyReadonlyArray1};
use pyo3::prelude::*;

/// Compute a windowed spectrogram
///
/// Args:
///     signal: Input samples
///     window: Window weights; their count sets the segment length
///     sample_rate: Sample rate in Hz
///     overlap: Shared samples between segments, negative for gaps (default: 0)
///
/// Returns:
///     Tuple of (times, frequencies, magnitudes) with magnitudes shaped
///     (frequencies, times)
#[pyfunction]
#[pyo3(signature = (signal, window, sample_rate, overlap=0))]
pub fn spectrogram<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    window: PyReadonlyArray1<f64>,
    sample_rate: f64,
    overlap: isize,
) -> PyResult<(&'py PyArray1<f64>, &'py PyArray1<f64>, &'py PyArray2<f64>)> {
    let spec = compute_spectrogram(signal.as_slice()?, window.as_slice()?, sample_rate, overlap)?;

    // Frequency rows, time columns, as plotting libraries expect
    let grid = spec.magnitudes().t().to_owned();

    Ok((
        PyArray1::from_slice(py, spec.times()),
        PyArray1::from_slice(py, spec.frequencies()),
        PyArray2::from_owned_array(py, grid),
    ))
}

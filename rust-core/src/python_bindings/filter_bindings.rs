//! Python bindings for window generation and spectral thresholding

use crate::filters::{self, generate_window, Support, ThresholdDirection, WindowShape};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

type WindowArrays<'py> = (&'py PyArray1<f64>, &'py PyArray1<f64>);

fn window_arrays<'py>(
    py: Python<'py>,
    shape: WindowShape,
    support: Support,
) -> PyResult<WindowArrays<'py>> {
    let window = generate_window(shape, support)?;
    Ok((
        PyArray1::from_slice(py, window.positions()),
        PyArray1::from_slice(py, window.weights()),
    ))
}

/// Sample a Gaussian window over [start, stop)
///
/// Args:
///     start, stop, step: Support grid
///     width: Gaussian width parameter a in exp(-a (x - c)^2)
///     peak_scale: Value at the centre (default: 1.0)
///
/// Returns:
///     Tuple of (positions, weights) numpy arrays
#[pyfunction]
#[pyo3(signature = (start, stop, step, width, peak_scale=None))]
pub fn gaussian_window<'py>(
    py: Python<'py>,
    start: f64,
    stop: f64,
    step: f64,
    width: f64,
    peak_scale: Option<f64>,
) -> PyResult<WindowArrays<'py>> {
    window_arrays(
        py,
        WindowShape::Gaussian { width, peak_scale },
        Support::new(start, stop, step),
    )
}

/// Sample a Ricker (Mexican hat) wavelet over [start, stop)
///
/// Returns:
///     Tuple of (positions, weights) numpy arrays
#[pyfunction]
pub fn ricker_window<'py>(
    py: Python<'py>,
    start: f64,
    stop: f64,
    step: f64,
    sigma: f64,
) -> PyResult<WindowArrays<'py>> {
    window_arrays(py, WindowShape::Ricker { sigma }, Support::new(start, stop, step))
}

/// Zero every DFT bin on the wrong side of `threshold` and invert
///
/// Args:
///     signal: Input samples
///     sample_rate: Sample rate in Hz
///     threshold: Magnitude threshold
///     keep: "above" or "below"
///
/// Returns:
///     Tuple of (real, imaginary) parts of the reconstruction
#[pyfunction]
#[pyo3(signature = (signal, sample_rate, threshold, keep="above"))]
pub fn threshold_filter<'py>(
    py: Python<'py>,
    signal: PyReadonlyArray1<f64>,
    sample_rate: f64,
    threshold: f64,
    keep: &str,
) -> PyResult<WindowArrays<'py>> {
    let direction = match keep {
        "above" => ThresholdDirection::KeepAbove,
        "below" => ThresholdDirection::KeepBelow,
        other => {
            return Err(PyValueError::new_err(format!(
                "keep must be 'above' or 'below', got '{other}'"
            )))
        }
    };

    let reconstruction =
        filters::threshold_filter(signal.as_slice()?, sample_rate, threshold, direction)?;
    let imaginary: Vec<f64> = reconstruction.samples().iter().map(|c| c.im).collect();

    Ok((
        PyArray1::from_vec(py, reconstruction.real_part()),
        PyArray1::from_vec(py, imaginary),
    ))
}

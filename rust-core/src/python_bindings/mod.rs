//! PyO3 bindings for Python integration

use crate::error::AnalysisError;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

mod filter_bindings;
mod spectrum_bindings;

impl From<AnalysisError> for PyErr {
    fn from(err: AnalysisError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// Python module definition
#[pymodule]
fn spectral_explorer(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(filter_bindings::gaussian_window, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::ricker_window, m)?)?;
    m.add_function(wrap_pyfunction!(filter_bindings::threshold_filter, m)?)?;
    m.add_function(wrap_pyfunction!(spectrum_bindings::spectrogram, m)?)?;

    Ok(())
}

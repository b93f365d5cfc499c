//! Spectral Explorer - Time-Frequency Analysis Core
//!
//! Windowed spectrograms with Gaussian and Ricker windows, global
//! spectral thresholding with inverse-FFT reconstruction, and the loaders,
//! exporters and playback around them.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod config;
pub mod error;
pub mod export;
pub mod filters;
pub mod pipeline;
pub mod presentation;
pub mod signal;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use config::ExplorerConfig;
pub use error::{AnalysisError, Result};
pub use export::FileExporter;
pub use filters::{generate_window, threshold_filter, Support, ThresholdDirection, WindowShape};
pub use pipeline::{Explorer, RunSummary};
pub use presentation::Presenter;
pub use signal::Signal;
pub use spectrum::{compute_spectrogram, GlobalSpectrum, Spectrogram};

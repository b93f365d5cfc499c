//! Spectral analysis with FFT

pub mod fft;
pub mod windowing;
pub mod spectrogram;
pub mod analysis;

pub use fft::{FftEngine, ComplexFft};
pub use windowing::apply_window;
pub use spectrogram::{Spectrogram, compute_spectrogram};
pub use analysis::{GlobalSpectrum, OneSidedSpectrum};

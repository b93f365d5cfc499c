//! Window generation and global spectral filtering

pub mod windows;
pub mod threshold;

pub use windows::{WindowShape, Support, Window, generate_window};
pub use threshold::{ThresholdDirection, MagnitudeMask, Reconstruction, SpectralFilter, threshold_filter};

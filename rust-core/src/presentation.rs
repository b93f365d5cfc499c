//! Presentation seam
//!
//! Analysis results are handed to a `Presenter` as plain data. Rendering,
//! file export and playback live behind the trait, so the transforms never
//! touch display state.

use crate::error::Result;
use crate::filters::windows::Window;
use crate::spectrum::spectrogram::Spectrogram;
use serde::Serialize;

/// Label of the input signal plot
pub const SIGNAL_LABEL: &str = "signal";

/// Label of the one-sided spectrum plot
pub const SPECTRUM_LABEL: &str = "fourier-transform";

/// Label of the window overlay plotted for a spectrogram
pub fn window_label(spectrogram_label: &str) -> String {
    format!("{spectrogram_label}-window")
}

/// File-name stem for a label: anything outside `[A-Za-z0-9._-]` becomes `_`
pub fn output_stem(label: &str) -> String {
    label
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || "-_.".contains(c) { c } else { '_' })
        .collect()
}

/// Horizontal reference line drawn across a plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceLine {
    pub y: f64,
    pub label: String,
}

/// Line plot data
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinePlot {
    /// Identifier used for output names
    pub label: String,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reference_lines: Vec<ReferenceLine>,
}

impl LinePlot {
    pub fn new(
        label: impl Into<String>,
        title: impl Into<String>,
        (x_label, y_label): (&str, &str),
        x: Vec<f64>,
        y: Vec<f64>,
    ) -> Self {
        Self {
            label: label.into(),
            title: title.into(),
            x_label: x_label.to_string(),
            y_label: y_label.to_string(),
            x,
            y,
            reference_lines: Vec::new(),
        }
    }

    pub fn with_reference_line(mut self, y: f64, label: impl Into<String>) -> Self {
        self.reference_lines.push(ReferenceLine { y, label: label.into() });
        self
    }
}

/// Spectrogram with the window that produced it
pub struct SpectrogramView<'a> {
    pub label: &'a str,
    pub title: &'a str,
    pub window: &'a Window,
    pub spectrogram: &'a Spectrogram,
}

/// Receiver of analysis output
pub trait Presenter {
    /// Show a line plot
    fn line_plot(&mut self, plot: &LinePlot) -> Result<()>;

    /// Show a time-frequency magnitude grid
    fn spectrogram(&mut self, view: &SpectrogramView<'_>) -> Result<()>;

    /// Play a sample sequence
    fn play(&mut self, label: &str, samples: &[f64], sample_rate: f64) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_stem() {
        assert_eq!(output_stem("a b"), "a_b");
        assert_eq!(output_stem("a_b"), "a_b");
        assert_eq!(output_stem("ricker-sigma0.01/overlap0"), "ricker-sigma0.01_overlap0");
        assert_eq!(window_label("gauss"), "gauss-window");
    }
}

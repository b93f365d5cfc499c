//! Window functions for spectrogram analysis
//!
//! Windows are sampled over a half-open support `[start, stop)` at a fixed
//! step, the same way an `arange` grid is built, and are centred on the
//! midpoint between the first and last sample.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Window shape family
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum WindowShape {
    /// Gaussian: w(x) = peak_scale * exp(-width * (x - c)²)
    ///
    /// `peak_scale` only rescales the curve for overlay plots. It has no
    /// effect on where spectral energy lands.
    Gaussian {
        width: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        peak_scale: Option<f64>,
    },

    /// Ricker (Mexican hat) wavelet:
    /// w(x) = K * (1 - ((x - c)/σ)²) * exp(-(x - c)² / (2σ²))
    Ricker { sigma: f64 },

    /// Symmetric Hann window: w[n] = 0.5 - 0.5*cos(2πn/(M-1))
    Hann,

    /// Rectangular window (no weighting)
    Rectangular,
}

impl WindowShape {
    /// Short name used in log lines and file names
    pub fn name(&self) -> &'static str {
        match self {
            WindowShape::Gaussian { .. } => "gaussian",
            WindowShape::Ricker { .. } => "ricker",
            WindowShape::Hann => "hann",
            WindowShape::Rectangular => "rectangular",
        }
    }

    /// Fill in an unset Gaussian peak scale. Other shapes are returned unchanged.
    pub fn with_default_peak_scale(self, scale: f64) -> Self {
        match self {
            WindowShape::Gaussian { width, peak_scale: None } => WindowShape::Gaussian {
                width,
                peak_scale: Some(scale),
            },
            other => other,
        }
    }

    /// Same shape with a Gaussian peak of exactly 1.0, as used for analysis
    pub fn unit_peak(self) -> Self {
        match self {
            WindowShape::Gaussian { width, .. } => WindowShape::Gaussian {
                width,
                peak_scale: Some(1.0),
            },
            other => other,
        }
    }

    /// Ricker normalisation constant K for a given σ
    pub fn ricker_scale(sigma: f64) -> f64 {
        2.0 / (3.0 * sigma).sqrt() * PI.powf(0.25)
    }
}

/// Largest window a support may describe
pub const MAX_WINDOW_LEN: usize = 1 << 24;

/// Sampled support of a window: `start, start + step, ...` strictly below `stop`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Support {
    pub start: f64,
    pub stop: f64,
    pub step: f64,
}

impl Support {
    pub fn new(start: f64, stop: f64, step: f64) -> Self {
        Self { start, stop, step }
    }

    /// Integer sample grid `0, 1, ..., length - 1`
    pub fn samples(length: usize) -> Self {
        Self::new(0.0, length as f64, 1.0)
    }

    /// Number of grid points: ceil((stop - start) / step)
    pub fn len(&self) -> usize {
        let span = (self.stop - self.start) / self.step;
        if span.is_finite() && span > 0.0 {
            span.ceil() as usize
        } else {
            0
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Midpoint between the first and last grid point
    pub fn center(&self) -> f64 {
        let n = self.len();
        self.start + n.saturating_sub(1) as f64 * self.step / 2.0
    }

    /// Grid positions (x-values for overlay plots)
    pub fn positions(&self) -> Vec<f64> {
        (0..self.len())
            .map(|i| self.start + i as f64 * self.step)
            .collect()
    }

    /// Signed distance of each grid point from the centre.
    ///
    /// Computed from the integer index so that the offsets are exactly
    /// antisymmetric: offset[i] == -offset[n - 1 - i].
    fn offsets(&self) -> Vec<f64> {
        let n = self.len();
        let mid = n.saturating_sub(1) as f64 / 2.0;
        (0..n).map(|i| (i as f64 - mid) * self.step).collect()
    }

    fn validate(&self) -> Result<()> {
        if !(self.start.is_finite() && self.stop.is_finite()) {
            return Err(AnalysisError::config("window support bounds must be finite"));
        }
        if !(self.step.is_finite() && self.step > 0.0) {
            return Err(AnalysisError::config(format!(
                "window support step must be positive, got {}",
                self.step
            )));
        }
        if self.stop <= self.start {
            return Err(AnalysisError::config(format!(
                "window support [{}, {}) is empty",
                self.start, self.stop
            )));
        }
        if (self.stop - self.start) / self.step > MAX_WINDOW_LEN as f64 {
            return Err(AnalysisError::config(format!(
                "window support [{}, {}) with step {} exceeds {MAX_WINDOW_LEN} samples",
                self.start, self.stop, self.step
            )));
        }
        if self.len() < 2 {
            return Err(AnalysisError::config(format!(
                "window support [{}, {}) with step {} yields fewer than 2 samples",
                self.start, self.stop, self.step
            )));
        }
        Ok(())
    }
}

/// Generated window: grid positions and their weights
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    shape: WindowShape,
    positions: Vec<f64>,
    weights: Vec<f64>,
}

impl Window {
    pub fn shape(&self) -> WindowShape {
        self.shape
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Index and value of the largest weight
    pub fn peak(&self) -> (usize, f64) {
        self.weights
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, w)| if w > best.1 { (i, w) } else { best })
    }
}

/// Generate window coefficients
///
/// # Arguments
/// * `shape` - Window family and its parameters
/// * `support` - Sample grid the window is evaluated on
///
/// # Returns
/// Window with `support.len()` weights
pub fn generate_window(shape: WindowShape, support: Support) -> Result<Window> {
    support.validate()?;

    let length = support.len();
    let offsets = support.offsets();

    let weights = match shape {
        WindowShape::Gaussian { width, peak_scale } => {
            if !(width.is_finite() && width > 0.0) {
                return Err(AnalysisError::config(format!(
                    "Gaussian width must be positive, got {width}"
                )));
            }
            let scale = peak_scale.unwrap_or(1.0);
            if !scale.is_finite() {
                return Err(AnalysisError::config("Gaussian peak scale must be finite"));
            }
            offsets
                .iter()
                .map(|&d| scale * (-width * d * d).exp())
                .collect()
        }

        WindowShape::Ricker { sigma } => {
            if !(sigma.is_finite() && sigma > 0.0) {
                return Err(AnalysisError::config(format!(
                    "Ricker sigma must be positive, got {sigma}"
                )));
            }
            let k = WindowShape::ricker_scale(sigma);
            offsets
                .iter()
                .map(|&d| {
                    let u = d / sigma;
                    k * (1.0 - u * u) * (-(d * d) / (2.0 * sigma * sigma)).exp()
                })
                .collect()
        }

        WindowShape::Hann => {
            let m = length as f64;
            (0..length)
                .map(|n| {
                    let angle = 2.0 * PI * n as f64 / (m - 1.0);
                    0.5 - 0.5 * angle.cos()
                })
                .collect()
        }

        WindowShape::Rectangular => vec![1.0; length],
    };

    tracing::debug!(shape = shape.name(), length, "generated window");

    Ok(Window {
        shape,
        positions: support.positions(),
        weights,
    })
}

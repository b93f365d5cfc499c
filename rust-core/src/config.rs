//! Analysis configuration
//!
//! Read from TOML. `ExplorerConfig::default()` reproduces the reference
//! session on the Handel recording: three Gaussian spectrograms with
//! different overlaps, a Ricker spectrogram, a default Hann spectrogram, and
//! the two complementary 100-magnitude threshold filters.

use crate::error::{AnalysisError, Result};
use crate::filters::threshold::ThresholdDirection;
use crate::filters::windows::{Support, WindowShape};
use crate::presentation::{output_stem, window_label, SIGNAL_LABEL, SPECTRUM_LABEL};
use crate::signal::FieldNames;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Input description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Recording to analyse; the CLI argument takes precedence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Title used for the signal plot
    pub title: String,

    /// Field names for JSON containers
    pub fields: FieldNames,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            title: "Handel's Messiah".to_string(),
            fields: FieldNames::default(),
        }
    }
}

/// Window shape and the grid it is sampled on
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    pub shape: WindowShape,
    pub support: Support,
}

/// One spectrogram configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrogramConfig {
    /// Identifier used for output names
    pub label: String,
    pub title: String,
    /// Samples shared by consecutive segments (negative leaves gaps)
    #[serde(default)]
    pub overlap: isize,
    pub window: WindowConfig,
}

/// One global threshold filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub label: String,
    pub title: String,
    pub threshold: f64,
    pub direction: ThresholdDirection,
    /// Request playback of the reconstruction
    #[serde(default)]
    pub play: bool,
}

/// Export options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Resample audio to this rate before writing WAV files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<f64>,
}

/// Complete session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub input: InputConfig,
    pub export: ExportConfig,
    #[serde(rename = "spectrogram")]
    pub spectrograms: Vec<SpectrogramConfig>,
    #[serde(rename = "filter")]
    pub filters: Vec<FilterConfig>,
}

fn gaussian(label: &str, title: &str, overlap: isize) -> SpectrogramConfig {
    SpectrogramConfig {
        label: label.to_string(),
        title: title.to_string(),
        overlap,
        window: WindowConfig {
            shape: WindowShape::Gaussian {
                width: 10.0,
                peak_scale: None,
            },
            support: Support::new(0.0, 1.0, 0.01),
        },
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            input: InputConfig::default(),
            export: ExportConfig::default(),
            spectrograms: vec![
                gaussian("gaussian-a10-overlap0", "Gaussian Filter, a = 10, Overlap = 0", 0),
                gaussian(
                    "gaussian-a10-overlap50",
                    "Gaussian Filter, a = 10, Overlap = 50 (oversampled)",
                    50,
                ),
                gaussian(
                    "gaussian-a10-overlap-50",
                    "Gaussian Filter, a = 10, Overlap = -50 (undersampled)",
                    -50,
                ),
                SpectrogramConfig {
                    label: "ricker-sigma0.01-overlap0".to_string(),
                    title: "Ricker Wavelet Filter, σ = 0.01, Overlap = 0".to_string(),
                    overlap: 0,
                    window: WindowConfig {
                        shape: WindowShape::Ricker { sigma: 0.01 },
                        support: Support::new(0.0, 2.0, 0.01),
                    },
                },
                SpectrogramConfig {
                    label: "default-hann".to_string(),
                    title: "Spectrogram - Audio with Gabor Transform".to_string(),
                    overlap: 128,
                    window: WindowConfig {
                        shape: WindowShape::Hann,
                        support: Support::samples(256),
                    },
                },
            ],
            filters: vec![
                FilterConfig {
                    label: "above-100".to_string(),
                    title: "Handel's Messiah - Intensities Greater Than 100".to_string(),
                    threshold: 100.0,
                    direction: ThresholdDirection::KeepAbove,
                    play: false,
                },
                FilterConfig {
                    label: "below-100".to_string(),
                    title: "Handel's Messiah - Intensities Less Than 100".to_string(),
                    threshold: 100.0,
                    direction: ThresholdDirection::KeepBelow,
                    play: false,
                },
            ],
        }
    }
}

impl ExplorerConfig {
    /// Parse from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        tracing::info!(
            path = %path.display(),
            spectrograms = config.spectrograms.len(),
            filters = config.filters.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Serialize to TOML text
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject labels whose output files would collide
    ///
    /// Every label, the derived `<label>-window` overlay names and the
    /// fixed signal and spectrum plots are compared by file stem.
    pub fn validate(&self) -> Result<()> {
        let mut stems: HashMap<String, String> = [SIGNAL_LABEL, SPECTRUM_LABEL]
            .into_iter()
            .map(|label| (output_stem(label), label.to_string()))
            .collect();

        let outputs = self
            .spectrograms
            .iter()
            .flat_map(|s| [s.label.clone(), window_label(&s.label)])
            .chain(self.filters.iter().map(|f| f.label.clone()));
        for label in outputs {
            if label.is_empty() {
                return Err(AnalysisError::config("labels must not be empty"));
            }
            if let Some(taken) = stems.insert(output_stem(&label), label.clone()) {
                return Err(AnalysisError::config(format!(
                    "label '{label}' writes to the same output as '{taken}'"
                )));
            }
        }
        if let Some(rate) = self.export.sample_rate {
            if !(rate.is_finite() && rate > 0.0) {
                return Err(AnalysisError::config(format!(
                    "export sample rate must be positive, got {rate}"
                )));
            }
        }
        Ok(())
    }
}

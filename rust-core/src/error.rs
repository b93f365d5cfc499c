//! Error types shared by every stage of the analysis

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Window of {window} samples does not fit in a signal of {signal} samples")]
    InsufficientData { window: usize, signal: usize },

    #[error("Transform failed: {0}")]
    Transform(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("MAT file error: {0}")]
    MatFile(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to serialize configuration: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Resampling failed: {0}")]
    Resample(String),

    #[cfg(feature = "playback")]
    #[error("Audio playback failed: {0}")]
    Audio(#[from] crate::audio::output::AudioError),
}

impl AnalysisError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        AnalysisError::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

//! File-based presenter: JSON for plots and grids, WAV for audio

use crate::audio::resample;
use crate::error::{AnalysisError, Result};
use crate::presentation::{output_stem, LinePlot, Presenter, SpectrogramView};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct SpectrogramRecord<'a> {
    label: &'a str,
    title: &'a str,
    window_shape: &'a str,
    window_len: usize,
    overlap: isize,
    step: usize,
    sample_rate: f64,
    window_positions: &'a [f64],
    window_weights: &'a [f64],
    times: &'a [f64],
    frequencies: &'a [f64],
    /// One row per segment
    magnitudes: Vec<Vec<f64>>,
}

/// Writes every presented item into an output directory
pub struct FileExporter {
    dir: PathBuf,
    wav_sample_rate: Option<f64>,
    written: Vec<PathBuf>,
}

impl FileExporter {
    /// Create the exporter, creating `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            wav_sample_rate: None,
            written: Vec::new(),
        })
    }

    /// Resample audio to `rate` before writing WAV files
    pub fn with_wav_sample_rate(mut self, rate: Option<f64>) -> Self {
        self.wav_sample_rate = rate;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn path_for(&self, label: &str, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{extension}", output_stem(label)))
    }

    fn write_json<T: Serialize>(&mut self, label: &str, value: &T) -> Result<()> {
        let path = self.path_for(label, "json");
        let writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(writer, value)?;
        tracing::debug!(path = %path.display(), "wrote JSON");
        self.written.push(path);
        Ok(())
    }
}

impl Presenter for FileExporter {
    fn line_plot(&mut self, plot: &LinePlot) -> Result<()> {
        self.write_json(&plot.label, plot)
    }

    fn spectrogram(&mut self, view: &SpectrogramView<'_>) -> Result<()> {
        let spec = view.spectrogram;
        let record = SpectrogramRecord {
            label: view.label,
            title: view.title,
            window_shape: view.window.shape().name(),
            window_len: spec.window_len(),
            overlap: spec.overlap(),
            step: spec.step(),
            sample_rate: spec.sample_rate(),
            window_positions: view.window.positions(),
            window_weights: view.window.weights(),
            times: spec.times(),
            frequencies: spec.frequencies(),
            magnitudes: spec.rows(),
        };
        self.write_json(view.label, &record)
    }

    fn play(&mut self, label: &str, samples: &[f64], sample_rate: f64) -> Result<()> {
        let target_rate = self.wav_sample_rate.unwrap_or(sample_rate);
        let audio = resample(samples, sample_rate, target_rate)?;

        let rate = target_rate.round();
        if !(rate >= 1.0 && rate <= u32::MAX as f64) {
            return Err(AnalysisError::config(format!(
                "cannot write WAV at {target_rate} Hz"
            )));
        }

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: rate as u32,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let path = self.path_for(label, "wav");
        let mut writer = hound::WavWriter::create(&path, spec)?;
        for &s in &audio {
            writer.write_sample(s as f32)?;
        }
        writer.finalize()?;

        tracing::debug!(path = %path.display(), samples = audio.len(), "wrote WAV");
        self.written.push(path);
        Ok(())
    }
}

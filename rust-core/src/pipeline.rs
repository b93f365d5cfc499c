//! Runs a full exploration session against one signal
//!
//! Every stage reads the signal and its own parameters only; results go
//! straight to the presenter. The first error aborts the run.

use crate::config::{ExplorerConfig, FilterConfig, SpectrogramConfig};
use crate::error::Result;
use crate::filters::threshold::SpectralFilter;
use crate::filters::windows::generate_window;
use crate::presentation::{window_label, LinePlot, Presenter, SpectrogramView, SIGNAL_LABEL, SPECTRUM_LABEL};
use crate::signal::Signal;
use crate::spectrum::analysis::GlobalSpectrum;
use crate::spectrum::spectrogram::compute_spectrogram;

const TIME_AXIS: (&str, &str) = ("Time (s)", "Intensity");
const FREQUENCY_AXIS: (&str, &str) = ("Frequency (Hz)", "Intensity");

/// Counts of what a run produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub spectrograms: usize,
    pub reconstructions: usize,
    pub playbacks: usize,
}

/// Session driver
pub struct Explorer {
    config: ExplorerConfig,
}

impl Explorer {
    pub fn new(config: ExplorerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    /// Run every configured spectrogram and filter on `signal`
    pub fn run<P: Presenter>(&self, signal: &Signal, presenter: &mut P) -> Result<RunSummary> {
        self.config.validate()?;
        let mut summary = RunSummary::default();

        tracing::info!(
            samples = signal.len(),
            sample_rate = signal.sample_rate(),
            "starting analysis"
        );

        presenter.line_plot(&LinePlot::new(
            SIGNAL_LABEL,
            self.config.input.title.clone(),
            TIME_AXIS,
            signal.times().to_vec(),
            signal.samples().to_vec(),
        ))?;

        for spec in &self.config.spectrograms {
            self.run_spectrogram(spec, signal, presenter)?;
            summary.spectrograms += 1;
        }

        if !self.config.filters.is_empty() {
            self.run_filters(signal, presenter, &mut summary)?;
        }

        tracing::info!(
            spectrograms = summary.spectrograms,
            reconstructions = summary.reconstructions,
            "analysis finished"
        );
        Ok(summary)
    }

    fn run_filters<P: Presenter>(
        &self,
        signal: &Signal,
        presenter: &mut P,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let spectrum = GlobalSpectrum::compute(signal.samples(), signal.sample_rate())?;
        let one_sided = spectrum.one_sided();
        let spectrum_plot = self.config.filters.iter().fold(
            LinePlot::new(
                SPECTRUM_LABEL,
                "Fourier Transform of Signal",
                FREQUENCY_AXIS,
                one_sided.frequencies,
                one_sided.magnitudes,
            ),
            |plot, f| plot.with_reference_line(f.threshold, f.label.clone()),
        );
        presenter.line_plot(&spectrum_plot)?;

        for filter in &self.config.filters {
            let played = self.run_filter(filter, &spectrum, signal, presenter)?;
            summary.reconstructions += 1;
            if played {
                summary.playbacks += 1;
            }
        }
        Ok(())
    }

    fn run_spectrogram<P: Presenter>(
        &self,
        spec: &SpectrogramConfig,
        signal: &Signal,
        presenter: &mut P,
    ) -> Result<()> {
        let shape = spec.window.shape;
        let support = spec.window.support;

        // Peak scale only affects the overlay; an unset one follows the signal maximum
        let overlay = generate_window(shape.with_default_peak_scale(signal.max_value()), support)?;
        presenter.line_plot(&LinePlot::new(
            window_label(&spec.label),
            format!("{} (window)", spec.title),
            TIME_AXIS,
            overlay.positions().to_vec(),
            overlay.weights().to_vec(),
        ))?;

        let window = generate_window(shape.unit_peak(), support)?;
        let spectrogram =
            compute_spectrogram(signal.samples(), window.weights(), signal.sample_rate(), spec.overlap)?;

        tracing::info!(
            label = %spec.label,
            window = shape.name(),
            segments = spectrogram.num_segments(),
            bins = spectrogram.num_bins(),
            "spectrogram ready"
        );

        presenter.spectrogram(&SpectrogramView {
            label: &spec.label,
            title: &spec.title,
            window: &window,
            spectrogram: &spectrogram,
        })
    }

    fn run_filter<P: Presenter>(
        &self,
        filter: &FilterConfig,
        spectrum: &GlobalSpectrum,
        signal: &Signal,
        presenter: &mut P,
    ) -> Result<bool> {
        let reconstruction = SpectralFilter::new(filter.threshold, filter.direction).apply(spectrum)?;
        let samples = reconstruction.real_part();

        tracing::info!(
            label = %filter.label,
            kept = reconstruction.mask().kept(),
            total = reconstruction.mask().len(),
            max_imaginary = reconstruction.max_imaginary(),
            "reconstruction ready"
        );

        presenter.line_plot(&LinePlot::new(
            filter.label.clone(),
            filter.title.clone(),
            TIME_AXIS,
            signal.times().to_vec(),
            samples.clone(),
        ))?;

        if filter.play {
            presenter.play(&filter.label, &samples, signal.sample_rate())?;
        }
        Ok(filter.play)
    }
}

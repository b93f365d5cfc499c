//! Spectral Explorer Command-Line Interface
//!
//! Runs a configured exploration session over a recording:
//! - Gaussian, Ricker and Hann spectrograms at several overlaps
//! - Global spectral thresholding with inverse-FFT reconstruction
//! - JSON and WAV export of every result
//!
//! Live playback needs the `playback` feature.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use spectral_explorer::config::ExplorerConfig;
use spectral_explorer::signal::{load_signal, FieldNames, Signal};
use spectral_explorer::{Explorer, FileExporter, ThresholdDirection};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "spectral-explorer")]
#[command(author, version, about = "Spectrogram and spectral threshold explorer", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run every configured spectrogram and filter and export the results
    Analyze {
        /// Input recording (.mat, .json or .wav); overrides the config input path
        input: Option<PathBuf>,

        /// Session configuration (TOML); built-in defaults when omitted
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = "spectral-output")]
        output: PathBuf,

        /// MAT/JSON field holding the time axis
        #[arg(long)]
        time_field: Option<String>,

        /// MAT/JSON field holding the samples
        #[arg(long)]
        sample_field: Option<String>,

        /// Resample exported WAV files to this rate in Hz
        #[arg(long)]
        export_rate: Option<f64>,
    },

    /// Print the built-in session configuration as TOML
    DefaultConfig,

    /// Play a recording, optionally after spectral thresholding
    #[cfg(feature = "playback")]
    Play {
        /// Input recording (.mat, .json or .wav)
        input: PathBuf,

        /// Magnitude threshold; plays the raw signal when omitted
        #[arg(long)]
        threshold: Option<f64>,

        /// Which side of the threshold to keep
        #[arg(long, value_enum, default_value = "below")]
        keep: Keep,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Keep {
    Above,
    Below,
}

impl From<Keep> for ThresholdDirection {
    fn from(keep: Keep) -> Self {
        match keep {
            Keep::Above => ThresholdDirection::KeepAbove,
            Keep::Below => ThresholdDirection::KeepBelow,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            config,
            output,
            time_field,
            sample_field,
            export_rate,
        } => cmd_analyze(input, config, output, time_field, sample_field, export_rate),

        Commands::DefaultConfig => cmd_default_config(),

        #[cfg(feature = "playback")]
        Commands::Play {
            input,
            threshold,
            keep,
        } => cmd_play(input, threshold, keep),
    }
}

fn load_input(path: &Path, fields: &FieldNames) -> Result<Signal> {
    let signal = load_signal(path, fields)
        .with_context(|| format!("failed to load signal from {}", path.display()))?;
    info!(
        "Loaded {} samples at {:.1} Hz ({:.2} s)",
        signal.len(),
        signal.sample_rate(),
        signal.duration()
    );
    Ok(signal)
}

fn cmd_analyze(
    input: Option<PathBuf>,
    config_path: Option<PathBuf>,
    output: PathBuf,
    time_field: Option<String>,
    sample_field: Option<String>,
    export_rate: Option<f64>,
) -> Result<()> {
    let mut config = match &config_path {
        Some(path) => ExplorerConfig::load(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => ExplorerConfig::default(),
    };

    if let Some(field) = time_field {
        config.input.fields.time = field;
    }
    if let Some(field) = sample_field {
        config.input.fields.samples = field;
    }
    if export_rate.is_some() {
        config.export.sample_rate = export_rate;
    }

    let Some(input) = input.or_else(|| config.input.path.clone()) else {
        bail!("no input given on the command line or in the config");
    };

    let signal = load_input(&input, &config.input.fields)?;

    let mut exporter = FileExporter::new(&output)
        .with_context(|| format!("failed to create {}", output.display()))?
        .with_wav_sample_rate(config.export.sample_rate);

    let summary = Explorer::new(config).run(&signal, &mut exporter)?;

    println!("Spectral Explorer");
    println!("=================");
    println!("Input:           {}", input.display());
    println!("Samples:         {}", signal.len());
    println!("Sample rate:     {:.1} Hz", signal.sample_rate());
    println!("Spectrograms:    {}", summary.spectrograms);
    println!("Reconstructions: {}", summary.reconstructions);
    println!("Audio exports:   {}", summary.playbacks);
    println!();
    println!("Wrote {} files to {}", exporter.written().len(), exporter.dir().display());
    for path in exporter.written() {
        println!("  {}", path.display());
    }

    Ok(())
}

fn cmd_default_config() -> Result<()> {
    let text = ExplorerConfig::default().to_toml()?;
    print!("{text}");
    Ok(())
}

#[cfg(feature = "playback")]
fn cmd_play(input: PathBuf, threshold: Option<f64>, keep: Keep) -> Result<()> {
    use spectral_explorer::audio::play_blocking;
    use spectral_explorer::threshold_filter;

    let signal = load_input(&input, &FieldNames::default())?;

    let samples = match threshold {
        Some(threshold) => {
            let reconstruction =
                threshold_filter(signal.samples(), signal.sample_rate(), threshold, keep.into())?;
            info!(
                "Kept {} of {} bins",
                reconstruction.mask().kept(),
                reconstruction.mask().len()
            );
            reconstruction.real_part()
        }
        None => signal.samples().to_vec(),
    };

    println!("Playing {} ({} samples)...", input.display(), samples.len());
    play_blocking(&samples, signal.sample_rate()).context("playback failed")?;
    println!("Done");
    Ok(())
}

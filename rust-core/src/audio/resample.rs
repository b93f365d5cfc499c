//! Sample-rate conversion with rubato
//!
//! Recordings rarely come at a rate an output device or WAV consumer
//! expects, so audio is converted with a windowed-sinc resampler before it
//! leaves the crate.

use crate::error::{AnalysisError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Input frames per resampler call
const CHUNK_SIZE: usize = 1024;

/// Resample a mono signal from `from_rate` to `to_rate`
///
/// # Returns
/// round(N * to_rate / from_rate) samples with the resampler delay removed.
/// Equal rates return the input unchanged.
pub fn resample(samples: &[f64], from_rate: f64, to_rate: f64) -> Result<Vec<f64>> {
    for rate in [from_rate, to_rate] {
        if !(rate.is_finite() && rate > 0.0) {
            return Err(AnalysisError::config(format!(
                "sample rates must be positive, got {rate}"
            )));
        }
    }

    if (from_rate - to_rate).abs() < 1e-9 || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let ratio = to_rate / from_rate;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let mut resampler = SincFixedIn::<f64>::new(ratio, 1.0, params, CHUNK_SIZE, 1)
        .map_err(|e| AnalysisError::Resample(e.to_string()))?;

    let expected = (samples.len() as f64 * ratio).round() as usize;
    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(expected + delay + CHUNK_SIZE);

    let mut pos = 0;
    while samples.len() - pos >= resampler.input_frames_next() {
        let n = resampler.input_frames_next();
        let chunk: [&[f64]; 1] = [&samples[pos..pos + n]];
        let block = resampler
            .process(&chunk[..], None)
            .map_err(|e| AnalysisError::Resample(e.to_string()))?;
        output.extend_from_slice(&block[0]);
        pos += n;
    }

    if pos < samples.len() {
        let tail: [&[f64]; 1] = [&samples[pos..]];
        let block = resampler
            .process_partial(Some(&tail[..]), None)
            .map_err(|e| AnalysisError::Resample(e.to_string()))?;
        output.extend_from_slice(&block[0]);
    }

    // Flush the filter tail until the delayed output is complete
    while output.len() < expected + delay {
        let block = resampler
            .process_partial::<&[f64]>(None, None)
            .map_err(|e| AnalysisError::Resample(e.to_string()))?;
        if block[0].is_empty() {
            break;
        }
        output.extend_from_slice(&block[0]);
    }

    let resampled: Vec<f64> = output.into_iter().skip(delay).take(expected).collect();

    tracing::debug!(
        from_rate,
        to_rate,
        input = samples.len(),
        output = resampled.len(),
        "resampled audio"
    );

    Ok(resampled)
}

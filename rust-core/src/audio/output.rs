//! Blocking playback on the default cpal output device
//!
//! Samples are resampled to the device rate and pushed through a ring
//! buffer; the stream callback pops one sample per frame and copies it to
//! every channel.

use super::resample::resample;
use crate::error::Result;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::{HeapConsumer, HeapRb};
use std::time::Duration;
use thiserror::Error;

const POLL: Duration = Duration::from_millis(10);

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("No audio output device found")]
    NoDevice,

    #[error("Failed to query output device: {0}")]
    Device(String),

    #[error("Failed to open output stream: {0}")]
    Stream(String),
}

/// Fill interleaved `frames` from `source`, one mono sample per frame
///
/// Frames past the end of the available samples are silenced.
pub(crate) fn fill_frames(source: &mut HeapConsumer<f64>, frames: &mut [f32], channels: usize) {
    for frame in frames.chunks_mut(channels.max(1)) {
        let sample = source.pop().unwrap_or(0.0) as f32;
        frame.fill(sample);
    }
}

/// Play `samples` recorded at `sample_rate` and return once they are drained
pub fn play_blocking(samples: &[f64], sample_rate: f64) -> Result<()> {
    let device = cpal::default_host()
        .default_output_device()
        .ok_or(AudioError::NoDevice)?;
    let name = device
        .name()
        .map_err(|e| AudioError::Device(e.to_string()))?;
    let supported = device
        .default_output_config()
        .map_err(|e| AudioError::Device(e.to_string()))?;

    let device_rate = supported.sample_rate().0 as f64;
    let channels = supported.channels() as usize;
    let audio = resample(samples, sample_rate, device_rate)?;

    tracing::info!(
        device = %name,
        device_rate,
        channels,
        samples = audio.len(),
        "starting playback"
    );

    // Half a second of headroom
    let capacity = (device_rate as usize / 2).max(1024);
    let (mut producer, mut consumer) = HeapRb::<f64>::new(capacity).split();
    let mut pos = producer.push_slice(&audio);

    let stream = device
        .build_output_stream(
            &supported.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                fill_frames(&mut consumer, data, channels)
            },
            |err| tracing::error!("audio output error: {}", err),
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))?;
    stream
        .play()
        .map_err(|e| AudioError::Stream(e.to_string()))?;

    while pos < audio.len() {
        let pushed = producer.push_slice(&audio[pos..]);
        if pushed == 0 {
            std::thread::sleep(POLL);
        }
        pos += pushed;
    }

    while producer.free_len() < capacity {
        std::thread::sleep(POLL);
    }
    // Last callback period is still in the device buffer
    std::thread::sleep(Duration::from_millis(100));

    drop(stream);
    tracing::info!("playback finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_frames_duplicates_channels() {
        let (mut producer, mut consumer) = HeapRb::<f64>::new(8).split();
        producer.push_slice(&[0.5, -0.25]);

        let mut frames = [1.0f32; 6];
        fill_frames(&mut consumer, &mut frames, 2);

        assert_eq!(frames, [0.5, 0.5, -0.25, -0.25, 0.0, 0.0]);
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_fill_frames_mono() {
        let (mut producer, mut consumer) = HeapRb::<f64>::new(4).split();
        assert_eq!(producer.push_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]), 4);

        let mut frames = [0.0f32; 3];
        fill_frames(&mut consumer, &mut frames, 1);

        assert_eq!(frames, [1.0, 2.0, 3.0]);
        assert_eq!(consumer.len(), 1);
    }
}

//! Audio conversion and playback

pub mod resample;
#[cfg(feature = "playback")]
pub mod output;

pub use resample::resample;
#[cfg(feature = "playback")]
pub use output::play_blocking;

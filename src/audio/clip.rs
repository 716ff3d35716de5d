//! WAV clip processing for the annotation driver.
//!
//! Loads a source WAV (any rate, any channel count), downmixes to mono by
//! averaging channels, resamples to the target rate, and writes processed
//! clips back as 16-bit mono PCM.

use crate::error::{ClipscribeError, Result};
use std::path::Path;

/// A mono audio clip in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl Clip {
    /// Clip length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Load a WAV file and downmix it to mono.
///
/// The returned clip keeps the source sample rate; use [`prepare`] to also
/// resample to a target rate.
pub fn load(path: &Path) -> Result<Clip> {
    let mut reader = hound::WavReader::open(path).map_err(|e| ClipscribeError::AudioDecode {
        message: format!("Failed to open WAV file {}: {}", path.display(), e),
    })?;

    let spec = reader.spec();
    let raw_samples: Vec<i16> = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| ClipscribeError::AudioDecode {
            message: format!("Failed to read WAV samples from {}: {}", path.display(), e),
        })?;

    if spec.channels == 0 {
        return Err(ClipscribeError::AudioDecode {
            message: format!("WAV file {} declares zero channels", path.display()),
        });
    }

    Ok(Clip {
        samples: downmix(&raw_samples, spec.channels),
        sample_rate: spec.sample_rate,
    })
}

/// Load a clip and resample it to `target_rate` if needed.
pub fn prepare(path: &Path, target_rate: u32) -> Result<Clip> {
    let clip = load(path)?;
    if clip.sample_rate == target_rate {
        return Ok(clip);
    }
    Ok(Clip {
        samples: resample(&clip.samples, clip.sample_rate, target_rate),
        sample_rate: target_rate,
    })
}

/// Write a mono clip as 16-bit PCM.
pub fn save(path: &Path, clip: &Clip) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: clip.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer =
        hound::WavWriter::create(path, spec).map_err(|e| ClipscribeError::AudioEncode {
            message: format!("Failed to create WAV file {}: {}", path.display(), e),
        })?;

    for &sample in &clip.samples {
        writer
            .write_sample(sample)
            .map_err(|e| ClipscribeError::AudioEncode {
                message: format!("Failed to write sample to {}: {}", path.display(), e),
            })?;
    }

    writer.finalize().map_err(|e| ClipscribeError::AudioEncode {
        message: format!("Failed to finalize WAV file {}: {}", path.display(), e),
    })
}

/// Downmix interleaved multi-channel samples to mono by averaging frames.
fn downmix(samples: &[i16], channels: u16) -> Vec<i16> {
    if channels <= 1 {
        return samples.to_vec();
    }

    let channels = channels as usize;
    samples
        .chunks_exact(channels)
        .map(|frame| {
            let sum: i32 = frame.iter().map(|&s| s as i32).sum();
            (sum / channels as i32) as i16
        })
        .collect()
}

/// Simple linear interpolation resampling.
pub fn resample(samples: &[i16], from_rate: u32, to_rate: u32) -> Vec<i16> {
    if from_rate == to_rate {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let output_len = (samples.len() as f64 / ratio).ceil() as usize;

    (0..output_len)
        .map(|i| {
            let source_pos = i as f64 * ratio;
            let source_idx = source_pos.floor() as usize;
            let fraction = source_pos - source_idx as f64;

            if source_idx + 1 >= samples.len() {
                samples[source_idx]
            } else {
                let left = samples[source_idx] as f64;
                let right = samples[source_idx + 1] as f64;
                (left + (right - left) * fraction) as i16
            }
        })
        .collect()
}

//! Decoded audio buffers
//!
//! All audio in the engine is interleaved stereo f32 in [-1.0, 1.0].
//! Decoders normalize to this format on load so the processing graph never
//! deals with channel layouts or integer sample formats.

use std::time::Duration;

/// A fully decoded audio clip
///
/// Samples are interleaved stereo (L, R, L, R, ...).
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Create a buffer from interleaved stereo samples
    ///
    /// An odd trailing sample is dropped to keep frames whole.
    pub fn new(mut samples: Vec<f32>, sample_rate: u32) -> Self {
        if samples.len() % 2 != 0 {
            samples.pop();
        }
        Self {
            samples,
            sample_rate,
        }
    }

    /// Create a silent buffer of the given length in frames
    pub fn silent(frames: usize, sample_rate: u32) -> Self {
        Self {
            samples: vec![0.0; frames * 2],
            sample_rate,
        }
    }

    /// Interleaved stereo samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of stereo frames
    pub fn frames(&self) -> usize {
        self.samples.len() / 2
    }

    /// Clip duration
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    /// Sample pair at a frame index, or silence past the end
    #[inline]
    pub fn frame(&self, index: usize) -> (f32, f32) {
        if index >= self.frames() {
            return (0.0, 0.0);
        }
        (self.samples[index * 2], self.samples[index * 2 + 1])
    }
}

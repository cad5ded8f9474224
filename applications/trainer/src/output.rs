//! CPAL audio output
//!
//! Opens the default output device and pulls interleaved stereo from a
//! render callback, spreading it across however many channels the device
//! actually has.

use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::Stream;
use tracing::{error, info};

/// Owns the output stream; audio stops when this is dropped
pub struct AudioOutput {
    _stream: Stream,
    sample_rate: u32,
}

impl AudioOutput {
    /// Open the default output device and start pulling from `render`
    ///
    /// `render` fills an interleaved stereo buffer at the given sample rate.
    /// It runs on the audio thread, so it must not block.
    pub fn start<F>(mut render: F) -> Result<Self>
    where
        F: FnMut(&mut [f32], u32) + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| anyhow!("no audio output device found"))?;

        let config = device
            .default_output_config()
            .context("failed to query default output config")?;
        let sample_rate = config.sample_rate();
        let channels = config.channels() as usize;
        let config = config.config();

        info!(
            device = device.name().unwrap_or_else(|_| "unknown".into()),
            sample_rate,
            channels,
            "audio output opened"
        );

        let mut stereo_scratch: Vec<f32> = Vec::new();
        let stream = device
            .build_output_stream(
                &config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    let frames = data.len() / channels.max(1);
                    if stereo_scratch.len() < frames * 2 {
                        stereo_scratch.resize(frames * 2, 0.0);
                    }
                    let scratch = &mut stereo_scratch[..frames * 2];
                    render(scratch, sample_rate);
                    spread_stereo(scratch, data, channels);
                },
                |err| error!(error = %err, "audio stream error"),
                None,
            )
            .context("failed to build output stream")?;

        stream.play().context("failed to start output stream")?;

        Ok(Self {
            _stream: stream,
            sample_rate,
        })
    }

    /// Output device sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

/// Copy interleaved stereo into a device buffer with any channel count
///
/// Mono devices get the left channel, extra channels beyond two get silence.
fn spread_stereo(stereo: &[f32], out: &mut [f32], channels: usize) {
    if channels == 2 {
        out.copy_from_slice(stereo);
        return;
    }
    for (frame_idx, frame) in out.chunks_exact_mut(channels.max(1)).enumerate() {
        let left = stereo[frame_idx * 2];
        let right = stereo[frame_idx * 2 + 1];
        frame[0] = left;
        if channels > 1 {
            frame[1] = right;
        }
        for sample in frame.iter_mut().skip(2) {
            *sample = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spread_to_mono_takes_left() {
        let stereo = [0.5, -0.5, 0.25, -0.25];
        let mut out = [0.0; 2];
        spread_stereo(&stereo, &mut out, 1);
        assert_eq!(out, [0.5, 0.25]);
    }

    #[test]
    fn spread_to_quad_zeroes_extras() {
        let stereo = [0.5, -0.5];
        let mut out = [9.0; 4];
        spread_stereo(&stereo, &mut out, 4);
        assert_eq!(out, [0.5, -0.5, 0.0, 0.0]);
    }
}

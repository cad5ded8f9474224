//! Audio decoding via Symphonia
//!
//! Full-file decode only: the game clips are a few seconds long and looped,
//! so streaming decode buys nothing here.

use crate::buffer::AudioBuffer;
use crate::error::{AudioError, Result};
use std::path::Path;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Decode an entire audio file into an interleaved stereo buffer
///
/// Supports the formats enabled on the symphonia dependency (MP3, FLAC,
/// OGG/Vorbis, WAV). Mono is duplicated to both channels; layouts with more
/// than two channels are downmixed with extra channels folded in at -3 dB.
pub fn decode_file(path: &Path) -> Result<AudioBuffer> {
    if !path.exists() {
        return Err(AudioError::AssetNotFound(path.display().to_string()));
    }

    let file = std::fs::File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AudioError::Decode(format!("Failed to probe file: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| AudioError::NoAudioTracks(path.display().to_string()))?;

    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let track_id = track.id;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AudioError::Decode(format!("Failed to create decoder: {}", e)))?;

    let mut all_samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(AudioError::Decode(format!("Error reading packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = decoder
            .decode(&packet)
            .map_err(|e| AudioError::Decode(format!("Decode error: {}", e)))?;

        append_as_stereo(&decoded, &mut all_samples);
    }

    Ok(AudioBuffer::new(all_samples, sample_rate))
}

/// Convert a decoded Symphonia buffer to interleaved stereo f32 and append
///
/// Signed integers use symmetric scaling (divide by 2^(N-1)) so the output
/// range stays symmetric around zero.
fn append_as_stereo(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => mix_to_stereo(buf, out, |s| s.clamp(-1.0, 1.0)),
        AudioBufferRef::F64(buf) => mix_to_stereo(buf, out, |s| (s as f32).clamp(-1.0, 1.0)),
        AudioBufferRef::S32(buf) => mix_to_stereo(buf, out, |s| s as f32 / 2147483648.0),
        AudioBufferRef::S16(buf) => mix_to_stereo(buf, out, |s| s as f32 / 32768.0),
        AudioBufferRef::S8(buf) => mix_to_stereo(buf, out, |s| s as f32 / 128.0),
        AudioBufferRef::S24(buf) => mix_to_stereo(buf, out, |s| s.inner() as f32 / 8388608.0),
        AudioBufferRef::U32(buf) => {
            mix_to_stereo(buf, out, |s| (s as f32 / u32::MAX as f32) * 2.0 - 1.0);
        }
        AudioBufferRef::U16(buf) => {
            mix_to_stereo(buf, out, |s| (s as f32 / u16::MAX as f32) * 2.0 - 1.0);
        }
        AudioBufferRef::U8(buf) => {
            mix_to_stereo(buf, out, |s| (s as f32 / u8::MAX as f32) * 2.0 - 1.0);
        }
        AudioBufferRef::U24(buf) => {
            mix_to_stereo(buf, out, |s| (s.inner() as f32 / 16777215.0) * 2.0 - 1.0);
        }
    }
}

/// Fold any channel layout down to interleaved stereo
///
/// - Mono is duplicated to both channels
/// - Stereo passes through
/// - Additional channels beyond the first two are folded into both sides at
///   -3 dB (0.707), which is close enough to ITU downmix for game clips
fn mix_to_stereo<T, F>(
    buf: &symphonia::core::audio::AudioBuffer<T>,
    out: &mut Vec<f32>,
    normalize: F,
) where
    T: symphonia::core::sample::Sample + Copy,
    F: Fn(T) -> f32,
{
    const FOLD_MIX: f32 = 0.707; // -3 dB

    let channels = buf.spec().channels.count();
    let frames = buf.frames();
    out.reserve(frames * 2);

    match channels {
        0 => {
            out.extend(std::iter::repeat(0.0).take(frames * 2));
        }
        1 => {
            let mono = buf.chan(0);
            for i in 0..frames {
                let sample = normalize(mono[i]);
                out.push(sample);
                out.push(sample);
            }
        }
        2 => {
            let left = buf.chan(0);
            let right = buf.chan(1);
            for i in 0..frames {
                out.push(normalize(left[i]));
                out.push(normalize(right[i]));
            }
        }
        _ => {
            let left = buf.chan(0);
            let right = buf.chan(1);
            for i in 0..frames {
                let mut l = normalize(left[i]);
                let mut r = normalize(right[i]);
                for ch in 2..channels {
                    let extra = normalize(buf.chan(ch)[i]) * FOLD_MIX;
                    l += extra;
                    r += extra;
                }
                out.push(l.clamp(-1.0, 1.0));
                out.push(r.clamp(-1.0, 1.0));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_nonexistent_file_returns_error() {
        let result = decode_file(Path::new("/nonexistent/clip.mp3"));
        assert!(matches!(result, Err(AudioError::AssetNotFound(_))));
    }
}

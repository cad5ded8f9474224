/// Equal-power stereo panner
///
/// Implements the standard equal-power pan law for stereo material: panning
/// left folds the right channel into the left at increasing gain, panning
/// right mirrors that. A pan of 0.0 is a perfect pass-through, -1.0 is hard
/// left, +1.0 is hard right.
use super::chain::AudioEffect;

use std::f32::consts::FRAC_PI_2;

/// Stereo panner with position in [-1.0, 1.0]
pub struct StereoPanner {
    pan: f32,
    // Cached equal-power gains
    gain_l: f32,
    gain_r: f32,
    enabled: bool,
}

impl StereoPanner {
    /// Create a panner at the given position (clamped to [-1.0, 1.0])
    pub fn new(pan: f32) -> Self {
        let mut panner = Self {
            pan: 0.0,
            gain_l: 1.0,
            gain_r: 0.0,
            enabled: true,
        };
        panner.set_pan(pan);
        panner
    }

    /// Current pan position
    pub fn pan(&self) -> f32 {
        self.pan
    }

    /// Move the pan position (clamped to [-1.0, 1.0])
    pub fn set_pan(&mut self, pan: f32) {
        self.pan = pan.clamp(-1.0, 1.0);
        // Equal-power gains over a quarter circle. For pan <= 0 the angle
        // runs from 0 (hard left) to pi/2 (center); for pan > 0 from 0
        // (center) to pi/2 (hard right).
        let x = if self.pan <= 0.0 {
            self.pan + 1.0
        } else {
            self.pan
        };
        self.gain_l = (x * FRAC_PI_2).cos();
        self.gain_r = (x * FRAC_PI_2).sin();
    }
}

impl AudioEffect for StereoPanner {
    fn process(&mut self, buffer: &mut [f32], _sample_rate: u32) {
        if !self.enabled || self.pan == 0.0 {
            return;
        }

        if self.pan <= 0.0 {
            // Fold the right channel into the left
            for frame in buffer.chunks_exact_mut(2) {
                let (l, r) = (frame[0], frame[1]);
                frame[0] = l + r * self.gain_l;
                frame[1] = r * self.gain_r;
            }
        } else {
            // Fold the left channel into the right
            for frame in buffer.chunks_exact_mut(2) {
                let (l, r) = (frame[0], frame[1]);
                frame[0] = l * self.gain_l;
                frame[1] = r + l * self.gain_r;
            }
        }
    }

    fn reset(&mut self) {
        // Stateless
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Stereo Panner"
    }
}

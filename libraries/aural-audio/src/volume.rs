//! Master volume with logarithmic scaling
//!
//! Page-wide output stage applied after every session's graph. Volume range
//! is 0-100%, mapped to -60 dB to 0 dB internally so the slider feels
//! perceptually linear.

/// Master volume controller with logarithmic scaling
///
/// 0% = -60 dB (near silence), 100% = 0 dB (unity gain). The default of 90%
/// lands at -6 dB, leaving headroom for boosted playback paths.
#[derive(Debug, Clone)]
pub struct Volume {
    /// Volume level (0-100)
    level: u8,

    /// Mute state (preserves volume level)
    muted: bool,

    /// Cached linear gain multiplier
    linear_gain: f32,
}

impl Volume {
    /// Create new volume controller (level clamped to 0-100)
    pub fn new(level: u8) -> Self {
        let level = level.min(100);
        let linear_gain = Self::calculate_linear_gain(level);

        Self {
            level,
            muted: false,
            linear_gain,
        }
    }

    /// Set volume level (0-100)
    pub fn set_level(&mut self, level: u8) {
        self.level = level.min(100);
        self.linear_gain = Self::calculate_linear_gain(self.level);
    }

    /// Get current volume level (0-100)
    pub fn level(&self) -> u8 {
        self.level
    }

    /// Mute audio (preserves volume level)
    pub fn mute(&mut self) {
        self.muted = true;
    }

    /// Unmute audio (restores previous volume)
    pub fn unmute(&mut self) {
        self.muted = false;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Linear gain multiplier, 0.0 when muted
    pub fn gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.linear_gain
        }
    }

    /// Apply volume to audio buffer (in-place)
    pub fn apply(&self, buffer: &mut [f32]) {
        let gain = self.gain();

        if gain == 0.0 {
            buffer.fill(0.0);
        } else if gain != 1.0 {
            for sample in buffer.iter_mut() {
                *sample *= gain;
            }
        }
    }

    /// Convert volume percentage to linear gain
    ///
    /// Formula: gain = 10^((level% - 100) * 0.6 / 20)
    /// - 0%   → -60 dB (treated as silence)
    /// - 50%  → -30 dB
    /// - 90%  →  -6 dB (default)
    /// - 100% →   0 dB (unity)
    fn calculate_linear_gain(level: u8) -> f32 {
        if level == 0 {
            return 0.0;
        }

        let db = (level as f32 - 100.0) * 0.6;
        10.0_f32.powf(db / 20.0)
    }

    /// Current setting in dB, for display
    pub fn to_db(&self) -> f32 {
        if self.level == 0 || self.muted {
            -60.0
        } else {
            20.0 * self.linear_gain.log10()
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(90)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_minus_six_db() {
        let vol = Volume::default();
        assert_eq!(vol.level(), 90);
        assert!((vol.to_db() + 6.0).abs() < 0.01);
    }

    #[test]
    fn set_volume_level_clamps() {
        let mut vol = Volume::new(50);
        vol.set_level(150);
        assert_eq!(vol.level(), 100);
    }

    #[test]
    fn mute_preserves_level() {
        let mut vol = Volume::new(80);
        vol.mute();
        assert!(vol.is_muted());
        assert_eq!(vol.level(), 80);
        assert_eq!(vol.gain(), 0.0);

        vol.unmute();
        assert!(vol.gain() > 0.0);
    }

    #[test]
    fn gain_calculation() {
        let vol = Volume::new(0);
        assert_eq!(vol.gain(), 0.0);

        let vol = Volume::new(100);
        assert!((vol.gain() - 1.0).abs() < 0.001);

        // 50% is -30 dB
        let vol = Volume::new(50);
        assert!((vol.gain() - 0.0316).abs() < 0.001);
    }

    #[test]
    fn apply_muted_zeroes_buffer() {
        let mut vol = Volume::new(80);
        vol.mute();

        let mut buffer = vec![0.5, 0.8, -0.3, -0.9];
        vol.apply(&mut buffer);

        assert_eq!(buffer, vec![0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn apply_scales_samples() {
        let vol = Volume::new(50);
        let mut buffer = vec![1.0];
        vol.apply(&mut buffer);
        assert!((buffer[0] - 0.0316).abs() < 0.001);
    }
}

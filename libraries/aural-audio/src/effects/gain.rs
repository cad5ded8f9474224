/// Static gain stage
///
/// Applies a fixed linear gain to both channels. Used for per-stem mix
/// gains, makeup gain after compression, and EQ output compensation.
use super::chain::AudioEffect;
use aural_core::db_to_gain;

/// Fixed gain applied to both channels
pub struct Gain {
    linear: f32,
    enabled: bool,
}

impl Gain {
    /// Create a gain stage from a dB value
    pub fn from_db(gain_db: f32) -> Self {
        Self {
            linear: db_to_gain(gain_db),
            enabled: true,
        }
    }

    /// Create a gain stage from a linear multiplier
    pub fn from_linear(linear: f32) -> Self {
        Self {
            linear: linear.max(0.0),
            enabled: true,
        }
    }

    /// Current linear gain
    pub fn linear(&self) -> f32 {
        self.linear
    }

    /// Replace the gain with a new dB value
    pub fn set_db(&mut self, gain_db: f32) {
        self.linear = db_to_gain(gain_db);
    }
}

impl AudioEffect for Gain {
    fn process(&mut self, buffer: &mut [f32], _sample_rate: u32) {
        if !self.enabled {
            return;
        }
        for sample in buffer.iter_mut() {
            *sample *= self.linear;
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
        "Gain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unity_gain_is_transparent() {
        let mut gain = Gain::from_db(0.0);
        let mut buffer = vec![0.25, -0.25, 0.5, -0.5];
        gain.process(&mut buffer, 44100);
        assert_eq!(buffer, vec![0.25, -0.25, 0.5, -0.5]);
    }

    #[test]
    fn minus_six_db_roughly_halves() {
        let mut gain = Gain::from_db(-6.0);
        let mut buffer = vec![1.0, 1.0];
        gain.process(&mut buffer, 44100);
        assert!((buffer[0] - 0.501).abs() < 0.001);
    }

    #[test]
    fn negative_linear_gain_clamped_to_zero() {
        let gain = Gain::from_linear(-1.0);
        assert_eq!(gain.linear(), 0.0);
    }
}

/// Dynamic range compressor
///
/// Attenuates signal above a threshold. Makeup gain is deliberately not part
/// of this node; the graph builder appends a separate gain stage so the
/// meter reads pure reduction.
use super::chain::AudioEffect;
use super::meter::SharedLevel;

/// Compressor settings
#[derive(Debug, Clone, Copy)]
pub struct CompressorSettings {
    /// Threshold in dB (-60 to 0)
    pub threshold_db: f32,

    /// Ratio (1.0 to 20.0), e.g. 4.0 means 4:1 compression
    pub ratio: f32,

    /// Attack time in milliseconds (0.1 to 500)
    pub attack_ms: f32,

    /// Release time in milliseconds (10 to 1000)
    pub release_ms: f32,

    /// Knee width in dB (0 = hard knee)
    pub knee_db: f32,
}

impl CompressorSettings {
    /// Default voicing for the guessing games: -30 dB threshold, narrow knee
    pub fn new() -> Self {
        Self {
            threshold_db: -30.0,
            ratio: 4.0,
            attack_ms: 20.0,
            release_ms: 250.0,
            knee_db: 2.0,
        }
    }

    /// Validate and clamp settings to safe ranges
    pub fn validate(&mut self) {
        self.threshold_db = self.threshold_db.clamp(-60.0, 0.0);
        self.ratio = self.ratio.clamp(1.0, 20.0);
        self.attack_ms = self.attack_ms.clamp(0.1, 500.0);
        self.release_ms = self.release_ms.clamp(10.0, 1000.0);
        self.knee_db = self.knee_db.clamp(0.0, 10.0);
    }
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self::new()
    }
}

/// Dynamic range compressor
///
/// Two-stage design:
/// 1. Peak level detection with instant attack and slow release, so the
///    measured level is stable across waveform cycles (low THD)
/// 2. Gain-reduction smoothing with the configured attack/release, which is
///    where the audible timing lives
pub struct Compressor {
    settings: CompressorSettings,
    enabled: bool,

    // Peak level detector (dB), instant attack / slow release
    peak_level_db: f32,

    // Smoothed gain reduction (dB, negative while compressing)
    gain_reduction_db: f32,

    peak_release_coeff: f32,
    gr_attack_coeff: f32,
    gr_release_coeff: f32,

    // Published as positive dB of reduction for the meter
    reduction_out: Option<SharedLevel>,

    sample_rate: u32,
    needs_update: bool,
}

impl Compressor {
    /// Create a compressor with specific settings
    pub fn with_settings(mut settings: CompressorSettings) -> Self {
        settings.validate();
        let mut comp = Self {
            settings,
            enabled: true,
            peak_level_db: -120.0,
            gain_reduction_db: 0.0,
            peak_release_coeff: 0.0,
            gr_attack_coeff: 0.0,
            gr_release_coeff: 0.0,
            reduction_out: None,
            sample_rate: 44100,
            needs_update: true,
        };
        comp.update_coefficients();
        comp
    }

    /// Create a compressor with default settings
    pub fn new() -> Self {
        Self::with_settings(CompressorSettings::new())
    }

    /// Publish gain reduction (positive dB) to the given cell while processing
    pub fn with_reduction_output(mut self, out: SharedLevel) -> Self {
        self.reduction_out = Some(out);
        self
    }

    /// Current settings
    pub fn settings(&self) -> CompressorSettings {
        self.settings
    }

    /// Current gain reduction as positive dB
    pub fn gain_reduction_db(&self) -> f32 {
        -self.gain_reduction_db
    }

    fn update_coefficients(&mut self) {
        if !self.needs_update {
            return;
        }

        let sr = self.sample_rate as f32;

        // Peak hold long enough to span waveform cycles at low frequencies
        let peak_release_samples = 50.0 * sr / 1000.0;
        self.peak_release_coeff = (-1.0 / peak_release_samples).exp();

        // coeff = exp(-1 / (time_ms * sr / 1000)) gives 63.2% response at
        // the configured time
        let attack_samples = self.settings.attack_ms * sr / 1000.0;
        let release_samples = self.settings.release_ms * sr / 1000.0;
        self.gr_attack_coeff = (-1.0 / attack_samples).exp();
        self.gr_release_coeff = (-1.0 / release_samples).exp();

        self.needs_update = false;
    }

    /// Static transfer curve: output level in dB for an input level in dB
    #[inline]
    fn compute_output_level(&self, input_db: f32) -> f32 {
        let threshold = self.settings.threshold_db;
        let ratio = self.settings.ratio;
        let knee = self.settings.knee_db;

        if knee <= 0.0 {
            if input_db <= threshold {
                input_db
            } else {
                threshold + (input_db - threshold) / ratio
            }
        } else {
            let half_knee = knee / 2.0;
            let knee_start = threshold - half_knee;
            let knee_end = threshold + half_knee;

            if input_db <= knee_start {
                input_db
            } else if input_db >= knee_end {
                threshold + (input_db - threshold) / ratio
            } else {
                // Quadratic soft-knee transition
                let x = input_db - knee_start;
                let slope_change = (1.0 - 1.0 / ratio) / (2.0 * knee);
                input_db - slope_change * x * x
            }
        }
    }

    /// Gain reduction in dB for an input level (negative while compressing)
    #[inline]
    fn compute_gain_reduction(&self, input_db: f32) -> f32 {
        self.compute_output_level(input_db) - input_db
    }

    /// Instant attack, fixed-rate decay toward the noise floor
    #[inline]
    fn update_peak_level(&mut self, input_db: f32) {
        if input_db > self.peak_level_db {
            self.peak_level_db = input_db;
        } else {
            // Decay toward the floor rather than the input, which hits -inf
            // at every zero crossing
            const NOISE_FLOOR_DB: f32 = -120.0;
            self.peak_level_db =
                self.peak_release_coeff * (self.peak_level_db - NOISE_FLOOR_DB) + NOISE_FLOOR_DB;
        }
    }

    #[inline]
    fn smooth_gain_reduction(&mut self, target_gr_db: f32) {
        // More negative target means we are attacking into compression
        let coeff = if target_gr_db < self.gain_reduction_db {
            self.gr_attack_coeff
        } else {
            self.gr_release_coeff
        };

        self.gain_reduction_db = coeff * self.gain_reduction_db + (1.0 - coeff) * target_gr_db;
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioEffect for Compressor {
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        if !self.enabled {
            return;
        }

        if self.sample_rate != sample_rate {
            self.sample_rate = sample_rate;
            self.needs_update = true;
        }
        self.update_coefficients();

        for chunk in buffer.chunks_exact_mut(2) {
            // Linked stereo detection: track the louder channel
            let max_sample = chunk[0].abs().max(chunk[1].abs());

            let input_db = if max_sample > 1e-10 {
                20.0 * max_sample.log10()
            } else {
                -200.0
            };

            self.update_peak_level(input_db);

            let target_gr_db = self.compute_gain_reduction(self.peak_level_db);
            self.smooth_gain_reduction(target_gr_db);

            let gain = 10.0_f32.powf(self.gain_reduction_db / 20.0);

            // Same gain on both channels preserves the stereo image
            chunk[0] *= gain;
            chunk[1] *= gain;
        }

        if let Some(out) = &self.reduction_out {
            out.set(-self.gain_reduction_db);
        }
    }

    fn reset(&mut self) {
        self.peak_level_db = -120.0;
        self.gain_reduction_db = 0.0;
        if let Some(out) = &self.reduction_out {
            out.set(0.0);
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Compressor"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_validation() {
        let mut settings = CompressorSettings {
            threshold_db: -100.0,
            ratio: 50.0,
            attack_ms: 0.01,
            release_ms: 5000.0,
            knee_db: 20.0,
        };

        settings.validate();

        assert!(settings.threshold_db >= -60.0 && settings.threshold_db <= 0.0);
        assert!(settings.ratio >= 1.0 && settings.ratio <= 20.0);
        assert!(settings.attack_ms >= 0.1 && settings.attack_ms <= 500.0);
        assert!(settings.release_ms >= 10.0 && settings.release_ms <= 1000.0);
        assert!(settings.knee_db >= 0.0 && settings.knee_db <= 10.0);
    }

    #[test]
    fn process_reduces_loud_signal() {
        let mut comp = Compressor::with_settings(CompressorSettings {
            threshold_db: -30.0,
            ratio: 8.0,
            attack_ms: 1.0,
            release_ms: 50.0,
            knee_db: 2.0,
        });

        let mut buffer = vec![0.8; 2000];
        comp.process(&mut buffer, 44100);

        let avg = buffer.iter().skip(200).sum::<f32>() / 1800.0;
        assert!(avg < 0.8, "loud signal should be attenuated, got {}", avg);
    }

    #[test]
    fn quiet_signal_untouched() {
        let settings = CompressorSettings {
            threshold_db: -30.0,
            ratio: 4.0,
            attack_ms: 5.0,
            release_ms: 50.0,
            knee_db: 0.0,
        };
        let comp = Compressor::with_settings(settings);

        assert_eq!(comp.compute_gain_reduction(-40.0), 0.0);
        assert_eq!(comp.compute_gain_reduction(-30.0), 0.0);
    }

    #[test]
    fn gain_reduction_follows_ratio() {
        let settings = CompressorSettings {
            threshold_db: -20.0,
            ratio: 4.0,
            attack_ms: 5.0,
            release_ms: 50.0,
            knee_db: 0.0,
        };
        let comp = Compressor::with_settings(settings);

        // 4 dB over at 4:1 leaves 1 dB, so 3 dB of reduction
        let gr = comp.compute_gain_reduction(-16.0);
        assert!((gr - (-3.0)).abs() < 0.01, "got {}", gr);

        // 10 dB over at 4:1 leaves 2.5 dB, so 7.5 dB of reduction
        let gr = comp.compute_gain_reduction(-10.0);
        assert!((gr - (-7.5)).abs() < 0.01, "got {}", gr);
    }

    #[test]
    fn reduction_published_to_shared_level() {
        let level = SharedLevel::new();
        let mut comp = Compressor::with_settings(CompressorSettings {
            threshold_db: -30.0,
            ratio: 16.0,
            attack_ms: 1.0,
            release_ms: 100.0,
            knee_db: 2.0,
        })
        .with_reduction_output(level.clone());

        let mut buffer = vec![0.9; 4000];
        comp.process(&mut buffer, 44100);

        assert!(level.get() > 0.0, "meter cell should see reduction");
        assert!((level.get() - comp.gain_reduction_db()).abs() < 1e-6);
    }

    #[test]
    fn reset_clears_envelope_and_meter() {
        let level = SharedLevel::new();
        let mut comp = Compressor::new().with_reduction_output(level.clone());

        let mut buffer = vec![0.9; 1000];
        comp.process(&mut buffer, 44100);
        comp.reset();

        assert_eq!(comp.gain_reduction_db(), 0.0);
        assert_eq!(level.get(), 0.0);
    }

    #[test]
    fn disabled_compressor_bypassed() {
        let mut comp = Compressor::with_settings(CompressorSettings {
            threshold_db: -40.0,
            ratio: 16.0,
            attack_ms: 0.1,
            release_ms: 50.0,
            knee_db: 0.0,
        });
        comp.set_enabled(false);

        let mut buffer = vec![0.8; 100];
        let original = buffer.clone();
        comp.process(&mut buffer, 44100);

        assert_eq!(buffer, original);
    }
}

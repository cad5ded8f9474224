/// Peaking equalizer band
///
/// A single biquad peaking filter (RBJ cookbook coefficients) that boosts or
/// cuts around a center frequency. Parameters are fixed at construction; the
/// round sets up a fresh filter instead of retuning a live one.
use super::chain::AudioEffect;

/// Peaking biquad filter
pub struct PeakingFilter {
    frequency: f32,
    gain_db: f32,
    q: f32,

    // Normalized coefficients (a0 divided out)
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    // Direct form I state, per channel
    x1_l: f32,
    x2_l: f32,
    y1_l: f32,
    y2_l: f32,
    x1_r: f32,
    x2_r: f32,
    y1_r: f32,
    y2_r: f32,

    sample_rate: u32,
    enabled: bool,
}

impl PeakingFilter {
    /// Create a peaking filter
    ///
    /// `gain_db` is clamped to +/-24 dB and `q` to [0.1, 10.0].
    pub fn new(frequency: f32, gain_db: f32, q: f32) -> Self {
        let mut filter = Self {
            frequency: frequency.max(1.0),
            gain_db: gain_db.clamp(-24.0, 24.0),
            q: q.clamp(0.1, 10.0),
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1_l: 0.0,
            x2_l: 0.0,
            y1_l: 0.0,
            y2_l: 0.0,
            x1_r: 0.0,
            x2_r: 0.0,
            y1_r: 0.0,
            y2_r: 0.0,
            sample_rate: 44100,
            enabled: true,
        };
        filter.update_coefficients();
        filter
    }

    /// Center frequency in Hz
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Band gain in dB
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    /// Q factor
    pub fn q(&self) -> f32 {
        self.q
    }

    /// Bandwidth used when auditioning a band at a given center frequency
    ///
    /// Narrower at the extremes so the boost stays audible without smearing
    /// into neighboring bands: Q 2.5 below 200 Hz, 3.0 above 10 kHz,
    /// 2.0 in between.
    pub fn q_for_frequency(frequency: f32) -> f32 {
        if frequency < 200.0 {
            2.5
        } else if frequency > 10_000.0 {
            3.0
        } else {
            2.0
        }
    }

    /// Linear output gain that offsets the perceived loudness of a boost
    ///
    /// A boosted band makes the whole clip read louder; scaling the output
    /// down keeps reference and boosted playback comparable by ear.
    pub fn level_compensation(gain_db: f32) -> f32 {
        1.5 * (1.0 - gain_db.abs() / 25.0)
    }

    /// RBJ cookbook peaking coefficients, normalized by a0
    fn update_coefficients(&mut self) {
        let sr = self.sample_rate as f32;
        // Keep the center frequency below Nyquist with headroom
        let freq = self.frequency.min(0.45 * sr);

        let a = 10.0_f32.powf(self.gain_db / 40.0);
        let omega = 2.0 * std::f32::consts::PI * freq / sr;
        let sin_omega = omega.sin();
        let cos_omega = omega.cos();
        let alpha = sin_omega / (2.0 * self.q);

        let b0 = 1.0 + alpha * a;
        let b1 = -2.0 * cos_omega;
        let b2 = 1.0 - alpha * a;
        let a0 = 1.0 + alpha / a;
        let a1 = -2.0 * cos_omega;
        let a2 = 1.0 - alpha / a;

        self.b0 = b0 / a0;
        self.b1 = b1 / a0;
        self.b2 = b2 / a0;
        self.a1 = a1 / a0;
        self.a2 = a2 / a0;
    }

    #[inline]
    fn tick(
        &self,
        x: f32,
        x1: &mut f32,
        x2: &mut f32,
        y1: &mut f32,
        y2: &mut f32,
    ) -> f32 {
        let mut y =
            self.b0 * x + self.b1 * *x1 + self.b2 * *x2 - self.a1 * *y1 - self.a2 * *y2;

        // Flush denormals
        if y.abs() < 1e-15 {
            y = 0.0;
        }

        *x2 = *x1;
        *x1 = x;
        *y2 = *y1;
        *y1 = y;
        y
    }
}

impl AudioEffect for PeakingFilter {
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        if !self.enabled {
            return;
        }

        if self.sample_rate != sample_rate {
            self.sample_rate = sample_rate;
            self.update_coefficients();
        }

        // tick() borrows state fields disjointly from self, so pull the
        // state out per channel
        let mut x1_l = self.x1_l;
        let mut x2_l = self.x2_l;
        let mut y1_l = self.y1_l;
        let mut y2_l = self.y2_l;
        let mut x1_r = self.x1_r;
        let mut x2_r = self.x2_r;
        let mut y1_r = self.y1_r;
        let mut y2_r = self.y2_r;

        for frame in buffer.chunks_exact_mut(2) {
            frame[0] = self.tick(frame[0], &mut x1_l, &mut x2_l, &mut y1_l, &mut y2_l);
            frame[1] = self.tick(frame[1], &mut x1_r, &mut x2_r, &mut y1_r, &mut y2_r);
        }

        self.x1_l = x1_l;
        self.x2_l = x2_l;
        self.y1_l = y1_l;
        self.y2_l = y2_l;
        self.x1_r = x1_r;
        self.x2_r = x2_r;
        self.y1_r = y1_r;
        self.y2_r = y2_r;
    }

    fn reset(&mut self) {
        self.x1_l = 0.0;
        self.x2_l = 0.0;
        self.y1_l = 0.0;
        self.y2_l = 0.0;
        self.x1_r = 0.0;
        self.x2_r = 0.0;
        self.y1_r = 0.0;
        self.y2_r = 0.0;
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn name(&self) -> &str {
        "Peaking EQ"
    }
}

/// Level metering
///
/// The processing thread publishes levels through [`SharedLevel`], a
/// lock-free f32 cell, and the display side smooths them through
/// [`GainReductionMeter`] so the needle moves like an analog meter instead
/// of jumping sample-accurately.
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Lock-free shared f32, written by the audio path and read by the UI
#[derive(Debug, Clone, Default)]
pub struct SharedLevel {
    bits: Arc<AtomicU32>,
}

impl SharedLevel {
    /// Create a shared level initialized to 0.0
    pub fn new() -> Self {
        Self {
            bits: Arc::new(AtomicU32::new(0.0_f32.to_bits())),
        }
    }

    /// Publish a new value
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Read the last published value
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

/// Display ballistics for a gain-reduction meter
///
/// Values are positive dB of reduction, clamped to the 0-60 dB scale.
/// Rising values are tracked faster than falling ones, and with no fresh
/// signal the needle decays toward zero.
#[derive(Debug, Clone)]
pub struct GainReductionMeter {
    displayed_db: f32,
}

const METER_ATTACK: f32 = 0.18;
const METER_RELEASE: f32 = 0.06;
const METER_DECAY: f32 = 0.97;
const METER_MAX_DB: f32 = 60.0;

impl GainReductionMeter {
    /// Create a meter resting at 0 dB
    pub fn new() -> Self {
        Self { displayed_db: 0.0 }
    }

    /// Advance the needle one display frame toward `target_db`
    pub fn update(&mut self, target_db: f32) -> f32 {
        let target = target_db.clamp(0.0, METER_MAX_DB);
        let coeff = if target > self.displayed_db {
            METER_ATTACK
        } else {
            METER_RELEASE
        };
        self.displayed_db += (target - self.displayed_db) * coeff;
        self.displayed_db
    }

    /// Advance one display frame with no signal present
    pub fn decay(&mut self) -> f32 {
        self.displayed_db *= METER_DECAY;
        if self.displayed_db < 0.01 {
            self.displayed_db = 0.0;
        }
        self.displayed_db
    }

    /// Current needle position in dB of reduction
    pub fn displayed_db(&self) -> f32 {
        self.displayed_db
    }

    /// Snap the needle back to rest
    pub fn reset(&mut self) {
        self.displayed_db = 0.0;
    }
}

impl Default for GainReductionMeter {
    fn default() -> Self {
        Self::new()
    }
}

//! Round parameter generation
//!
//! Each round draws a fresh ground truth with game-specific ranges and
//! distributions. The generated parameters are immutable for the life of the
//! round; the user's guess is a separate value of matching shape.

use crate::config::{MIX_CLIPS, TRACK_FOLDERS, VOCAL_CLIPS};
use aural_core::GameKind;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Ratios offered by the compressor game
pub const COMPRESSOR_RATIOS: [u32; 4] = [2, 4, 8, 16];

/// Ground truth for a balance round
#[derive(Debug, Clone, PartialEq)]
pub struct BalanceParams {
    /// Multitrack folder the stems come from
    pub track: &'static str,
    /// Reference gain per stem in dB, fader order, range [-12, +2]
    pub gains: [f32; 5],
}

/// Ground truth for a compressor round
#[derive(Debug, Clone, PartialEq)]
pub struct CompressorParams {
    pub clip: &'static str,
    /// One of [`COMPRESSOR_RATIOS`]
    pub ratio: u32,
    /// 5-95 ms
    pub attack_ms: u32,
    /// 50-850 ms
    pub release_ms: u32,
    /// 0-10 dB, one decimal
    pub makeup_db: f32,
}

/// Ground truth for a frequency round
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencyParams {
    pub clip: &'static str,
    /// Boosted center frequency, log-uniform in [20, 18500] Hz
    pub frequency_hz: u32,
    /// Boost amount, 6-10 dB, one decimal
    pub gain_db: f32,
}

/// Ground truth for a stereo round
#[derive(Debug, Clone, PartialEq)]
pub struct StereoParams {
    pub clip: &'static str,
    /// Pan position in [-1.0, 1.0], two decimals
    pub pan: f32,
}

/// Ground truth for the current round of any game
#[derive(Debug, Clone, PartialEq)]
pub enum RoundParams {
    Balance(BalanceParams),
    Compressor(CompressorParams),
    Frequency(FrequencyParams),
    Stereo(StereoParams),
}

impl RoundParams {
    /// Which game these parameters belong to
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Balance(_) => GameKind::Balance,
            Self::Compressor(_) => GameKind::Compressor,
            Self::Frequency(_) => GameKind::Frequency,
            Self::Stereo(_) => GameKind::Stereo,
        }
    }
}

/// The user's guess, same shape as the round's parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Guess {
    Balance {
        gains: [f32; 5],
    },
    Compressor {
        ratio: u32,
        attack_ms: u32,
        release_ms: u32,
        makeup_db: f32,
    },
    Frequency {
        frequency_hz: f32,
    },
    Stereo {
        pan: f32,
    },
}

/// Draws ground-truth parameters for rounds
pub struct ParameterGenerator {
    rng: StdRng,
}

impl ParameterGenerator {
    /// Generator seeded from the OS
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw ground truth for one round of the given game
    pub fn generate(&mut self, kind: GameKind) -> RoundParams {
        match kind {
            GameKind::Balance => RoundParams::Balance(self.balance()),
            GameKind::Compressor => RoundParams::Compressor(self.compressor()),
            GameKind::Frequency => RoundParams::Frequency(self.frequency()),
            GameKind::Stereo => RoundParams::Stereo(self.stereo()),
        }
    }

    fn balance(&mut self) -> BalanceParams {
        let track = *TRACK_FOLDERS
            .choose(&mut self.rng)
            .unwrap_or(&TRACK_FOLDERS[0]);
        let mut gains = [0.0_f32; 5];
        for gain in &mut gains {
            *gain = round_to(self.rng.gen::<f64>() * 14.0 - 12.0, 1);
        }
        BalanceParams { track, gains }
    }

    fn compressor(&mut self) -> CompressorParams {
        let clip = *MIX_CLIPS.choose(&mut self.rng).unwrap_or(&MIX_CLIPS[0]);
        let ratio = *COMPRESSOR_RATIOS
            .choose(&mut self.rng)
            .unwrap_or(&COMPRESSOR_RATIOS[0]);
        CompressorParams {
            clip,
            ratio,
            attack_ms: (self.rng.gen::<f64>() * 90.0 + 5.0).round() as u32,
            release_ms: (self.rng.gen::<f64>() * 800.0 + 50.0).round() as u32,
            makeup_db: round_to(self.rng.gen::<f64>() * 10.0, 1),
        }
    }

    fn frequency(&mut self) -> FrequencyParams {
        let clip = *MIX_CLIPS.choose(&mut self.rng).unwrap_or(&MIX_CLIPS[0]);
        // Uniform in log-frequency space so every octave is equally likely
        let min = 20.0_f64.log10();
        let max = 18_500.0_f64.log10();
        let exponent = self.rng.gen::<f64>() * (max - min) + min;
        FrequencyParams {
            clip,
            frequency_hz: 10.0_f64.powf(exponent).round() as u32,
            gain_db: round_to(self.rng.gen::<f64>() * 4.0 + 6.0, 1),
        }
    }

    fn stereo(&mut self) -> StereoParams {
        let clip = *VOCAL_CLIPS.choose(&mut self.rng).unwrap_or(&VOCAL_CLIPS[0]);
        StereoParams {
            clip,
            pan: round_to(self.rng.gen::<f64>() * 2.0 - 1.0, 2),
        }
    }
}

impl Default for ParameterGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn round_to(value: f64, decimals: u32) -> f32 {
    let factor = 10.0_f64.powi(decimals as i32);
    ((value * factor).round() / factor) as f32
}

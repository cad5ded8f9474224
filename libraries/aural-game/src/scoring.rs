//! Round scoring
//!
//! Pure functions from (ground truth, guess) to points. The formulas and
//! their rounding are part of the game balance and are locked down by tests;
//! change a constant here and historical scores stop being comparable.

use crate::error::{GameError, Result};
use crate::params::{CompressorParams, Guess, RoundParams};
use aural_core::FrequencyBand;

/// Points and per-component detail for one scored round
#[derive(Debug, Clone, PartialEq)]
pub struct RoundScore {
    /// Integer points added to the accumulator
    pub points: u32,
    pub breakdown: Breakdown,
}

/// Game-specific detail behind a round score
#[derive(Debug, Clone, PartialEq)]
pub enum Breakdown {
    Balance {
        /// Signed dB difference per stem, fader order
        differences: [f32; 5],
    },
    Compressor {
        ratio: f64,
        attack: f64,
        release: f64,
        makeup: f64,
    },
    Frequency {
        guess_band: usize,
        truth_band: usize,
    },
    Stereo {
        /// Absolute pan difference
        difference: f64,
    },
}

/// Score a guess against the round's ground truth
///
/// Deterministic and side-effect free. Fails with
/// [`GameError::GuessMismatch`] when the guess shape does not match the
/// round's game.
pub fn score(truth: &RoundParams, guess: &Guess) -> Result<RoundScore> {
    match (truth, guess) {
        (RoundParams::Balance(truth), Guess::Balance { gains }) => {
            Ok(balance_score(&truth.gains, gains))
        }
        (RoundParams::Compressor(truth), Guess::Compressor { .. }) => {
            Ok(compressor_score(truth, guess))
        }
        (RoundParams::Frequency(truth), Guess::Frequency { frequency_hz }) => Ok(
            frequency_score(truth.frequency_hz as f32, *frequency_hz),
        ),
        (RoundParams::Stereo(truth), Guess::Stereo { pan }) => Ok(stereo_score(truth.pan, *pan)),
        _ => Err(GameError::GuessMismatch),
    }
}

/// Per stem: accuracy = max(0, 100 - diff^2), averaged over the five stems
fn balance_score(truth: &[f32; 5], guess: &[f32; 5]) -> RoundScore {
    let mut round_score = 0.0_f64;
    let mut differences = [0.0_f32; 5];

    for i in 0..5 {
        let diff = f64::from(guess[i]) - f64::from(truth[i]);
        differences[i] = diff as f32;
        let accuracy = (100.0 - diff.abs().powi(2)).max(0.0);
        round_score += accuracy / 5.0;
    }

    RoundScore {
        points: round_score.round() as u32,
        breakdown: Breakdown::Balance { differences },
    }
}

/// Weighted sub-scores: ratio is a binary 32, attack/release/makeup decay
/// linearly from 16 with game-tuned slopes
fn compressor_score(truth: &CompressorParams, guess: &Guess) -> RoundScore {
    let Guess::Compressor {
        ratio,
        attack_ms,
        release_ms,
        makeup_db,
    } = guess
    else {
        unreachable!("caller matched the guess shape");
    };

    let ratio_score = if *ratio == truth.ratio { 32.0 } else { 0.0 };

    let attack_diff = f64::from(attack_ms.abs_diff(truth.attack_ms));
    let attack_score = (16.0 - attack_diff * 0.32).max(0.0);

    let release_diff = f64::from(release_ms.abs_diff(truth.release_ms));
    let release_score = (16.0 - release_diff * 0.04).max(0.0);

    let makeup_diff = (f64::from(*makeup_db) - f64::from(truth.makeup_db)).abs();
    let makeup_score = (16.0 - makeup_diff * 3.2).max(0.0);

    let total = ratio_score + attack_score + release_score + makeup_score;

    RoundScore {
        points: total.round() as u32,
        breakdown: Breakdown::Compressor {
            ratio: ratio_score,
            attack: attack_score,
            release: release_score,
            makeup: makeup_score,
        },
    }
}

/// Band-based step function of band-index distance: 0 -> 100, 1 -> 60,
/// 2 -> 30, otherwise 0
fn frequency_score(truth_hz: f32, guess_hz: f32) -> RoundScore {
    let truth_band = FrequencyBand::index_for(truth_hz);
    let guess_band = FrequencyBand::index_for(guess_hz);

    let points = match truth_band.abs_diff(guess_band) {
        0 => 100,
        1 => 60,
        2 => 30,
        _ => 0,
    };

    RoundScore {
        points,
        breakdown: Breakdown::Frequency {
            guess_band,
            truth_band,
        },
    }
}

/// Step function of absolute pan difference, tapered inside each step
fn stereo_score(truth_pan: f32, guess_pan: f32) -> RoundScore {
    let difference = (f64::from(truth_pan) - f64::from(guess_pan)).abs();

    let points = if difference < 0.1 {
        100
    } else if difference < 0.2 {
        90
    } else if difference < 0.35 {
        ((85.0 - (difference * 100.0).floor()) as u32).max(60)
    } else if difference < 0.6 {
        ((60.0 - (difference * 50.0).floor()) as u32).max(30)
    } else if difference < 1.0 {
        ((35.0 - (difference * 20.0).floor()) as u32).max(10)
    } else {
        0
    };

    RoundScore {
        points,
        breakdown: Breakdown::Stereo { difference },
    }
}

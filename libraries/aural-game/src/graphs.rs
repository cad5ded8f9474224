//! Graph specs for each game's playback paths
//!
//! These are the four games' "config tables": every audition a game offers
//! is one small function producing a [`GraphSpec`] for the generic graph
//! builder. No game wires nodes by hand.

use crate::config::stem_asset;
use crate::params::{BalanceParams, CompressorParams, FrequencyParams, StereoParams};
use aural_audio::effects::{CompressorSettings, PeakingFilter};
use aural_audio::{ChainSpec, EffectSpec, GraphSpec};
use aural_core::StemId;

/// Threshold used for every compressor audition, reference and guess alike
pub const COMPRESSOR_THRESHOLD_DB: f32 = -30.0;

/// Narrow knee so the compression character is clearly audible
pub const COMPRESSOR_KNEE_DB: f32 = 2.0;

/// Five stems, each through its own gain fader
///
/// Used for both the hidden reference mix (ground-truth gains) and the
/// user's live fader mix.
pub fn balance_mix(params: &BalanceParams, gains: &[f32; 5]) -> GraphSpec {
    let chains = StemId::ALL
        .iter()
        .map(|stem| {
            ChainSpec::new(stem_asset(params.track, *stem)).effect(EffectSpec::Gain {
                db: gains[stem.index()],
            })
        })
        .collect();
    GraphSpec::new(chains)
}

/// The reference mix for a balance round
pub fn balance_reference(params: &BalanceParams) -> GraphSpec {
    balance_mix(params, &params.gains)
}

/// Full mix through a metered compressor and makeup gain
pub fn compressor_mix(
    clip: &str,
    ratio: u32,
    attack_ms: u32,
    release_ms: u32,
    makeup_db: f32,
) -> GraphSpec {
    GraphSpec::single(ChainSpec::new(clip).effect(EffectSpec::Compressor {
        settings: CompressorSettings {
            threshold_db: COMPRESSOR_THRESHOLD_DB,
            ratio: ratio as f32,
            attack_ms: attack_ms as f32,
            release_ms: release_ms as f32,
            knee_db: COMPRESSOR_KNEE_DB,
        },
        makeup_gain_db: makeup_db,
        metered: true,
    }))
}

/// The target compression for a compressor round
pub fn compressor_reference(params: &CompressorParams) -> GraphSpec {
    compressor_mix(
        params.clip,
        params.ratio,
        params.attack_ms,
        params.release_ms,
        params.makeup_db,
    )
}

/// The clip with no processing, for A/B comparison
pub fn flat_reference(clip: &str) -> GraphSpec {
    GraphSpec::single(ChainSpec::new(clip))
}

/// Baseline gain on the frequency game's unprocessed path
///
/// Matches the boosted path's compensation curve at 0 dB so A/B switching
/// compares timbre, not loudness.
pub const FREQUENCY_LEVEL_MATCH: f32 = 1.5;

/// The clip without the boost, level-matched against [`frequency_boosted`]
pub fn frequency_reference(clip: &str) -> GraphSpec {
    GraphSpec::single(ChainSpec::new(clip).effect(EffectSpec::LinearGain {
        linear: FREQUENCY_LEVEL_MATCH,
    }))
}

/// The clip with the round's boosted band
///
/// Bandwidth narrows toward the spectrum edges, and a loudness-compensating
/// output gain keeps the boost from being guessable by level alone.
pub fn frequency_boosted(params: &FrequencyParams) -> GraphSpec {
    let frequency = params.frequency_hz as f32;
    GraphSpec::single(
        ChainSpec::new(params.clip)
            .effect(EffectSpec::Peaking {
                frequency,
                gain_db: params.gain_db,
                q: PeakingFilter::q_for_frequency(frequency),
            })
            .effect(EffectSpec::LinearGain {
                linear: PeakingFilter::level_compensation(params.gain_db),
            }),
    )
}

/// The vocal clip at the round's hidden pan position
pub fn stereo_panned(params: &StereoParams) -> GraphSpec {
    GraphSpec::single(ChainSpec::new(params.clip).effect(EffectSpec::Panner { pan: params.pan }))
}

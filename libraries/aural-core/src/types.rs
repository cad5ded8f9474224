//! Shared identifiers and psychoacoustic conversions

use serde::{Deserialize, Serialize};

/// The four ear-training games
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    /// Mix five stems to match a hidden reference balance
    Balance,
    /// Identify compressor settings (ratio, attack, release, makeup)
    Compressor,
    /// Identify which frequency band was boosted
    Frequency,
    /// Identify a stereo pan position
    Stereo,
}

impl GameKind {
    /// Display name used for score submission and logging
    ///
    /// These names are part of the submission contract with the stats
    /// backend and must not change.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Balance => "Balance Game",
            Self::Compressor => "Compressor Game",
            Self::Frequency => "Frequency Game",
            Self::Stereo => "Pan Position Game",
        }
    }
}

/// One of the five stems in the balance game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StemId {
    Drums,
    Vocals,
    Bass,
    Guitars,
    Others,
}

impl StemId {
    /// All stems, in fader order
    pub const ALL: [StemId; 5] = [
        StemId::Drums,
        StemId::Vocals,
        StemId::Bass,
        StemId::Guitars,
        StemId::Others,
    ];

    /// File-name stem used by the asset catalog
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Drums => "drums",
            Self::Vocals => "vocals",
            Self::Bass => "bass",
            Self::Guitars => "guitars",
            Self::Others => "others",
        }
    }

    /// Index into fixed-size per-stem arrays
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Convert decibels to a linear gain multiplier
///
/// Formula: `gain = 10^(dB/20)`. 0 dB is unity, -6 dB is roughly half
/// amplitude, +6 dB roughly double.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert a linear gain multiplier to decibels
///
/// Returns -120 dB for non-positive gains instead of -inf so downstream
/// metering math stays finite.
#[inline]
pub fn gain_to_db(gain: f32) -> f32 {
    if gain > 0.0 {
        20.0 * gain.log10()
    } else {
        -120.0
    }
}

/// A named perceptual frequency band
///
/// Bands are half-open `[min_hz, max_hz)`; a frequency at or above the last
/// band's upper bound still maps to the last band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyBand {
    pub label: &'static str,
    pub min_hz: f32,
    pub max_hz: f32,
    /// Representative center used when a band is selected as a guess
    pub center_hz: f32,
}

/// The seven bands used by the frequency game, low to high
pub const FREQUENCY_BANDS: [FrequencyBand; 7] = [
    FrequencyBand { label: "Sub", min_hz: 20.0, max_hz: 60.0, center_hz: 40.0 },
    FrequencyBand { label: "Bass", min_hz: 60.0, max_hz: 250.0, center_hz: 120.0 },
    FrequencyBand { label: "Low Mid", min_hz: 250.0, max_hz: 500.0, center_hz: 350.0 },
    FrequencyBand { label: "Mid", min_hz: 500.0, max_hz: 2000.0, center_hz: 1000.0 },
    FrequencyBand { label: "High Mid", min_hz: 2000.0, max_hz: 4000.0, center_hz: 3000.0 },
    FrequencyBand { label: "Presence", min_hz: 4000.0, max_hz: 8000.0, center_hz: 6000.0 },
    FrequencyBand { label: "Brilliance", min_hz: 8000.0, max_hz: 20000.0, center_hz: 12000.0 },
];

impl FrequencyBand {
    /// Index of the band containing `freq_hz`
    ///
    /// Frequencies beyond the table fall into the last band, matching the
    /// band-selector behavior of the game UI.
    pub fn index_for(freq_hz: f32) -> usize {
        for (i, band) in FREQUENCY_BANDS.iter().enumerate() {
            if freq_hz >= band.min_hz && freq_hz < band.max_hz {
                return i;
            }
        }
        FREQUENCY_BANDS.len() - 1
    }

    /// Band containing `freq_hz`
    pub fn for_frequency(freq_hz: f32) -> &'static FrequencyBand {
        &FREQUENCY_BANDS[Self::index_for(freq_hz)]
    }
}

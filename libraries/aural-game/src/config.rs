//! Per-game configuration
//!
//! Round counts, score ceilings, feedback tiers, and the fixed asset
//! catalogs. These tables are the only thing that differs between the four
//! games at the session level; everything else is shared machinery.

use aural_core::{GameKind, StemId};

/// The three multitrack folders used by the balance game
pub const TRACK_FOLDERS: [&str; 3] = ["track1", "track2", "track3"];

/// Full-mix clips used by the compressor and frequency games
pub const MIX_CLIPS: [&str; 3] = ["music/test.wav", "music/guitar.wav", "music/piano.wav"];

/// Vocal samples used by the stereo game
pub const VOCAL_CLIPS: [&str; 2] = ["vocal1.mp3", "vocal2.mp3"];

/// Asset name for one stem of one multitrack folder
pub fn stem_asset(track: &str, stem: StemId) -> String {
    format!("multitracks/{}/{}.mp3", track, stem.file_name())
}

/// Feedback tier shown with the final summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Excellent,
    Great,
    Good,
    KeepPracticing,
}

/// How a game's tier table reads its thresholds
#[derive(Debug, Clone, Copy)]
enum TierScale {
    /// Thresholds compare against the rounded percentage of the maximum
    Percent,
    /// Thresholds compare against the raw total score
    Raw,
}

/// Static configuration for one game
#[derive(Debug, Clone)]
pub struct GameConfig {
    kind: GameKind,
    rounds: u32,
    max_total: u32,
    scale: TierScale,
    tiers: &'static [(u32, Tier)],
}

impl GameConfig {
    /// Configuration table for a game
    pub fn for_kind(kind: GameKind) -> Self {
        match kind {
            GameKind::Balance => Self {
                kind,
                rounds: 6,
                max_total: 800,
                scale: TierScale::Percent,
                tiers: &[
                    (90, Tier::Excellent),
                    (75, Tier::Great),
                    (60, Tier::Good),
                ],
            },
            GameKind::Compressor => Self {
                kind,
                rounds: 10,
                max_total: 1000,
                scale: TierScale::Percent,
                tiers: &[(80, Tier::Excellent), (60, Tier::Great)],
            },
            GameKind::Frequency => Self {
                kind,
                rounds: 10,
                max_total: 1000,
                scale: TierScale::Raw,
                tiers: &[(800, Tier::Excellent), (500, Tier::Great)],
            },
            GameKind::Stereo => Self {
                kind,
                rounds: 8,
                max_total: 800,
                scale: TierScale::Percent,
                tiers: &[(80, Tier::Excellent), (60, Tier::Great)],
            },
        }
    }

    /// Which game this configures
    pub fn kind(&self) -> GameKind {
        self.kind
    }

    /// Number of rounds in a full session
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Ceiling for the accumulated total score
    pub fn max_total(&self) -> u32 {
        self.max_total
    }

    /// Final percentage, rounded to the nearest integer
    pub fn percentage(&self, total: u32) -> u32 {
        ((f64::from(total) / f64::from(self.max_total)) * 100.0).round() as u32
    }

    /// Feedback tier for an accumulated total
    pub fn tier_for(&self, total: u32) -> Tier {
        let value = match self.scale {
            TierScale::Percent => self.percentage(total),
            TierScale::Raw => total,
        };
        for (threshold, tier) in self.tiers {
            if value >= *threshold {
                return *tier;
            }
        }
        Tier::KeepPracticing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn balance_tiers_follow_percentage() {
        let config = GameConfig::for_kind(GameKind::Balance);
        assert_eq!(config.tier_for(800), Tier::Excellent); // 100%
        assert_eq!(config.tier_for(720), Tier::Excellent); // 90%
        assert_eq!(config.tier_for(600), Tier::Great); // 75%
        assert_eq!(config.tier_for(480), Tier::Good); // 60%
        assert_eq!(config.tier_for(100), Tier::KeepPracticing);
    }

    #[test]
    fn frequency_tiers_use_raw_score() {
        let config = GameConfig::for_kind(GameKind::Frequency);
        assert_eq!(config.tier_for(800), Tier::Excellent);
        assert_eq!(config.tier_for(500), Tier::Great);
        assert_eq!(config.tier_for(499), Tier::KeepPracticing);
    }

    #[test]
    fn stereo_has_eight_hundred_ceiling() {
        let config = GameConfig::for_kind(GameKind::Stereo);
        assert_eq!(config.rounds(), 8);
        assert_eq!(config.max_total(), 800);
        assert_eq!(config.percentage(400), 50);
    }

    #[test]
    fn stem_asset_paths() {
        assert_eq!(
            stem_asset("track2", StemId::Drums),
            "multitracks/track2/drums.mp3"
        );
    }
}

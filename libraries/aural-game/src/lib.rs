//! Aural Trainer - Game Logic
//!
//! The four ear-training games on top of the audio engine:
//! - Round parameter generation with game-specific ranges and distributions
//! - Pure scoring with the exact formulas the games are balanced around
//! - The round state machine (audition, one guess, advance, restart)
//! - End-of-session summary, tiers, and score submission
//!
//! Each game is the same machinery with a different config table: round
//! count, score ceiling, tier thresholds, asset catalog, and a handful of
//! [`GraphSpec`](aural_audio::GraphSpec) constructors in [`graphs`].
//!
//! ```rust
//! use aural_core::GameKind;
//! use aural_game::{GameConfig, Guess, ParameterGenerator, RoundController, RoundParams};
//! use aural_audio::assets::MemoryAssetLibrary;
//! use aural_audio::{AudioBuffer, SessionManager};
//! use std::sync::Arc;
//!
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let mut assets = MemoryAssetLibrary::new();
//! assets.insert("vocal1.mp3", Arc::new(AudioBuffer::silent(64, 44100)));
//! assets.insert("vocal2.mp3", Arc::new(AudioBuffer::silent(64, 44100)));
//!
//! let mut controller = RoundController::new(
//!     GameConfig::for_kind(GameKind::Stereo),
//!     ParameterGenerator::seeded(1),
//!     SessionManager::new(Arc::new(assets)),
//! );
//!
//! let RoundParams::Stereo(truth) = controller.params().clone() else { unreachable!() };
//! let score = controller
//!     .submit_guess(&Guess::Stereo { pan: truth.pan })
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(score.points, 100);
//! # });
//! ```

pub mod config;
pub mod error;
pub mod graphs;
pub mod params;
pub mod round;
pub mod scoring;
pub mod submit;
pub mod summary;

pub use config::{GameConfig, Tier};
pub use error::{GameError, Result};
pub use params::{
    BalanceParams, CompressorParams, FrequencyParams, Guess, ParameterGenerator, RoundParams,
    StereoParams,
};
pub use round::{Advance, RoundController, RoundState, ScoreAccumulator};
pub use scoring::{Breakdown, RoundScore};
pub use submit::{HttpScoreSubmitter, NullSubmitter};
pub use summary::GameSummary;

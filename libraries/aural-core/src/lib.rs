//! Aural Trainer - Core Types
//!
//! Shared vocabulary for the ear-training games:
//! - Game and stem identifiers
//! - dB / linear gain conversions
//! - The perceptual frequency-band table
//! - The external score-submission contract
//!
//! This crate is platform-agnostic and free of audio-engine dependencies;
//! everything here is plain data plus one async trait at the system boundary.

pub mod error;
pub mod submit;
pub mod types;

pub use error::{CoreError, Result};
pub use submit::{Achievement, ScoreReceipt, ScoreSubmitter};
pub use types::{db_to_gain, gain_to_db, FrequencyBand, GameKind, StemId, FREQUENCY_BANDS};

//! Error types for the game layer

use thiserror::Error;

/// Game layer errors
#[derive(Debug, Error)]
pub enum GameError {
    /// Playback or asset failure from the audio engine
    #[error("Audio error: {0}")]
    Audio(#[from] aural_audio::AudioError),

    /// Score submission failure
    #[error("Submission error: {0}")]
    Submission(#[from] aural_core::CoreError),

    /// A guess of one game's shape was submitted to another game's round
    #[error("Guess does not match the current round's game")]
    GuessMismatch,

    /// An operation that is only legal in another round state
    #[error("Illegal in state {0}")]
    IllegalState(&'static str),
}

/// Result type for game operations
pub type Result<T> = std::result::Result<T, GameError>;

//! Error types for the audio engine

use thiserror::Error;

/// Audio engine errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// Logical asset name not present in the library
    #[error("Audio asset not found: {0}")]
    AssetNotFound(String),

    /// Container probe or codec failure
    #[error("Decode error: {0}")]
    Decode(String),

    /// The file contains no audio tracks
    #[error("No audio tracks found in {0}")]
    NoAudioTracks(String),

    /// A node was disposed more than once
    #[error("Node already disposed: {0}")]
    AlreadyDisposed(String),

    /// A graph was committed with a missing source buffer
    #[error("Graph source not resolved: {0}")]
    UnresolvedSource(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

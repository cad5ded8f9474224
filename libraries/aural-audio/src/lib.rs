//! Aural Trainer - Audio Engine
//!
//! Owns everything that makes sound:
//! - Decoded audio buffers and asset loading (symphonia, LRU-cached)
//! - Effect nodes: gain, compressor, peaking EQ, stereo panner, level meters
//! - A declarative signal-graph builder (one constructor for all four games)
//! - The playback session lifecycle: at most one started session, toggle
//!   semantics, cancellation of superseded loads, and per-node disposal
//!   acknowledgment
//! - The page-wide master volume stage
//!
//! # Session lifecycle
//!
//! ```rust
//! use aural_audio::{AudioBuffer, ChainSpec, EffectSpec, GraphSpec};
//! use aural_audio::assets::MemoryAssetLibrary;
//! use aural_audio::session::{PlayOutcome, SessionManager};
//! use std::sync::Arc;
//!
//! # tokio_test();
//! # fn tokio_test() {
//! # let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
//! # rt.block_on(async {
//! let mut assets = MemoryAssetLibrary::new();
//! assets.insert("vocal", Arc::new(AudioBuffer::silent(44100, 44100)));
//!
//! let mut manager = SessionManager::new(Arc::new(assets));
//! let spec = GraphSpec::single(ChainSpec::new("vocal").effect(EffectSpec::Panner { pan: -0.5 }));
//!
//! // First click starts, second click on the same label stops.
//! assert!(matches!(manager.play("pan", spec.clone()).await.unwrap(), PlayOutcome::Started(_)));
//! assert!(matches!(manager.play("pan", spec).await.unwrap(), PlayOutcome::Stopped));
//! # });
//! # }
//! ```

pub mod assets;
pub mod buffer;
pub mod decoder;
pub mod effects;
pub mod error;
pub mod graph;
pub mod session;
pub mod volume;

pub use buffer::AudioBuffer;
pub use error::{AudioError, Result};
pub use graph::{ChainSpec, DisposalReceipt, EffectSpec, GraphSpec, MeterHandles, SignalGraph};
pub use session::{PlayOutcome, SessionHandle, SessionId, SessionManager, SessionTicket};
pub use volume::Volume;

//! Audio effect nodes
//!
//! Every node operates in-place on interleaved stereo f32 samples and
//! implements [`AudioEffect`]. Nodes are assembled into per-chain
//! [`EffectChain`]s by the signal graph builder.

pub mod chain;
pub mod compressor;
pub mod gain;
pub mod meter;
pub mod panner;
pub mod peaking;

pub use chain::{AudioEffect, EffectChain};
pub use compressor::{Compressor, CompressorSettings};
pub use gain::Gain;
pub use meter::{GainReductionMeter, SharedLevel};
pub use panner::StereoPanner;
pub use peaking::PeakingFilter;

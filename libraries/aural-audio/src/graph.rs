//! Declarative signal graphs
//!
//! Each game round describes its audio as a [`GraphSpec`]: one or more
//! source chains, each naming an asset and a list of effect nodes. A single
//! generic builder interprets the spec into a live [`SignalGraph`], so the
//! games never assemble nodes by hand.
//!
//! Disposal is explicit: [`SignalGraph::dispose`] tears every node down
//! exactly once and returns a [`DisposalReceipt`] listing what was released.
//! Disposing twice is reported in the receipt rather than panicking.

use crate::buffer::AudioBuffer;
use crate::effects::{
    AudioEffect, Compressor, CompressorSettings, EffectChain, Gain, PeakingFilter, SharedLevel,
    StereoPanner,
};
use crate::error::{AudioError, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// One effect node in a chain, in processing order
#[derive(Debug, Clone)]
pub enum EffectSpec {
    /// Fixed gain in dB
    Gain { db: f32 },
    /// Fixed linear gain multiplier
    LinearGain { linear: f32 },
    /// Equal-power stereo panner, pan in [-1.0, 1.0]
    Panner { pan: f32 },
    /// Peaking EQ band
    Peaking { frequency: f32, gain_db: f32, q: f32 },
    /// Dynamic range compressor followed by makeup gain
    ///
    /// When `metered` is set, the graph exposes the compressor's gain
    /// reduction through [`MeterHandles`].
    Compressor {
        settings: CompressorSettings,
        makeup_gain_db: f32,
        metered: bool,
    },
}

/// A source chain: one asset played through an ordered list of effects
#[derive(Debug, Clone)]
pub struct ChainSpec {
    source: String,
    looped: bool,
    effects: Vec<EffectSpec>,
}

impl ChainSpec {
    /// Create a chain reading from the named asset, looped by default
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            looped: true,
            effects: Vec::new(),
        }
    }

    /// Set whether playback loops when the clip ends
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Append an effect node
    pub fn effect(mut self, spec: EffectSpec) -> Self {
        self.effects.push(spec);
        self
    }

    /// Asset name this chain reads from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Effect nodes in processing order
    pub fn effects(&self) -> &[EffectSpec] {
        &self.effects
    }
}

/// Complete description of a round's audio
#[derive(Debug, Clone)]
pub struct GraphSpec {
    chains: Vec<ChainSpec>,
}

impl GraphSpec {
    /// Graph with several parallel chains mixed together
    pub fn new(chains: Vec<ChainSpec>) -> Self {
        Self { chains }
    }

    /// Graph with a single chain
    pub fn single(chain: ChainSpec) -> Self {
        Self {
            chains: vec![chain],
        }
    }

    /// The chains in this graph
    pub fn chains(&self) -> &[ChainSpec] {
        &self.chains
    }

    /// Asset names this graph needs resolved before it can be built
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.chains.iter().map(|c| c.source.as_str())
    }
}

/// Handles to meters created while building a graph
#[derive(Debug, Clone, Default)]
pub struct MeterHandles {
    /// Gain reduction of the metered compressor, positive dB
    pub gain_reduction: Option<SharedLevel>,
}

/// Acknowledgment that a graph's nodes were released
#[derive(Debug)]
pub struct DisposalReceipt {
    nodes: Vec<String>,
    errors: Vec<AudioError>,
}

impl DisposalReceipt {
    /// Names of the nodes that were released
    pub fn nodes(&self) -> &[String] {
        &self.nodes
    }

    /// Errors encountered while releasing, e.g. double disposal
    pub fn errors(&self) -> &[AudioError] {
        &self.errors
    }

    /// True when every node released without error
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Sample-accurate clip player with linear-interpolation rate conversion
struct Player {
    buffer: Arc<AudioBuffer>,
    /// Fractional read position in source frames
    position: f64,
    looped: bool,
    finished: bool,
}

impl Player {
    fn new(buffer: Arc<AudioBuffer>, looped: bool) -> Self {
        Self {
            buffer,
            position: 0.0,
            looped,
            finished: false,
        }
    }

    /// Fill `out` with interleaved stereo at `out_rate`, silence once done
    fn render(&mut self, out: &mut [f32], out_rate: u32) {
        let src_frames = self.buffer.frames();
        if src_frames == 0 || out_rate == 0 {
            out.fill(0.0);
            self.finished = true;
            return;
        }

        let step = self.buffer.sample_rate() as f64 / out_rate as f64;

        for frame in out.chunks_exact_mut(2) {
            if self.finished {
                frame[0] = 0.0;
                frame[1] = 0.0;
                continue;
            }

            let base = self.position.floor() as usize;
            let frac = (self.position - base as f64) as f32;
            let (l0, r0) = self.buffer.frame(base);
            let (l1, r1) = self.buffer.frame(base + 1);

            frame[0] = l0 + (l1 - l0) * frac;
            frame[1] = r0 + (r1 - r0) * frac;

            self.position += step;
            if self.position >= src_frames as f64 {
                if self.looped {
                    self.position %= src_frames as f64;
                } else {
                    self.finished = true;
                }
            }
        }
    }

    fn restart(&mut self) {
        self.position = 0.0;
        self.finished = false;
    }
}

struct BuiltChain {
    name: String,
    player: Player,
    effects: EffectChain,
    node_names: Vec<String>,
}

/// A live, renderable audio graph built from a [`GraphSpec`]
pub struct SignalGraph {
    chains: Vec<BuiltChain>,
    meters: MeterHandles,
    scratch: Vec<f32>,
    disposed: bool,
}

impl SignalGraph {
    /// Interpret a spec into live nodes
    ///
    /// Every chain's source must be present in `sources`, otherwise
    /// [`AudioError::UnresolvedSource`] is returned and nothing is built.
    pub fn build(
        spec: &GraphSpec,
        sources: &HashMap<String, Arc<AudioBuffer>>,
    ) -> Result<Self> {
        let mut meters = MeterHandles::default();
        let mut chains = Vec::with_capacity(spec.chains.len());

        for chain_spec in &spec.chains {
            let buffer = sources
                .get(&chain_spec.source)
                .cloned()
                .ok_or_else(|| AudioError::UnresolvedSource(chain_spec.source.clone()))?;

            let mut effects = EffectChain::new();
            let mut node_names = vec![format!("{}:source", chain_spec.source)];

            for effect_spec in &chain_spec.effects {
                for node in Self::build_effect(effect_spec, &mut meters) {
                    node_names.push(format!("{}:{}", chain_spec.source, node.name()));
                    effects.add_effect(node);
                }
            }

            chains.push(BuiltChain {
                name: chain_spec.source.clone(),
                player: Player::new(buffer, chain_spec.looped),
                effects,
                node_names,
            });
        }

        Ok(Self {
            chains,
            meters,
            scratch: Vec::new(),
            disposed: false,
        })
    }

    /// One effect spec can expand to more than one node (compressor + makeup)
    fn build_effect(spec: &EffectSpec, meters: &mut MeterHandles) -> Vec<Box<dyn AudioEffect>> {
        match spec {
            EffectSpec::Gain { db } => vec![Box::new(Gain::from_db(*db))],
            EffectSpec::LinearGain { linear } => vec![Box::new(Gain::from_linear(*linear))],
            EffectSpec::Panner { pan } => vec![Box::new(StereoPanner::new(*pan))],
            EffectSpec::Peaking {
                frequency,
                gain_db,
                q,
            } => vec![Box::new(PeakingFilter::new(*frequency, *gain_db, *q))],
            EffectSpec::Compressor {
                settings,
                makeup_gain_db,
                metered,
            } => {
                let mut comp = Compressor::with_settings(*settings);
                if *metered {
                    let level = SharedLevel::new();
                    comp = comp.with_reduction_output(level.clone());
                    meters.gain_reduction = Some(level);
                }
                vec![
                    Box::new(comp),
                    Box::new(Gain::from_db(*makeup_gain_db)),
                ]
            }
        }
    }

    /// Meters created while building
    pub fn meters(&self) -> &MeterHandles {
        &self.meters
    }

    /// Render and mix all chains into `out` at `out_rate`
    ///
    /// `out` is interleaved stereo and is overwritten. A disposed graph
    /// renders silence.
    pub fn render_into(&mut self, out: &mut [f32], out_rate: u32) {
        out.fill(0.0);
        if self.disposed {
            return;
        }

        if self.scratch.len() < out.len() {
            self.scratch.resize(out.len(), 0.0);
        }

        for chain in &mut self.chains {
            let scratch = &mut self.scratch[..out.len()];
            chain.player.render(scratch, out_rate);
            chain.effects.process(scratch, out_rate);
            for (o, s) in out.iter_mut().zip(scratch.iter()) {
                *o += *s;
            }
        }
    }

    /// True when every non-looped chain has played out
    pub fn finished(&self) -> bool {
        self.chains.iter().all(|c| c.player.finished)
    }

    /// Rewind every chain and clear effect state
    pub fn restart(&mut self) {
        for chain in &mut self.chains {
            chain.player.restart();
            chain.effects.reset();
        }
    }

    /// Names of the chains in this graph
    pub fn chain_names(&self) -> Vec<&str> {
        self.chains.iter().map(|c| c.name.as_str()).collect()
    }

    /// Release every node exactly once
    ///
    /// The receipt lists each node released. Calling dispose on an already
    /// disposed graph yields a receipt with no nodes and an
    /// [`AudioError::AlreadyDisposed`] entry per chain.
    pub fn dispose(&mut self) -> DisposalReceipt {
        if self.disposed {
            return DisposalReceipt {
                nodes: Vec::new(),
                errors: self
                    .chains
                    .iter()
                    .map(|c| AudioError::AlreadyDisposed(c.name.clone()))
                    .collect(),
            };
        }
        self.disposed = true;

        let mut nodes = Vec::new();
        for chain in &mut self.chains {
            chain.effects.clear();
            nodes.append(&mut chain.node_names);
        }
        if let Some(level) = &self.meters.gain_reduction {
            level.set(0.0);
        }

        DisposalReceipt {
            nodes,
            errors: Vec::new(),
        }
    }

    /// Whether this graph has been disposed
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources_with(names: &[&str]) -> HashMap<String, Arc<AudioBuffer>> {
        names
            .iter()
            .map(|n| {
                (
                    n.to_string(),
                    Arc::new(AudioBuffer::new(vec![0.5, -0.5, 0.25, -0.25], 44100)),
                )
            })
            .collect()
    }

    #[test]
    fn missing_source_fails_build() {
        let spec = GraphSpec::single(ChainSpec::new("drums"));
        let result = SignalGraph::build(&spec, &HashMap::new());
        assert!(matches!(result, Err(AudioError::UnresolvedSource(_))));
    }

    #[test]
    fn parallel_chains_are_summed() {
        let spec = GraphSpec::new(vec![ChainSpec::new("a"), ChainSpec::new("b")]);
        let mut graph = SignalGraph::build(&spec, &sources_with(&["a", "b"])).unwrap();

        let mut out = vec![0.0; 4];
        graph.render_into(&mut out, 44100);

        // Both chains carry the same clip, so the mix doubles it
        assert!((out[0] - 1.0).abs() < 1e-6);
        assert!((out[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn looped_chain_wraps_around() {
        let spec = GraphSpec::single(ChainSpec::new("a"));
        let mut graph = SignalGraph::build(&spec, &sources_with(&["a"])).unwrap();

        // The clip is 2 frames; rendering 4 frames must wrap, not finish
        let mut out = vec![0.0; 8];
        graph.render_into(&mut out, 44100);

        assert!(!graph.finished());
        assert!((out[4] - 0.5).abs() < 1e-6, "loop restarts at frame 0");
    }

    #[test]
    fn one_shot_chain_finishes_and_goes_silent() {
        let spec = GraphSpec::single(ChainSpec::new("a").looped(false));
        let mut graph = SignalGraph::build(&spec, &sources_with(&["a"])).unwrap();

        let mut out = vec![0.0; 8];
        graph.render_into(&mut out, 44100);

        assert!(graph.finished());
        assert_eq!(&out[4..], &[0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn rate_conversion_interpolates() {
        let sources: HashMap<_, _> = [(
            "ramp".to_string(),
            Arc::new(AudioBuffer::new(vec![0.0, 0.0, 1.0, 1.0], 22050)),
        )]
        .into();
        let spec = GraphSpec::single(ChainSpec::new("ramp").looped(false));
        let mut graph = SignalGraph::build(&spec, &sources).unwrap();

        // Output at twice the source rate: step 0.5, so the second output
        // frame sits halfway between source frames 0 and 1
        let mut out = vec![0.0; 8];
        graph.render_into(&mut out, 44100);
        assert!((out[2] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn metered_compressor_exposes_reduction_handle() {
        let spec = GraphSpec::single(ChainSpec::new("a").effect(EffectSpec::Compressor {
            settings: CompressorSettings::new(),
            makeup_gain_db: 3.0,
            metered: true,
        }));
        let graph = SignalGraph::build(&spec, &sources_with(&["a"])).unwrap();

        assert!(graph.meters().gain_reduction.is_some());
    }

    #[test]
    fn dispose_lists_every_node_once() {
        let spec = GraphSpec::single(
            ChainSpec::new("vocal")
                .effect(EffectSpec::Panner { pan: 0.3 })
                .effect(EffectSpec::Gain { db: -3.0 }),
        );
        let mut graph = SignalGraph::build(&spec, &sources_with(&["vocal"])).unwrap();

        let receipt = graph.dispose();
        assert!(receipt.is_clean());
        assert_eq!(receipt.nodes().len(), 3); // source + panner + gain
        assert!(receipt.nodes().iter().any(|n| n == "vocal:source"));

        // Second dispose is acknowledged as an error, not a panic
        let receipt = graph.dispose();
        assert!(!receipt.is_clean());
        assert!(receipt.nodes().is_empty());
    }

    #[test]
    fn disposed_graph_renders_silence() {
        let spec = GraphSpec::single(ChainSpec::new("a"));
        let mut graph = SignalGraph::build(&spec, &sources_with(&["a"])).unwrap();
        graph.dispose();

        let mut out = vec![0.9; 4];
        graph.render_into(&mut out, 44100);
        assert_eq!(out, vec![0.0; 4]);
    }
}

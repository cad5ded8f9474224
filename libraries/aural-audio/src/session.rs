//! Playback session lifecycle
//!
//! At most one session plays at a time. Every play control shares toggle
//! semantics: pressing the control that owns the current session stops it,
//! pressing any other control stops the current session and starts a new
//! one.
//!
//! Starting is split into `request` and `commit` so slow asset loads cannot
//! resurrect a session the user has already moved past: `request` claims an
//! epoch and stops whatever is playing, and a `commit` with a stale ticket
//! disposes its freshly built nodes instead of starting them.

use crate::assets::AssetLibrary;
use crate::buffer::AudioBuffer;
use crate::error::Result;
use crate::graph::{DisposalReceipt, GraphSpec, SignalGraph};
use crate::volume::Volume;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Identifies a started session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

const STATE_STARTED: u8 = 1;
const STATE_DISPOSED: u8 = 2;

/// Observable handle to a session's lifecycle
///
/// Cloneable; all clones observe the same state transitions.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    id: SessionId,
    state: Arc<AtomicU8>,
}

impl SessionHandle {
    fn started(id: SessionId) -> Self {
        Self {
            id,
            state: Arc::new(AtomicU8::new(STATE_STARTED)),
        }
    }

    /// Session identifier
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// True while the session owns the output
    pub fn is_active(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_STARTED
    }

    /// True once the session's nodes have been released
    pub fn is_disposed(&self) -> bool {
        self.state.load(Ordering::Acquire) == STATE_DISPOSED
    }

    fn mark_disposed(&self) {
        self.state.store(STATE_DISPOSED, Ordering::Release);
    }
}

/// Claim produced by [`SessionManager::request`]
///
/// Commits are only honored while the ticket's epoch is current.
#[derive(Debug)]
pub struct SessionTicket {
    epoch: u64,
    label: String,
}

impl SessionTicket {
    /// Play-control label this ticket was requested for
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Result of a play request
#[derive(Debug)]
pub enum PlayOutcome {
    /// A new session took over the output
    Started(SessionHandle),
    /// The control owned the current session, which is now stopped
    Stopped,
    /// A newer request claimed the output while this one was loading
    Superseded,
}

struct ActiveSession {
    label: String,
    handle: SessionHandle,
    graph: SignalGraph,
}

/// Owns the single playback slot, the asset library, and the master volume
pub struct SessionManager {
    assets: Arc<dyn AssetLibrary>,
    current: Option<ActiveSession>,
    epoch: u64,
    next_id: u64,
    master: Volume,
}

impl SessionManager {
    /// Create a manager with the default master volume (-6 dB)
    pub fn new(assets: Arc<dyn AssetLibrary>) -> Self {
        Self {
            assets,
            current: None,
            epoch: 0,
            next_id: 0,
            master: Volume::default(),
        }
    }

    /// Toggle playback for a control
    ///
    /// Stops the current session if `label` owns it; otherwise loads the
    /// spec's assets, stops whatever else is playing, and starts the new
    /// session.
    pub async fn play(&mut self, label: &str, spec: GraphSpec) -> Result<PlayOutcome> {
        if self
            .current
            .as_ref()
            .is_some_and(|s| s.label == label)
        {
            self.stop();
            return Ok(PlayOutcome::Stopped);
        }

        let ticket = self.request(label);

        let mut sources = HashMap::new();
        for name in spec.sources() {
            if !sources.contains_key(name) {
                sources.insert(name.to_string(), self.assets.load(name).await?);
            }
        }

        self.commit(ticket, &spec, &sources)
    }

    /// Claim the playback slot for a control
    ///
    /// Bumps the epoch, invalidating any outstanding ticket, and stops the
    /// current session so nothing plays while the new one loads.
    pub fn request(&mut self, label: &str) -> SessionTicket {
        self.epoch += 1;
        self.stop();
        SessionTicket {
            epoch: self.epoch,
            label: label.to_string(),
        }
    }

    /// Build and start a session from resolved sources
    ///
    /// A stale ticket means a newer request won the slot: the graph is
    /// still built and immediately disposed so its nodes never dangle, and
    /// [`PlayOutcome::Superseded`] is returned.
    pub fn commit(
        &mut self,
        ticket: SessionTicket,
        spec: &GraphSpec,
        sources: &HashMap<String, Arc<AudioBuffer>>,
    ) -> Result<PlayOutcome> {
        let mut graph = SignalGraph::build(spec, sources)?;

        if ticket.epoch != self.epoch {
            let receipt = graph.dispose();
            debug!(
                label = %ticket.label,
                nodes = receipt.nodes().len(),
                "superseded session discarded"
            );
            return Ok(PlayOutcome::Superseded);
        }

        self.next_id += 1;
        let handle = SessionHandle::started(SessionId(self.next_id));
        debug!(label = %ticket.label, id = self.next_id, "session started");

        self.current = Some(ActiveSession {
            label: ticket.label,
            handle: handle.clone(),
            graph,
        });
        Ok(PlayOutcome::Started(handle))
    }

    /// Stop and dispose the current session, if any
    pub fn stop(&mut self) -> Option<DisposalReceipt> {
        let session = self.current.take()?;
        session.handle.mark_disposed();
        let mut graph = session.graph;
        let receipt = graph.dispose();
        debug!(
            label = %session.label,
            nodes = receipt.nodes().len(),
            clean = receipt.is_clean(),
            "session stopped"
        );
        Some(receipt)
    }

    /// Render the current session through the master volume
    ///
    /// `out` is interleaved stereo and is overwritten; silence when nothing
    /// plays. A session whose non-looped chains have all played out is
    /// stopped and disposed automatically.
    pub fn render(&mut self, out: &mut [f32], out_rate: u32) {
        let mut finished = false;
        match &mut self.current {
            Some(session) => {
                session.graph.render_into(out, out_rate);
                self.master.apply(out);
                finished = session.graph.finished();
            }
            None => out.fill(0.0),
        }
        if finished {
            self.stop();
        }
    }

    /// Label of the control that owns the current session
    pub fn current_label(&self) -> Option<&str> {
        self.current.as_ref().map(|s| s.label.as_str())
    }

    /// True while a session owns the output
    pub fn is_playing(&self) -> bool {
        self.current.is_some()
    }

    /// Gain reduction of the current session's metered compressor,
    /// positive dB; `None` when nothing metered is playing
    pub fn gain_reduction_db(&self) -> Option<f32> {
        self.current
            .as_ref()
            .and_then(|s| s.graph.meters().gain_reduction.as_ref())
            .map(|level| level.get())
    }

    /// Set the master volume (0-100)
    pub fn set_master_level(&mut self, level: u8) {
        self.master.set_level(level);
    }

    /// Master volume stage
    pub fn master_volume(&self) -> &Volume {
        &self.master
    }

    /// Mutable master volume stage, for mute control
    pub fn master_volume_mut(&mut self) -> &mut Volume {
        &mut self.master
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssetLibrary;
    use crate::graph::{ChainSpec, EffectSpec};

    fn library() -> Arc<MemoryAssetLibrary> {
        let mut lib = MemoryAssetLibrary::new();
        for name in ["drums", "bass", "vocal"] {
            lib.insert(
                name,
                Arc::new(AudioBuffer::new(vec![0.5, -0.5, 0.25, -0.25], 44100)),
            );
        }
        Arc::new(lib)
    }

    fn spec_for(source: &str) -> GraphSpec {
        GraphSpec::single(ChainSpec::new(source))
    }

    #[tokio::test]
    async fn same_control_toggles_playback() {
        let mut manager = SessionManager::new(library());

        let outcome = manager.play("reference", spec_for("drums")).await.unwrap();
        assert!(matches!(outcome, PlayOutcome::Started(_)));
        assert!(manager.is_playing());

        let outcome = manager.play("reference", spec_for("drums")).await.unwrap();
        assert!(matches!(outcome, PlayOutcome::Stopped));
        assert!(!manager.is_playing());
    }

    #[tokio::test]
    async fn other_control_replaces_session() {
        let mut manager = SessionManager::new(library());

        let first = match manager.play("reference", spec_for("drums")).await.unwrap() {
            PlayOutcome::Started(handle) => handle,
            other => panic!("expected start, got {:?}", other),
        };

        let outcome = manager.play("guess", spec_for("bass")).await.unwrap();
        assert!(matches!(outcome, PlayOutcome::Started(_)));

        // The first session was disposed before the second took over
        assert!(first.is_disposed());
        assert_eq!(manager.current_label(), Some("guess"));
    }

    #[tokio::test]
    async fn stale_ticket_is_superseded() {
        let mut manager = SessionManager::new(library());

        let slow_ticket = manager.request("reference");
        // A newer request claims the slot while the first is still loading
        let fresh_ticket = manager.request("guess");

        let sources: HashMap<_, _> = [(
            "drums".to_string(),
            Arc::new(AudioBuffer::silent(4, 44100)),
        )]
        .into();

        let spec = spec_for("drums");
        let outcome = manager.commit(slow_ticket, &spec, &sources).unwrap();
        assert!(matches!(outcome, PlayOutcome::Superseded));
        assert!(!manager.is_playing());

        let outcome = manager.commit(fresh_ticket, &spec, &sources).unwrap();
        assert!(matches!(outcome, PlayOutcome::Started(_)));
    }

    #[tokio::test]
    async fn missing_asset_fails_cleanly() {
        let mut manager = SessionManager::new(library());
        let result = manager.play("reference", spec_for("missing")).await;
        assert!(result.is_err());
        assert!(!manager.is_playing());
    }

    #[tokio::test]
    async fn finished_session_stops_itself() {
        let mut manager = SessionManager::new(library());
        let spec = GraphSpec::single(ChainSpec::new("drums").looped(false));
        manager.play("reference", spec).await.unwrap();

        // The clip is 2 frames; rendering 4 plays it out
        let mut out = vec![0.0; 8];
        manager.render(&mut out, 44100);

        assert!(!manager.is_playing());
    }

    #[tokio::test]
    async fn master_volume_scales_output() {
        let mut manager = SessionManager::new(library());
        manager.set_master_level(100);
        manager.play("reference", spec_for("drums")).await.unwrap();

        let mut out = vec![0.0; 2];
        manager.render(&mut out, 44100);
        let at_unity = out[0];

        manager.set_master_level(50);
        manager.render(&mut out, 44100);
        assert!(out[0].abs() < at_unity.abs());
    }

    #[tokio::test]
    async fn render_without_session_is_silent() {
        let mut manager = SessionManager::new(library());
        let mut out = vec![0.7; 4];
        manager.render(&mut out, 44100);
        assert_eq!(out, vec![0.0; 4]);
    }

    #[tokio::test]
    async fn metered_session_reports_reduction() {
        let mut manager = SessionManager::new(library());
        let spec = GraphSpec::single(ChainSpec::new("vocal").effect(EffectSpec::Compressor {
            settings: crate::effects::CompressorSettings::new(),
            makeup_gain_db: 0.0,
            metered: true,
        }));
        manager.play("guess", spec).await.unwrap();

        assert_eq!(manager.gain_reduction_db(), Some(0.0));

        manager.stop();
        assert_eq!(manager.gain_reduction_db(), None);
    }
}

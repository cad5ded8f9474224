//! Round state machine
//!
//! Sequences a game session: generate ground truth, let the user audition,
//! accept one guess, score it, advance or finish. The controller owns the
//! game's [`SessionManager`] so every exit path can stop audio.

use crate::config::GameConfig;
use crate::error::Result;
use crate::params::{Guess, ParameterGenerator, RoundParams};
use crate::scoring::{self, RoundScore};
use crate::summary::GameSummary;
use aural_audio::{GraphSpec, PlayOutcome, SessionManager};
use tracing::info;

/// Where the current round stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundState {
    /// Fresh parameters generated, nothing auditioned yet
    AwaitingPlayback,
    /// The user has auditioned at least once; a guess was always legal,
    /// this state only tracks that listening happened
    AwaitingGuess,
    /// The guess was scored; waiting for advance or restart
    Scored,
    /// All rounds played; absorbing until restart
    GameComplete,
}

/// What `advance` moved to
#[derive(Debug)]
pub enum Advance {
    /// A new round started (1-based index)
    NextRound(u32),
    /// The session finished; submit and show this summary
    Complete(GameSummary),
}

/// Per-session score accumulator
#[derive(Debug, Clone, Default)]
pub struct ScoreAccumulator {
    total: u32,
    per_round: Vec<u32>,
}

impl ScoreAccumulator {
    /// Add a round's points, clamping the total at `max_total`
    fn add(&mut self, points: u32, max_total: u32) {
        self.per_round.push(points);
        self.total = (self.total + points).min(max_total);
    }

    /// Accumulated total
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Points per scored round, in order
    pub fn per_round(&self) -> &[u32] {
        &self.per_round
    }

    fn reset(&mut self) {
        self.total = 0;
        self.per_round.clear();
    }
}

/// Drives one game session from round 1 to the summary
pub struct RoundController {
    config: GameConfig,
    generator: ParameterGenerator,
    session: SessionManager,
    state: RoundState,
    current_round: u32,
    params: RoundParams,
    accumulator: ScoreAccumulator,
}

impl RoundController {
    /// Start a session at round 1 with fresh parameters
    pub fn new(
        config: GameConfig,
        mut generator: ParameterGenerator,
        session: SessionManager,
    ) -> Self {
        let params = generator.generate(config.kind());
        info!(game = config.kind().name(), "game session started");
        Self {
            config,
            generator,
            session,
            state: RoundState::AwaitingPlayback,
            current_round: 1,
            params,
            accumulator: ScoreAccumulator::default(),
        }
    }

    /// Ground truth for the current round
    ///
    /// The UI only reveals this after scoring; the controller itself never
    /// mutates it once generated.
    pub fn params(&self) -> &RoundParams {
        &self.params
    }

    /// Current state
    pub fn state(&self) -> RoundState {
        self.state
    }

    /// Current round, 1-based
    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    /// Score accumulator
    pub fn accumulator(&self) -> &ScoreAccumulator {
        &self.accumulator
    }

    /// Game configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Audition a playback path for this round
    ///
    /// Toggle semantics come from the session manager: the same label stops
    /// its own playback, a different label replaces it. Auditioning is legal
    /// until the game completes; after scoring it lets the user compare
    /// their guess with the revealed truth.
    pub async fn audition(&mut self, label: &str, spec: GraphSpec) -> Result<PlayOutcome> {
        if self.state == RoundState::GameComplete {
            return Err(crate::error::GameError::IllegalState("GameComplete"));
        }
        let outcome = self.session.play(label, spec).await?;
        if self.state == RoundState::AwaitingPlayback {
            self.state = RoundState::AwaitingGuess;
        }
        Ok(outcome)
    }

    /// Submit the user's guess for this round
    ///
    /// Legal once per round: the first call stops any playing audio, scores
    /// the guess, and accumulates; repeated calls return `None` and change
    /// nothing. A guess is accepted even if the user never auditioned.
    pub fn submit_guess(&mut self, guess: &Guess) -> Result<Option<RoundScore>> {
        match self.state {
            RoundState::Scored | RoundState::GameComplete => return Ok(None),
            RoundState::AwaitingPlayback | RoundState::AwaitingGuess => {}
        }

        self.session.stop();

        let score = scoring::score(&self.params, guess)?;
        self.accumulator.add(score.points, self.config.max_total());
        self.state = RoundState::Scored;

        info!(
            game = self.config.kind().name(),
            round = self.current_round,
            points = score.points,
            total = self.accumulator.total(),
            "round scored"
        );
        Ok(Some(score))
    }

    /// Move past a scored round
    ///
    /// From `Scored` only: either starts the next round with fresh
    /// parameters or completes the game and returns the summary.
    pub fn advance(&mut self) -> Result<Advance> {
        if self.state != RoundState::Scored {
            return Err(crate::error::GameError::IllegalState("advance needs Scored"));
        }

        self.session.stop();

        if self.current_round >= self.config.rounds() {
            self.state = RoundState::GameComplete;
            let summary = GameSummary::finalize(&self.config, self.accumulator.total());
            info!(
                game = self.config.kind().name(),
                total = summary.total_score,
                percentage = summary.percentage,
                "game complete"
            );
            return Ok(Advance::Complete(summary));
        }

        self.current_round += 1;
        self.params = self.generator.generate(self.config.kind());
        self.state = RoundState::AwaitingPlayback;
        Ok(Advance::NextRound(self.current_round))
    }

    /// Reset to round 1 from any state
    pub fn restart(&mut self) {
        self.session.stop();
        self.accumulator.reset();
        self.current_round = 1;
        self.params = self.generator.generate(self.config.kind());
        self.state = RoundState::AwaitingPlayback;
        info!(game = self.config.kind().name(), "game restarted");
    }

    /// The session manager, for master volume and meter access
    pub fn session(&self) -> &SessionManager {
        &self.session
    }

    /// Mutable session manager
    pub fn session_mut(&mut self) -> &mut SessionManager {
        &mut self.session
    }
}

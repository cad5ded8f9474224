//! End-of-session summary and score hand-off
//!
//! The summary is computed locally and shown regardless of what the
//! submission backend does; a failed submission is logged and swallowed.

use crate::config::{GameConfig, Tier};
use aural_core::{GameKind, ScoreReceipt, ScoreSubmitter};
use tracing::{info, warn};

/// Final result of a completed game session
#[derive(Debug, Clone)]
pub struct GameSummary {
    pub kind: GameKind,
    pub total_score: u32,
    pub max_score: u32,
    /// `round(100 * total / max)`
    pub percentage: u32,
    pub tier: Tier,
}

impl GameSummary {
    /// Compute the summary for an accumulated total
    pub fn finalize(config: &GameConfig, total: u32) -> Self {
        let total = total.min(config.max_total());
        Self {
            kind: config.kind(),
            total_score: total,
            max_score: config.max_total(),
            percentage: config.percentage(total),
            tier: config.tier_for(total),
        }
    }

    /// Hand the score to the submission collaborator
    ///
    /// Fire-and-forget semantics: a failure is logged and `None` returned,
    /// never an error — the summary the user sees does not depend on the
    /// backend.
    pub async fn submit(
        &self,
        submitter: &dyn ScoreSubmitter,
        user_id: &str,
    ) -> Option<ScoreReceipt> {
        match submitter
            .submit_score(user_id, self.kind.name(), self.total_score)
            .await
        {
            Ok(receipt) => {
                info!(
                    game = self.kind.name(),
                    score = self.total_score,
                    new_best = receipt.new_best,
                    achievements = receipt.achievements.len(),
                    "score submitted"
                );
                Some(receipt)
            }
            Err(e) => {
                warn!(game = self.kind.name(), error = %e, "score submission failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FailingSubmitter;

    #[async_trait]
    impl ScoreSubmitter for FailingSubmitter {
        async fn submit_score(
            &self,
            _user_id: &str,
            _game: &str,
            _score: u32,
        ) -> aural_core::Result<ScoreReceipt> {
            Err(aural_core::CoreError::submission("backend down"))
        }
    }

    struct RecordingSubmitter {
        submitted: AtomicU32,
    }

    #[async_trait]
    impl ScoreSubmitter for RecordingSubmitter {
        async fn submit_score(
            &self,
            _user_id: &str,
            game: &str,
            score: u32,
        ) -> aural_core::Result<ScoreReceipt> {
            assert_eq!(game, "Pan Position Game");
            self.submitted.store(score, Ordering::SeqCst);
            Ok(ScoreReceipt {
                new_best: true,
                total_score: score,
                achievements: Vec::new(),
            })
        }
    }

    #[test]
    fn finalize_clamps_and_rounds() {
        let config = GameConfig::for_kind(GameKind::Balance);
        let summary = GameSummary::finalize(&config, 5000);
        assert_eq!(summary.total_score, 800);
        assert_eq!(summary.percentage, 100);
        assert_eq!(summary.tier, Tier::Excellent);

        let summary = GameSummary::finalize(&config, 601);
        assert_eq!(summary.percentage, 75); // 75.125 rounds down
        assert_eq!(summary.tier, Tier::Great);
    }

    #[tokio::test]
    async fn submission_failure_is_contained() {
        let config = GameConfig::for_kind(GameKind::Stereo);
        let summary = GameSummary::finalize(&config, 640);
        let receipt = summary.submit(&FailingSubmitter, "user-1").await;
        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn submission_uses_stable_game_name() {
        let config = GameConfig::for_kind(GameKind::Stereo);
        let summary = GameSummary::finalize(&config, 640);
        let submitter = RecordingSubmitter {
            submitted: AtomicU32::new(0),
        };
        let receipt = summary.submit(&submitter, "user-1").await;
        assert!(receipt.is_some_and(|r| r.new_best));
        assert_eq!(submitter.submitted.load(Ordering::SeqCst), 640);
    }
}

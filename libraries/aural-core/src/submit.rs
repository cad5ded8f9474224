//! Score submission contract
//!
//! The profile/leaderboard backend is an external collaborator. The games
//! only depend on this trait; transports live elsewhere.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An achievement unlocked by a submitted score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: String,
    pub name: String,
}

/// Backend response to a score submission
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreReceipt {
    /// Whether this score beat the user's previous best for the game
    pub new_best: bool,
    /// The user's accumulated score across all games
    pub total_score: u32,
    /// Achievements unlocked by this submission
    #[serde(default)]
    pub achievements: Vec<Achievement>,
}

/// External score-submission collaborator
///
/// Called once per completed game session. Implementations must not panic;
/// callers treat failures as non-fatal and only log them.
#[async_trait]
pub trait ScoreSubmitter: Send + Sync {
    /// Submit a final game score for a user
    async fn submit_score(&self, user_id: &str, game: &str, score: u32) -> Result<ScoreReceipt>;
}

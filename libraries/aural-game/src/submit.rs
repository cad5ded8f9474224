//! Score submission transports
//!
//! [`HttpScoreSubmitter`] talks to the stats backend over HTTPS;
//! [`NullSubmitter`] is for offline play and tests.

use async_trait::async_trait;
use aural_core::{Achievement, CoreError, ScoreReceipt, ScoreSubmitter};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    user_id: &'a str,
    game: &'a str,
    score: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubmitResponse {
    #[serde(default)]
    new_best: bool,
    #[serde(default)]
    total_score: u32,
    #[serde(default)]
    achievements: Vec<WireAchievement>,
}

#[derive(Deserialize)]
struct WireAchievement {
    id: String,
    name: String,
}

/// HTTP transport for the stats backend
pub struct HttpScoreSubmitter {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScoreSubmitter {
    /// Create a submitter against the given backend base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, CoreError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CoreError::submission(format!("failed to build client: {}", e)))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl ScoreSubmitter for HttpScoreSubmitter {
    async fn submit_score(
        &self,
        user_id: &str,
        game: &str,
        score: u32,
    ) -> aural_core::Result<ScoreReceipt> {
        let url = format!("{}/scores", self.base_url.trim_end_matches('/'));
        debug!(url = %url, game, score, "submitting score");

        let response = self
            .client
            .post(&url)
            .json(&SubmitRequest {
                user_id,
                game,
                score,
            })
            .send()
            .await
            .map_err(|e| CoreError::submission(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::submission(format!(
                "backend returned {}",
                status
            )));
        }

        let body: SubmitResponse = response
            .json()
            .await
            .map_err(|e| CoreError::submission(format!("invalid response body: {}", e)))?;

        Ok(ScoreReceipt {
            new_best: body.new_best,
            total_score: body.total_score,
            achievements: body
                .achievements
                .into_iter()
                .map(|a| Achievement {
                    id: a.id,
                    name: a.name,
                })
                .collect(),
        })
    }
}

/// Submitter that accepts everything and reports nothing new
///
/// Used when no user is signed in; scores stay local.
#[derive(Debug, Default)]
pub struct NullSubmitter;

#[async_trait]
impl ScoreSubmitter for NullSubmitter {
    async fn submit_score(
        &self,
        _user_id: &str,
        _game: &str,
        score: u32,
    ) -> aural_core::Result<ScoreReceipt> {
        Ok(ScoreReceipt {
            new_best: false,
            total_score: score,
            achievements: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn null_submitter_echoes_score() {
        let receipt = NullSubmitter
            .submit_score("user-1", "Balance Game", 640)
            .await
            .unwrap();
        assert!(!receipt.new_best);
        assert_eq!(receipt.total_score, 640);
        assert!(receipt.achievements.is_empty());
    }

    #[test]
    fn request_serializes_camel_case() {
        let request = SubmitRequest {
            user_id: "u1",
            game: "Frequency Game",
            score: 730,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"userId\":\"u1\""));
        assert!(json.contains("\"score\":730"));
    }

    #[test]
    fn response_fields_default_when_missing() {
        let body: SubmitResponse = serde_json::from_str("{}").unwrap();
        assert!(!body.new_best);
        assert_eq!(body.total_score, 0);
        assert!(body.achievements.is_empty());
    }
}

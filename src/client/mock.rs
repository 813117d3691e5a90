//! Mock team backend for testing
//!
//! Provides an in-memory implementation of [`TeamApi`] for unit testing
//! without making real API calls.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Team, TeamApi};
use crate::error::{ApiError, Result};
use crate::lineup::TeamId;

/// Mock backend for testing.
///
/// # Example
/// ```ignore
/// let mock = MockTeamClient::new().with_teams(vec![team]).await;
/// let team = mock.get_team(&TeamId::from(1)).await?;
/// ```
#[derive(Default)]
pub struct MockTeamClient {
    /// Stored team records
    teams: Arc<Mutex<Vec<Team>>>,
    /// Error to return (if any) - consumed on first use
    error: Arc<Mutex<Option<ApiError>>>,
    /// Track number of calls for verification
    call_count: Arc<Mutex<CallCounts>>,
    /// Bodies received by update_team
    updates: Arc<Mutex<Vec<Team>>>,
}

/// Tracks API call counts for test verification
#[derive(Default, Debug, Clone)]
pub struct CallCounts {
    pub get_team: usize,
    pub update_team: usize,
}

impl CallCounts {
    /// Get total number of API calls made.
    pub fn total(&self) -> usize {
        self.get_team + self.update_team
    }
}

impl MockTeamClient {
    /// Create a new mock client with no teams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the stored teams.
    pub async fn with_teams(self, teams: Vec<Team>) -> Self {
        *self.teams.lock().await = teams;
        self
    }

    /// Configure an error to return on the next API call.
    /// The error is consumed after one use.
    pub async fn with_error(self, error: ApiError) -> Self {
        *self.error.lock().await = Some(error);
        self
    }

    /// Get the call counts for verification in tests.
    pub async fn call_counts(&self) -> CallCounts {
        self.call_count.lock().await.clone()
    }

    /// Bodies sent to update_team, oldest first.
    pub async fn updates(&self) -> Vec<Team> {
        self.updates.lock().await.clone()
    }

    /// Check if there's a pending error and consume it.
    async fn check_error(&self) -> Result<()> {
        let mut error = self.error.lock().await;
        if let Some(e) = error.take() {
            return Err(e.into());
        }
        Ok(())
    }
}

#[async_trait]
impl TeamApi for MockTeamClient {
    async fn get_team(&self, team_id: &TeamId) -> Result<Team> {
        self.call_count.lock().await.get_team += 1;
        self.check_error().await?;

        let teams = self.teams.lock().await;
        teams
            .iter()
            .find(|t| &t.id == team_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Team not found: {}", team_id)).into())
    }

    async fn update_team(&self, team_id: &TeamId, team: &Team) -> Result<Team> {
        self.call_count.lock().await.update_team += 1;
        self.check_error().await?;

        self.updates.lock().await.push(team.clone());

        let mut teams = self.teams.lock().await;
        let stored = teams
            .iter_mut()
            .find(|t| &t.id == team_id)
            .ok_or_else(|| ApiError::NotFound(format!("Team not found: {}", team_id)))?;
        *stored = team.clone();

        Ok(stored.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_get_returns_configured_team() {
        let mock = MockTeamClient::new()
            .with_teams(vec![Team::new(1u64, "Rovers")])
            .await;

        let team = mock.get_team(&TeamId::from(1)).await.unwrap();
        assert_eq!(team.name, "Rovers");
        assert_eq!(mock.call_counts().await.get_team, 1);
    }

    #[tokio::test]
    async fn test_mock_get_not_found() {
        let mock = MockTeamClient::new();

        let result = mock.get_team(&TeamId::from(9)).await;
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_mock_error_is_consumed() {
        let mock = MockTeamClient::new()
            .with_teams(vec![Team::new(1u64, "Rovers")])
            .await
            .with_error(ApiError::ServerError("down".to_string()))
            .await;

        assert!(mock.get_team(&TeamId::from(1)).await.is_err());
        assert!(mock.get_team(&TeamId::from(1)).await.is_ok());
        assert_eq!(mock.call_counts().await.total(), 2);
    }

    #[tokio::test]
    async fn test_mock_update_replaces_record() {
        let mock = MockTeamClient::new()
            .with_teams(vec![Team::new(1u64, "Rovers")])
            .await;

        let updated = Team::new(1u64, "Rovers FC");
        mock.update_team(&TeamId::from(1), &updated).await.unwrap();

        let team = mock.get_team(&TeamId::from(1)).await.unwrap();
        assert_eq!(team.name, "Rovers FC");
        assert_eq!(mock.updates().await.len(), 1);
        assert_eq!(mock.call_counts().await.update_team, 1);
    }
}

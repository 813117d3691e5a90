//! Team persistence backend
//!
//! The lineup engine only needs two calls from the backend: read a team
//! (roster plus any saved lineup) and write it back with a new lineup.

use async_trait::async_trait;

use crate::error::Result;
use crate::lineup::TeamId;

#[cfg(test)]
pub mod mock;
pub mod models;
pub mod rest;

#[cfg(test)]
pub use mock::MockTeamClient;
pub use models::Team;
pub use rest::RestClient;

/// Team read/write operations against the persistence backend
#[async_trait]
pub trait TeamApi: Send + Sync {
    /// Fetch a team record, including its roster and saved lineup.
    async fn get_team(&self, team_id: &TeamId) -> Result<Team>;

    /// Replace a team record.
    ///
    /// The body is the complete record; fields are not merged server-side.
    async fn update_team(&self, team_id: &TeamId, team: &Team) -> Result<Team>;
}

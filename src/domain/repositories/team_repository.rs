use async_trait::async_trait;

use super::errors::RepositoryResult;
use crate::domain::team::{NewTeam, Team, TeamFilter};

/// Persistence of teams and their pool membership
#[async_trait]
pub trait TeamRepository: Send {
    /// Find a team by its ID
    async fn find_team(&mut self, id: i64) -> RepositoryResult<Option<Team>>;

    /// Find all teams among the given IDs
    async fn find_teams(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Team>>;

    /// Teams holding any of the players, in either player column
    async fn find_team_with_players(&mut self, player_ids: &[i64])
        -> RepositoryResult<Vec<Team>>;

    async fn list_teams(&mut self, filter: &TeamFilter) -> RepositoryResult<Vec<Team>>;

    async fn insert_team(&mut self, team: &NewTeam) -> RepositoryResult<Team>;

    /// Overwrite company and players of an existing team
    async fn update_team(&mut self, team: &Team) -> RepositoryResult<()>;

    /// Delete a team; returns false when it does not exist
    async fn delete_team(&mut self, id: i64) -> RepositoryResult<bool>;

    /// Set the pool of every listed team
    async fn assign_pool(&mut self, team_ids: &[i64], pool_id: i64) -> RepositoryResult<()>;

    /// Remove every team from the pool
    async fn clear_pool(&mut self, pool_id: i64) -> RepositoryResult<()>;

    async fn count_teams(&mut self) -> RepositoryResult<i64>;
}

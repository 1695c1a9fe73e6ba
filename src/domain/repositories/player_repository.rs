use async_trait::async_trait;
use uuid::Uuid;

use super::errors::RepositoryResult;
use crate::domain::player::{NewPlayer, Player};

/// Persistence of players
#[async_trait]
pub trait PlayerRepository: Send {
    /// Find a player by its ID
    async fn find_player(&mut self, id: i64) -> RepositoryResult<Option<Player>>;

    /// Find all players among the given IDs
    async fn find_players(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Player>>;

    /// Find the player linked to an account
    async fn find_player_by_user(&mut self, user_id: Uuid) -> RepositoryResult<Option<Player>>;

    async fn find_player_by_license(&mut self, license_number: &str)
        -> RepositoryResult<Option<Player>>;

    async fn find_player_by_email(&mut self, email: &str) -> RepositoryResult<Option<Player>>;

    /// All players, newest first
    async fn list_players(&mut self) -> RepositoryResult<Vec<Player>>;

    async fn insert_player(&mut self, player: &NewPlayer) -> RepositoryResult<Player>;

    /// Overwrite a player; returns false when it does not exist
    async fn update_player(&mut self, id: i64, player: &NewPlayer) -> RepositoryResult<bool>;

    /// Delete a player; returns false when it does not exist
    async fn delete_player(&mut self, id: i64) -> RepositoryResult<bool>;

    async fn count_players(&mut self) -> RepositoryResult<i64>;
}

use async_trait::async_trait;

use super::errors::RepositoryResult;
use crate::domain::matches::{Match, MatchDraft, MatchFilter, MatchStatus};

/// Persistence of matches
#[async_trait]
pub trait MatchRepository: Send {
    async fn find_match(&mut self, id: i64) -> RepositoryResult<Option<Match>>;

    /// Matches of the given events, ordered by court
    async fn matches_in_events(&mut self, event_ids: &[i64]) -> RepositoryResult<Vec<Match>>;

    async fn insert_match(&mut self, event_id: i64, draft: &MatchDraft)
        -> RepositoryResult<Match>;

    /// Overwrite all fields of a match, including its event
    async fn update_match(&mut self, m: &Match) -> RepositoryResult<()>;

    /// Delete a match; returns false when it does not exist
    async fn delete_match(&mut self, id: i64) -> RepositoryResult<bool>;

    async fn delete_matches_in_event(&mut self, event_id: i64) -> RepositoryResult<()>;

    /// Whether any of the teams plays in a match, optionally of one status
    async fn teams_have_match(
        &mut self,
        team_ids: &[i64],
        status: Option<MatchStatus>,
    ) -> RepositoryResult<bool>;

    async fn list_matches(&mut self, filter: &MatchFilter) -> RepositoryResult<Vec<Match>>;

    async fn count_matches(&mut self) -> RepositoryResult<i64>;
}

use async_trait::async_trait;

use super::errors::RepositoryResult;
use crate::domain::pool::Pool;

/// Persistence of pools
#[async_trait]
pub trait PoolRepository: Send {
    async fn find_pool(&mut self, id: i64) -> RepositoryResult<Option<Pool>>;

    /// All pools ordered by name
    async fn list_pools(&mut self) -> RepositoryResult<Vec<Pool>>;

    async fn insert_pool(&mut self, name: &str) -> RepositoryResult<Pool>;

    async fn rename_pool(&mut self, id: i64, name: &str) -> RepositoryResult<()>;

    /// Delete a pool, detaching its teams; returns false when it does not exist
    async fn delete_pool(&mut self, id: i64) -> RepositoryResult<bool>;

    async fn count_pools(&mut self) -> RepositoryResult<i64>;
}

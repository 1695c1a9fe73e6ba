use async_trait::async_trait;

use super::errors::RepositoryResult;
use super::{
    EventRepository, MatchRepository, PlayerRepository, PoolRepository, TeamRepository,
};

/// One atomic transaction over every repository
///
/// Dropping a unit of work without calling [`UnitOfWork::commit`] rolls
/// back everything it wrote.
#[async_trait]
pub trait UnitOfWork:
    PlayerRepository + TeamRepository + PoolRepository + EventRepository + MatchRepository + Send
{
    async fn commit(self: Box<Self>) -> RepositoryResult<()>;
}

/// Opens units of work against a backing store
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> RepositoryResult<Box<dyn UnitOfWork>>;
}

use std::sync::Arc;

use serde::Serialize;

use crate::domain::access::{Access, Capability};
use crate::domain::errors::TournamentResult;
use crate::domain::repositories::{
    MatchRepository, PlayerRepository, PoolRepository, Store, TeamRepository,
};

/// Row counts shown on the admin dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    pub players: i64,
    pub teams: i64,
    pub pools: i64,
    pub matches: i64,
}

#[derive(Clone)]
pub struct StatsService {
    store: Arc<dyn Store>,
}

impl StatsService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn dashboard(&self, access: &Access) -> TournamentResult<DashboardCounts> {
        access.require(Capability::ViewStatistics)?;
        let mut uow = self.store.begin().await?;
        Ok(DashboardCounts {
            players: uow.count_players().await?,
            teams: uow.count_teams().await?,
            pools: uow.count_pools().await?,
            matches: uow.count_matches().await?,
        })
    }
}

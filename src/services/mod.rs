//! Application services
//!
//! Each service opens one unit of work per operation, so every check and
//! write of an operation commits or rolls back together.

pub mod events;
pub mod hydrate;
pub mod matches;
pub mod players;
pub mod pools;
pub mod results;
pub mod stats;
pub mod teams;

use std::sync::Arc;

use crate::domain::repositories::Store;

pub use events::EventService;
pub use matches::{MatchPlacement, MatchQuery, MatchService};
pub use players::PlayerService;
pub use pools::PoolService;
pub use results::{Outcome, PersonalMatchResult, PersonalResults, RankingReport, ResultService};
pub use stats::{DashboardCounts, StatsService};
pub use teams::TeamService;

/// Every service, sharing one store
#[derive(Clone)]
pub struct Services {
    pub events: EventService,
    pub matches: MatchService,
    pub players: PlayerService,
    pub pools: PoolService,
    pub results: ResultService,
    pub stats: StatsService,
    pub teams: TeamService,
}

impl Services {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            events: EventService::new(store.clone()),
            matches: MatchService::new(store.clone()),
            players: PlayerService::new(store.clone()),
            pools: PoolService::new(store.clone()),
            results: ResultService::new(store.clone()),
            stats: StatsService::new(store.clone()),
            teams: TeamService::new(store),
        }
    }
}

// Repository interfaces (ports) for the tournament aggregates
// Implementations live in the infrastructure layer

pub mod errors;
pub mod event_repository;
pub mod match_repository;
pub mod player_repository;
pub mod pool_repository;
pub mod team_repository;
pub mod unit_of_work;

pub use errors::{Constraint, RepositoryError, RepositoryResult};
pub use event_repository::EventRepository;
pub use match_repository::MatchRepository;
pub use player_repository::PlayerRepository;
pub use pool_repository::PoolRepository;
pub use team_repository::TeamRepository;
pub use unit_of_work::{Store, UnitOfWork};

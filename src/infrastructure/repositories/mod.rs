// Repository implementations (data access layer)
// Adapters that implement the domain unit of work over PostgreSQL or memory

pub mod in_memory_store;
pub mod postgres_event_repository;
pub mod postgres_match_repository;
pub mod postgres_player_repository;
pub mod postgres_pool_repository;
pub mod postgres_store;
pub mod postgres_team_repository;

pub use in_memory_store::InMemoryStore;
pub use postgres_store::PostgresStore;

// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod access;
pub mod errors;
pub mod event;
pub mod matches;
pub mod player;
pub mod pool;
pub mod ranking;
pub mod repositories;
pub mod score;
pub mod team;

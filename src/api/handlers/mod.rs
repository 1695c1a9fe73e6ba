// HTTP handlers, one module per resource

pub mod events;
pub mod health;
pub mod matches;
pub mod players;
pub mod pools;
pub mod results;
pub mod stats;
pub mod teams;

//! Padel Tournament API Library
//!
//! Scheduling and match-integrity engine for a corporate padel tournament:
//! domain rules, application services, storage adapters and the HTTP layer.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod services;

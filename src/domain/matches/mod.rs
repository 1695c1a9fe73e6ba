// Match domain module
// Contains the match entity, its status, and the draft used for placement

#![allow(clippy::module_inception)]

pub mod matches;
pub mod value_objects;

pub use matches::{Match, MatchDetails, MatchDraft, MatchFilter, ScheduledMatch, MAX_COURT_NUMBER};
pub use value_objects::MatchStatus;

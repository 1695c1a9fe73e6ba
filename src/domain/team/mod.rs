// Team domain module
// Contains the team entity and the composition rules for company duos

#![allow(clippy::module_inception)]

pub mod team;

pub use team::{check_composition, NewTeam, Team, TeamDetails, TeamFilter};

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::errors::TournamentError;
use super::team::Team;

/// Number of teams in every pool
pub const POOL_SIZE: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pool {
    pub id: i64,
    pub name: String,
}

/// Pool with its member teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolDetails {
    pub id: i64,
    pub name: String,
    pub teams: Vec<Team>,
}

/// Pool data supplied on creation or update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolInput {
    pub name: String,
    #[serde(default, alias = "team_ids")]
    pub team_ids: Option<Vec<i64>>,
}

/// Checks that a member list holds exactly [`POOL_SIZE`] distinct teams
pub fn check_pool_members(team_ids: &[i64]) -> Result<(), TournamentError> {
    if team_ids.len() != POOL_SIZE {
        return Err(TournamentError::bad_request(
            "Une poule doit contenir exactement 6 équipes.",
        ));
    }

    let distinct: HashSet<i64> = team_ids.iter().copied().collect();
    if distinct.len() != team_ids.len() {
        return Err(TournamentError::bad_request(
            "Une équipe ne peut apparaître qu'une fois dans une poule.",
        ));
    }

    Ok(())
}

/// Rejects teams that already sit in a pool other than `pool_id`
///
/// The error names the companies of the offending teams.
pub fn check_teams_free(teams: &[Team], pool_id: Option<i64>) -> Result<(), TournamentError> {
    let taken: Vec<&str> = teams
        .iter()
        .filter(|team| team.pool_id.is_some() && team.pool_id != pool_id)
        .map(|team| team.company.as_str())
        .collect();

    if taken.is_empty() {
        Ok(())
    } else {
        Err(TournamentError::conflict(format!(
            "Certaines équipes sont déjà assignées à une poule : {}",
            taken.join(", ")
        )))
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::TournamentError;
use crate::domain::player::Player;

/// A duo of players representing one company
///
/// # Invariants
/// - Both players belong to the team's company
/// - A player is on at most one team
/// - A team is in at most one pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: i64,
    pub company: String,
    pub player1_id: i64,
    pub player2_id: i64,
    pub pool_id: Option<i64>,
}

impl Team {
    pub fn has_player(&self, player_id: i64) -> bool {
        self.player1_id == player_id || self.player2_id == player_id
    }
}

/// Team composition supplied on creation or update
///
/// Pool membership is managed through pools, not here.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTeam {
    pub company: String,
    pub player1_id: i64,
    pub player2_id: i64,
}

/// Team with both players loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetails {
    pub id: i64,
    pub company: String,
    pub player1: Player,
    pub player2: Player,
    pub pool_id: Option<i64>,
}

impl TeamDetails {
    pub fn new(team: Team, player1: Player, player2: Player) -> Self {
        Self {
            id: team.id,
            company: team.company,
            player1,
            player2,
            pool_id: team.pool_id,
        }
    }

    /// Whether one of the two players is linked to the given account
    pub fn has_account(&self, user_id: Uuid) -> bool {
        self.player1.is_account(user_id) || self.player2.is_account(user_id)
    }

    pub fn player_names(&self) -> [String; 2] {
        [self.player1.full_name(), self.player2.full_name()]
    }
}

/// Optional criteria for listing teams
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamFilter {
    pub pool_id: Option<i64>,
    pub company: Option<String>,
}

impl TeamFilter {
    pub fn matches(&self, team: &Team) -> bool {
        self.pool_id.map_or(true, |pool_id| team.pool_id == Some(pool_id))
            && self
                .company
                .as_deref()
                .map_or(true, |company| team.company == company)
    }
}

/// Checks that two players may form a team for the given company
///
/// # Business Rules
/// - The two players must be different people
/// - Both must work for the requested company
/// - Both must work for the same company
pub fn check_composition(
    company: &str,
    player1: &Player,
    player2: &Player,
) -> Result<(), TournamentError> {
    if player1.id == player2.id {
        return Err(TournamentError::bad_request(
            "Les deux joueurs doivent être différents",
        ));
    }

    if player1.company != company || player2.company != company {
        return Err(TournamentError::bad_request(format!(
            "Les deux joueurs doivent appartenir à l'entreprise sélectionnée ({})",
            company
        )));
    }

    if player1.company != player2.company {
        return Err(TournamentError::bad_request(
            "Les deux joueurs n'appartiennent pas à la même entreprise",
        ));
    }

    Ok(())
}

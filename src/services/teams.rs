use std::sync::Arc;

use tracing::info;

use super::hydrate;
use crate::domain::access::{Access, Capability};
use crate::domain::errors::{TournamentError, TournamentResult};
use crate::domain::matches::MatchStatus;
use crate::domain::player::Player;
use crate::domain::repositories::{
    MatchRepository, PlayerRepository, Store, TeamRepository, UnitOfWork,
};
use crate::domain::team::{check_composition, NewTeam, Team, TeamDetails, TeamFilter};

#[derive(Clone)]
pub struct TeamService {
    store: Arc<dyn Store>,
}

impl TeamService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> TournamentResult<TeamDetails> {
        let mut uow = self.store.begin().await?;
        let team = load_team(uow.as_mut(), id).await?;
        one_team(uow.as_mut(), team).await
    }

    pub async fn list(&self, filter: TeamFilter) -> TournamentResult<Vec<TeamDetails>> {
        let mut uow = self.store.begin().await?;
        let teams = uow.list_teams(&filter).await?;
        hydrate::team_details(uow.as_mut(), teams).await
    }

    /// Pair two players of one company into a team
    ///
    /// # Business Rules
    /// - Two different players, both from the team's company
    /// - A player belongs to at most one team
    pub async fn create(&self, access: &Access, new_team: NewTeam) -> TournamentResult<TeamDetails> {
        access.require(Capability::ManageTeams)?;

        let mut uow = self.store.begin().await?;
        let (player1, player2) = load_pair(uow.as_mut(), &new_team).await?;
        check_composition(&new_team.company, &player1, &player2)?;
        ensure_players_free(uow.as_mut(), &new_team, None).await?;

        let team = uow.insert_team(&new_team).await?;
        let details = TeamDetails::new(team, player1, player2);
        uow.commit().await?;

        info!(team_id = details.id, company = %details.company, "Team created");
        Ok(details)
    }

    /// Change a team's company or players
    ///
    /// Refused once the team has a completed match. Pool membership is
    /// left untouched.
    pub async fn update(
        &self,
        access: &Access,
        id: i64,
        changes: NewTeam,
    ) -> TournamentResult<TeamDetails> {
        access.require(Capability::ManageTeams)?;

        let mut uow = self.store.begin().await?;
        let mut team = load_team(uow.as_mut(), id).await?;
        if uow.teams_have_match(&[id], Some(MatchStatus::Completed)).await? {
            return Err(TournamentError::forbidden(
                "Impossible de modifier une équipe qui a déjà terminé des matchs.",
            ));
        }

        let (player1, player2) = load_pair(uow.as_mut(), &changes).await?;
        check_composition(&changes.company, &player1, &player2)?;
        ensure_players_free(uow.as_mut(), &changes, Some(id)).await?;

        team.company = changes.company;
        team.player1_id = changes.player1_id;
        team.player2_id = changes.player2_id;
        uow.update_team(&team).await?;
        let details = TeamDetails::new(team, player1, player2);
        uow.commit().await?;

        info!(team_id = id, company = %details.company, "Team updated");
        Ok(details)
    }

    /// Delete a team that never played
    pub async fn delete(&self, access: &Access, id: i64) -> TournamentResult<()> {
        access.require(Capability::ManageTeams)?;

        let mut uow = self.store.begin().await?;
        load_team(uow.as_mut(), id).await?;
        if uow.teams_have_match(&[id], None).await? {
            return Err(TournamentError::forbidden(
                "Impossible de supprimer une équipe qui a déjà joué des matchs.",
            ));
        }
        uow.delete_team(id).await?;
        uow.commit().await?;

        info!(team_id = id, "Team deleted");
        Ok(())
    }
}

async fn load_team(uow: &mut dyn UnitOfWork, id: i64) -> TournamentResult<Team> {
    uow.find_team(id)
        .await?
        .ok_or_else(|| TournamentError::not_found("Équipe introuvable"))
}

async fn one_team(uow: &mut dyn UnitOfWork, team: Team) -> TournamentResult<TeamDetails> {
    let mut details = hydrate::team_details(uow, vec![team]).await?;
    details
        .pop()
        .ok_or_else(|| TournamentError::not_found("Équipe introuvable"))
}

async fn load_pair(
    uow: &mut dyn UnitOfWork,
    team: &NewTeam,
) -> TournamentResult<(Player, Player)> {
    let players = uow
        .find_players(&[team.player1_id, team.player2_id])
        .await?;
    let pick = |id: i64| {
        players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| TournamentError::not_found("Un ou plusieurs joueurs introuvables"))
    };
    Ok((pick(team.player1_id)?, pick(team.player2_id)?))
}

/// Rejects players already on a team other than `own`
async fn ensure_players_free(
    uow: &mut dyn UnitOfWork,
    team: &NewTeam,
    own: Option<i64>,
) -> TournamentResult<()> {
    let taken = uow
        .find_team_with_players(&[team.player1_id, team.player2_id])
        .await?
        .into_iter()
        .any(|t| Some(t.id) != own);

    if taken {
        return Err(TournamentError::conflict("Un des joueurs est déjà dans une équipe"));
    }
    Ok(())
}

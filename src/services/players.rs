use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::domain::access::{Access, Capability};
use crate::domain::errors::{TournamentError, TournamentResult};
use crate::domain::player::{NewPlayer, Player};
use crate::domain::repositories::{
    Constraint, PlayerRepository, RepositoryError, Store, TeamRepository, UnitOfWork,
};

#[derive(Clone)]
pub struct PlayerService {
    store: Arc<dyn Store>,
}

impl PlayerService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> TournamentResult<Player> {
        let mut uow = self.store.begin().await?;
        load_player(uow.as_mut(), id).await
    }

    pub async fn list(&self) -> TournamentResult<Vec<Player>> {
        let mut uow = self.store.begin().await?;
        Ok(uow.list_players().await?)
    }

    /// The player profile linked to an account
    pub async fn find_by_user(&self, user_id: Uuid) -> TournamentResult<Player> {
        let mut uow = self.store.begin().await?;
        uow.find_player_by_user(user_id)
            .await?
            .ok_or_else(|| TournamentError::not_found("Profil joueur introuvable"))
    }

    pub async fn create(&self, access: &Access, new_player: NewPlayer) -> TournamentResult<Player> {
        access.require(Capability::ManagePlayers)?;
        check_fields(&new_player)?;

        let mut uow = self.store.begin().await?;
        ensure_unique(uow.as_mut(), &new_player, None).await?;
        let player = uow.insert_player(&new_player).await?;
        uow.commit().await?;

        info!(player_id = player.id, company = %player.company, "Player created");
        Ok(player)
    }

    /// Edit a player
    ///
    /// A player on a team keeps its company, since the team's composition
    /// depends on it.
    pub async fn update(
        &self,
        access: &Access,
        id: i64,
        changes: NewPlayer,
    ) -> TournamentResult<Player> {
        access.require(Capability::ManagePlayers)?;
        check_fields(&changes)?;

        let mut uow = self.store.begin().await?;
        let current = load_player(uow.as_mut(), id).await?;
        if current.company != changes.company
            && !uow.find_team_with_players(&[id]).await?.is_empty()
        {
            return Err(TournamentError::forbidden(
                "Impossible de changer l'entreprise d'un joueur qui appartient à une équipe.",
            ));
        }
        ensure_unique(uow.as_mut(), &changes, Some(id)).await?;

        if !uow.update_player(id, &changes).await? {
            return Err(player_not_found());
        }
        uow.commit().await?;

        info!(player_id = id, "Player updated");
        Ok(changes.into_player(id))
    }

    /// Delete a player who is on no team
    pub async fn delete(&self, access: &Access, id: i64) -> TournamentResult<()> {
        access.require(Capability::ManagePlayers)?;

        let mut uow = self.store.begin().await?;
        load_player(uow.as_mut(), id).await?;
        if !uow.find_team_with_players(&[id]).await?.is_empty() {
            return Err(TournamentError::forbidden(
                "Impossible de supprimer ce joueur car il appartient à une équipe.",
            ));
        }
        uow.delete_player(id).await?;
        uow.commit().await?;

        info!(player_id = id, "Player deleted");
        Ok(())
    }
}

fn player_not_found() -> TournamentError {
    TournamentError::not_found("Joueur introuvable")
}

async fn load_player(uow: &mut dyn UnitOfWork, id: i64) -> TournamentResult<Player> {
    uow.find_player(id).await?.ok_or_else(player_not_found)
}

fn check_fields(player: &NewPlayer) -> TournamentResult<()> {
    let required = [
        &player.first_name,
        &player.last_name,
        &player.email,
        &player.company,
        &player.license_number,
    ];
    if required.iter().any(|field| field.trim().is_empty()) {
        return Err(TournamentError::bad_request(
            "Tous les champs du joueur sont requis.",
        ));
    }
    if !player.email.contains('@') {
        return Err(TournamentError::bad_request("Adresse email invalide."));
    }
    if let Some(birth_date) = player.birth_date {
        check_birth_date(birth_date, Utc::now().date_naive())?;
    }
    Ok(())
}

/// Earliest accepted birth date
const OLDEST_BIRTH_DATE: (i32, u32, u32) = (1900, 1, 1);

fn check_birth_date(birth_date: NaiveDate, today: NaiveDate) -> TournamentResult<()> {
    let (y, m, d) = OLDEST_BIRTH_DATE;
    if NaiveDate::from_ymd_opt(y, m, d).is_some_and(|oldest| birth_date < oldest) {
        return Err(TournamentError::bad_request(
            "La date est invalide (trop ancienne)",
        ));
    }
    if birth_date > today {
        return Err(TournamentError::bad_request(
            "La date de naissance ne peut pas être dans le futur",
        ));
    }
    Ok(())
}

/// Reports a taken email, license or account the same way the storage
/// constraint would
async fn ensure_unique(
    uow: &mut dyn UnitOfWork,
    player: &NewPlayer,
    own: Option<i64>,
) -> TournamentResult<()> {
    let taken = |found: Option<Player>| found.is_some_and(|p| Some(p.id) != own);

    if taken(uow.find_player_by_email(&player.email).await?) {
        return Err(RepositoryError::UniqueViolation(Constraint::PlayerEmail).into());
    }
    if taken(uow.find_player_by_license(&player.license_number).await?) {
        return Err(RepositoryError::UniqueViolation(Constraint::PlayerLicenseNumber).into());
    }
    if let Some(user_id) = player.user_id {
        if taken(uow.find_player_by_user(user_id).await?) {
            return Err(RepositoryError::UniqueViolation(Constraint::PlayerUserId).into());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ErrorKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn birth_date_must_be_past_and_after_1900() {
        let today = date(2025, 6, 1);
        assert!(check_birth_date(date(1990, 4, 12), today).is_ok());
        assert!(check_birth_date(date(1900, 1, 1), today).is_ok());
        assert!(check_birth_date(today, today).is_ok());

        let err = check_birth_date(date(1899, 12, 31), today).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert!(check_birth_date(date(2025, 6, 2), today).is_err());
    }
}

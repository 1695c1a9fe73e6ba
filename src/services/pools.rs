use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::domain::access::{Access, Capability};
use crate::domain::errors::{TournamentError, TournamentResult};
use crate::domain::matches::MatchStatus;
use crate::domain::pool::{check_pool_members, check_teams_free, Pool, PoolDetails, PoolInput};
use crate::domain::repositories::{
    MatchRepository, PoolRepository, Store, TeamRepository, UnitOfWork,
};
use crate::domain::team::{Team, TeamFilter};

/// Groups of exactly six teams
#[derive(Clone)]
pub struct PoolService {
    store: Arc<dyn Store>,
}

impl PoolService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> TournamentResult<PoolDetails> {
        let mut uow = self.store.begin().await?;
        let pool = load_pool(uow.as_mut(), id).await?;
        let teams = members(uow.as_mut(), id).await?;
        Ok(PoolDetails {
            id: pool.id,
            name: pool.name,
            teams,
        })
    }

    /// All pools by name, each with its teams
    pub async fn list(&self) -> TournamentResult<Vec<PoolDetails>> {
        let mut uow = self.store.begin().await?;
        let pools = uow.list_pools().await?;

        let mut by_pool: HashMap<i64, Vec<Team>> = HashMap::new();
        for team in uow.list_teams(&TeamFilter::default()).await? {
            if let Some(pool_id) = team.pool_id {
                by_pool.entry(pool_id).or_default().push(team);
            }
        }

        Ok(pools
            .into_iter()
            .map(|pool| PoolDetails {
                teams: by_pool.remove(&pool.id).unwrap_or_default(),
                id: pool.id,
                name: pool.name,
            })
            .collect())
    }

    /// Create a pool of exactly six free teams
    pub async fn create(&self, access: &Access, input: PoolInput) -> TournamentResult<PoolDetails> {
        access.require(Capability::ManagePools)?;
        let name = checked_name(&input.name)?;
        let team_ids = input.team_ids.unwrap_or_default();
        check_pool_members(&team_ids)?;

        let mut uow = self.store.begin().await?;
        let teams = load_members(uow.as_mut(), &team_ids).await?;
        check_teams_free(&teams, None)?;

        let pool = uow.insert_pool(name).await?;
        uow.assign_pool(&team_ids, pool.id).await?;
        let teams = members(uow.as_mut(), pool.id).await?;
        uow.commit().await?;

        info!(pool_id = pool.id, name = %pool.name, "Pool created");
        Ok(PoolDetails {
            id: pool.id,
            name: pool.name,
            teams,
        })
    }

    /// Rename a pool and optionally replace its six teams
    pub async fn update(
        &self,
        access: &Access,
        id: i64,
        input: PoolInput,
    ) -> TournamentResult<PoolDetails> {
        access.require(Capability::ManagePools)?;
        let name = checked_name(&input.name)?;
        if let Some(team_ids) = &input.team_ids {
            check_pool_members(team_ids)?;
        }

        let mut uow = self.store.begin().await?;
        load_pool(uow.as_mut(), id).await?;
        ensure_no_completed_match(uow.as_mut(), id, "modifier").await?;

        uow.rename_pool(id, name).await?;
        if let Some(team_ids) = &input.team_ids {
            let teams = load_members(uow.as_mut(), team_ids).await?;
            check_teams_free(&teams, Some(id))?;
            uow.clear_pool(id).await?;
            uow.assign_pool(team_ids, id).await?;
        }

        let teams = members(uow.as_mut(), id).await?;
        uow.commit().await?;

        info!(pool_id = id, name = %name, "Pool updated");
        Ok(PoolDetails {
            id,
            name: name.to_string(),
            teams,
        })
    }

    /// Delete a pool; its teams become unassigned
    pub async fn delete(&self, access: &Access, id: i64) -> TournamentResult<()> {
        access.require(Capability::ManagePools)?;

        let mut uow = self.store.begin().await?;
        load_pool(uow.as_mut(), id).await?;
        ensure_no_completed_match(uow.as_mut(), id, "supprimer").await?;
        uow.delete_pool(id).await?;
        uow.commit().await?;

        info!(pool_id = id, "Pool deleted");
        Ok(())
    }
}

fn checked_name(name: &str) -> TournamentResult<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::bad_request("Le nom de la poule est requis."));
    }
    Ok(name)
}

async fn load_pool(uow: &mut dyn UnitOfWork, id: i64) -> TournamentResult<Pool> {
    uow.find_pool(id)
        .await?
        .ok_or_else(|| TournamentError::not_found("Poule introuvable"))
}

async fn members(uow: &mut dyn UnitOfWork, pool_id: i64) -> TournamentResult<Vec<Team>> {
    let filter = TeamFilter {
        pool_id: Some(pool_id),
        ..TeamFilter::default()
    };
    Ok(uow.list_teams(&filter).await?)
}

async fn load_members(uow: &mut dyn UnitOfWork, team_ids: &[i64]) -> TournamentResult<Vec<Team>> {
    let teams = uow.find_teams(team_ids).await?;
    if teams.len() != team_ids.len() {
        return Err(TournamentError::not_found(
            "Une ou plusieurs équipes introuvables",
        ));
    }
    Ok(teams)
}

/// Freezes a pool once any of its teams finished a match
async fn ensure_no_completed_match(
    uow: &mut dyn UnitOfWork,
    pool_id: i64,
    action: &str,
) -> TournamentResult<()> {
    let team_ids: Vec<i64> = members(uow, pool_id).await?.iter().map(|t| t.id).collect();
    if uow
        .teams_have_match(&team_ids, Some(MatchStatus::Completed))
        .await?
    {
        return Err(TournamentError::forbidden(format!(
            "Impossible de {} : des matchs ont déjà été terminés avec ces équipes.",
            action
        )));
    }
    Ok(())
}

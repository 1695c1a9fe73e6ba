use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::domain::event::{Event, SlotTime};
use crate::domain::matches::{Match, MatchDraft, MatchFilter, MatchStatus};
use crate::domain::player::{NewPlayer, Player};
use crate::domain::pool::Pool;
use crate::domain::repositories::{
    Constraint, EventRepository, MatchRepository, PlayerRepository, PoolRepository,
    RepositoryError, RepositoryResult, Store, TeamRepository, UnitOfWork,
};
use crate::domain::team::{NewTeam, Team, TeamFilter};

#[derive(Debug, Clone, Default)]
struct Tables {
    players: BTreeMap<i64, Player>,
    teams: BTreeMap<i64, Team>,
    pools: BTreeMap<i64, Pool>,
    events: BTreeMap<i64, Event>,
    matches: BTreeMap<i64, Match>,
    last_id: i64,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn player_account(&self, player_id: i64) -> Option<Uuid> {
        self.players.get(&player_id).and_then(|p| p.user_id)
    }

    fn team_has_account(&self, team_id: i64, user_id: Uuid) -> bool {
        self.teams.get(&team_id).is_some_and(|team| {
            self.player_account(team.player1_id) == Some(user_id)
                || self.player_account(team.player2_id) == Some(user_id)
        })
    }

    fn team_company(&self, team_id: i64) -> Option<&str> {
        self.teams.get(&team_id).map(|t| t.company.as_str())
    }

    fn team_pool(&self, team_id: i64) -> Option<i64> {
        self.teams.get(&team_id).and_then(|t| t.pool_id)
    }

    fn match_passes(&self, m: &Match, filter: &MatchFilter) -> bool {
        let either = |test: &dyn Fn(i64) -> bool| test(m.team1_id) || test(m.team2_id);
        let date = self.events.get(&m.event_id).map(|e| e.event_date);

        filter.user_id.map_or(true, |user| either(&|t| self.team_has_account(t, user)))
            && filter.team_id.map_or(true, |team| m.involves_team(team))
            && filter
                .company
                .as_deref()
                .map_or(true, |company| either(&|t| self.team_company(t) == Some(company)))
            && filter.pool_id.map_or(true, |pool| either(&|t| self.team_pool(t) == Some(pool)))
            && filter.status.map_or(true, |status| m.status == status)
            && filter.start.map_or(true, |start| date.is_some_and(|d| d >= start))
            && filter.end.map_or(true, |end| date.is_some_and(|d| d <= end))
    }

    fn check_player(&self, player: &NewPlayer, own: Option<i64>) -> RepositoryResult<()> {
        for other in self.players.values().filter(|p| Some(p.id) != own) {
            if other.license_number == player.license_number {
                return Err(RepositoryError::UniqueViolation(Constraint::PlayerLicenseNumber));
            }
            if other.email == player.email {
                return Err(RepositoryError::UniqueViolation(Constraint::PlayerEmail));
            }
            if player.user_id.is_some() && other.user_id == player.user_id {
                return Err(RepositoryError::UniqueViolation(Constraint::PlayerUserId));
            }
        }
        Ok(())
    }

    fn check_team(&self, player1_id: i64, player2_id: i64, own: Option<i64>) -> RepositoryResult<()> {
        if !self.players.contains_key(&player1_id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::TeamPlayer1Ref));
        }
        if !self.players.contains_key(&player2_id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::TeamPlayer2Ref));
        }
        for other in self.teams.values().filter(|t| Some(t.id) != own) {
            if other.player1_id == player1_id {
                return Err(RepositoryError::UniqueViolation(Constraint::TeamPlayer1));
            }
            if other.player2_id == player2_id {
                return Err(RepositoryError::UniqueViolation(Constraint::TeamPlayer2));
            }
        }
        Ok(())
    }

    fn check_pool_name(&self, name: &str, own: Option<i64>) -> RepositoryResult<()> {
        if self
            .pools
            .values()
            .any(|p| p.name == name && Some(p.id) != own)
        {
            return Err(RepositoryError::UniqueViolation(Constraint::PoolName));
        }
        Ok(())
    }

    fn check_match(&self, m: &Match) -> RepositoryResult<()> {
        if !self.events.contains_key(&m.event_id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::Unknown(
                "matches_event_id_fkey".to_string(),
            )));
        }
        if !self.teams.contains_key(&m.team1_id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::MatchTeam1Ref));
        }
        if !self.teams.contains_key(&m.team2_id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::MatchTeam2Ref));
        }
        if self.matches.values().any(|other| {
            other.id != m.id && other.event_id == m.event_id && other.court_number == m.court_number
        }) {
            return Err(RepositoryError::UniqueViolation(Constraint::Unknown(
                "matches_event_id_court_number_key".to_string(),
            )));
        }
        Ok(())
    }
}

fn pick<T: Clone>(table: &BTreeMap<i64, T>, ids: &[i64]) -> Vec<T> {
    table
        .iter()
        .filter(|(id, _)| ids.contains(id))
        .map(|(_, row)| row.clone())
        .collect()
}

/// Process-local store, for development runs and tests
///
/// A unit of work locks the whole store until it is committed or dropped,
/// so transactions never interleave.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn UnitOfWork>> {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(InMemoryUnitOfWork { guard, work }))
    }
}

/// Works on a copy of the tables, published on commit
pub struct InMemoryUnitOfWork {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        let InMemoryUnitOfWork { mut guard, work } = *self;
        *guard = work;
        Ok(())
    }
}

#[async_trait]
impl PlayerRepository for InMemoryUnitOfWork {
    async fn find_player(&mut self, id: i64) -> RepositoryResult<Option<Player>> {
        Ok(self.work.players.get(&id).cloned())
    }

    async fn find_players(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Player>> {
        Ok(pick(&self.work.players, ids))
    }

    async fn find_player_by_user(&mut self, user_id: Uuid) -> RepositoryResult<Option<Player>> {
        Ok(self
            .work
            .players
            .values()
            .find(|p| p.user_id == Some(user_id))
            .cloned())
    }

    async fn find_player_by_license(
        &mut self,
        license_number: &str,
    ) -> RepositoryResult<Option<Player>> {
        Ok(self
            .work
            .players
            .values()
            .find(|p| p.license_number == license_number)
            .cloned())
    }

    async fn find_player_by_email(&mut self, email: &str) -> RepositoryResult<Option<Player>> {
        Ok(self
            .work
            .players
            .values()
            .find(|p| p.email == email)
            .cloned())
    }

    async fn list_players(&mut self) -> RepositoryResult<Vec<Player>> {
        let mut players: Vec<Player> = self.work.players.values().cloned().collect();
        players.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id).cmp(&(&b.last_name, &b.first_name, b.id))
        });
        Ok(players)
    }

    async fn insert_player(&mut self, player: &NewPlayer) -> RepositoryResult<Player> {
        self.work.check_player(player, None)?;
        let id = self.work.next_id();
        let player = player.clone().into_player(id);
        self.work.players.insert(id, player.clone());
        Ok(player)
    }

    async fn update_player(&mut self, id: i64, player: &NewPlayer) -> RepositoryResult<bool> {
        if !self.work.players.contains_key(&id) {
            return Ok(false);
        }
        self.work.check_player(player, Some(id))?;
        self.work.players.insert(id, player.clone().into_player(id));
        Ok(true)
    }

    async fn delete_player(&mut self, id: i64) -> RepositoryResult<bool> {
        if self.work.teams.values().any(|t| t.player1_id == id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::TeamPlayer1Ref));
        }
        if self.work.teams.values().any(|t| t.player2_id == id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::TeamPlayer2Ref));
        }
        Ok(self.work.players.remove(&id).is_some())
    }

    async fn count_players(&mut self) -> RepositoryResult<i64> {
        Ok(self.work.players.len() as i64)
    }
}

#[async_trait]
impl TeamRepository for InMemoryUnitOfWork {
    async fn find_team(&mut self, id: i64) -> RepositoryResult<Option<Team>> {
        Ok(self.work.teams.get(&id).cloned())
    }

    async fn find_teams(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Team>> {
        Ok(pick(&self.work.teams, ids))
    }

    async fn find_team_with_players(&mut self, player_ids: &[i64]) -> RepositoryResult<Vec<Team>> {
        Ok(self
            .work
            .teams
            .values()
            .filter(|t| player_ids.iter().any(|&p| t.has_player(p)))
            .cloned()
            .collect())
    }

    async fn list_teams(&mut self, filter: &TeamFilter) -> RepositoryResult<Vec<Team>> {
        let mut teams: Vec<Team> = self
            .work
            .teams
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        teams.sort_by(|a, b| (&a.company, a.id).cmp(&(&b.company, b.id)));
        Ok(teams)
    }

    async fn insert_team(&mut self, team: &NewTeam) -> RepositoryResult<Team> {
        self.work.check_team(team.player1_id, team.player2_id, None)?;
        let id = self.work.next_id();
        let team = Team {
            id,
            company: team.company.clone(),
            player1_id: team.player1_id,
            player2_id: team.player2_id,
            pool_id: None,
        };
        self.work.teams.insert(id, team.clone());
        Ok(team)
    }

    async fn update_team(&mut self, team: &Team) -> RepositoryResult<()> {
        self.work
            .check_team(team.player1_id, team.player2_id, Some(team.id))?;
        if let Some(row) = self.work.teams.get_mut(&team.id) {
            row.company = team.company.clone();
            row.player1_id = team.player1_id;
            row.player2_id = team.player2_id;
        }
        Ok(())
    }

    async fn delete_team(&mut self, id: i64) -> RepositoryResult<bool> {
        if self.work.matches.values().any(|m| m.team1_id == id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::MatchTeam1Ref));
        }
        if self.work.matches.values().any(|m| m.team2_id == id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::MatchTeam2Ref));
        }
        Ok(self.work.teams.remove(&id).is_some())
    }

    async fn assign_pool(&mut self, team_ids: &[i64], pool_id: i64) -> RepositoryResult<()> {
        if !self.work.pools.contains_key(&pool_id) {
            return Err(RepositoryError::ForeignKeyViolation(Constraint::Unknown(
                "teams_pool_id_fkey".to_string(),
            )));
        }
        for team in self
            .work
            .teams
            .values_mut()
            .filter(|t| team_ids.contains(&t.id))
        {
            team.pool_id = Some(pool_id);
        }
        Ok(())
    }

    async fn clear_pool(&mut self, pool_id: i64) -> RepositoryResult<()> {
        for team in self
            .work
            .teams
            .values_mut()
            .filter(|t| t.pool_id == Some(pool_id))
        {
            team.pool_id = None;
        }
        Ok(())
    }

    async fn count_teams(&mut self) -> RepositoryResult<i64> {
        Ok(self.work.teams.len() as i64)
    }
}

#[async_trait]
impl PoolRepository for InMemoryUnitOfWork {
    async fn find_pool(&mut self, id: i64) -> RepositoryResult<Option<Pool>> {
        Ok(self.work.pools.get(&id).cloned())
    }

    async fn list_pools(&mut self) -> RepositoryResult<Vec<Pool>> {
        let mut pools: Vec<Pool> = self.work.pools.values().cloned().collect();
        pools.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(pools)
    }

    async fn insert_pool(&mut self, name: &str) -> RepositoryResult<Pool> {
        self.work.check_pool_name(name, None)?;
        let pool = Pool {
            id: self.work.next_id(),
            name: name.to_string(),
        };
        self.work.pools.insert(pool.id, pool.clone());
        Ok(pool)
    }

    async fn rename_pool(&mut self, id: i64, name: &str) -> RepositoryResult<()> {
        self.work.check_pool_name(name, Some(id))?;
        if let Some(pool) = self.work.pools.get_mut(&id) {
            pool.name = name.to_string();
        }
        Ok(())
    }

    async fn delete_pool(&mut self, id: i64) -> RepositoryResult<bool> {
        if self.work.pools.remove(&id).is_none() {
            return Ok(false);
        }
        self.clear_pool(id).await?;
        Ok(true)
    }

    async fn count_pools(&mut self) -> RepositoryResult<i64> {
        Ok(self.work.pools.len() as i64)
    }
}

#[async_trait]
impl EventRepository for InMemoryUnitOfWork {
    async fn find_event(&mut self, id: i64) -> RepositoryResult<Option<Event>> {
        Ok(self.work.events.get(&id).copied())
    }

    async fn find_event_at(
        &mut self,
        date: NaiveDate,
        time: SlotTime,
        exclude: Option<i64>,
    ) -> RepositoryResult<Option<Event>> {
        Ok(self
            .work
            .events
            .values()
            .find(|e| e.is_at(date, time) && Some(e.id) != exclude)
            .copied())
    }

    async fn events_on(&mut self, date: NaiveDate) -> RepositoryResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .work
            .events
            .values()
            .filter(|e| e.event_date == date)
            .copied()
            .collect();
        events.sort_by_key(|e| (e.event_time, e.id));
        Ok(events)
    }

    async fn events_between(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        participant: Option<Uuid>,
    ) -> RepositoryResult<Vec<Event>> {
        let tables = &self.work;
        let mut events: Vec<Event> = tables
            .events
            .values()
            .filter(|e| (start..=end).contains(&e.event_date))
            .filter(|e| {
                participant.map_or(true, |user| {
                    tables.matches.values().any(|m| {
                        m.event_id == e.id
                            && (tables.team_has_account(m.team1_id, user)
                                || tables.team_has_account(m.team2_id, user))
                    })
                })
            })
            .copied()
            .collect();
        events.sort_by_key(|e| (e.event_date, e.event_time, e.id));
        Ok(events)
    }

    async fn find_events(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Event>> {
        Ok(pick(&self.work.events, ids))
    }

    async fn insert_event(&mut self, date: NaiveDate, time: SlotTime) -> RepositoryResult<Event> {
        let event = Event {
            id: self.work.next_id(),
            event_date: date,
            event_time: time,
        };
        self.work.events.insert(event.id, event);
        Ok(event)
    }

    async fn update_event(&mut self, event: &Event) -> RepositoryResult<()> {
        if let Some(row) = self.work.events.get_mut(&event.id) {
            *row = *event;
        }
        Ok(())
    }

    async fn delete_event(&mut self, id: i64) -> RepositoryResult<bool> {
        if self.work.events.remove(&id).is_none() {
            return Ok(false);
        }
        self.work.matches.retain(|_, m| m.event_id != id);
        Ok(true)
    }
}

#[async_trait]
impl MatchRepository for InMemoryUnitOfWork {
    async fn find_match(&mut self, id: i64) -> RepositoryResult<Option<Match>> {
        Ok(self.work.matches.get(&id).cloned())
    }

    async fn matches_in_events(&mut self, event_ids: &[i64]) -> RepositoryResult<Vec<Match>> {
        let mut matches: Vec<Match> = self
            .work
            .matches
            .values()
            .filter(|m| event_ids.contains(&m.event_id))
            .cloned()
            .collect();
        matches.sort_by_key(|m| (m.event_id, m.court_number, m.id));
        Ok(matches)
    }

    async fn insert_match(&mut self, event_id: i64, draft: &MatchDraft) -> RepositoryResult<Match> {
        let mut m = Match {
            id: 0,
            event_id,
            court_number: draft.court_number,
            team1_id: draft.team1_id,
            team2_id: draft.team2_id,
            status: MatchStatus::default(),
            score_team1: None,
            score_team2: None,
        };
        m.apply(event_id, draft);
        self.work.check_match(&m)?;
        m.id = self.work.next_id();
        self.work.matches.insert(m.id, m.clone());
        Ok(m)
    }

    async fn update_match(&mut self, m: &Match) -> RepositoryResult<()> {
        self.work.check_match(m)?;
        if let Some(row) = self.work.matches.get_mut(&m.id) {
            *row = m.clone();
        }
        Ok(())
    }

    async fn delete_match(&mut self, id: i64) -> RepositoryResult<bool> {
        Ok(self.work.matches.remove(&id).is_some())
    }

    async fn delete_matches_in_event(&mut self, event_id: i64) -> RepositoryResult<()> {
        self.work.matches.retain(|_, m| m.event_id != event_id);
        Ok(())
    }

    async fn teams_have_match(
        &mut self,
        team_ids: &[i64],
        status: Option<MatchStatus>,
    ) -> RepositoryResult<bool> {
        Ok(self.work.matches.values().any(|m| {
            team_ids.iter().any(|&t| m.involves_team(t)) && status.map_or(true, |s| m.status == s)
        }))
    }

    async fn list_matches(&mut self, filter: &MatchFilter) -> RepositoryResult<Vec<Match>> {
        let tables = &self.work;
        Ok(tables
            .matches
            .values()
            .filter(|m| tables.match_passes(m, filter))
            .cloned()
            .collect())
    }

    async fn count_matches(&mut self) -> RepositoryResult<i64> {
        Ok(self.work.matches.len() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_player(n: u32, company: &str) -> NewPlayer {
        NewPlayer {
            first_name: format!("First{}", n),
            last_name: format!("Last{}", n),
            email: format!("p{}@example.com", n),
            company: company.to_string(),
            license_number: format!("L{}", n),
            user_id: None,
            birth_date: None,
        }
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = InMemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        uow.insert_player(&new_player(1, "Acme")).await.unwrap();
        drop(uow);

        let mut uow = store.begin().await.unwrap();
        assert!(uow.list_players().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn committed_writes_are_visible_to_the_next_unit() {
        let store = InMemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        let player = uow.insert_player(&new_player(1, "Acme")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.find_player(player.id).await.unwrap(), Some(player));
    }

    #[tokio::test]
    async fn duplicate_license_is_a_unique_violation() {
        let store = InMemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        uow.insert_player(&new_player(1, "Acme")).await.unwrap();

        let mut twin = new_player(2, "Acme");
        twin.license_number = "L1".to_string();
        let err = uow.insert_player(&twin).await.unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::UniqueViolation(Constraint::PlayerLicenseNumber)
        ));
    }

    #[tokio::test]
    async fn deleting_an_event_cascades_to_its_matches() {
        let store = InMemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let p: Vec<Player> = {
            let mut out = Vec::new();
            for n in 1..=4 {
                out.push(uow.insert_player(&new_player(n, "Acme")).await.unwrap());
            }
            out
        };
        let t1 = uow
            .insert_team(&NewTeam {
                company: "Acme".to_string(),
                player1_id: p[0].id,
                player2_id: p[1].id,
            })
            .await
            .unwrap();
        let t2 = uow
            .insert_team(&NewTeam {
                company: "Acme".to_string(),
                player1_id: p[2].id,
                player2_id: p[3].id,
            })
            .await
            .unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let event = uow
            .insert_event(date, SlotTime::new(18, 0).unwrap())
            .await
            .unwrap();
        let m = uow
            .insert_match(event.id, &MatchDraft::new(1, t1.id, t2.id))
            .await
            .unwrap();

        assert!(matches!(
            uow.delete_team(t1.id).await,
            Err(RepositoryError::ForeignKeyViolation(Constraint::MatchTeam1Ref))
        ));
        assert!(uow.delete_event(event.id).await.unwrap());
        assert_eq!(uow.find_match(m.id).await.unwrap(), None);
        assert!(uow.delete_team(t1.id).await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_pool_unassigns_its_teams() {
        let store = InMemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let a = uow.insert_player(&new_player(1, "Acme")).await.unwrap();
        let b = uow.insert_player(&new_player(2, "Acme")).await.unwrap();
        let team = uow
            .insert_team(&NewTeam {
                company: "Acme".to_string(),
                player1_id: a.id,
                player2_id: b.id,
            })
            .await
            .unwrap();
        let pool = uow.insert_pool("Poule A").await.unwrap();
        uow.assign_pool(&[team.id], pool.id).await.unwrap();

        assert!(uow.delete_pool(pool.id).await.unwrap());
        assert_eq!(uow.find_team(team.id).await.unwrap().unwrap().pool_id, None);
    }

    #[tokio::test]
    async fn one_match_per_court_and_event() {
        let store = InMemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let mut teams = Vec::new();
        for n in [1, 3] {
            let a = uow.insert_player(&new_player(n, "Acme")).await.unwrap();
            let b = uow.insert_player(&new_player(n + 1, "Acme")).await.unwrap();
            let team = NewTeam {
                company: "Acme".to_string(),
                player1_id: a.id,
                player2_id: b.id,
            };
            teams.push(uow.insert_team(&team).await.unwrap());
        }
        let date = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let event = uow
            .insert_event(date, SlotTime::new(18, 0).unwrap())
            .await
            .unwrap();
        let mut first = uow
            .insert_match(event.id, &MatchDraft::new(1, teams[0].id, teams[1].id))
            .await
            .unwrap();

        let err = uow
            .insert_match(event.id, &MatchDraft::new(1, teams[1].id, teams[0].id))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RepositoryError::UniqueViolation(Constraint::Unknown(ref name))
                if name == "matches_event_id_court_number_key"
        ));

        first.score_team1 = Some("6-4".to_string());
        uow.update_match(&first).await.unwrap();
        let second = uow
            .insert_match(event.id, &MatchDraft::new(2, teams[1].id, teams[0].id))
            .await
            .unwrap();
        assert_eq!(uow.count_matches().await.unwrap(), 2);
        assert_eq!(uow.count_teams().await.unwrap(), 2);
        assert_eq!(uow.count_players().await.unwrap(), 4);
        assert_ne!(second.court_number, first.court_number);
    }
}

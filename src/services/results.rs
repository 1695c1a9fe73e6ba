use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use super::hydrate;
use crate::domain::errors::{TournamentError, TournamentResult};
use crate::domain::matches::{MatchFilter, MatchStatus, ScheduledMatch};
use crate::domain::player::Player;
use crate::domain::ranking::{compute_ranking, MatchResult, RankingRow};
use crate::domain::repositories::{MatchRepository, PlayerRepository, Store};
use crate::domain::score::parse_score_string;

/// Completed matches, newest first, with the standings they produce
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    pub matches: Vec<ScheduledMatch>,
    pub ranking: Vec<RankingRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Opponents {
    pub company: String,
    pub players: [String; 2],
}

/// One completed match seen from a player's side
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalMatchResult {
    pub date: NaiveDate,
    pub opponents: Opponents,
    pub result: Outcome,
    /// Sets won, `"mine - theirs"`
    pub score: String,
    /// Game detail of the winning side
    pub sets: Option<String>,
    pub court_number: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonalResults {
    pub player: Player,
    pub matches: Vec<PersonalMatchResult>,
}

#[derive(Clone)]
pub struct ResultService {
    store: Arc<dyn Store>,
}

impl ResultService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn ranking(&self) -> TournamentResult<RankingReport> {
        let mut uow = self.store.begin().await?;
        let matches = uow.list_matches(&completed(None)).await?;
        let mut matches = hydrate::scheduled_matches(uow.as_mut(), matches).await?;
        matches.sort_by(|a, b| {
            (b.event.event_date, b.event.event_time).cmp(&(a.event.event_date, a.event.event_time))
        });

        let results: Vec<MatchResult<'_>> = matches
            .iter()
            .map(|m| MatchResult {
                team1_company: &m.details.team1.company,
                team2_company: &m.details.team2.company,
                status: m.details.status,
                score_team1: m.details.score_team1.as_deref(),
            })
            .collect();
        let ranking = compute_ranking(&results);

        Ok(RankingReport { matches, ranking })
    }

    /// Completed matches of the player linked to an account, oldest first
    pub async fn my_results(&self, user_id: Uuid) -> TournamentResult<PersonalResults> {
        let mut uow = self.store.begin().await?;
        let player = uow
            .find_player_by_user(user_id)
            .await?
            .ok_or_else(|| TournamentError::not_found("Profil joueur introuvable"))?;

        let matches = uow.list_matches(&completed(Some(user_id))).await?;
        let mut matches = hydrate::scheduled_matches(uow.as_mut(), matches).await?;
        matches.sort_by_key(|m| (m.event.event_date, m.event.event_time));

        let matches = matches
            .iter()
            .map(|m| personal_result(m, user_id))
            .collect();
        Ok(PersonalResults { player, matches })
    }
}

fn completed(user_id: Option<Uuid>) -> MatchFilter {
    MatchFilter {
        user_id,
        status: Some(MatchStatus::Completed),
        ..MatchFilter::default()
    }
}

fn personal_result(m: &ScheduledMatch, user_id: Uuid) -> PersonalMatchResult {
    let details = &m.details;
    let on_team1 = details.team1.has_account(user_id);
    let opponents = if on_team1 { &details.team2 } else { &details.team1 };

    let (sets1, sets2) = parse_score_string(details.score_team1.as_deref());
    let (mine, theirs) = if on_team1 { (sets1, sets2) } else { (sets2, sets1) };
    let won = mine > theirs;

    PersonalMatchResult {
        date: m.event.event_date,
        opponents: Opponents {
            company: opponents.company.clone(),
            players: opponents.player_names(),
        },
        result: if won { Outcome::Victory } else { Outcome::Defeat },
        score: format!("{} - {}", mine, theirs),
        sets: if won {
            details.score_team1.clone()
        } else {
            details.score_team2.clone()
        },
        court_number: details.court_number,
    }
}

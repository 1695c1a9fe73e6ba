use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::MatchStatus;
use crate::domain::errors::TournamentError;
use crate::domain::event::Event;
use crate::domain::score::{validate_match_score, MatchScore};
use crate::domain::team::TeamDetails;

/// Highest court number of the venue
pub const MAX_COURT_NUMBER: i32 = 10;

/// One contest between two teams, on one court, within one event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    pub id: i64,
    pub event_id: i64,
    pub court_number: i32,
    pub team1_id: i64,
    pub team2_id: i64,
    pub status: MatchStatus,
    pub score_team1: Option<String>,
    pub score_team2: Option<String>,
}

impl Match {
    pub fn involves_team(&self, team_id: i64) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }

    /// Whether either team of the draft already plays in this match
    pub fn shares_team_with(&self, draft: &MatchDraft) -> bool {
        self.involves_team(draft.team1_id) || self.involves_team(draft.team2_id)
    }

    /// Overwrites the match with a draft, moving it to `event_id`
    pub fn apply(&mut self, event_id: i64, draft: &MatchDraft) {
        self.event_id = event_id;
        self.court_number = draft.court_number;
        self.team1_id = draft.team1_id;
        self.team2_id = draft.team2_id;
        self.status = draft.status;
        self.score_team1 = draft.score_team1.clone();
        self.score_team2 = draft.score_team2.clone();
    }
}

/// Match fields supplied when placing or editing a match
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDraft {
    pub court_number: i32,
    pub team1_id: i64,
    pub team2_id: i64,
    #[serde(default)]
    pub status: MatchStatus,
    #[serde(default)]
    pub score_team1: Option<String>,
    #[serde(default)]
    pub score_team2: Option<String>,
}

impl MatchDraft {
    /// An ongoing match without score
    pub fn new(court_number: i32, team1_id: i64, team2_id: i64) -> Self {
        Self {
            court_number,
            team1_id,
            team2_id,
            status: MatchStatus::Ongoing,
            score_team1: None,
            score_team2: None,
        }
    }

    /// Marks the draft completed with the given score strings
    pub fn completed(mut self, score_team1: &str, score_team2: &str) -> Self {
        self.status = MatchStatus::Completed;
        self.score_team1 = Some(score_team1.to_string());
        self.score_team2 = Some(score_team2.to_string());
        self
    }

    /// Checks the rules a match must satisfy on its own
    ///
    /// # Business Rules
    /// - Court number between 1 and [`MAX_COURT_NUMBER`]
    /// - Two different teams
    /// - A completed match has both scores, and team 1's score is a legal
    ///   best-of-3 result
    pub fn validate(&self) -> Result<(), TournamentError> {
        if !(1..=MAX_COURT_NUMBER).contains(&self.court_number) {
            return Err(TournamentError::bad_request(format!(
                "Le numéro de piste doit être compris entre 1 et {}",
                MAX_COURT_NUMBER
            )));
        }

        if self.team1_id == self.team2_id {
            return Err(TournamentError::bad_request(
                "Les deux équipes doivent être différentes",
            ));
        }

        if self.status.is_completed() {
            let (Some(score1), Some(_)) = (non_blank(&self.score_team1), non_blank(&self.score_team2))
            else {
                return Err(TournamentError::bad_request(
                    "Le score est requis pour un match terminé",
                ));
            };
            validate_match_score(&MatchScore::from_score_string(score1))?;
        }

        Ok(())
    }
}

fn non_blank(score: &Option<String>) -> Option<&str> {
    score.as_deref().filter(|s| !s.trim().is_empty())
}

/// Match with both teams and their players loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDetails {
    pub id: i64,
    pub event_id: i64,
    pub court_number: i32,
    pub team1: TeamDetails,
    pub team2: TeamDetails,
    pub status: MatchStatus,
    pub score_team1: Option<String>,
    pub score_team2: Option<String>,
}

impl MatchDetails {
    pub fn new(m: Match, team1: TeamDetails, team2: TeamDetails) -> Self {
        Self {
            id: m.id,
            event_id: m.event_id,
            court_number: m.court_number,
            team1,
            team2,
            status: m.status,
            score_team1: m.score_team1,
            score_team2: m.score_team2,
        }
    }

    pub fn involves_account(&self, user_id: Uuid) -> bool {
        self.team1.has_account(user_id) || self.team2.has_account(user_id)
    }
}

/// A match together with the event it is scheduled in
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduledMatch {
    pub event: Event,
    #[serde(flatten)]
    pub details: MatchDetails,
}

/// Optional criteria for listing matches
///
/// All given criteria must hold. `user_id` keeps matches where the
/// account's player is on either team; `start`/`end` bound the event date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchFilter {
    pub user_id: Option<Uuid>,
    pub team_id: Option<i64>,
    pub company: Option<String>,
    pub pool_id: Option<i64>,
    pub status: Option<MatchStatus>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

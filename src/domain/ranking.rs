use std::collections::HashMap;

use serde::Serialize;

use super::matches::MatchStatus;
use super::score::parse_score_string;

/// Points awarded for a win
pub const POINTS_PER_WIN: u32 = 3;

/// The part of a match the ranking needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult<'a> {
    pub team1_company: &'a str,
    pub team2_company: &'a str,
    pub status: MatchStatus,
    /// Score from team 1's point of view, e.g. `"6-4, 6-3"`
    pub score_team1: Option<&'a str>,
}

/// Standing of one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    pub company: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
}

impl RankingRow {
    fn new(company: &str) -> Self {
        Self {
            company: company.to_string(),
            played: 0,
            wins: 0,
            losses: 0,
            points: 0,
            sets_won: 0,
            sets_lost: 0,
        }
    }

    pub fn set_differential(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    fn record(&mut self, sets_for: u32, sets_against: u32) {
        self.played += 1;
        self.sets_won += sets_for;
        self.sets_lost += sets_against;
        if sets_for > sets_against {
            self.wins += 1;
            self.points += POINTS_PER_WIN;
        } else if sets_against > sets_for {
            self.losses += 1;
        }
    }
}

/// Computes company standings from match results
///
/// Only completed matches count. The result is recomputed from scratch on
/// every call.
///
/// # Ordering
/// Points, then wins, then set differential, all descending; company name
/// ascending breaks the remaining ties.
///
/// # Example
/// ```
/// use padel_tournament_api::domain::matches::MatchStatus;
/// use padel_tournament_api::domain::ranking::{compute_ranking, MatchResult};
///
/// let rows = compute_ranking(&[MatchResult {
///     team1_company: "Acme",
///     team2_company: "Globex",
///     status: MatchStatus::Completed,
///     score_team1: Some("6-4, 6-2"),
/// }]);
///
/// assert_eq!(rows[0].company, "Acme");
/// assert_eq!(rows[0].points, 3);
/// ```
pub fn compute_ranking(results: &[MatchResult<'_>]) -> Vec<RankingRow> {
    let mut standings: HashMap<&str, RankingRow> = HashMap::new();

    for result in results.iter().filter(|r| r.status.is_completed()) {
        let (sets1, sets2) = parse_score_string(result.score_team1);

        standings
            .entry(result.team1_company)
            .or_insert_with(|| RankingRow::new(result.team1_company))
            .record(sets1, sets2);
        standings
            .entry(result.team2_company)
            .or_insert_with(|| RankingRow::new(result.team2_company))
            .record(sets2, sets1);
    }

    let mut rows: Vec<RankingRow> = standings.into_values().collect();
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then_with(|| b.wins.cmp(&a.wins))
            .then_with(|| b.set_differential().cmp(&a.set_differential()))
            .then_with(|| a.company.cmp(&b.company))
    });
    rows
}

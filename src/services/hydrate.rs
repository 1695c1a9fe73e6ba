// Loads nested relations (Event -> Match -> Team -> Player) inside a unit of work

use std::collections::HashMap;

use crate::domain::errors::{TournamentError, TournamentResult};
use crate::domain::event::{Event, EventDetails};
use crate::domain::matches::{Match, MatchDetails, ScheduledMatch};
use crate::domain::player::Player;
use crate::domain::repositories::{
    EventRepository, MatchRepository, PlayerRepository, RepositoryError, TeamRepository,
    UnitOfWork,
};
use crate::domain::team::{Team, TeamDetails};

fn dangling(what: &str, id: i64) -> TournamentError {
    TournamentError::Storage(RepositoryError::Database(format!(
        "dangling reference to {} {}",
        what, id
    )))
}

fn distinct(mut ids: Vec<i64>) -> Vec<i64> {
    ids.sort_unstable();
    ids.dedup();
    ids
}

pub(crate) async fn team_details(
    uow: &mut dyn UnitOfWork,
    teams: Vec<Team>,
) -> TournamentResult<Vec<TeamDetails>> {
    let player_ids = distinct(
        teams
            .iter()
            .flat_map(|t| [t.player1_id, t.player2_id])
            .collect(),
    );
    let players: HashMap<i64, Player> = uow
        .find_players(&player_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    teams
        .into_iter()
        .map(|team| {
            let player1 = players
                .get(&team.player1_id)
                .cloned()
                .ok_or_else(|| dangling("player", team.player1_id))?;
            let player2 = players
                .get(&team.player2_id)
                .cloned()
                .ok_or_else(|| dangling("player", team.player2_id))?;
            Ok(TeamDetails::new(team, player1, player2))
        })
        .collect()
}

pub(crate) async fn match_details(
    uow: &mut dyn UnitOfWork,
    matches: Vec<Match>,
) -> TournamentResult<Vec<MatchDetails>> {
    let team_ids = distinct(
        matches
            .iter()
            .flat_map(|m| [m.team1_id, m.team2_id])
            .collect(),
    );
    let teams = uow.find_teams(&team_ids).await?;
    let teams: HashMap<i64, TeamDetails> = team_details(uow, teams)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    matches
        .into_iter()
        .map(|m| {
            let team1 = teams
                .get(&m.team1_id)
                .cloned()
                .ok_or_else(|| dangling("team", m.team1_id))?;
            let team2 = teams
                .get(&m.team2_id)
                .cloned()
                .ok_or_else(|| dangling("team", m.team2_id))?;
            Ok(MatchDetails::new(m, team1, team2))
        })
        .collect()
}

pub(crate) async fn event_details(
    uow: &mut dyn UnitOfWork,
    events: Vec<Event>,
) -> TournamentResult<Vec<EventDetails>> {
    let event_ids: Vec<i64> = events.iter().map(|e| e.id).collect();
    let matches = uow.matches_in_events(&event_ids).await?;

    let mut by_event: HashMap<i64, Vec<MatchDetails>> = HashMap::new();
    for details in match_details(uow, matches).await? {
        by_event.entry(details.event_id).or_default().push(details);
    }

    Ok(events
        .into_iter()
        .map(|event| {
            let matches = by_event.remove(&event.id).unwrap_or_default();
            EventDetails::new(event, matches)
        })
        .collect())
}

pub(crate) async fn one_event(
    uow: &mut dyn UnitOfWork,
    event: Event,
) -> TournamentResult<EventDetails> {
    let id = event.id;
    event_details(uow, vec![event])
        .await?
        .pop()
        .ok_or_else(|| dangling("event", id))
}

pub(crate) async fn scheduled_matches(
    uow: &mut dyn UnitOfWork,
    matches: Vec<Match>,
) -> TournamentResult<Vec<ScheduledMatch>> {
    let event_ids = distinct(matches.iter().map(|m| m.event_id).collect());
    let events: HashMap<i64, Event> = uow
        .find_events(&event_ids)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    match_details(uow, matches)
        .await?
        .into_iter()
        .map(|details| {
            let event = *events
                .get(&details.event_id)
                .ok_or_else(|| dangling("event", details.event_id))?;
            Ok(ScheduledMatch { event, details })
        })
        .collect()
}

pub(crate) async fn one_match(
    uow: &mut dyn UnitOfWork,
    m: Match,
) -> TournamentResult<ScheduledMatch> {
    let id = m.id;
    scheduled_matches(uow, vec![m])
        .await?
        .pop()
        .ok_or_else(|| dangling("match", id))
}

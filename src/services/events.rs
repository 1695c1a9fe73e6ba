use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use uuid::Uuid;

use super::hydrate;
use crate::domain::access::{Access, Capability};
use crate::domain::errors::{TournamentError, TournamentResult};
use crate::domain::event::schedule::check_schedule;
use crate::domain::event::slot::check_event_matches;
use crate::domain::event::{Event, EventDetails, EventInput, SlotTime};
use crate::domain::matches::{Match, MatchDraft};
use crate::domain::repositories::{
    EventRepository, MatchRepository, Store, TeamRepository, UnitOfWork,
};

/// Creation, edition and lookup of events (time slots)
#[derive(Clone)]
pub struct EventService {
    store: Arc<dyn Store>,
}

impl EventService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> TournamentResult<EventDetails> {
        let mut uow = self.store.begin().await?;
        let event = load_event(uow.as_mut(), id).await?;
        hydrate::one_event(uow.as_mut(), event).await
    }

    /// Events dated within `[start, end]` with their matches
    ///
    /// With `participant`, only the events where that account plays.
    pub async fn get_by_date_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        participant: Option<Uuid>,
    ) -> TournamentResult<Vec<EventDetails>> {
        if start > end {
            return Err(TournamentError::bad_request(
                "La date de début doit précéder la date de fin",
            ));
        }

        let mut uow = self.store.begin().await?;
        let events = uow.events_between(start, end, participant).await?;
        hydrate::event_details(uow.as_mut(), events).await
    }

    /// Whether another event already sits exactly on this slot
    pub async fn check_duplicate(
        &self,
        date: NaiveDate,
        time: SlotTime,
        exclude: Option<i64>,
    ) -> TournamentResult<bool> {
        let mut uow = self.store.begin().await?;
        Ok(uow.find_event_at(date, time, exclude).await?.is_some())
    }

    /// Create an event and its matches atomically
    ///
    /// # Business Rules
    /// - 1 to 3 matches, on distinct courts, no team twice
    /// - No other event of the day within 60 minutes
    pub async fn create(
        &self,
        access: &Access,
        input: EventInput,
    ) -> TournamentResult<EventDetails> {
        access.require(Capability::ManageEvents)?;
        check_event_matches(&input.matches)?;

        let mut uow = self.store.begin().await?;
        let (event, _) =
            create_event_in(uow.as_mut(), input.event_date, input.event_time, &input.matches)
                .await?;
        let details = hydrate::one_event(uow.as_mut(), event).await?;
        uow.commit().await?;

        info!(
            event_id = event.id,
            date = %event.event_date,
            time = %event.event_time,
            matches = details.matches.len(),
            "Event created"
        );
        Ok(details)
    }

    /// Move an event and replace its whole match list
    pub async fn update(
        &self,
        access: &Access,
        id: i64,
        input: EventInput,
    ) -> TournamentResult<EventDetails> {
        access.require(Capability::ManageEvents)?;
        check_event_matches(&input.matches)?;

        let mut uow = self.store.begin().await?;
        let mut event = load_event(uow.as_mut(), id).await?;
        ensure_teams_exist(uow.as_mut(), &input.matches).await?;
        ensure_no_schedule_conflict(uow.as_mut(), input.event_date, input.event_time, Some(id))
            .await?;

        event.event_date = input.event_date;
        event.event_time = input.event_time;
        uow.update_event(&event).await?;

        uow.delete_matches_in_event(id).await?;
        for draft in &input.matches {
            uow.insert_match(id, draft).await?;
        }

        let details = hydrate::one_event(uow.as_mut(), event).await?;
        uow.commit().await?;

        info!(event_id = id, date = %event.event_date, time = %event.event_time, "Event updated");
        Ok(details)
    }

    /// Delete an event together with its matches
    pub async fn delete(&self, access: &Access, id: i64) -> TournamentResult<()> {
        access.require(Capability::ManageEvents)?;

        let mut uow = self.store.begin().await?;
        if !uow.delete_event(id).await? {
            return Err(event_not_found());
        }
        uow.commit().await?;

        info!(event_id = id, "Event deleted");
        Ok(())
    }
}

fn event_not_found() -> TournamentError {
    TournamentError::not_found("Événement introuvable")
}

async fn load_event(uow: &mut dyn UnitOfWork, id: i64) -> TournamentResult<Event> {
    uow.find_event(id).await?.ok_or_else(event_not_found)
}

/// Rejects a start time within 60 minutes of another event that day
pub(crate) async fn ensure_no_schedule_conflict(
    uow: &mut dyn UnitOfWork,
    date: NaiveDate,
    time: SlotTime,
    exclude: Option<i64>,
) -> TournamentResult<()> {
    let same_day = uow.events_on(date).await?;
    check_schedule(&same_day, time, exclude).map_err(|err| {
        debug!(%date, %time, "Start time too close to another event");
        err
    })
}

pub(crate) async fn ensure_teams_exist(
    uow: &mut dyn UnitOfWork,
    drafts: &[MatchDraft],
) -> TournamentResult<()> {
    let wanted: HashSet<i64> = drafts
        .iter()
        .flat_map(|d| [d.team1_id, d.team2_id])
        .collect();
    let ids: Vec<i64> = wanted.iter().copied().collect();

    let found = uow.find_teams(&ids).await?;
    if found.len() != wanted.len() {
        return Err(TournamentError::not_found("Équipe introuvable"));
    }
    Ok(())
}

/// Inserts a new event with its matches after the schedule check
pub(crate) async fn create_event_in(
    uow: &mut dyn UnitOfWork,
    date: NaiveDate,
    time: SlotTime,
    drafts: &[MatchDraft],
) -> TournamentResult<(Event, Vec<Match>)> {
    ensure_teams_exist(uow, drafts).await?;
    ensure_no_schedule_conflict(uow, date, time, None).await?;

    let event = uow.insert_event(date, time).await?;
    let mut matches = Vec::with_capacity(drafts.len());
    for draft in drafts {
        matches.push(uow.insert_match(event.id, draft).await?);
    }
    Ok((event, matches))
}

/// Deletes an event left without matches
pub(crate) async fn remove_event_if_empty(
    uow: &mut dyn UnitOfWork,
    event_id: i64,
) -> TournamentResult<bool> {
    if !uow.matches_in_events(&[event_id]).await?.is_empty() {
        return Ok(false);
    }
    uow.delete_event(event_id).await?;
    debug!(event_id, "Removed empty event");
    Ok(true)
}

use std::slice;
use std::sync::Arc;

use chrono::{Days, NaiveDate, Utc};
use serde::Deserialize;
use tracing::info;

use super::events::{
    create_event_in, ensure_no_schedule_conflict, ensure_teams_exist, remove_event_if_empty,
};
use super::hydrate;
use crate::domain::access::{Access, Capability};
use crate::domain::errors::{TournamentError, TournamentResult};
use crate::domain::event::slot::{check_slot_admission, check_slot_exclusivity};
use crate::domain::event::SlotTime;
use crate::domain::matches::{Match, MatchDraft, MatchFilter, MatchStatus, ScheduledMatch};
use crate::domain::repositories::{
    EventRepository, MatchRepository, RepositoryError, Store, UnitOfWork,
};

/// Days covered by the upcoming view, starting today
pub const UPCOMING_WINDOW_DAYS: u64 = 30;

/// A match together with the slot it should sit in
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MatchPlacement {
    pub date: NaiveDate,
    pub time: SlotTime,
    #[serde(flatten)]
    pub draft: MatchDraft,
}

/// Listing criteria; `upcoming` overrides the date bounds with the next
/// [`UPCOMING_WINDOW_DAYS`] days
#[derive(Debug, Clone, Default)]
pub struct MatchQuery {
    pub filter: MatchFilter,
    pub upcoming: bool,
}

/// Placement of single matches into slots, and score entry
#[derive(Clone)]
pub struct MatchService {
    store: Arc<dyn Store>,
}

impl MatchService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: i64) -> TournamentResult<ScheduledMatch> {
        let mut uow = self.store.begin().await?;
        let m = load_match(uow.as_mut(), id).await?;
        hydrate::one_match(uow.as_mut(), m).await
    }

    /// Matches meeting the query, by event date then time
    pub async fn list(&self, query: MatchQuery) -> TournamentResult<Vec<ScheduledMatch>> {
        let mut filter = query.filter;
        if query.upcoming {
            let today = Utc::now().date_naive();
            filter.start = Some(today);
            filter.end = today.checked_add_days(Days::new(UPCOMING_WINDOW_DAYS));
        }

        let mut uow = self.store.begin().await?;
        let matches = uow.list_matches(&filter).await?;
        let mut scheduled = hydrate::scheduled_matches(uow.as_mut(), matches).await?;
        scheduled.sort_by(|a, b| {
            (a.event.event_date, a.event.event_time, a.details.court_number).cmp(&(
                b.event.event_date,
                b.event.event_time,
                b.details.court_number,
            ))
        });
        Ok(scheduled)
    }

    /// Place one match on a slot
    ///
    /// Joins the event already on that exact slot when there is one,
    /// otherwise opens a new event, which must respect the 60-minute gap.
    ///
    /// # Business Rules
    /// - At most 3 matches per slot
    /// - A court and a team appear at most once per slot
    pub async fn create(
        &self,
        access: &Access,
        placement: MatchPlacement,
    ) -> TournamentResult<ScheduledMatch> {
        access.require(Capability::ManageMatches)?;
        placement.draft.validate()?;
        let MatchPlacement { date, time, draft } = placement;

        let mut uow = self.store.begin().await?;
        let created = match uow.find_event_at(date, time, None).await? {
            Some(slot) => {
                ensure_teams_exist(uow.as_mut(), slice::from_ref(&draft)).await?;
                let slot_matches = uow.matches_in_events(&[slot.id]).await?;
                check_slot_admission(&slot_matches, &draft)?;
                uow.insert_match(slot.id, &draft).await?
            }
            None => {
                let (_, mut matches) =
                    create_event_in(uow.as_mut(), date, time, slice::from_ref(&draft)).await?;
                matches.pop().ok_or_else(|| {
                    TournamentError::Storage(RepositoryError::Database(
                        "new event stored without its match".to_string(),
                    ))
                })?
            }
        };

        let scheduled = hydrate::one_match(uow.as_mut(), created).await?;
        uow.commit().await?;

        info!(
            match_id = scheduled.details.id,
            event_id = scheduled.event.id,
            court = scheduled.details.court_number,
            "Match placed"
        );
        Ok(scheduled)
    }

    /// Edit a match, possibly moving it to another slot
    ///
    /// Staying on its own slot only re-checks court and teams against the
    /// other matches there. Moving applies the same rules as placement,
    /// and the event left behind is deleted once it holds no match.
    pub async fn reschedule(
        &self,
        access: &Access,
        id: i64,
        placement: MatchPlacement,
    ) -> TournamentResult<ScheduledMatch> {
        access.require(Capability::ManageMatches)?;
        placement.draft.validate()?;
        let MatchPlacement { date, time, draft } = placement;

        let mut uow = self.store.begin().await?;
        let mut current = load_match(uow.as_mut(), id).await?;
        ensure_teams_exist(uow.as_mut(), slice::from_ref(&draft)).await?;
        let source_event = current.event_id;

        match uow.find_event_at(date, time, None).await? {
            Some(slot) if slot.id == source_event => {
                let others: Vec<Match> = uow
                    .matches_in_events(&[slot.id])
                    .await?
                    .into_iter()
                    .filter(|m| m.id != id)
                    .collect();
                check_slot_exclusivity(&others, &draft)?;
                current.apply(slot.id, &draft);
                uow.update_match(&current).await?;
            }
            Some(slot) => {
                let slot_matches = uow.matches_in_events(&[slot.id]).await?;
                check_slot_admission(&slot_matches, &draft)?;
                current.apply(slot.id, &draft);
                uow.update_match(&current).await?;
                remove_event_if_empty(uow.as_mut(), source_event).await?;
            }
            None => {
                ensure_no_schedule_conflict(uow.as_mut(), date, time, None).await?;
                let event = uow.insert_event(date, time).await?;
                current.apply(event.id, &draft);
                uow.update_match(&current).await?;
                remove_event_if_empty(uow.as_mut(), source_event).await?;
            }
        }

        let scheduled = hydrate::one_match(uow.as_mut(), current).await?;
        uow.commit().await?;

        info!(
            match_id = id,
            from_event = source_event,
            to_event = scheduled.event.id,
            "Match rescheduled"
        );
        Ok(scheduled)
    }

    /// Delete a match, and its event once the event holds no match
    pub async fn delete(&self, access: &Access, id: i64) -> TournamentResult<()> {
        access.require(Capability::ManageMatches)?;

        let mut uow = self.store.begin().await?;
        let m = load_match(uow.as_mut(), id).await?;
        uow.delete_match(id).await?;
        let event_removed = remove_event_if_empty(uow.as_mut(), m.event_id).await?;
        uow.commit().await?;

        info!(match_id = id, event_id = m.event_id, event_removed, "Match deleted");
        Ok(())
    }

    /// Mark a match completed with its final score
    ///
    /// `score_team1` must be a legal best-of-3 result such as `"6-4, 3-6, 7-5"`.
    pub async fn record_score(
        &self,
        access: &Access,
        id: i64,
        score_team1: String,
        score_team2: String,
    ) -> TournamentResult<ScheduledMatch> {
        access.require(Capability::ManageMatches)?;

        let mut uow = self.store.begin().await?;
        let mut current = load_match(uow.as_mut(), id).await?;
        let draft = MatchDraft {
            court_number: current.court_number,
            team1_id: current.team1_id,
            team2_id: current.team2_id,
            status: MatchStatus::Completed,
            score_team1: Some(score_team1),
            score_team2: Some(score_team2),
        };
        draft.validate()?;

        current.apply(current.event_id, &draft);
        uow.update_match(&current).await?;
        let scheduled = hydrate::one_match(uow.as_mut(), current).await?;
        uow.commit().await?;

        info!(match_id = id, "Score recorded");
        Ok(scheduled)
    }
}

async fn load_match(uow: &mut dyn UnitOfWork, id: i64) -> TournamentResult<Match> {
    uow.find_match(id)
        .await?
        .ok_or_else(|| TournamentError::not_found("Match introuvable"))
}

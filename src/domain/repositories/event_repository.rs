use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::errors::RepositoryResult;
use crate::domain::event::{Event, SlotTime};

/// Persistence of events (time slots)
#[async_trait]
pub trait EventRepository: Send {
    async fn find_event(&mut self, id: i64) -> RepositoryResult<Option<Event>>;

    /// Find the event sitting exactly on a slot, other than `exclude`
    async fn find_event_at(
        &mut self,
        date: NaiveDate,
        time: SlotTime,
        exclude: Option<i64>,
    ) -> RepositoryResult<Option<Event>>;

    /// All events of one calendar day
    async fn events_on(&mut self, date: NaiveDate) -> RepositoryResult<Vec<Event>>;

    /// Events dated within `[start, end]`, by date then time
    ///
    /// With `participant`, only events where that account's player plays in
    /// at least one match.
    async fn events_between(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        participant: Option<Uuid>,
    ) -> RepositoryResult<Vec<Event>>;

    /// Find all events among the given IDs
    async fn find_events(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Event>>;

    async fn insert_event(&mut self, date: NaiveDate, time: SlotTime) -> RepositoryResult<Event>;

    async fn update_event(&mut self, event: &Event) -> RepositoryResult<()>;

    /// Delete an event and its matches; returns false when it does not exist
    async fn delete_event(&mut self, id: i64) -> RepositoryResult<bool>;
}

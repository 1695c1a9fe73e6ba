use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::value_objects::SlotTime;
use crate::domain::matches::{MatchDetails, MatchDraft};

/// A scheduled time slot
///
/// # Invariants
/// - Holds between one and three matches; an empty event is deleted
/// - No other event of the same day starts less than 60 minutes away
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub event_date: NaiveDate,
    pub event_time: SlotTime,
}

impl Event {
    /// Whether this event sits exactly on the given slot
    pub fn is_at(&self, date: NaiveDate, time: SlotTime) -> bool {
        self.event_date == date && self.event_time == time
    }
}

/// Event with its matches, teams and players loaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub id: i64,
    pub event_date: NaiveDate,
    pub event_time: SlotTime,
    pub matches: Vec<MatchDetails>,
}

impl EventDetails {
    pub fn new(event: Event, matches: Vec<MatchDetails>) -> Self {
        Self {
            id: event.id,
            event_date: event.event_date,
            event_time: event.event_time,
            matches,
        }
    }

    /// Whether the account's player takes part in any match of the event
    pub fn involves_account(&self, user_id: Uuid) -> bool {
        self.matches.iter().any(|m| m.involves_account(user_id))
    }
}

/// Event data supplied on creation or update
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub event_date: NaiveDate,
    pub event_time: SlotTime,
    pub matches: Vec<MatchDraft>,
}

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Timelike};
use uuid::Uuid;

use super::postgres_store::{map_sqlx_error, PgUnitOfWork};
use crate::domain::event::{Event, SlotTime};
use crate::domain::repositories::{EventRepository, RepositoryError, RepositoryResult};

#[derive(sqlx::FromRow)]
struct EventRow {
    id: i64,
    event_date: NaiveDate,
    event_time: NaiveTime,
}

impl TryFrom<EventRow> for Event {
    type Error = RepositoryError;

    fn try_from(r: EventRow) -> Result<Self, Self::Error> {
        // Stored with seconds; slots only keep the minute
        let event_time = SlotTime::new(r.event_time.hour() as u16, r.event_time.minute() as u16)
            .map_err(RepositoryError::Database)?;
        Ok(Event {
            id: r.id,
            event_date: r.event_date,
            event_time,
        })
    }
}

fn to_time(time: SlotTime) -> RepositoryResult<NaiveTime> {
    NaiveTime::from_hms_opt(u32::from(time.hour()), u32::from(time.minute()), 0)
        .ok_or_else(|| RepositoryError::Database(format!("unrepresentable time {}", time)))
}

fn to_events(rows: Vec<EventRow>) -> RepositoryResult<Vec<Event>> {
    rows.into_iter().map(Event::try_from).collect()
}

#[async_trait]
impl EventRepository for PgUnitOfWork {
    async fn find_event(&mut self, id: i64) -> RepositoryResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_date, event_time FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.map(Event::try_from).transpose()
    }

    async fn find_event_at(
        &mut self,
        date: NaiveDate,
        time: SlotTime,
        exclude: Option<i64>,
    ) -> RepositoryResult<Option<Event>> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, event_date, event_time
            FROM events
            WHERE event_date = $1
              AND event_time = $2
              AND ($3::BIGINT IS NULL OR id <> $3)
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(date)
        .bind(to_time(time)?)
        .bind(exclude)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.map(Event::try_from).transpose()
    }

    async fn events_on(&mut self, date: NaiveDate) -> RepositoryResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT id, event_date, event_time
            FROM events
            WHERE event_date = $1
            ORDER BY event_time, id
            "#,
        )
        .bind(date)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        to_events(rows)
    }

    async fn events_between(
        &mut self,
        start: NaiveDate,
        end: NaiveDate,
        participant: Option<Uuid>,
    ) -> RepositoryResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT e.id, e.event_date, e.event_time
            FROM events e
            WHERE e.event_date BETWEEN $1 AND $2
              AND (
                $3::UUID IS NULL
                OR EXISTS (
                    SELECT 1
                    FROM matches m
                    JOIN teams t ON t.id IN (m.team1_id, m.team2_id)
                    JOIN players p ON p.id IN (t.player1_id, t.player2_id)
                    WHERE m.event_id = e.id AND p.user_id = $3
                )
              )
            ORDER BY e.event_date, e.event_time, e.id
            "#,
        )
        .bind(start)
        .bind(end)
        .bind(participant)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        to_events(rows)
    }

    async fn find_events(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            "SELECT id, event_date, event_time FROM events WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        to_events(rows)
    }

    async fn insert_event(&mut self, date: NaiveDate, time: SlotTime) -> RepositoryResult<Event> {
        let row = sqlx::query_as::<_, EventRow>(
            r#"
            INSERT INTO events (event_date, event_time)
            VALUES ($1, $2)
            RETURNING id, event_date, event_time
            "#,
        )
        .bind(date)
        .bind(to_time(time)?)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        row.try_into()
    }

    async fn update_event(&mut self, event: &Event) -> RepositoryResult<()> {
        sqlx::query("UPDATE events SET event_date = $2, event_time = $3 WHERE id = $1")
            .bind(event.id)
            .bind(event.event_date)
            .bind(to_time(event.event_time)?)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_event(&mut self, id: i64) -> RepositoryResult<bool> {
        // matches.event_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }
}

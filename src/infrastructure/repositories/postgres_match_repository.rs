use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::postgres_store::{map_sqlx_error, PgUnitOfWork};
use crate::domain::matches::{Match, MatchDraft, MatchFilter, MatchStatus};
use crate::domain::repositories::{MatchRepository, RepositoryResult};

#[derive(sqlx::FromRow)]
struct MatchRow {
    id: i64,
    event_id: i64,
    court_number: i32,
    team1_id: i64,
    team2_id: i64,
    status: MatchStatus,
    score_team1: Option<String>,
    score_team2: Option<String>,
}

impl From<MatchRow> for Match {
    fn from(r: MatchRow) -> Self {
        Match {
            id: r.id,
            event_id: r.event_id,
            court_number: r.court_number,
            team1_id: r.team1_id,
            team2_id: r.team2_id,
            status: r.status,
            score_team1: r.score_team1,
            score_team2: r.score_team2,
        }
    }
}

#[async_trait]
impl MatchRepository for PgUnitOfWork {
    async fn find_match(&mut self, id: i64) -> RepositoryResult<Option<Match>> {
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, event_id, court_number, team1_id, team2_id, status,
                   score_team1, score_team2
            FROM matches
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Match::from))
    }

    async fn matches_in_events(&mut self, event_ids: &[i64]) -> RepositoryResult<Vec<Match>> {
        let rows = sqlx::query_as::<_, MatchRow>(
            r#"
            SELECT id, event_id, court_number, team1_id, team2_id, status,
                   score_team1, score_team2
            FROM matches
            WHERE event_id = ANY($1)
            ORDER BY event_id, court_number, id
            "#,
        )
        .bind(event_ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Match::from).collect())
    }

    async fn insert_match(&mut self, event_id: i64, draft: &MatchDraft) -> RepositoryResult<Match> {
        let row = sqlx::query_as::<_, MatchRow>(
            r#"
            INSERT INTO matches (
                event_id, court_number, team1_id, team2_id, status, score_team1, score_team2
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, event_id, court_number, team1_id, team2_id, status,
                      score_team1, score_team2
            "#,
        )
        .bind(event_id)
        .bind(draft.court_number)
        .bind(draft.team1_id)
        .bind(draft.team2_id)
        .bind(draft.status)
        .bind(&draft.score_team1)
        .bind(&draft.score_team2)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_match(&mut self, m: &Match) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            UPDATE matches
            SET event_id = $2, court_number = $3, team1_id = $4, team2_id = $5,
                status = $6, score_team1 = $7, score_team2 = $8
            WHERE id = $1
            "#,
        )
        .bind(m.id)
        .bind(m.event_id)
        .bind(m.court_number)
        .bind(m.team1_id)
        .bind(m.team2_id)
        .bind(m.status)
        .bind(&m.score_team1)
        .bind(&m.score_team2)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_match(&mut self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM matches WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_matches_in_event(&mut self, event_id: i64) -> RepositoryResult<()> {
        sqlx::query("DELETE FROM matches WHERE event_id = $1")
            .bind(event_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn teams_have_match(
        &mut self,
        team_ids: &[i64],
        status: Option<MatchStatus>,
    ) -> RepositoryResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM matches
                WHERE (team1_id = ANY($1) OR team2_id = ANY($1))
                  AND ($2::match_status IS NULL OR status = $2)
            )
            "#,
        )
        .bind(team_ids)
        .bind(status)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)
    }

    async fn list_matches(&mut self, filter: &MatchFilter) -> RepositoryResult<Vec<Match>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"
            SELECT m.id, m.event_id, m.court_number, m.team1_id, m.team2_id, m.status,
                   m.score_team1, m.score_team2
            FROM matches m
            JOIN events e ON e.id = m.event_id
            JOIN teams t1 ON t1.id = m.team1_id
            JOIN teams t2 ON t2.id = m.team2_id
            WHERE TRUE
            "#,
        );

        if let Some(user_id) = filter.user_id {
            query
                .push(" AND EXISTS (SELECT 1 FROM players p WHERE p.user_id = ")
                .push_bind(user_id)
                .push(" AND p.id IN (t1.player1_id, t1.player2_id, t2.player1_id, t2.player2_id))");
        }
        if let Some(team_id) = filter.team_id {
            query
                .push(" AND (m.team1_id = ")
                .push_bind(team_id)
                .push(" OR m.team2_id = ")
                .push_bind(team_id)
                .push(")");
        }
        if let Some(company) = &filter.company {
            query
                .push(" AND (t1.company = ")
                .push_bind(company.clone())
                .push(" OR t2.company = ")
                .push_bind(company.clone())
                .push(")");
        }
        if let Some(pool_id) = filter.pool_id {
            query
                .push(" AND (t1.pool_id = ")
                .push_bind(pool_id)
                .push(" OR t2.pool_id = ")
                .push_bind(pool_id)
                .push(")");
        }
        if let Some(status) = filter.status {
            query.push(" AND m.status = ").push_bind(status);
        }
        if let Some(start) = filter.start {
            query.push(" AND e.event_date >= ").push_bind(start);
        }
        if let Some(end) = filter.end {
            query.push(" AND e.event_date <= ").push_bind(end);
        }
        query.push(" ORDER BY e.event_date, e.event_time, m.court_number");

        let rows = query
            .build_query_as::<MatchRow>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Match::from).collect())
    }

    async fn count_matches(&mut self) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM matches")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }
}

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use super::postgres_store::{map_sqlx_error, PgUnitOfWork};
use crate::domain::repositories::{RepositoryResult, TeamRepository};
use crate::domain::team::{NewTeam, Team, TeamFilter};

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    company: String,
    player1_id: i64,
    player2_id: i64,
    pool_id: Option<i64>,
}

impl From<TeamRow> for Team {
    fn from(r: TeamRow) -> Self {
        Team {
            id: r.id,
            company: r.company,
            player1_id: r.player1_id,
            player2_id: r.player2_id,
            pool_id: r.pool_id,
        }
    }
}

#[async_trait]
impl TeamRepository for PgUnitOfWork {
    async fn find_team(&mut self, id: i64) -> RepositoryResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, company, player1_id, player2_id, pool_id
            FROM teams
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Team::from))
    }

    async fn find_teams(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, company, player1_id, player2_id, pool_id
            FROM teams
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn find_team_with_players(&mut self, player_ids: &[i64]) -> RepositoryResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(
            r#"
            SELECT id, company, player1_id, player2_id, pool_id
            FROM teams
            WHERE player1_id = ANY($1) OR player2_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(player_ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn list_teams(&mut self, filter: &TeamFilter) -> RepositoryResult<Vec<Team>> {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "SELECT id, company, player1_id, player2_id, pool_id FROM teams WHERE TRUE",
        );
        if let Some(pool_id) = filter.pool_id {
            query.push(" AND pool_id = ").push_bind(pool_id);
        }
        if let Some(company) = &filter.company {
            query.push(" AND company = ").push_bind(company.clone());
        }
        query.push(" ORDER BY company, id");

        let rows = query
            .build_query_as::<TeamRow>()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Team::from).collect())
    }

    async fn insert_team(&mut self, team: &NewTeam) -> RepositoryResult<Team> {
        let row = sqlx::query_as::<_, TeamRow>(
            r#"
            INSERT INTO teams (company, player1_id, player2_id)
            VALUES ($1, $2, $3)
            RETURNING id, company, player1_id, player2_id, pool_id
            "#,
        )
        .bind(&team.company)
        .bind(team.player1_id)
        .bind(team.player2_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_team(&mut self, team: &Team) -> RepositoryResult<()> {
        sqlx::query(
            r#"
            UPDATE teams
            SET company = $2, player1_id = $3, player2_id = $4
            WHERE id = $1
            "#,
        )
        .bind(team.id)
        .bind(&team.company)
        .bind(team.player1_id)
        .bind(team.player2_id)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_team(&mut self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn assign_pool(&mut self, team_ids: &[i64], pool_id: i64) -> RepositoryResult<()> {
        sqlx::query("UPDATE teams SET pool_id = $2 WHERE id = ANY($1)")
            .bind(team_ids)
            .bind(pool_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn clear_pool(&mut self, pool_id: i64) -> RepositoryResult<()> {
        sqlx::query("UPDATE teams SET pool_id = NULL WHERE pool_id = $1")
            .bind(pool_id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn count_teams(&mut self) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM teams")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use super::postgres_store::{map_sqlx_error, PgUnitOfWork};
use crate::domain::player::{NewPlayer, Player};
use crate::domain::repositories::{PlayerRepository, RepositoryResult};

#[derive(sqlx::FromRow)]
struct PlayerRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    company: String,
    license_number: String,
    user_id: Option<Uuid>,
    birth_date: Option<NaiveDate>,
}

impl From<PlayerRow> for Player {
    fn from(r: PlayerRow) -> Self {
        Player {
            id: r.id,
            first_name: r.first_name,
            last_name: r.last_name,
            email: r.email,
            company: r.company,
            license_number: r.license_number,
            user_id: r.user_id,
            birth_date: r.birth_date,
        }
    }
}

#[async_trait]
impl PlayerRepository for PgUnitOfWork {
    async fn find_player(&mut self, id: i64) -> RepositoryResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT id, first_name, last_name, email, company, license_number, user_id, birth_date
            FROM players
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Player::from))
    }

    async fn find_players(&mut self, ids: &[i64]) -> RepositoryResult<Vec<Player>> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT id, first_name, last_name, email, company, license_number, user_id, birth_date
            FROM players
            WHERE id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Player::from).collect())
    }

    async fn find_player_by_user(&mut self, user_id: Uuid) -> RepositoryResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT id, first_name, last_name, email, company, license_number, user_id, birth_date
            FROM players
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Player::from))
    }

    async fn find_player_by_license(
        &mut self,
        license_number: &str,
    ) -> RepositoryResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT id, first_name, last_name, email, company, license_number, user_id, birth_date
            FROM players
            WHERE license_number = $1
            "#,
        )
        .bind(license_number)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Player::from))
    }

    async fn find_player_by_email(&mut self, email: &str) -> RepositoryResult<Option<Player>> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT id, first_name, last_name, email, company, license_number, user_id, birth_date
            FROM players
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(Player::from))
    }

    async fn list_players(&mut self) -> RepositoryResult<Vec<Player>> {
        let rows = sqlx::query_as::<_, PlayerRow>(
            r#"
            SELECT id, first_name, last_name, email, company, license_number, user_id, birth_date
            FROM players
            ORDER BY last_name, first_name, id
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Player::from).collect())
    }

    async fn insert_player(&mut self, player: &NewPlayer) -> RepositoryResult<Player> {
        let row = sqlx::query_as::<_, PlayerRow>(
            r#"
            INSERT INTO players (
                first_name, last_name, email, company, license_number, user_id, birth_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, first_name, last_name, email, company, license_number, user_id, birth_date
            "#,
        )
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(&player.email)
        .bind(&player.company)
        .bind(&player.license_number)
        .bind(player.user_id)
        .bind(player.birth_date)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn update_player(&mut self, id: i64, player: &NewPlayer) -> RepositoryResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE players
            SET first_name = $2, last_name = $3, email = $4, company = $5,
                license_number = $6, user_id = $7, birth_date = $8
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&player.first_name)
        .bind(&player.last_name)
        .bind(&player.email)
        .bind(&player.company)
        .bind(&player.license_number)
        .bind(player.user_id)
        .bind(player.birth_date)
        .execute(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_player(&mut self, id: i64) -> RepositoryResult<bool> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_players(&mut self) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }
}

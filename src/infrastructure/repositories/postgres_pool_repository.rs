use async_trait::async_trait;

use super::postgres_store::{map_sqlx_error, PgUnitOfWork};
use crate::domain::pool::Pool;
use crate::domain::repositories::{PoolRepository, RepositoryResult};

#[derive(sqlx::FromRow)]
struct PoolRow {
    id: i64,
    name: String,
}

impl From<PoolRow> for Pool {
    fn from(r: PoolRow) -> Self {
        Pool {
            id: r.id,
            name: r.name,
        }
    }
}

#[async_trait]
impl PoolRepository for PgUnitOfWork {
    async fn find_pool(&mut self, id: i64) -> RepositoryResult<Option<Pool>> {
        let row = sqlx::query_as::<_, PoolRow>("SELECT id, name FROM pools WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(Pool::from))
    }

    async fn list_pools(&mut self) -> RepositoryResult<Vec<Pool>> {
        let rows = sqlx::query_as::<_, PoolRow>("SELECT id, name FROM pools ORDER BY name")
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(Pool::from).collect())
    }

    async fn insert_pool(&mut self, name: &str) -> RepositoryResult<Pool> {
        let row = sqlx::query_as::<_, PoolRow>(
            "INSERT INTO pools (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.into())
    }

    async fn rename_pool(&mut self, id: i64, name: &str) -> RepositoryResult<()> {
        sqlx::query("UPDATE pools SET name = $2 WHERE id = $1")
            .bind(id)
            .bind(name)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_pool(&mut self, id: i64) -> RepositoryResult<bool> {
        // teams.pool_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM pools WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_pools(&mut self) -> RepositoryResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM pools")
            .fetch_one(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)
    }
}

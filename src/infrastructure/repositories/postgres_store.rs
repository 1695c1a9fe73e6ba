use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};

use crate::domain::repositories::{
    Constraint, RepositoryError, RepositoryResult, Store, UnitOfWork,
};

/// PostgreSQL-backed store
///
/// Every unit of work is one `SERIALIZABLE` transaction, so concurrent
/// check-then-write sequences cannot both commit.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgresStore
    ///
    /// # Arguments
    /// * `pool` - SQLx connection pool for PostgreSQL
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool of at most `max_connections` connections
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Applies the embedded schema migrations
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn begin(&self) -> RepositoryResult<Box<dyn UnitOfWork>> {
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL SERIALIZABLE")
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// One open transaction; the repository impls live in the
/// `postgres_*_repository` modules
pub struct PgUnitOfWork {
    pub(super) tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl UnitOfWork for PgUnitOfWork {
    async fn commit(self: Box<Self>) -> RepositoryResult<()> {
        self.tx.commit().await.map_err(map_sqlx_error)
    }
}

/// Classifies a driver error by constraint name
pub(super) fn map_sqlx_error(err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        let constraint = || {
            db_err
                .constraint()
                .map(Constraint::from_name)
                .unwrap_or_else(|| Constraint::Unknown(String::new()))
        };
        match db_err.kind() {
            ErrorKind::UniqueViolation => return RepositoryError::UniqueViolation(constraint()),
            ErrorKind::ForeignKeyViolation => {
                return RepositoryError::ForeignKeyViolation(constraint())
            }
            _ => {}
        }
    }
    RepositoryError::Database(err.to_string())
}

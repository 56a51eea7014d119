//! Postgres-backed user record store.
//!
//! Expects the following schema (id is store-assigned, email carries the
//! integrity constraint):
//!
//! ```sql
//! CREATE TABLE users (
//!     id       SERIAL PRIMARY KEY,
//!     name     TEXT NOT NULL,
//!     email    TEXT NOT NULL UNIQUE,
//!     password TEXT NOT NULL
//! );
//! ```
//!
//! ## Error Mapping
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Duplicate email on insert/update |
//! | Database (other integrity violation) | `23xxx` | `Conflict` | Constraint conflict on write |
//! | Database (other) | Any other | `Backend` | Other database errors |
//! | PoolClosed / Io | N/A | `Unavailable` | Connection pool closed, network failure |
//! | Other | N/A | `Backend` | Decode failures etc. |
//!
//! ## Thread Safety
//!
//! `PostgresUserStore` is `Send + Sync`; the SQLx pool handles connection
//! management across tasks. Every operation is a single statement, so the
//! store's native atomicity is the only isolation in play.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use tracing::instrument;

use usersvc_core::UserId;
use usersvc_users::{User, UserDraft};

use super::r#trait::{StoreError, UserStore};

/// Postgres implementation of the user record store.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: Arc<PgPool>,
}

impl PostgresUserStore {
    /// Create a new store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

#[async_trait]
impl UserStore for PostgresUserStore {
    #[instrument(skip(self), fields(id = %id), err)]
    async fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("get", e))?;

        match row {
            Some(row) => Ok(Some(UserRow::try_from_row(&row)?.into())),
            None => Ok(None),
        }
    }

    #[instrument(skip(self), err)]
    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, email, password
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list", e))?;

        let mut users = Vec::with_capacity(rows.len());
        for row in rows {
            users.push(UserRow::try_from_row(&row)?.into());
        }
        Ok(users)
    }

    #[instrument(skip(self, draft), err)]
    async fn insert(&self, draft: UserDraft) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (name, email, password)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.password)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert", e))?;

        Ok(UserRow::try_from_row(&row)?.into())
    }

    #[instrument(skip(self, user), fields(id = %user.id()), err)]
    async fn update(&self, user: User) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, email = $3, password = $4
            WHERE id = $1
            RETURNING id, name, email, password
            "#,
        )
        .bind(user.id().as_i32())
        .bind(user.name())
        .bind(user.email())
        .bind(user.password())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update", e))?;

        match row {
            Some(row) => Ok(UserRow::try_from_row(&row)?.into()),
            // Existence is the caller's responsibility; a vanished row is a
            // backend fault, not a business outcome.
            None => Err(StoreError::Backend(format!(
                "update affected no rows for id {}",
                user.id()
            ))),
        }
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: UserId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_i32())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Map SQLx errors to StoreError.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            // Class 23 = integrity constraint violation.
            if db_err.code().is_some_and(|c| c.starts_with("23")) {
                StoreError::Conflict(db_err.message().to_string())
            } else {
                StoreError::Backend(format!(
                    "database error in {}: {}",
                    operation,
                    db_err.message()
                ))
            }
        }
        sqlx::Error::PoolClosed => {
            StoreError::Unavailable(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::Io(e) => StoreError::Unavailable(format!("io error in {}: {}", operation, e)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

// SQLx row type

#[derive(Debug)]
struct UserRow {
    id: i32,
    name: String,
    email: String,
    password: String,
}

impl UserRow {
    fn try_from_row(row: &sqlx::postgres::PgRow) -> Result<Self, StoreError> {
        let decode = |e: sqlx::Error| {
            StoreError::Backend(format!("failed to decode user row: {}", e))
        };
        Ok(UserRow {
            id: row.try_get("id").map_err(decode)?,
            name: row.try_get("name").map_err(decode)?,
            email: row.try_get("email").map_err(decode)?,
            password: row.try_get("password").map_err(decode)?,
        })
    }
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User::from_parts(UserId::new(row.id), row.name, row.email, row.password)
    }
}

use async_trait::async_trait;
use chrono::Utc;
use common::UserId;
use domain::{DomainError, DomainResult, Fields, Filter, Pagination, User, UserRepository};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use uuid::Uuid;

use crate::{Result, StorageError};

const USER_COLUMNS: &str = "id, first_name, last_name, nickname, password_hash, email, country, \
                            created_at, updated_at";

/// Name of the primary key constraint on the `users` table.
const USERS_PKEY: &str = "users_pkey";

/// PostgreSQL-backed user repository implementation.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgreSQL user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a connection pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_user(row: PgRow) -> Result<User> {
        Ok(User {
            id: UserId::from_uuid(row.try_get::<Uuid, _>("id")?),
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            nickname: row.try_get("nickname")?,
            password_hash: row.try_get("password_hash")?,
            email: row.try_get("email")?,
            country: row.try_get("country")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn exists(&self, id: UserId) -> Result<bool> {
        let found: Option<i32> = sqlx::query_scalar("SELECT 1 FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }
}

/// Appends ` WHERE a = $1 AND b = $2 ...` for every present predicate.
fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &Filter) {
    for (i, (field, value)) in filter.predicates().enumerate() {
        builder.push(if i == 0 { " WHERE " } else { " AND " });
        builder
            .push(field.as_str())
            .push(" = ")
            .push_bind(value.to_owned());
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[tracing::instrument(skip(self, user), fields(user_id = %user.id))]
    async fn add_user(&self, user: User) -> DomainResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, nickname, password_hash, email, country, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.as_uuid())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.nickname)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.country)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.constraint() == Some(USERS_PKEY)
            {
                return DomainError::UserAlreadyExists(user.id);
            }
            StorageError::Database(e).into()
        })?;

        Ok(())
    }

    #[tracing::instrument(skip(self, fields), fields(field_count = fields.len()))]
    async fn modify_user(&self, id: UserId, fields: Fields) -> DomainResult<()> {
        if fields.is_empty() {
            return if self.exists(id).await? {
                Ok(())
            } else {
                Err(DomainError::UserNotFound(id))
            };
        }

        let mut builder = QueryBuilder::<Postgres>::new("UPDATE users SET ");
        let mut assignments = builder.separated(", ");
        for (field, value) in fields.iter() {
            assignments
                .push(field.as_str())
                .push_unseparated(" = ")
                .push_bind_unseparated(value.to_owned());
        }
        assignments
            .push("updated_at = ")
            .push_bind_unseparated(Utc::now());
        builder.push(" WHERE id = ").push_bind(id.as_uuid());

        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn remove_user(&self, id: UserId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::UserNotFound(id));
        }
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn users(&self, filter: Filter, pagination: Pagination) -> DomainResult<Vec<User>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_filter(&mut builder, &filter);
        builder
            .push(" ORDER BY seq ASC LIMIT ")
            .push_bind(pagination.limit() as i64)
            .push(" OFFSET ")
            .push_bind(pagination.offset() as i64);

        let rows = builder
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        let users = rows
            .into_iter()
            .map(Self::row_to_user)
            .collect::<Result<Vec<_>>>()?;
        Ok(users)
    }
}

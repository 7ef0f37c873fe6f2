//! Persistence gateway: the two-table SQLite store behind the HTTP handlers.

use std::{num::NonZeroU32, str::FromStr};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::entities::{NewTodo, NewUser, Todo, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

/// Single-statement operations the API layer needs. No call spans more
/// than one entity and nothing is retried.
#[async_trait::async_trait]
pub trait TodoStore: Send + Sync {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError>;

    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError>;

    /// Sets `completed` on the todo. `None` when no row has that id.
    async fn complete_todo(&self, id: i64) -> Result<Option<Todo>, StoreError>;

    /// `false` when no row has that id.
    async fn delete_todo(&self, id: i64) -> Result<bool, StoreError>;

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
}

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pub sqlite_pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(sqlite_pool: SqlitePool) -> Self {
        Self { sqlite_pool }
    }

    /// Opens (creating if needed) the database at `database_url` and applies migrations.
    pub async fn connect(
        database_url: &str,
        max_connections: NonZeroU32,
    ) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let sqlite_pool = SqlitePoolOptions::new()
            .max_connections(max_connections.get())
            .connect_with(options)
            .await?;

        let store = Self::new(sqlite_pool);
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory database. Pinned to one connection that never
    /// expires, since every sqlite memory connection is its own database.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let sqlite_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self::new(sqlite_pool);
        store.migrate().await?;
        Ok(store)
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.sqlite_pool).await?;
        Ok(())
    }

    /// Read-side lookups outside the HTTP surface, used at startup and by
    /// integration tests to inspect what a request persisted.
    pub async fn find_user(&self, id: &str) -> Result<Option<User>, StoreError> {
        let user =
            sqlx::query_as("SELECT id, name, email, password_hash FROM users WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.sqlite_pool)
                .await?;

        Ok(user)
    }

    pub async fn count_users(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.sqlite_pool)
            .await?;

        Ok(count)
    }
}

#[async_trait::async_trait]
impl TodoStore for SqliteStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        let todos = sqlx::query_as(
            "SELECT id, title, description, completed, user_id FROM todos ORDER BY id",
        )
        .fetch_all(&self.sqlite_pool)
        .await?;

        Ok(todos)
    }

    async fn create_todo(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        let todo = sqlx::query_as(
            "INSERT INTO todos (title, description, completed, user_id) VALUES (?, ?, ?, ?)
             RETURNING id, title, description, completed, user_id",
        )
        .bind(todo.title)
        .bind(todo.description)
        .bind(false)
        .bind(todo.user_id)
        .fetch_one(&self.sqlite_pool)
        .await?;

        Ok(todo)
    }

    async fn complete_todo(&self, id: i64) -> Result<Option<Todo>, StoreError> {
        let todo = sqlx::query_as(
            "UPDATE todos SET completed = ? WHERE id = ?
             RETURNING id, title, description, completed, user_id",
        )
        .bind(true)
        .bind(id)
        .fetch_optional(&self.sqlite_pool)
        .await?;

        Ok(todo)
    }

    async fn delete_todo(&self, id: i64) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = ?")
            .bind(id)
            .execute(&self.sqlite_pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();

        let user = sqlx::query_as(
            "INSERT INTO users (id, name, email, password_hash) VALUES (?, ?, ?, ?)
             RETURNING id, name, email, password_hash",
        )
        .bind(id)
        .bind(user.name)
        .bind(user.email)
        .bind(user.password_hash)
        .fetch_one(&self.sqlite_pool)
        .await?;

        Ok(user)
    }
}

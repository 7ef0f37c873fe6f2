#![allow(dead_code)]

use std::sync::Arc;

use tokio::net::TcpListener;
use todo_api::{
    crud_ops::DynStore,
    entities::{NewTodo, NewUser, Todo, User},
    store::{SqliteStore, StoreError, TodoStore},
};

/// Starts the API on an ephemeral port and returns its base url.
pub async fn spawn_with(store: DynStore) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(todo_api::serve(listener, store, std::future::pending()));
    format!("http://{addr}")
}

pub async fn spawn_app() -> (String, SqliteStore) {
    let store = SqliteStore::in_memory().await.unwrap();
    let base_url = spawn_with(Arc::new(store.clone())).await;
    (base_url, store)
}

/// Store whose every call fails as if the database were unreachable.
pub struct FailingStore;

fn unavailable() -> StoreError {
    StoreError::Sqlx(sqlx::Error::PoolClosed)
}

#[async_trait::async_trait]
impl TodoStore for FailingStore {
    async fn list_todos(&self) -> Result<Vec<Todo>, StoreError> {
        Err(unavailable())
    }

    async fn create_todo(&self, _todo: NewTodo) -> Result<Todo, StoreError> {
        Err(unavailable())
    }

    async fn complete_todo(&self, _id: i64) -> Result<Option<Todo>, StoreError> {
        Err(unavailable())
    }

    async fn delete_todo(&self, _id: i64) -> Result<bool, StoreError> {
        Err(unavailable())
    }

    async fn create_user(&self, _user: NewUser) -> Result<User, StoreError> {
        Err(unavailable())
    }
}

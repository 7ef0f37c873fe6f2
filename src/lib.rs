use std::{future::Future, sync::Arc};

use axum::{
    extract::Extension,
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod client;
pub mod config;
pub mod crud_ops;
pub mod entities;
pub mod error;
pub mod registration;
pub mod store;
pub mod telemetry;

use crate::{
    config::{Config, ConfigError},
    crud_ops::DynStore,
    store::{SqliteStore, StoreError},
};

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub fn app(store: DynStore) -> Router {
    Router::new()
        .route("/", get(crud_ops::health))
        .route("/registerUser", post(registration::register_user))
        .route("/todos", get(crud_ops::get_todos).post(crud_ops::create_todo))
        .route(
            "/todos/{id}",
            put(crud_ops::complete_todo).delete(crud_ops::delete_todo),
        )
        .layer(Extension(store))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, store: DynStore, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown)
        .await
}

pub async fn run_server(config: Config) -> Result<(), StartupError> {
    let store =
        SqliteStore::connect(&config.database_url, config.database_max_connections).await?;
    let users = store.count_users().await?;
    tracing::info!(database_url = %config.database_url, users, "database ready");

    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    serve(listener, Arc::new(store), shutdown_signal()).await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

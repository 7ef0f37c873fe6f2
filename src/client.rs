//! Typed HTTP client for the todo API, plus the list view a frontend keeps.
//!
//! The server is the only source of truth: [`TodoBoard`] never patches its
//! local copy, it re-fetches the whole list after every successful mutation.

use std::fmt;

use reqwest::StatusCode;
use serde_json::json;

use crate::entities::{Todo, User};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server responded {status}: {message}")]
    Status { status: StatusCode, message: String },
}

impl ClientError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Transport(err) => err.status(),
            ClientError::Status { status, .. } => Some(*status),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn health(&self) -> Result<String, ClientError> {
        let response = self.http.get(self.url("/")).send().await?;
        Ok(check(response).await?.text().await?)
    }

    pub async fn list_todos(&self) -> Result<Vec<Todo>, ClientError> {
        let response = self.http.get(self.url("/todos")).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_todo(
        &self,
        title: &str,
        description: Option<&str>,
        user_id: &str,
    ) -> Result<Todo, ClientError> {
        let body = json!({
            "title": title,
            "description": description,
            "userId": user_id,
        });
        let response = self.http.post(self.url("/todos")).json(&body).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn complete_todo(&self, id: i64) -> Result<Todo, ClientError> {
        let response = self
            .http
            .put(self.url(&format!("/todos/{id}")))
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_todo(&self, id: i64) -> Result<(), ClientError> {
        let response = self
            .http
            .delete(self.url(&format!("/todos/{id}")))
            .send()
            .await?;
        check(response).await?;
        Ok(())
    }

    pub async fn register_user(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, ClientError> {
        let body = json!({
            "name": name,
            "email": email,
            "password": password,
        });
        let response = self
            .http
            .post(self.url("/registerUser"))
            .json(&body)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Any non-2xx is a failure; the message comes from the `error` field when present.
async fn check(response: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response
        .json::<serde_json::Value>()
        .await
        .ok()
        .and_then(|body| body.get("error")?.as_str().map(str::to_owned))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

    Err(ClientError::Status { status, message })
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Vec<Todo>),
    Failed(String),
}

pub struct TodoBoard {
    client: ApiClient,
    state: LoadState,
}

impl TodoBoard {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            state: LoadState::Loading,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn todos(&self) -> &[Todo] {
        match &self.state {
            LoadState::Ready(todos) => todos,
            _ => &[],
        }
    }

    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.client.list_todos().await {
            Ok(todos) => {
                self.state = LoadState::Ready(todos);
                Ok(())
            }
            Err(err) => {
                self.state = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    pub async fn add(
        &mut self,
        title: &str,
        description: Option<&str>,
        user_id: &str,
    ) -> Result<Todo, ClientError> {
        let todo = self.client.create_todo(title, description, user_id).await?;
        self.refresh().await?;
        Ok(todo)
    }

    pub async fn complete(&mut self, id: i64) -> Result<Todo, ClientError> {
        let todo = self.client.complete_todo(id).await?;
        self.refresh().await?;
        Ok(todo)
    }

    pub async fn remove(&mut self, id: i64) -> Result<(), ClientError> {
        self.client.delete_todo(id).await?;
        self.refresh().await
    }
}

impl fmt::Display for TodoBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.state {
            LoadState::Loading => writeln!(f, "Loading..."),
            LoadState::Failed(_) => writeln!(f, "Error fetching todos"),
            LoadState::Ready(todos) => {
                writeln!(f, "Todo List")?;
                for todo in todos {
                    let status = if todo.completed { "Completed" } else { "Pending" };
                    write!(f, "#{} {} [{status}]", todo.id, todo.title)?;
                    match &todo.description {
                        Some(description) => writeln!(f, " - {description}")?,
                        None => writeln!(f)?,
                    }
                }
                Ok(())
            }
        }
    }
}

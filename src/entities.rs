use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub user_id: String,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    // argon2 PHC string, never leaves the server
    #[serde(skip)]
    pub password_hash: String,
}

/// Validated input for inserting a todo.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub title: String,
    pub description: Option<String>,
    pub user_id: String,
}

/// Validated input for inserting a user. `password_hash` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodoRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub user_id: Option<String>,
}

impl CreateTodoRequest {
    /// Returns `None` when `title` or `userId` is missing or empty.
    pub fn validate(self) -> Option<NewTodo> {
        let title = non_empty(self.title)?;
        let user_id = non_empty(self.user_id)?;

        Some(NewTodo {
            title,
            description: self.description,
            user_id,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RegisterUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Registration fields that passed the presence check.
#[derive(Debug)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterUserRequest {
    pub fn validate(self) -> Option<Registration> {
        Some(Registration {
            name: non_empty(self.name)?,
            email: non_empty(self.email)?,
            password: non_empty(self.password)?,
        })
    }
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

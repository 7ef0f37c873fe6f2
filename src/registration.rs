use axum::{extract::rejection::JsonRejection, extract::Extension, http::StatusCode, Json};

use crate::{
    crud_ops::DynStore,
    entities::{NewUser, RegisterUserRequest, User},
    error::ApiError,
};

const CREDENTIALS_REQUIRED: &str = "Credentials required";
const REGISTRATION_FAILED: &str = "Failed to register user";

pub async fn register_user(
    Extension(store): Extension<DynStore>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let Json(request) = payload.map_err(|_| ApiError::BadRequest(CREDENTIALS_REQUIRED))?;
    let registration = request
        .validate()
        .ok_or(ApiError::BadRequest(CREDENTIALS_REQUIRED))?;

    // `password_auth::generate_hash()` is blocking, hence using `tokio::task::spawn_blocking()`
    let password = registration.password;
    let password_hash = tokio::task::spawn_blocking(move || password_auth::generate_hash(password))
        .await
        .map_err(ApiError::internal(REGISTRATION_FAILED))?;

    let user = store
        .create_user(NewUser {
            name: registration.name,
            email: registration.email,
            password_hash,
        })
        .await
        .map_err(ApiError::internal(REGISTRATION_FAILED))?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(user)))
}

//! Account endpoints

use api_types::{
    Message,
    user::{CreateAccount, LoggedIn, Login, PushToken, UserView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewUserCmd, User};

use crate::{ServerError, credentials, server::ServerState};

pub(crate) fn user_view(user: User) -> UserView {
    UserView {
        id: user.id,
        first_name: user.first_name,
        last_name: user.last_name,
        email: user.email,
        push_token: user.push_token,
    }
}

/// Hashing is CPU-bound; keep it off the async workers.
async fn blocking<T, F>(task: F) -> Result<T, ServerError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, argon2::password_hash::Error> + Send + 'static,
{
    match tokio::task::spawn_blocking(task).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => {
            tracing::error!("password hashing failed: {err}");
            Err(ServerError::Engine(engine::EngineError::Dependency(
                "credential check failed".to_string(),
            )))
        }
        Err(err) => {
            tracing::error!("password task panicked: {err}");
            Err(ServerError::Engine(engine::EngineError::Dependency(
                "credential check failed".to_string(),
            )))
        }
    }
}

pub async fn create_account(
    State(state): State<ServerState>,
    Json(payload): Json<CreateAccount>,
) -> Result<(StatusCode, Json<Message>), ServerError> {
    if payload.password.is_empty() {
        return Err(ServerError::Generic("All fields are required".to_string()));
    }
    let password = payload.password;
    let hash = blocking(move || credentials::hash_password(&password)).await?;
    let user = state
        .engine
        .create_user(NewUserCmd::new(
            payload.first_name,
            payload.last_name,
            payload.email,
            hash,
        ))
        .await?;
    tracing::debug!(user_id = user.id, "account created");

    Ok((
        StatusCode::CREATED,
        Json(Message::new("User created successfully")),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<Login>,
) -> Result<Json<LoggedIn>, ServerError> {
    if payload.email.trim().is_empty() || payload.password.is_empty() {
        return Err(ServerError::Generic(
            "Email and password are required".to_string(),
        ));
    }
    let user = state.engine.user_by_email(&payload.email).await?;
    let hash = user.password_hash.clone();
    let password = payload.password;
    let valid = blocking(move || credentials::verify_password(&password, &hash)).await?;
    if !valid {
        return Err(ServerError::Unauthorized(
            "Invalid password or user".to_string(),
        ));
    }

    Ok(Json(LoggedIn {
        message: "Logged in successfully".to_string(),
        user: user_view(user),
    }))
}

pub async fn update_push_token(
    State(state): State<ServerState>,
    Path(id): Path<i32>,
    Json(payload): Json<PushToken>,
) -> Result<Json<UserView>, ServerError> {
    let user = state
        .engine
        .update_push_token(id, payload.push_token.as_deref())
        .await?;
    Ok(Json(user_view(user)))
}

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateUserRequest, MessageResponse, UpdatePasswordRequest};
use super::User;
use crate::auth::middleware::AuthUser;
use crate::auth::services::validate_signup;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = User::find_all(&state.backends).await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = User::find_by_id(&state.backends, id)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user))
}

#[instrument(skip(state))]
pub async fn get_by_email(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<User>, ApiError> {
    let email = email.trim().to_lowercase();
    let user = User::find_by_email(&state.backends, &email)
        .await?
        .ok_or(ApiError::NotFound("user"))?;
    Ok(Json(user))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Json(mut payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    validate_signup(&payload.email, &payload.password)?;

    let user = User::create(&state.backends, &payload.email, &payload.password).await?;
    info!(user_id = %user.id, email = %user.email, actor = %actor, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let email = payload.email.trim().to_lowercase();
    User::update_password(
        &state.backends,
        &email,
        &payload.old_password,
        &payload.new_password,
    )
    .await?;
    info!(email = %email, "password updated");
    Ok(Json(MessageResponse {
        message: "password updated".into(),
    }))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(actor): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    User::delete(&state.backends, id).await?;
    info!(user_id = %id, actor = %actor, "user deleted");
    Ok(StatusCode::NO_CONTENT)
}

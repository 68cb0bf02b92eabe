use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::CreateProjectRequest;
use super::Project;
use crate::error::ApiError;
use crate::state::AppState;

#[instrument(skip(state))]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = Project::find_all(state.backends.documents.as_ref()).await?;
    Ok(Json(projects))
}

#[instrument(skip(state))]
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Project>, ApiError> {
    let project = Project::find_by_id(state.backends.documents.as_ref(), id)
        .await?
        .ok_or(ApiError::NotFound("project"))?;
    Ok(Json(project))
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::InvalidInput("project name must not be empty".into()));
    }
    let project = Project::create(
        state.backends.documents.as_ref(),
        payload.owner_id,
        payload.name.trim(),
        payload.description,
    )
    .await?;
    info!(project_id = %project.id, owner_id = %project.owner_id, "project created");
    Ok((StatusCode::CREATED, Json(project)))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    Project::delete(state.backends.documents.as_ref(), id).await?;
    info!(project_id = %id, "project deleted");
    Ok(StatusCode::NO_CONTENT)
}

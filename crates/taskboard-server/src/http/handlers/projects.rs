//! Project handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use taskboard_core::wire::{CreateProjectRequest, UpdateProjectRequest, WorkspaceQuery};
use taskboard_core::{Project, ProjectId};

use crate::http::error::ApiError;
use crate::http::identity::Identity;
use crate::service::ProjectService;
use crate::state::AppState;

pub async fn create_project(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Json(req): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = ProjectService::new(state)
        .create_project(&identity, req)
        .await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Query(query): Query<WorkspaceQuery>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = ProjectService::new(state)
        .list_projects(&identity, &query.workspace_id)
        .await?;
    Ok(Json(projects))
}

pub async fn get_project(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Project>, ApiError> {
    let project = ProjectService::new(state)
        .get_project(&identity, &project_id)
        .await?;
    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(project_id): Path<ProjectId>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<Project>, ApiError> {
    let project = ProjectService::new(state)
        .update_project(&identity, &project_id, req)
        .await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = ProjectService::new(state)
        .delete_project(&identity, &project_id)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

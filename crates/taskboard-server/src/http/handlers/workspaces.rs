//! Workspace handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use taskboard_core::wire::{CreateWorkspaceRequest, JoinWorkspaceRequest, UpdateWorkspaceRequest};
use taskboard_core::{Member, Workspace, WorkspaceId};

use crate::http::error::ApiError;
use crate::http::identity::Identity;
use crate::service::WorkspaceService;
use crate::state::AppState;

pub async fn create_workspace(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<(StatusCode, Json<Workspace>), ApiError> {
    let workspace = WorkspaceService::new(state)
        .create_workspace(&identity, req)
        .await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

pub async fn list_workspaces(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
) -> Json<Vec<Workspace>> {
    Json(WorkspaceService::new(state).list_workspaces(&identity).await)
}

pub async fn get_workspace(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(workspace_id): Path<WorkspaceId>,
) -> Result<Json<Workspace>, ApiError> {
    let workspace = WorkspaceService::new(state)
        .get_workspace(&identity, &workspace_id)
        .await?;
    Ok(Json(workspace))
}

pub async fn update_workspace(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(workspace_id): Path<WorkspaceId>,
    Json(req): Json<UpdateWorkspaceRequest>,
) -> Result<Json<Workspace>, ApiError> {
    let workspace = WorkspaceService::new(state)
        .update_workspace(&identity, &workspace_id, req)
        .await?;
    Ok(Json(workspace))
}

pub async fn reset_invite_code(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(workspace_id): Path<WorkspaceId>,
) -> Result<Json<Workspace>, ApiError> {
    let workspace = WorkspaceService::new(state)
        .reset_invite_code(&identity, &workspace_id)
        .await?;
    Ok(Json(workspace))
}

pub async fn join_workspace(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(workspace_id): Path<WorkspaceId>,
    Json(req): Json<JoinWorkspaceRequest>,
) -> Result<(StatusCode, Json<Member>), ApiError> {
    let member = WorkspaceService::new(state)
        .join_workspace(&identity, &workspace_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(member)))
}

pub async fn delete_workspace(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(workspace_id): Path<WorkspaceId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = WorkspaceService::new(state)
        .delete_workspace(&identity, &workspace_id)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

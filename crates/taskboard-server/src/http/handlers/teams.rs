//! Team handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use taskboard_core::wire::{AddTeamMemberRequest, CreateTeamRequest, WorkspaceQuery};
use taskboard_core::{MemberId, Team, TeamId};

use crate::http::error::ApiError;
use crate::http::identity::Identity;
use crate::service::TeamService;
use crate::state::AppState;

pub async fn create_team(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Json(req): Json<CreateTeamRequest>,
) -> Result<(StatusCode, Json<Team>), ApiError> {
    let team = TeamService::new(state).create_team(&identity, req).await?;
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list_teams(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Query(query): Query<WorkspaceQuery>,
) -> Result<Json<Vec<Team>>, ApiError> {
    let teams = TeamService::new(state)
        .list_teams(&identity, &query.workspace_id)
        .await?;
    Ok(Json(teams))
}

pub async fn add_team_member(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(team_id): Path<TeamId>,
    Json(req): Json<AddTeamMemberRequest>,
) -> Result<Json<Team>, ApiError> {
    let team = TeamService::new(state)
        .add_team_member(&identity, &team_id, req)
        .await?;
    Ok(Json(team))
}

pub async fn get_team(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(team_id): Path<TeamId>,
) -> Result<Json<Team>, ApiError> {
    let team = TeamService::new(state).get_team(&identity, &team_id).await?;
    Ok(Json(team))
}

pub async fn delete_team(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(team_id): Path<TeamId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = TeamService::new(state)
        .delete_team(&identity, &team_id)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

pub async fn remove_team_member(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path((team_id, member_id)): Path<(TeamId, MemberId)>,
) -> Result<Json<Team>, ApiError> {
    let team = TeamService::new(state)
        .remove_team_member(&identity, &team_id, &member_id)
        .await?;
    Ok(Json(team))
}

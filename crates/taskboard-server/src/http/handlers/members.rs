//! Member handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use taskboard_core::wire::UpdateMemberRequest;
use taskboard_core::{Member, MemberId, WorkspaceId};

use crate::http::error::ApiError;
use crate::http::identity::Identity;
use crate::service::MemberService;
use crate::state::AppState;

pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(workspace_id): Path<WorkspaceId>,
) -> Result<Json<Vec<Member>>, ApiError> {
    let members = MemberService::new(state)
        .list_members(&identity, &workspace_id)
        .await?;
    Ok(Json(members))
}

pub async fn get_member(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(member_id): Path<MemberId>,
) -> Result<Json<Member>, ApiError> {
    let member = MemberService::new(state)
        .get_member(&identity, &member_id)
        .await?;
    Ok(Json(member))
}

pub async fn update_member(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(member_id): Path<MemberId>,
    Json(req): Json<UpdateMemberRequest>,
) -> Result<Json<Member>, ApiError> {
    let member = MemberService::new(state)
        .update_member(&identity, &member_id, req)
        .await?;
    Ok(Json(member))
}

pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(member_id): Path<MemberId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = MemberService::new(state)
        .remove_member(&identity, &member_id)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

//! Task handlers, including the two placement endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use taskboard_core::wire::{
    BulkCreateTasksRequest, BulkUpdateRequest, BulkUpdateResponse, CreateTaskRequest,
    MoveTaskRequest, MoveTaskResponse, TaskQuery, UpdateTaskRequest,
};
use taskboard_core::{ProjectId, Task, TaskId};

use crate::http::error::ApiError;
use crate::http::identity::Identity;
use crate::service::TaskService;
use crate::state::AppState;

pub async fn create_task(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let task = TaskService::new(state).create_task(&identity, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Create a batch of tasks; any invalid item fails the whole request.
pub async fn bulk_create_tasks(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Json(req): Json<BulkCreateTasksRequest>,
) -> Result<(StatusCode, Json<Vec<Task>>), ApiError> {
    let tasks = TaskService::new(state)
        .bulk_create_tasks(&identity, req)
        .await?;
    Ok((StatusCode::CREATED, Json(tasks)))
}

pub async fn list_tasks(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Query(query): Query<TaskQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = TaskService::new(state).list_tasks(&identity, query).await?;
    Ok(Json(tasks))
}

/// Full, uncapped task list of one project for board clients.
pub async fn project_board(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(project_id): Path<ProjectId>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = TaskService::new(state)
        .board_tasks(&identity, &project_id)
        .await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(task_id): Path<TaskId>,
) -> Result<Json<Task>, ApiError> {
    let task = TaskService::new(state).get_task(&identity, &task_id).await?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(task_id): Path<TaskId>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>, ApiError> {
    let task = TaskService::new(state)
        .update_task(&identity, &task_id, req)
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(task_id): Path<TaskId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = TaskService::new(state)
        .delete_task(&identity, &task_id)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// Plan and persist a single move.
pub async fn move_task(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(task_id): Path<TaskId>,
    Json(req): Json<MoveTaskRequest>,
) -> Result<Json<MoveTaskResponse>, ApiError> {
    let updates = TaskService::new(state)
        .move_task(&identity, &task_id, req)
        .await?;
    Ok(Json(MoveTaskResponse { updates }))
}

/// Persist a client-planned batch. Item-level validation failures are
/// listed in the body; store failures come back as 409.
pub async fn bulk_update(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Json(req): Json<BulkUpdateRequest>,
) -> Result<Json<BulkUpdateResponse>, ApiError> {
    let response = TaskService::new(state).bulk_update(&identity, req).await?;
    Ok(Json(response))
}

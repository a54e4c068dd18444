//! User story handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use taskboard_core::wire::{CreateStoryRequest, CreateStoryTasksRequest, StoryQuery};
use taskboard_core::{StoryId, Task, UserStory};

use crate::http::error::ApiError;
use crate::http::identity::Identity;
use crate::service::StoryService;
use crate::state::AppState;

pub async fn create_story(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Json(req): Json<CreateStoryRequest>,
) -> Result<(StatusCode, Json<UserStory>), ApiError> {
    let story = StoryService::new(state).create_story(&identity, req).await?;
    Ok((StatusCode::CREATED, Json(story)))
}

pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Query(query): Query<StoryQuery>,
) -> Result<Json<Vec<UserStory>>, ApiError> {
    let stories = StoryService::new(state)
        .list_stories(&identity, query)
        .await?;
    Ok(Json(stories))
}

pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(story_id): Path<StoryId>,
) -> Result<Json<UserStory>, ApiError> {
    let story = StoryService::new(state)
        .get_story(&identity, &story_id)
        .await?;
    Ok(Json(story))
}

pub async fn delete_story(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(story_id): Path<StoryId>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id = StoryService::new(state)
        .delete_story(&identity, &story_id)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// Create the story's tasks in one batch.
pub async fn create_story_tasks(
    State(state): State<Arc<AppState>>,
    Identity(identity): Identity,
    Path(story_id): Path<StoryId>,
    Json(req): Json<CreateStoryTasksRequest>,
) -> Result<(StatusCode, Json<Vec<Task>>), ApiError> {
    let tasks = StoryService::new(state)
        .create_story_tasks(&identity, &story_id, req)
        .await?;
    Ok((StatusCode::CREATED, Json(tasks)))
}

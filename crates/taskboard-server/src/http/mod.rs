//! HTTP API.
//!
//! Provides endpoints for:
//! - Workspaces, invite codes and membership (`/v1/workspaces`, `/v1/members`)
//! - Projects, full project boards and teams (`/v1/projects`, `/v1/teams`)
//! - User stories and the tasks planned from them (`/v1/stories`)
//! - Tasks, single moves, bulk creation and bulk reorders (`/v1/tasks`)
//! - Health check (`/health`)
//! - Prometheus metrics (`/metrics`)
//!
//! Every `/v1` route requires the `x-user-id` header.

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod error;
mod handlers;
pub mod identity;

pub use error::ApiError;

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Browser board clients run on another origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Workspaces and members
        .route(
            "/v1/workspaces",
            get(handlers::list_workspaces).post(handlers::create_workspace),
        )
        .route(
            "/v1/workspaces/:workspace_id",
            get(handlers::get_workspace)
                .patch(handlers::update_workspace)
                .delete(handlers::delete_workspace),
        )
        .route(
            "/v1/workspaces/:workspace_id/invite-code",
            post(handlers::reset_invite_code),
        )
        .route(
            "/v1/workspaces/:workspace_id/join",
            post(handlers::join_workspace),
        )
        .route(
            "/v1/workspaces/:workspace_id/members",
            get(handlers::list_members),
        )
        .route(
            "/v1/members/:member_id",
            get(handlers::get_member)
                .patch(handlers::update_member)
                .delete(handlers::remove_member),
        )
        // Projects and teams
        .route(
            "/v1/projects",
            get(handlers::list_projects).post(handlers::create_project),
        )
        .route(
            "/v1/projects/:project_id",
            get(handlers::get_project)
                .patch(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route(
            "/v1/projects/:project_id/board",
            get(handlers::project_board),
        )
        .route(
            "/v1/teams",
            get(handlers::list_teams).post(handlers::create_team),
        )
        .route(
            "/v1/teams/:team_id",
            get(handlers::get_team).delete(handlers::delete_team),
        )
        .route(
            "/v1/teams/:team_id/members",
            post(handlers::add_team_member),
        )
        .route(
            "/v1/teams/:team_id/members/:member_id",
            delete(handlers::remove_team_member),
        )
        // Stories
        .route(
            "/v1/stories",
            get(handlers::list_stories).post(handlers::create_story),
        )
        .route(
            "/v1/stories/:story_id",
            get(handlers::get_story).delete(handlers::delete_story),
        )
        .route(
            "/v1/stories/:story_id/tasks",
            post(handlers::create_story_tasks),
        )
        // Tasks
        .route(
            "/v1/tasks",
            get(handlers::list_tasks).post(handlers::create_task),
        )
        .route("/v1/tasks/bulk-create", post(handlers::bulk_create_tasks))
        .route("/v1/tasks/bulk-update", post(handlers::bulk_update))
        .route(
            "/v1/tasks/:task_id",
            get(handlers::get_task)
                .patch(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route("/v1/tasks/:task_id/move", post(handlers::move_task))
        // Observability routes
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

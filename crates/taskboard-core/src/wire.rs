//! HTTP request and response bodies shared by the server and the client.
//!
//! Column names arrive as raw strings and are parsed at the boundary so a
//! bad column surfaces as [`CoreError::InvalidColumn`] rather than a
//! deserialization failure.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    BulkUpdateItem, CoreError, MemberId, ProjectId, RejectedUpdate, TaskFilter, TaskUpdate,
    WorkspaceId,
};

// ============================================================================
// Error types
// ============================================================================

/// Error body returned for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Task ids that did not persist (partial update failures only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed: Vec<String>,
    /// Task ids that did persist (partial update failures only).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied: Vec<String>,
    /// Items of the same batch that failed validation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedItem>,
}

impl From<&CoreError> for ErrorResponse {
    fn from(err: &CoreError) -> Self {
        let mut body = Self {
            error: err.to_string(),
            code: err.code().to_string(),
            failed: Vec::new(),
            applied: Vec::new(),
            rejected: Vec::new(),
        };
        if let CoreError::PartialUpdateFailure {
            failed,
            applied,
            rejected,
        } = err
        {
            body.failed = failed.iter().map(ToString::to_string).collect();
            body.applied = applied.iter().map(ToString::to_string).collect();
            body.rejected = rejected.iter().map(RejectedItem::from).collect();
        }
        body
    }
}

// ============================================================================
// Workspace / member types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateWorkspaceRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinWorkspaceRequest {
    pub invite_code: String,
}

/// Query string for endpoints scoped to one workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceQuery {
    pub workspace_id: WorkspaceId,
}

/// Member profile/role edit. `skills` is a comma-separated list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMemberRequest {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub skills: Option<String>,
}

// ============================================================================
// Project / team types
// ============================================================================

/// `tech_stack` is a comma-separated list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProjectRequest {
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub tech_stack: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTeamRequest {
    pub workspace_id: WorkspaceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTeamMemberRequest {
    pub member_id: MemberId,
}

// ============================================================================
// User story types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoryRequest {
    pub workspace_id: WorkspaceId,
    pub project_id: ProjectId,
    pub description: String,
    #[serde(default)]
    pub acceptance_criteria: Option<String>,
}

/// Query string for story listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryQuery {
    pub workspace_id: WorkspaceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
}

/// One task to create from a story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryTaskDraft {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Tasks to add to a story's project. `status` defaults to BACKLOG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateStoryTasksRequest {
    #[serde(default)]
    pub status: Option<String>,
    pub tasks: Vec<StoryTaskDraft>,
}

// ============================================================================
// Task types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub workspace_id: WorkspaceId,
    pub project_id: ProjectId,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub assignee_id: Option<MemberId>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    /// Omit to append to the bottom of the column.
    #[serde(default)]
    pub position: Option<f64>,
}

/// Create several tasks in one workspace. Either all are created or none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateTasksRequest {
    pub tasks: Vec<CreateTaskRequest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub assignee_id: Option<MemberId>,
    /// Remove the current assignee; ignored when `assignee_id` is set.
    #[serde(default)]
    pub clear_assignee: bool,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
}

/// Query string for task listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskQuery {
    pub workspace_id: WorkspaceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl TryFrom<TaskQuery> for TaskFilter {
    type Error = CoreError;

    fn try_from(query: TaskQuery) -> Result<Self, Self::Error> {
        let status = query.status.as_deref().map(str::parse).transpose()?;
        Ok(TaskFilter {
            workspace_id: query.workspace_id,
            project_id: query.project_id,
            assignee_id: query.assignee_id,
            status,
            due_date: query.due_date,
            search: query.search.filter(|s| !s.trim().is_empty()),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTaskRequest {
    pub status: String,
    pub index: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveTaskResponse {
    pub updates: Vec<TaskUpdate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkUpdateRequest {
    pub tasks: Vec<BulkUpdateItem>,
}

/// Bulk item that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedItem {
    pub task_id: String,
    pub code: String,
    pub error: String,
}

impl From<&RejectedUpdate> for RejectedItem {
    fn from(rejected: &RejectedUpdate) -> Self {
        Self {
            task_id: rejected.task_id.clone(),
            code: rejected.error.code().to_string(),
            error: rejected.error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkUpdateResponse {
    pub applied: Vec<TaskUpdate>,
    pub rejected: Vec<RejectedItem>,
}

impl BulkUpdateResponse {
    /// Returns true if every submitted item was persisted.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

//! Task types.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{MemberId, ProjectId, TaskId, TaskStatus, WorkspaceId};

/// A Task is a card on a project's board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,

    /// Workspace the task belongs to.
    pub workspace_id: WorkspaceId,

    /// Project the task belongs to.
    pub project_id: ProjectId,

    /// Member the task is assigned to.
    pub assignee_id: Option<MemberId>,

    /// Short title.
    pub name: String,

    /// Longer free-form description.
    pub description: Option<String>,

    /// Board column.
    pub status: TaskStatus,

    /// Sort key within the column.
    pub position: i64,

    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,

    /// When the task was created.
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Create a new Task in the given column at the given position.
    pub fn new(
        workspace_id: WorkspaceId,
        project_id: ProjectId,
        name: impl Into<String>,
        status: TaskStatus,
        position: i64,
    ) -> Self {
        Self {
            id: TaskId::generate(),
            workspace_id,
            project_id,
            assignee_id: None,
            name: name.into(),
            description: None,
            status,
            position,
            due_date: None,
            created_at: Utc::now(),
        }
    }

    /// Builder method to set a specific ID (useful for testing).
    pub fn with_id(mut self, id: TaskId) -> Self {
        self.id = id;
        self
    }

    /// Builder method to set the assignee.
    pub fn with_assignee(mut self, assignee_id: MemberId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Builder method to set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Builder method to set the due date.
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Filter for task listings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskFilter {
    pub workspace_id: WorkspaceId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<MemberId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    /// Matches tasks due on this calendar day (UTC).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    /// Case-insensitive substring match on the task name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl TaskFilter {
    /// Filter for every task of a workspace.
    pub fn workspace(workspace_id: WorkspaceId) -> Self {
        Self {
            workspace_id,
            ..Self::default()
        }
    }

    /// Restrict to one project.
    pub fn with_project(mut self, project_id: ProjectId) -> Self {
        self.project_id = Some(project_id);
        self
    }

    /// Check whether a task passes the filter.
    pub fn matches(&self, task: &Task) -> bool {
        if task.workspace_id != self.workspace_id {
            return false;
        }
        if let Some(ref project_id) = self.project_id {
            if &task.project_id != project_id {
                return false;
            }
        }
        if let Some(ref assignee_id) = self.assignee_id {
            if task.assignee_id.as_ref() != Some(assignee_id) {
                return false;
            }
        }
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(day) = self.due_date {
            if task.due_date.map(|d| d.date_naive()) != Some(day) {
                return false;
            }
        }
        if let Some(ref needle) = self.search {
            if !task.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

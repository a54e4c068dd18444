//! Assignment notifications.
//!
//! Delivery (email or otherwise) is handled outside this process; the
//! server only hands a notice to a [`Notifier`].

use chrono::{DateTime, Utc};
use tracing::info;

use taskboard_core::{MemberId, TaskId, UserId, WorkspaceId};

/// A task was assigned to a member.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentNotice {
    pub task_id: TaskId,
    pub task_name: String,
    pub workspace_id: WorkspaceId,
    pub workspace_name: String,
    pub project_name: String,
    pub assignee_id: MemberId,
    pub assignee_name: String,
    pub assignee_email: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub assigned_by: UserId,
}

/// Receives assignment notices.
pub trait Notifier: Send + Sync {
    fn task_assigned(&self, notice: &AssignmentNotice);
}

/// Notifier that only logs.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn task_assigned(&self, notice: &AssignmentNotice) {
        info!(
            task_id = %notice.task_id,
            task = %notice.task_name,
            workspace = %notice.workspace_name,
            project = %notice.project_name,
            assignee = %notice.assignee_name,
            email = ?notice.assignee_email,
            due_date = ?notice.due_date,
            assigned_by = %notice.assigned_by,
            "Task assigned"
        );
    }
}

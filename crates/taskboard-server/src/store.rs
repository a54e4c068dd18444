//! Task persistence boundary.
//!
//! Services read and write task placements only through [`TaskStore`], so
//! the in-memory [`AppState`] can be swapped for a hosted document store.

use async_trait::async_trait;
use tracing::{debug, warn};

use taskboard_core::{CoreError, Task, TaskFilter, TaskUpdate};

use crate::state::AppState;

/// Fetch and persist tasks.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks matching the filter, sorted by status then position.
    async fn list_tasks(&self, filter: &TaskFilter) -> Vec<Task>;

    /// Persist `(status, position)` writes.
    ///
    /// Every update is attempted; if any fail the error lists both the
    /// failed and the applied task ids.
    async fn apply_task_updates(&self, updates: &[TaskUpdate]) -> Result<(), CoreError>;
}

#[async_trait]
impl TaskStore for AppState {
    async fn list_tasks(&self, filter: &TaskFilter) -> Vec<Task> {
        let mut tasks: Vec<Task> = self
            .tasks
            .read()
            .await
            .values()
            .filter(|t| filter.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| {
            a.status
                .cmp(&b.status)
                .then(a.position.cmp(&b.position))
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        tasks
    }

    async fn apply_task_updates(&self, updates: &[TaskUpdate]) -> Result<(), CoreError> {
        // Whole batch under one write lock.
        let mut tasks = self.tasks.write().await;
        let mut applied = Vec::with_capacity(updates.len());
        let mut failed = Vec::new();

        for update in updates {
            match tasks.get_mut(&update.task_id) {
                Some(task) => {
                    task.status = update.status;
                    task.position = update.position;
                    applied.push(update.task_id.clone());
                }
                None => {
                    warn!(task_id = %update.task_id, "Task vanished before update");
                    failed.push(update.task_id.clone());
                }
            }
        }

        debug!(applied = applied.len(), failed = failed.len(), "Applied task updates");

        if failed.is_empty() {
            Ok(())
        } else {
            Err(CoreError::PartialUpdateFailure {
                failed,
                applied,
                rejected: Vec::new(),
            })
        }
    }
}

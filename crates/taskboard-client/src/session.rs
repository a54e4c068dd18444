//! Optimistic board session.
//!
//! The board is the project's full task list, never a capped listing, so
//! local plans see every neighbour. Moves are planned against it, shown at
//! once, then persisted through the bulk endpoint. A failed persist rolls the
//! view back to the last confirmed snapshot and re-fetches from the server.

use tracing::{info, warn};

use taskboard_core::wire::BulkUpdateRequest;
use taskboard_core::{
    plan_move, Board, BoardView, BulkUpdateItem, ProjectId, TaskId, TaskStatus, TaskUpdate,
};

use crate::error::ClientError;
use crate::http::HttpClient;

/// A board loaded from the server plus its optimistic view.
pub struct BoardSession {
    client: HttpClient,
    project_id: ProjectId,
    view: BoardView,
}

impl BoardSession {
    /// Fetch the project's board and build the initial view.
    pub async fn load(client: HttpClient, project_id: ProjectId) -> Result<Self, ClientError> {
        let tasks = client.project_board(&project_id).await?;
        Ok(Self {
            client,
            project_id,
            view: BoardView::new(Board::from_tasks(tasks)),
        })
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn view(&self) -> &BoardView {
        &self.view
    }

    /// Board as it should be rendered now.
    pub fn board(&self) -> &Board {
        self.view.current()
    }

    /// Move a task, rendering the plan before the server confirms it.
    ///
    /// Returns the persisted plan. On any failure the view is rolled back
    /// and re-fetched before the error is returned.
    pub async fn move_task(
        &mut self,
        task_id: &TaskId,
        column: TaskStatus,
        index: usize,
    ) -> Result<Vec<TaskUpdate>, ClientError> {
        let plan = plan_move(self.view.current(), task_id, column, index)?;
        self.view.stage(&plan);

        let request = BulkUpdateRequest {
            tasks: bulk_items(&plan),
        };
        let outcome = match self.client.bulk_update(&request).await {
            Ok(response) if response.is_complete() => Ok(()),
            Ok(response) => Err(ClientError::Rejected {
                task_ids: response.rejected.into_iter().map(|r| r.task_id).collect(),
            }),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(()) => {
                self.view.confirm();
                info!(task_id = %task_id, column = %column, updates = plan.len(), "Move saved");
                Ok(plan)
            }
            Err(e) => {
                warn!(task_id = %task_id, error = %e, "Move failed; rolling back");
                self.view.rollback();
                if let Err(refresh_err) = self.refresh().await {
                    warn!(error = %refresh_err, "Re-fetch after rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Replace the view with the server's current state.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        let tasks = self.client.project_board(&self.project_id).await?;
        self.view.reconcile(Board::from_tasks(tasks));
        Ok(())
    }
}

/// Encode a plan as bulk-update items.
pub fn bulk_items(updates: &[TaskUpdate]) -> Vec<BulkUpdateItem> {
    updates
        .iter()
        .map(|u| BulkUpdateItem {
            task_id: u.task_id.to_string(),
            status: u.status.as_str().to_string(),
            // Exact: positions never exceed MAX_POSITION.
            position: u.position as f64,
        })
        .collect()
}

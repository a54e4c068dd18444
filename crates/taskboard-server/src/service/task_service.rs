//! Task service: CRUD plus the two placement operations.
//!
//! Placement writes always go through the ordering engine and then the
//! [`TaskStore`] boundary; nothing here assigns positions by hand except
//! when a new task is appended to its column.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use taskboard_core::access::require_member;
use taskboard_core::ordering::validate_position;
use taskboard_core::wire::{
    BulkCreateTasksRequest, BulkUpdateRequest, BulkUpdateResponse, CreateTaskRequest,
    MoveTaskRequest, RejectedItem, TaskQuery, UpdateTaskRequest,
};
use taskboard_core::{
    append_position, plan_bulk_status_update, plan_move, ActingIdentity, Board, CoreError, Member,
    MemberId, ProjectId, RejectedUpdate, Task, TaskFilter, TaskId, TaskStatus, TaskUpdate,
    WorkspaceId, DEFAULT_POSITION,
};

use crate::notify::AssignmentNotice;
use crate::state::AppState;
use crate::store::TaskStore;

fn non_blank(value: &str, field: &str) -> Result<String, CoreError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CoreError::InvalidInput(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn require_assignee(members: &[Member], assignee_id: &MemberId) -> Result<(), CoreError> {
    if members.iter().any(|m| &m.id == assignee_id) {
        return Ok(());
    }
    Err(CoreError::InvalidInput(format!(
        "assignee {assignee_id} is not a workspace member"
    )))
}

/// Attach the batch's validation rejects to a store-level partial failure.
fn with_rejected(err: CoreError, rejected: Vec<RejectedUpdate>) -> CoreError {
    match err {
        CoreError::PartialUpdateFailure { failed, applied, .. } => CoreError::PartialUpdateFailure {
            failed,
            applied,
            rejected,
        },
        other => other,
    }
}

/// A validated create request. `position` is `None` when the task should
/// be appended to its column.
struct Draft {
    task: Task,
    position: Option<i64>,
}

/// Task operations.
pub struct TaskService {
    state: Arc<AppState>,
}

impl TaskService {
    /// Create a new TaskService.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Create a task. Without an explicit position it goes to the bottom
    /// of its column.
    pub async fn create_task(
        &self,
        identity: &ActingIdentity,
        req: CreateTaskRequest,
    ) -> Result<Task, CoreError> {
        let members = self.state.workspace_members(&req.workspace_id).await;
        require_member(&members, &req.workspace_id, identity)?;
        let draft = self.draft(&members, req).await?;
        self.insert(identity, draft).await
    }

    /// Create several tasks in one workspace.
    ///
    /// Every item is validated before the first one is stored, so a bad
    /// item fails the whole batch. Tasks without a position are appended in
    /// request order.
    pub async fn bulk_create_tasks(
        &self,
        identity: &ActingIdentity,
        req: BulkCreateTasksRequest,
    ) -> Result<Vec<Task>, CoreError> {
        let workspace_id = match req.tasks.first() {
            Some(first) => first.workspace_id.clone(),
            None => return Err(CoreError::InvalidInput("tasks must not be empty".to_string())),
        };
        if req.tasks.iter().any(|t| t.workspace_id != workspace_id) {
            return Err(CoreError::InvalidInput(
                "bulk create spans more than one workspace".to_string(),
            ));
        }
        let members = self.state.workspace_members(&workspace_id).await;
        require_member(&members, &workspace_id, identity)?;

        let mut drafts = Vec::with_capacity(req.tasks.len());
        for item in req.tasks {
            drafts.push(self.draft(&members, item).await?);
        }

        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            created.push(self.insert(identity, draft).await?);
        }
        info!(
            workspace_id = %workspace_id,
            user_id = %identity.user_id,
            count = created.len(),
            "Bulk created tasks"
        );
        Ok(created)
    }

    /// Tasks matching the query, capped at the configured page size.
    pub async fn list_tasks(
        &self,
        identity: &ActingIdentity,
        query: TaskQuery,
    ) -> Result<Vec<Task>, CoreError> {
        let filter = TaskFilter::try_from(query)?;
        self.state
            .membership(&filter.workspace_id, identity)
            .await?;

        let mut tasks = self.state.list_tasks(&filter).await;
        tasks.truncate(self.state.config.list_limit);
        Ok(tasks)
    }

    /// Every task of a project, in board order.
    ///
    /// Not capped by `list_limit`: moves must be planned against complete
    /// columns.
    pub async fn board_tasks(
        &self,
        identity: &ActingIdentity,
        project_id: &ProjectId,
    ) -> Result<Vec<Task>, CoreError> {
        let workspace_id = self
            .state
            .projects
            .read()
            .await
            .get(project_id)
            .map(|p| p.workspace_id.clone())
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;
        self.state.membership(&workspace_id, identity).await?;

        let filter = TaskFilter::workspace(workspace_id).with_project(project_id.clone());
        Ok(self.state.list_tasks(&filter).await)
    }

    pub async fn get_task(
        &self,
        identity: &ActingIdentity,
        task_id: &TaskId,
    ) -> Result<Task, CoreError> {
        let task = self.lookup(task_id).await?;
        self.state.membership(&task.workspace_id, identity).await?;
        Ok(task)
    }

    /// Edit a task. A status change sends the task to the bottom of the
    /// new column.
    pub async fn update_task(
        &self,
        identity: &ActingIdentity,
        task_id: &TaskId,
        req: UpdateTaskRequest,
    ) -> Result<Task, CoreError> {
        let existing = self.lookup(task_id).await?;
        let members = self.state.workspace_members(&existing.workspace_id).await;
        require_member(&members, &existing.workspace_id, identity)?;

        let status = req
            .status
            .as_deref()
            .map(str::parse::<TaskStatus>)
            .transpose()?;
        let name = req.name.as_deref().map(|n| non_blank(n, "name")).transpose()?;
        if let Some(assignee_id) = &req.assignee_id {
            require_assignee(&members, assignee_id)?;
        }

        let reassigned = {
            let mut tasks = self.state.tasks.write().await;
            let task = tasks
                .get_mut(task_id)
                .ok_or_else(|| CoreError::task_not_found(task_id))?;
            if let Some(name) = name {
                task.name = name;
            }
            if let Some(description) = req.description {
                task.description = Some(description).filter(|d| !d.trim().is_empty());
            }
            if let Some(due_date) = req.due_date {
                task.due_date = Some(due_date);
            }
            let previous = task.assignee_id.clone();
            if req.assignee_id.is_some() {
                task.assignee_id = req.assignee_id;
            } else if req.clear_assignee {
                task.assignee_id = None;
            }
            task.assignee_id.is_some() && task.assignee_id != previous
        };

        if let Some(status) = status.filter(|s| *s != existing.status) {
            let board = self
                .project_board(&existing.workspace_id, &existing.project_id)
                .await;
            let plan = plan_move(&board, task_id, status, usize::MAX)?;
            self.state.apply_task_updates(&plan).await?;
            debug!(task_id = %task_id, updates = plan.len(), "Status change re-placed task");
        }

        let task = self.lookup(task_id).await?;
        info!(task_id = %task_id, user_id = %identity.user_id, "Task updated");
        if reassigned {
            self.notify_assignment(identity, &task).await;
        }
        Ok(task)
    }

    pub async fn delete_task(
        &self,
        identity: &ActingIdentity,
        task_id: &TaskId,
    ) -> Result<TaskId, CoreError> {
        let task = self.lookup(task_id).await?;
        self.state.membership(&task.workspace_id, identity).await?;
        self.state.tasks.write().await.remove(task_id);
        info!(task_id = %task_id, user_id = %identity.user_id, "Task deleted");
        Ok(task_id.clone())
    }

    /// Move a task to `index` of the `status` column and persist the plan.
    pub async fn move_task(
        &self,
        identity: &ActingIdentity,
        task_id: &TaskId,
        req: MoveTaskRequest,
    ) -> Result<Vec<TaskUpdate>, CoreError> {
        let target_column: TaskStatus = req.status.parse()?;
        let task = self.lookup(task_id).await?;
        self.state.membership(&task.workspace_id, identity).await?;

        let board = self.project_board(&task.workspace_id, &task.project_id).await;
        let plan = plan_move(&board, task_id, target_column, req.index)?;
        self.state.apply_task_updates(&plan).await?;

        info!(
            task_id = %task_id,
            from = %task.status,
            to = %target_column,
            index = req.index,
            updates = plan.len(),
            "Task moved"
        );
        Ok(plan)
    }

    /// Persist a client-planned batch of placements.
    ///
    /// Malformed items are rejected individually; the rest are applied.
    /// Every existing task in the batch must live in a single workspace the
    /// caller belongs to.
    pub async fn bulk_update(
        &self,
        identity: &ActingIdentity,
        req: BulkUpdateRequest,
    ) -> Result<BulkUpdateResponse, CoreError> {
        let plan = plan_bulk_status_update(req.tasks);
        for rejected in &plan.rejected {
            warn!(task_id = %rejected.task_id, error = %rejected.error, "Rejected bulk item");
        }

        let workspaces: BTreeSet<WorkspaceId> = {
            let tasks = self.state.tasks.read().await;
            plan.updates
                .iter()
                .filter_map(|u| tasks.get(&u.task_id))
                .map(|t| t.workspace_id.clone())
                .collect()
        };
        if workspaces.len() > 1 {
            return Err(CoreError::InvalidInput(
                "bulk update spans more than one workspace".to_string(),
            ));
        }
        if let Some(workspace_id) = workspaces.first() {
            self.state.membership(workspace_id, identity).await?;
        }

        if !plan.updates.is_empty() {
            if let Err(err) = self.state.apply_task_updates(&plan.updates).await {
                return Err(with_rejected(err, plan.rejected));
            }
        }

        info!(
            user_id = %identity.user_id,
            applied = plan.updates.len(),
            rejected = plan.rejected.len(),
            "Bulk update"
        );
        Ok(BulkUpdateResponse {
            rejected: plan.rejected.iter().map(RejectedItem::from).collect(),
            applied: plan.updates,
        })
    }

    async fn draft(&self, members: &[Member], req: CreateTaskRequest) -> Result<Draft, CoreError> {
        let status: TaskStatus = req.status.parse()?;
        let position = req.position.map(validate_position).transpose()?;
        let name = non_blank(&req.name, "name")?;
        self.project_in_workspace(&req.project_id, &req.workspace_id)
            .await?;
        if let Some(assignee_id) = &req.assignee_id {
            require_assignee(members, assignee_id)?;
        }

        let mut task = Task::new(
            req.workspace_id,
            req.project_id,
            name,
            status,
            position.unwrap_or(DEFAULT_POSITION),
        );
        task.assignee_id = req.assignee_id;
        task.description = req.description.filter(|d| !d.trim().is_empty());
        task.due_date = req.due_date;
        Ok(Draft { task, position })
    }

    /// Store a drafted task, appending it to its column when it has no
    /// explicit position.
    async fn insert(&self, identity: &ActingIdentity, draft: Draft) -> Result<Task, CoreError> {
        let Draft { mut task, position } = draft;
        let mut renumber = false;
        if position.is_none() {
            let board = self.project_board(&task.workspace_id, &task.project_id).await;
            let column = board.column(task.status);
            match append_position(column) {
                Some(p) => task.position = p,
                None => {
                    // Tie with the last task; the move below renumbers the column.
                    task.position = column.last().map_or(DEFAULT_POSITION, |t| t.position);
                    renumber = true;
                }
            }
        }

        info!(
            task_id = %task.id,
            workspace_id = %task.workspace_id,
            status = %task.status,
            position = task.position,
            "Creating task"
        );
        self.state
            .tasks
            .write()
            .await
            .insert(task.id.clone(), task.clone());

        if renumber {
            let board = self.project_board(&task.workspace_id, &task.project_id).await;
            let plan = plan_move(&board, &task.id, task.status, usize::MAX)?;
            self.state.apply_task_updates(&plan).await?;
            debug!(task_id = %task.id, updates = plan.len(), "Column renumbered for append");
            task = self.lookup(&task.id).await?;
        }

        if task.assignee_id.is_some() {
            self.notify_assignment(identity, &task).await;
        }
        Ok(task)
    }

    async fn lookup(&self, task_id: &TaskId) -> Result<Task, CoreError> {
        self.state
            .tasks
            .read()
            .await
            .get(task_id)
            .cloned()
            .ok_or_else(|| CoreError::task_not_found(task_id))
    }

    async fn project_in_workspace(
        &self,
        project_id: &ProjectId,
        workspace_id: &WorkspaceId,
    ) -> Result<(), CoreError> {
        match self.state.projects.read().await.get(project_id) {
            Some(project) if &project.workspace_id == workspace_id => Ok(()),
            _ => Err(CoreError::not_found("Project", project_id)),
        }
    }

    async fn project_board(&self, workspace_id: &WorkspaceId, project_id: &ProjectId) -> Board {
        let filter = TaskFilter::workspace(workspace_id.clone()).with_project(project_id.clone());
        Board::from_tasks(self.state.list_tasks(&filter).await)
    }

    async fn notify_assignment(&self, identity: &ActingIdentity, task: &Task) {
        let Some(assignee_id) = &task.assignee_id else {
            return;
        };
        let assignee = self.state.members.read().await.get(assignee_id).cloned();
        let workspace_name = self
            .state
            .workspaces
            .read()
            .await
            .get(&task.workspace_id)
            .map(|w| w.name.clone());
        let project_name = self
            .state
            .projects
            .read()
            .await
            .get(&task.project_id)
            .map(|p| p.name.clone());

        let (Some(assignee), Some(workspace_name), Some(project_name)) =
            (assignee, workspace_name, project_name)
        else {
            warn!(task_id = %task.id, "Skipping assignment notice for incomplete task context");
            return;
        };

        self.state.notifier.task_assigned(&AssignmentNotice {
            task_id: task.id.clone(),
            task_name: task.name.clone(),
            workspace_id: task.workspace_id.clone(),
            workspace_name,
            project_name,
            assignee_id: assignee.id,
            assignee_name: assignee.name,
            assignee_email: assignee.email,
            due_date: task.due_date,
            assigned_by: identity.user_id.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::notify::testing::RecordingNotifier;
    use crate::service::testing::{alice, bob, mallory, project, workspace_with_bob};
    use taskboard_core::wire::CreateWorkspaceRequest;
    use taskboard_core::{BulkUpdateItem, Project, Workspace, MAX_POSITION};

    use crate::service::WorkspaceService;

    fn create(ws: &Workspace, project: &Project, name: &str, status: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            workspace_id: ws.id.clone(),
            project_id: project.id.clone(),
            name: name.to_string(),
            status: status.to_string(),
            assignee_id: None,
            description: None,
            due_date: None,
            position: None,
        }
    }

    async fn setup() -> (Arc<AppState>, TaskService, Workspace, Project) {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        (state.clone(), TaskService::new(state), ws, project)
    }

    async fn column_order(service: &TaskService, ws: &Workspace, status: &str) -> Vec<(String, i64)> {
        let query = TaskQuery {
            workspace_id: ws.id.clone(),
            status: Some(status.to_string()),
            ..TaskQuery::default()
        };
        service
            .list_tasks(&alice(), query)
            .await
            .unwrap()
            .into_iter()
            .map(|t| (t.name, t.position))
            .collect()
    }

    #[tokio::test]
    async fn test_create_appends_to_column() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();
        let b = service.create_task(&bob(), create(&ws, &project, "B", "TODO")).await.unwrap();
        let c = service.create_task(&bob(), create(&ws, &project, "C", "DONE")).await.unwrap();

        assert_eq!(a.position, 1000);
        assert_eq!(b.position, 2000);
        assert_eq!(c.position, 1000);
    }

    #[tokio::test]
    async fn test_create_validates_input() {
        let (_, service, ws, project) = setup().await;

        let err = service
            .create_task(&alice(), create(&ws, &project, "A", "LATER"))
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::InvalidColumn("LATER".to_string()));

        let mut req = create(&ws, &project, "A", "TODO");
        req.position = Some(1.5);
        let err = service.create_task(&alice(), req).await.unwrap_err();
        assert_eq!(err.code(), "invalid_position");

        let err = service
            .create_task(&mallory(), create(&ws, &project, "A", "TODO"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unauthorized");

        let mut req = create(&ws, &project, "A", "TODO");
        req.assignee_id = Some(MemberId::new("ghost"));
        let err = service.create_task(&alice(), req).await.unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[tokio::test]
    async fn test_project_must_belong_to_workspace() {
        let (state, service, _, project) = setup().await;
        let other = WorkspaceService::new(state.clone())
            .create_workspace(
                &alice(),
                CreateWorkspaceRequest {
                    name: "Other".to_string(),
                    image_url: None,
                },
            )
            .await
            .unwrap();

        let err = service
            .create_task(&alice(), create(&other, &project, "A", "TODO"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn test_move_to_top_halves_first_position() {
        let (_, service, ws, project) = setup().await;
        service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();
        let b = service.create_task(&alice(), create(&ws, &project, "B", "TODO")).await.unwrap();

        let plan = service
            .move_task(
                &bob(),
                &b.id,
                MoveTaskRequest {
                    status: "TODO".to_string(),
                    index: 0,
                },
            )
            .await
            .unwrap();
        assert_eq!(plan, vec![TaskUpdate::new(b.id.clone(), TaskStatus::Todo, 500)]);
        assert_eq!(
            column_order(&service, &ws, "TODO").await,
            vec![("B".to_string(), 500), ("A".to_string(), 1000)]
        );

        // Same move again changes nothing.
        let again = service
            .move_task(
                &bob(),
                &b.id,
                MoveTaskRequest {
                    status: "TODO".to_string(),
                    index: 0,
                },
            )
            .await
            .unwrap();
        assert_eq!(again, plan);
    }

    #[tokio::test]
    async fn test_move_into_empty_column() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();

        let plan = service
            .move_task(
                &alice(),
                &a.id,
                MoveTaskRequest {
                    status: "DONE".to_string(),
                    index: 0,
                },
            )
            .await
            .unwrap();
        assert_eq!(plan, vec![TaskUpdate::new(a.id.clone(), TaskStatus::Done, 1000)]);
        assert_eq!(service.get_task(&alice(), &a.id).await.unwrap().status, TaskStatus::Done);
    }

    #[tokio::test]
    async fn test_move_renumbers_exhausted_gap() {
        let (_, service, ws, project) = setup().await;
        for (name, position) in [("A", 1.0), ("B", 2.0)] {
            let mut req = create(&ws, &project, name, "TODO");
            req.position = Some(position);
            service.create_task(&alice(), req).await.unwrap();
        }
        let c = service.create_task(&alice(), create(&ws, &project, "C", "DONE")).await.unwrap();

        service
            .move_task(
                &alice(),
                &c.id,
                MoveTaskRequest {
                    status: "TODO".to_string(),
                    index: 1,
                },
            )
            .await
            .unwrap();
        assert_eq!(
            column_order(&service, &ws, "TODO").await,
            vec![
                ("A".to_string(), 1000),
                ("C".to_string(), 2000),
                ("B".to_string(), 3000)
            ]
        );
    }

    #[tokio::test]
    async fn test_move_renumber_persists_every_rewritten_task() {
        let (_, service, ws, project) = setup().await;
        let mut ids = Vec::new();
        for (name, position) in [("A", 1.0), ("B", 2.0), ("C", 3.0)] {
            let mut req = create(&ws, &project, name, "TODO");
            req.position = Some(position);
            ids.push(service.create_task(&alice(), req).await.unwrap().id);
        }
        let d = service.create_task(&alice(), create(&ws, &project, "D", "DONE")).await.unwrap();
        let e = service.create_task(&alice(), create(&ws, &project, "E", "DONE")).await.unwrap();

        let plan = service
            .move_task(
                &bob(),
                &d.id,
                MoveTaskRequest {
                    status: "TODO".to_string(),
                    index: 2,
                },
            )
            .await
            .unwrap();
        assert_eq!(plan.len(), 4);
        assert!(plan.iter().all(|u| u.status == TaskStatus::Todo));

        // The stored records agree with the returned plan.
        for update in &plan {
            let stored = service.get_task(&alice(), &update.task_id).await.unwrap();
            assert_eq!((stored.status, stored.position), (update.status, update.position));
        }
        assert_eq!(
            column_order(&service, &ws, "TODO").await,
            vec![
                ("A".to_string(), 1000),
                ("B".to_string(), 2000),
                ("D".to_string(), 3000),
                ("C".to_string(), 4000)
            ]
        );
        // The source column is left alone.
        assert_eq!(service.get_task(&alice(), &e.id).await.unwrap().position, 2000);
        assert_eq!(
            column_order(&service, &ws, "DONE").await,
            vec![("E".to_string(), 2000)]
        );
    }

    #[tokio::test]
    async fn test_append_past_max_position_renumbers_column() {
        let (_, service, ws, project) = setup().await;
        let mut req = create(&ws, &project, "A", "TODO");
        req.position = Some((MAX_POSITION - 10) as f64);
        let a = service.create_task(&alice(), req).await.unwrap();
        assert_eq!(a.position, MAX_POSITION - 10);

        let b = service.create_task(&alice(), create(&ws, &project, "B", "TODO")).await.unwrap();
        assert_eq!(b.position, 2000);
        assert_eq!(
            column_order(&service, &ws, "TODO").await,
            vec![("A".to_string(), 1000), ("B".to_string(), 2000)]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_position_beyond_exact_range() {
        let (_, service, ws, project) = setup().await;
        let mut req = create(&ws, &project, "A", "TODO");
        req.position = Some(9_007_199_254_740_992.0);
        let err = service.create_task(&alice(), req).await.unwrap_err();
        assert_eq!(err.code(), "invalid_position");
    }

    #[tokio::test]
    async fn test_move_rejects_unknown_column_and_task() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();

        let err = service
            .move_task(
                &alice(),
                &a.id,
                MoveTaskRequest {
                    status: "ARCHIVED".to_string(),
                    index: 0,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_column");

        let err = service
            .move_task(
                &alice(),
                &TaskId::new("missing"),
                MoveTaskRequest {
                    status: "TODO".to_string(),
                    index: 0,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::task_not_found("missing"));
    }

    #[tokio::test]
    async fn test_update_status_sends_task_to_bottom() {
        let (_, service, ws, project) = setup().await;
        service.create_task(&alice(), create(&ws, &project, "A", "DONE")).await.unwrap();
        let b = service.create_task(&alice(), create(&ws, &project, "B", "TODO")).await.unwrap();

        let updated = service
            .update_task(
                &bob(),
                &b.id,
                UpdateTaskRequest {
                    status: Some("DONE".to_string()),
                    name: Some("B2".to_string()),
                    ..UpdateTaskRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.position, 2000);
        assert_eq!(updated.name, "B2");
    }

    #[tokio::test]
    async fn test_assignment_notifies() {
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::with_notifier(Config::default(), notifier.clone());
        let (ws, _, bob_member) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = TaskService::new(state.clone());

        let mut req = create(&ws, &project, "A", "TODO");
        req.assignee_id = Some(bob_member.id.clone());
        let task = service.create_task(&alice(), req).await.unwrap();

        // Re-assigning the same member is not a new assignment.
        service
            .update_task(
                &alice(),
                &task.id,
                UpdateTaskRequest {
                    assignee_id: Some(bob_member.id.clone()),
                    ..UpdateTaskRequest::default()
                },
            )
            .await
            .unwrap();

        let notices = notifier.notices.lock().unwrap();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].assignee_name, "Bob");
        assert_eq!(notices[0].project_name, "Website");
        assert_eq!(notices[0].assigned_by.as_str(), "alice");
    }

    #[tokio::test]
    async fn test_clear_assignee() {
        let (state, service, ws, project) = setup().await;
        let bob_member = state.membership(&ws.id, &bob()).await.unwrap();
        let mut req = create(&ws, &project, "A", "TODO");
        req.assignee_id = Some(bob_member.id);
        let task = service.create_task(&alice(), req).await.unwrap();

        let updated = service
            .update_task(
                &alice(),
                &task.id,
                UpdateTaskRequest {
                    clear_assignee: true,
                    ..UpdateTaskRequest::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.assignee_id, None);
    }

    #[tokio::test]
    async fn test_list_is_capped() {
        let state = AppState::with_config(Config {
            list_limit: 2,
            ..Config::default()
        });
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = TaskService::new(state.clone());
        for name in ["A", "B", "C"] {
            service.create_task(&alice(), create(&ws, &project, name, "TODO")).await.unwrap();
        }

        let tasks = service
            .list_tasks(
                &alice(),
                TaskQuery {
                    workspace_id: ws.id.clone(),
                    ..TaskQuery::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(tasks.len(), 2);
    }

    #[tokio::test]
    async fn test_bulk_applies_valid_items_and_reports_rejects() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();
        let b = service.create_task(&alice(), create(&ws, &project, "B", "TODO")).await.unwrap();

        let response = service
            .bulk_update(
                &bob(),
                BulkUpdateRequest {
                    tasks: vec![
                        BulkUpdateItem {
                            task_id: a.id.to_string(),
                            status: "IN_REVIEW".to_string(),
                            position: 1000.0,
                        },
                        BulkUpdateItem {
                            task_id: b.id.to_string(),
                            status: "SOMEDAY".to_string(),
                            position: 2000.0,
                        },
                        BulkUpdateItem {
                            task_id: b.id.to_string(),
                            status: "DONE".to_string(),
                            position: f64::NAN,
                        },
                    ],
                },
            )
            .await
            .unwrap();

        assert_eq!(response.applied.len(), 1);
        let codes: Vec<&str> = response.rejected.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(codes, vec!["invalid_column", "invalid_position"]);
        assert_eq!(
            service.get_task(&alice(), &a.id).await.unwrap().status,
            TaskStatus::InReview
        );
        assert_eq!(service.get_task(&alice(), &b.id).await.unwrap().status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn test_bulk_missing_task_is_partial_failure() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();

        let item = |id: &str| BulkUpdateItem {
            task_id: id.to_string(),
            status: "DONE".to_string(),
            position: 1000.0,
        };
        let err = service
            .bulk_update(
                &alice(),
                BulkUpdateRequest {
                    tasks: vec![item(a.id.as_str()), item("gone")],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::PartialUpdateFailure {
                failed: vec![TaskId::new("gone")],
                applied: vec![a.id.clone()],
                rejected: Vec::new(),
            }
        );
    }

    #[tokio::test]
    async fn test_bulk_partial_failure_keeps_rejected_items() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();

        let err = service
            .bulk_update(
                &alice(),
                BulkUpdateRequest {
                    tasks: vec![
                        BulkUpdateItem {
                            task_id: a.id.to_string(),
                            status: "DONE".to_string(),
                            position: 1000.0,
                        },
                        BulkUpdateItem {
                            task_id: a.id.to_string(),
                            status: "SOMEDAY".to_string(),
                            position: 2000.0,
                        },
                        BulkUpdateItem {
                            task_id: "gone".to_string(),
                            status: "DONE".to_string(),
                            position: 3000.0,
                        },
                    ],
                },
            )
            .await
            .unwrap_err();

        match err {
            CoreError::PartialUpdateFailure {
                failed,
                applied,
                rejected,
            } => {
                assert_eq!(failed, vec![TaskId::new("gone")]);
                assert_eq!(applied, vec![a.id.clone()]);
                assert_eq!(rejected.len(), 1);
                assert_eq!(rejected[0].task_id, a.id.as_str());
                assert_eq!(rejected[0].error, CoreError::InvalidColumn("SOMEDAY".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_bulk_requires_membership() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();

        let err = service
            .bulk_update(
                &mallory(),
                BulkUpdateRequest {
                    tasks: vec![BulkUpdateItem {
                        task_id: a.id.to_string(),
                        status: "DONE".to_string(),
                        position: 1000.0,
                    }],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unauthorized");
        assert_eq!(service.get_task(&alice(), &a.id).await.unwrap().status, TaskStatus::Todo);
    }

    #[tokio::test]
    async fn test_board_tasks_ignores_list_limit() {
        let state = AppState::with_config(Config {
            list_limit: 2,
            ..Config::default()
        });
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = TaskService::new(state.clone());
        for (name, status) in [("A", "TODO"), ("B", "TODO"), ("C", "DONE")] {
            service.create_task(&alice(), create(&ws, &project, name, status)).await.unwrap();
        }

        let tasks = service.board_tasks(&bob(), &project.id).await.unwrap();
        let names: Vec<&str> = tasks.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);

        let err = service.board_tasks(&mallory(), &project.id).await.unwrap_err();
        assert_eq!(err.code(), "unauthorized");
        let err = service
            .board_tasks(&alice(), &ProjectId::new("missing"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn test_bulk_create_appends_in_request_order() {
        let (_, service, ws, project) = setup().await;
        service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();

        let created = service
            .bulk_create_tasks(
                &bob(),
                BulkCreateTasksRequest {
                    tasks: vec![
                        create(&ws, &project, "B", "TODO"),
                        create(&ws, &project, "C", "TODO"),
                        create(&ws, &project, "D", "DONE"),
                    ],
                },
            )
            .await
            .unwrap();
        let placed: Vec<(&str, i64)> = created.iter().map(|t| (t.name.as_str(), t.position)).collect();
        assert_eq!(placed, vec![("B", 2000), ("C", 3000), ("D", 1000)]);
    }

    #[tokio::test]
    async fn test_bulk_create_is_all_or_nothing() {
        let (state, service, ws, project) = setup().await;

        let err = service
            .bulk_create_tasks(
                &alice(),
                BulkCreateTasksRequest {
                    tasks: vec![
                        create(&ws, &project, "B", "TODO"),
                        create(&ws, &project, " ", "TODO"),
                    ],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");
        assert!(state.tasks.read().await.is_empty());

        let err = service
            .bulk_create_tasks(&alice(), BulkCreateTasksRequest { tasks: vec![] })
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");

        let err = service
            .bulk_create_tasks(
                &mallory(),
                BulkCreateTasksRequest {
                    tasks: vec![create(&ws, &project, "B", "TODO")],
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unauthorized");
    }

    #[tokio::test]
    async fn test_delete_task() {
        let (_, service, ws, project) = setup().await;
        let a = service.create_task(&alice(), create(&ws, &project, "A", "TODO")).await.unwrap();

        assert!(service.delete_task(&mallory(), &a.id).await.is_err());
        service.delete_task(&bob(), &a.id).await.unwrap();
        let err = service.get_task(&alice(), &a.id).await.unwrap_err();
        assert_eq!(err.code(), "not_found");
    }
}

use std::sync::Arc;

use tracing::info;

use taskboard_core::access::require_admin;
use taskboard_core::wire::{CreateProjectRequest, UpdateProjectRequest};
use taskboard_core::workspace::split_comma_list;
use taskboard_core::{ActingIdentity, CoreError, Project, ProjectId, WorkspaceId};

use crate::state::AppState;

/// Project operations.
pub struct ProjectService {
    state: Arc<AppState>,
}

impl ProjectService {
    /// Create a new ProjectService.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Create a project. Any member may do this.
    pub async fn create_project(
        &self,
        identity: &ActingIdentity,
        req: CreateProjectRequest,
    ) -> Result<Project, CoreError> {
        self.state.membership(&req.workspace_id, identity).await?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("name is required".to_string()));
        }

        let mut project = Project::new(req.workspace_id, name);
        project.image_url = req.image_url.filter(|u| !u.is_empty());
        project.tech_stack = split_comma_list(&req.tech_stack);

        info!(
            project_id = %project.id,
            workspace_id = %project.workspace_id,
            "Creating project"
        );
        self.state
            .projects
            .write()
            .await
            .insert(project.id.clone(), project.clone());
        Ok(project)
    }

    /// Projects in a workspace, oldest first.
    pub async fn list_projects(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<Project>, CoreError> {
        self.state.membership(workspace_id, identity).await?;
        let mut projects: Vec<Project> = self
            .state
            .projects
            .read()
            .await
            .values()
            .filter(|p| &p.workspace_id == workspace_id)
            .cloned()
            .collect();
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(projects)
    }

    pub async fn get_project(
        &self,
        identity: &ActingIdentity,
        project_id: &ProjectId,
    ) -> Result<Project, CoreError> {
        let project = self.lookup(project_id).await?;
        self.state.membership(&project.workspace_id, identity).await?;
        Ok(project)
    }

    pub async fn update_project(
        &self,
        identity: &ActingIdentity,
        project_id: &ProjectId,
        req: UpdateProjectRequest,
    ) -> Result<Project, CoreError> {
        let existing = self.lookup(project_id).await?;
        self.state
            .membership(&existing.workspace_id, identity)
            .await?;
        let name = match req.name.as_deref().map(str::trim) {
            Some("") => return Err(CoreError::InvalidInput("name is required".to_string())),
            other => other.map(str::to_string),
        };

        let mut projects = self.state.projects.write().await;
        let project = projects
            .get_mut(project_id)
            .ok_or_else(|| CoreError::not_found("Project", project_id))?;
        if let Some(name) = name {
            project.name = name;
        }
        if let Some(image_url) = req.image_url {
            project.image_url = Some(image_url).filter(|u| !u.is_empty());
        }
        Ok(project.clone())
    }

    /// Delete a project with its tasks and stories. ADMIN only.
    pub async fn delete_project(
        &self,
        identity: &ActingIdentity,
        project_id: &ProjectId,
    ) -> Result<ProjectId, CoreError> {
        let project = self.lookup(project_id).await?;
        let actor = self.state.membership(&project.workspace_id, identity).await?;
        require_admin(&actor)?;

        self.state.projects.write().await.remove(project_id);
        let tasks_deleted = {
            let mut tasks = self.state.tasks.write().await;
            let before = tasks.len();
            tasks.retain(|_, t| &t.project_id != project_id);
            before - tasks.len()
        };
        self.state
            .stories
            .write()
            .await
            .retain(|_, s| &s.project_id != project_id);

        info!(project_id = %project_id, tasks_deleted, "Project deleted");
        Ok(project_id.clone())
    }

    async fn lookup(&self, project_id: &ProjectId) -> Result<Project, CoreError> {
        self.state
            .projects
            .read()
            .await
            .get(project_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Project", project_id))
    }
}

use std::sync::Arc;

use tracing::info;

use taskboard_core::wire::{
    BulkCreateTasksRequest, CreateStoryRequest, CreateStoryTasksRequest, CreateTaskRequest,
    StoryQuery,
};
use taskboard_core::{ActingIdentity, CoreError, StoryId, Task, TaskStatus, UserStory};

use crate::state::AppState;

use super::TaskService;

/// User story operations. Any workspace member may use them.
pub struct StoryService {
    state: Arc<AppState>,
    tasks: TaskService,
}

impl StoryService {
    /// Create a new StoryService.
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            tasks: TaskService::new(state.clone()),
            state,
        }
    }

    pub async fn create_story(
        &self,
        identity: &ActingIdentity,
        req: CreateStoryRequest,
    ) -> Result<UserStory, CoreError> {
        self.state.membership(&req.workspace_id, identity).await?;
        let description = req.description.trim();
        if description.is_empty() {
            return Err(CoreError::InvalidInput("description is required".to_string()));
        }
        match self.state.projects.read().await.get(&req.project_id) {
            Some(project) if project.workspace_id == req.workspace_id => {}
            _ => return Err(CoreError::not_found("Project", &req.project_id)),
        }

        let mut story = UserStory::new(req.workspace_id, req.project_id, description);
        story.acceptance_criteria = req.acceptance_criteria.filter(|c| !c.trim().is_empty());

        info!(
            story_id = %story.id,
            project_id = %story.project_id,
            "Creating story"
        );
        self.state
            .stories
            .write()
            .await
            .insert(story.id.clone(), story.clone());
        Ok(story)
    }

    /// Stories in a workspace, optionally narrowed to one project, oldest first.
    pub async fn list_stories(
        &self,
        identity: &ActingIdentity,
        query: StoryQuery,
    ) -> Result<Vec<UserStory>, CoreError> {
        self.state.membership(&query.workspace_id, identity).await?;
        let mut stories: Vec<UserStory> = self
            .state
            .stories
            .read()
            .await
            .values()
            .filter(|s| s.workspace_id == query.workspace_id)
            .filter(|s| query.project_id.as_ref().map_or(true, |p| &s.project_id == p))
            .cloned()
            .collect();
        stories.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(stories)
    }

    pub async fn get_story(
        &self,
        identity: &ActingIdentity,
        story_id: &StoryId,
    ) -> Result<UserStory, CoreError> {
        let story = self.lookup(story_id).await?;
        self.state.membership(&story.workspace_id, identity).await?;
        Ok(story)
    }

    /// Delete a story. Tasks created from it stay on the board.
    pub async fn delete_story(
        &self,
        identity: &ActingIdentity,
        story_id: &StoryId,
    ) -> Result<StoryId, CoreError> {
        let story = self.lookup(story_id).await?;
        self.state.membership(&story.workspace_id, identity).await?;
        self.state.stories.write().await.remove(story_id);
        info!(story_id = %story_id, user_id = %identity.user_id, "Story deleted");
        Ok(story_id.clone())
    }

    /// Create a batch of tasks in the story's project, appended to the
    /// bottom of one column.
    pub async fn create_story_tasks(
        &self,
        identity: &ActingIdentity,
        story_id: &StoryId,
        req: CreateStoryTasksRequest,
    ) -> Result<Vec<Task>, CoreError> {
        let story = self.lookup(story_id).await?;
        self.state.membership(&story.workspace_id, identity).await?;
        let status = match req.status {
            Some(raw) => raw.parse::<TaskStatus>()?,
            None => TaskStatus::Backlog,
        };

        let tasks = req
            .tasks
            .into_iter()
            .map(|draft| CreateTaskRequest {
                workspace_id: story.workspace_id.clone(),
                project_id: story.project_id.clone(),
                name: draft.name,
                status: status.to_string(),
                assignee_id: None,
                description: draft.description,
                due_date: None,
                position: None,
            })
            .collect();
        let created = self
            .tasks
            .bulk_create_tasks(identity, BulkCreateTasksRequest { tasks })
            .await?;
        info!(story_id = %story_id, count = created.len(), "Tasks created from story");
        Ok(created)
    }

    async fn lookup(&self, story_id: &StoryId) -> Result<UserStory, CoreError> {
        self.state
            .stories
            .read()
            .await
            .get(story_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Story", story_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{alice, bob, mallory, project, workspace_with_bob};
    use taskboard_core::wire::StoryTaskDraft;
    use taskboard_core::{ProjectId, WorkspaceId};

    fn request(ws: &WorkspaceId, project_id: &ProjectId) -> CreateStoryRequest {
        CreateStoryRequest {
            workspace_id: ws.clone(),
            project_id: project_id.clone(),
            description: "As a user I can reorder tasks".to_string(),
            acceptance_criteria: Some("Order survives a reload".to_string()),
        }
    }

    fn drafts(names: &[&str]) -> Vec<StoryTaskDraft> {
        names
            .iter()
            .map(|name| StoryTaskDraft {
                name: name.to_string(),
                description: None,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_create_and_list_stories() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = StoryService::new(state.clone());

        let story = service
            .create_story(&bob(), request(&ws.id, &project.id))
            .await
            .unwrap();
        assert_eq!(story.description, "As a user I can reorder tasks");

        let listed = service
            .list_stories(
                &alice(),
                StoryQuery {
                    workspace_id: ws.id.clone(),
                    project_id: Some(project.id.clone()),
                },
            )
            .await
            .unwrap();
        assert_eq!(listed, vec![story.clone()]);
        assert_eq!(service.get_story(&alice(), &story.id).await.unwrap(), story);

        let err = service.get_story(&mallory(), &story.id).await.unwrap_err();
        assert_eq!(err.code(), "unauthorized");
    }

    #[tokio::test]
    async fn test_create_story_validates_input() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = StoryService::new(state.clone());

        let mut req = request(&ws.id, &project.id);
        req.description = "  ".to_string();
        let err = service.create_story(&alice(), req).await.unwrap_err();
        assert_eq!(err.code(), "invalid_input");

        let err = service
            .create_story(&alice(), request(&ws.id, &ProjectId::new("missing")))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "not_found");

        let err = service
            .create_story(&mallory(), request(&ws.id, &project.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unauthorized");
    }

    #[tokio::test]
    async fn test_story_tasks_default_to_backlog() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = StoryService::new(state.clone());
        let story = service
            .create_story(&alice(), request(&ws.id, &project.id))
            .await
            .unwrap();

        let created = service
            .create_story_tasks(
                &bob(),
                &story.id,
                CreateStoryTasksRequest {
                    status: None,
                    tasks: drafts(&["Schema", "Endpoint"]),
                },
            )
            .await
            .unwrap();
        let placed: Vec<(&str, TaskStatus, i64)> = created
            .iter()
            .map(|t| (t.name.as_str(), t.status, t.position))
            .collect();
        assert_eq!(
            placed,
            vec![
                ("Schema", TaskStatus::Backlog, 1000),
                ("Endpoint", TaskStatus::Backlog, 2000)
            ]
        );
        assert!(created.iter().all(|t| t.project_id == project.id));
    }

    #[tokio::test]
    async fn test_story_tasks_reject_bad_column() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = StoryService::new(state.clone());
        let story = service
            .create_story(&alice(), request(&ws.id, &project.id))
            .await
            .unwrap();

        let err = service
            .create_story_tasks(
                &alice(),
                &story.id,
                CreateStoryTasksRequest {
                    status: Some("LATER".to_string()),
                    tasks: drafts(&["Schema"]),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, CoreError::InvalidColumn("LATER".to_string()));
        assert!(state.tasks.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_story_keeps_tasks() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let project = project(&state, &ws).await;
        let service = StoryService::new(state.clone());
        let story = service
            .create_story(&alice(), request(&ws.id, &project.id))
            .await
            .unwrap();
        service
            .create_story_tasks(
                &alice(),
                &story.id,
                CreateStoryTasksRequest {
                    status: Some("TODO".to_string()),
                    tasks: drafts(&["Schema"]),
                },
            )
            .await
            .unwrap();

        assert!(service.delete_story(&mallory(), &story.id).await.is_err());
        service.delete_story(&bob(), &story.id).await.unwrap();
        let err = service.get_story(&alice(), &story.id).await.unwrap_err();
        assert_eq!(err.code(), "not_found");
        assert_eq!(state.tasks.read().await.len(), 1);
    }
}

//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use taskboard_core::access::require_member;
use taskboard_core::{
    ActingIdentity, CoreError, Member, MemberId, Project, ProjectId, StoryId, Task, TaskId, Team,
    TeamId, UserStory, Workspace, WorkspaceId,
};

use crate::config::Config;
use crate::notify::{LogNotifier, Notifier};

/// Shared application state.
///
/// When more than one map is locked at once, locks are taken in field
/// order.
pub struct AppState {
    /// Workspaces indexed by WorkspaceId.
    pub workspaces: RwLock<HashMap<WorkspaceId, Workspace>>,

    /// Members of every workspace indexed by MemberId.
    pub members: RwLock<HashMap<MemberId, Member>>,

    /// Projects indexed by ProjectId.
    pub projects: RwLock<HashMap<ProjectId, Project>>,

    /// Tasks indexed by TaskId.
    pub tasks: RwLock<HashMap<TaskId, Task>>,

    /// Teams indexed by TeamId.
    pub teams: RwLock<HashMap<TeamId, Team>>,

    /// User stories indexed by StoryId.
    pub stories: RwLock<HashMap<StoryId, UserStory>>,

    /// Sink for assignment notifications.
    pub notifier: Arc<dyn Notifier>,

    /// Server configuration.
    pub config: Config,
}

impl AppState {
    /// Create a new AppState with default configuration.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Create a new AppState with the given configuration.
    pub fn with_config(config: Config) -> Arc<Self> {
        Arc::new(Self {
            config,
            ..Self::default()
        })
    }

    /// Create a new AppState with a custom notifier.
    pub fn with_notifier(config: Config, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Arc::new(Self {
            config,
            notifier,
            ..Self::default()
        })
    }

    /// All members of a workspace, oldest first.
    ///
    /// This is a snapshot. Checks that must hold when a membership is
    /// written run against [`members_of`] under the `members` write lock.
    pub async fn workspace_members(&self, workspace_id: &WorkspaceId) -> Vec<Member> {
        members_of(&*self.members.read().await, workspace_id)
    }

    /// The identity's membership in a workspace.
    pub async fn membership(
        &self,
        workspace_id: &WorkspaceId,
        identity: &ActingIdentity,
    ) -> Result<Member, CoreError> {
        let members = self.workspace_members(workspace_id).await;
        require_member(&members, workspace_id, identity).cloned()
    }

    /// Get the number of workspaces.
    pub async fn workspace_count(&self) -> usize {
        self.workspaces.read().await.len()
    }

    /// Get the number of tasks.
    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }
}

/// Members of one workspace taken from an already locked map, oldest first.
pub fn members_of(members: &HashMap<MemberId, Member>, workspace_id: &WorkspaceId) -> Vec<Member> {
    let mut result: Vec<Member> = members
        .values()
        .filter(|m| &m.workspace_id == workspace_id)
        .cloned()
        .collect();
    result.sort_by(|a, b| a.joined_at.cmp(&b.joined_at).then(a.id.cmp(&b.id)));
    result
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            workspaces: RwLock::new(HashMap::new()),
            members: RwLock::new(HashMap::new()),
            projects: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
            teams: RwLock::new(HashMap::new()),
            stories: RwLock::new(HashMap::new()),
            notifier: Arc::new(LogNotifier),
            config: Config::default(),
        }
    }
}

//! Workspace lifecycle: create, join by invite code, admin actions.

use std::sync::Arc;

use rand::distributions::Alphanumeric;
use rand::Rng;
use tracing::info;

use taskboard_core::access::require_admin;
use taskboard_core::wire::{CreateWorkspaceRequest, JoinWorkspaceRequest, UpdateWorkspaceRequest};
use taskboard_core::workspace::INVITE_CODE_LEN;
use taskboard_core::{ActingIdentity, CoreError, Member, MemberRole, Workspace, WorkspaceId};

use crate::state::AppState;

/// Generate a random alphanumeric invite code.
pub fn generate_invite_code() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(INVITE_CODE_LEN)
        .map(char::from)
        .collect()
}

fn required_name(name: &str) -> Result<String, CoreError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::InvalidInput("name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Workspace operations.
pub struct WorkspaceService {
    state: Arc<AppState>,
}

impl WorkspaceService {
    /// Create a new WorkspaceService.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Create a workspace; the creator becomes its first ADMIN.
    pub async fn create_workspace(
        &self,
        identity: &ActingIdentity,
        req: CreateWorkspaceRequest,
    ) -> Result<Workspace, CoreError> {
        let name = required_name(&req.name)?;
        let mut workspace = Workspace::new(name, identity.user_id.clone(), generate_invite_code());
        workspace.image_url = req.image_url.filter(|u| !u.is_empty());

        let admin = Member::new(
            workspace.id.clone(),
            identity.user_id.clone(),
            MemberRole::Admin,
        )
        .with_profile(identity.name.clone(), identity.email.clone());

        info!(
            workspace_id = %workspace.id,
            user_id = %identity.user_id,
            "Creating workspace"
        );

        self.state
            .workspaces
            .write()
            .await
            .insert(workspace.id.clone(), workspace.clone());
        self.state
            .members
            .write()
            .await
            .insert(admin.id.clone(), admin);

        Ok(workspace)
    }

    /// Workspaces the identity belongs to, oldest first.
    pub async fn list_workspaces(&self, identity: &ActingIdentity) -> Vec<Workspace> {
        let workspaces = self.state.workspaces.read().await;
        let members = self.state.members.read().await;

        let mut result: Vec<Workspace> = members
            .values()
            .filter(|m| m.user_id == identity.user_id)
            .filter_map(|m| workspaces.get(&m.workspace_id).cloned())
            .collect();
        result.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        result
    }

    /// Get a workspace the identity belongs to.
    pub async fn get_workspace(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
    ) -> Result<Workspace, CoreError> {
        self.state.membership(workspace_id, identity).await?;
        self.state
            .workspaces
            .read()
            .await
            .get(workspace_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Workspace", workspace_id))
    }

    /// Rename or re-image a workspace. ADMIN only.
    pub async fn update_workspace(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
        req: UpdateWorkspaceRequest,
    ) -> Result<Workspace, CoreError> {
        let actor = self.state.membership(workspace_id, identity).await?;
        require_admin(&actor)?;
        let name = req.name.as_deref().map(required_name).transpose()?;

        let mut workspaces = self.state.workspaces.write().await;
        let workspace = workspaces
            .get_mut(workspace_id)
            .ok_or_else(|| CoreError::not_found("Workspace", workspace_id))?;
        if let Some(name) = name {
            workspace.name = name;
        }
        if let Some(image_url) = req.image_url {
            workspace.image_url = Some(image_url).filter(|u| !u.is_empty());
        }
        Ok(workspace.clone())
    }

    /// Replace the invite code. ADMIN only.
    pub async fn reset_invite_code(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
    ) -> Result<Workspace, CoreError> {
        let actor = self.state.membership(workspace_id, identity).await?;
        require_admin(&actor)?;

        let mut workspaces = self.state.workspaces.write().await;
        let workspace = workspaces
            .get_mut(workspace_id)
            .ok_or_else(|| CoreError::not_found("Workspace", workspace_id))?;
        workspace.invite_code = generate_invite_code();
        info!(workspace_id = %workspace_id, "Invite code reset");
        Ok(workspace.clone())
    }

    /// Join a workspace as a regular member.
    ///
    /// The duplicate check and the insert share one `members` write lock.
    pub async fn join_workspace(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
        req: JoinWorkspaceRequest,
    ) -> Result<Member, CoreError> {
        let workspaces = self.state.workspaces.read().await;
        let workspace = workspaces
            .get(workspace_id)
            .ok_or_else(|| CoreError::not_found("Workspace", workspace_id))?;

        let mut members = self.state.members.write().await;
        let already = members
            .values()
            .any(|m| &m.workspace_id == workspace_id && m.user_id == identity.user_id);
        if already {
            return Err(CoreError::InvalidInput("Already a member".to_string()));
        }
        if workspace.invite_code != req.invite_code.trim() {
            return Err(CoreError::InvalidInput("Invalid invite code".to_string()));
        }

        let member = Member::new(
            workspace_id.clone(),
            identity.user_id.clone(),
            MemberRole::Member,
        )
        .with_profile(identity.name.clone(), identity.email.clone());

        info!(
            workspace_id = %workspace_id,
            user_id = %identity.user_id,
            member_id = %member.id,
            "User joined workspace"
        );
        members.insert(member.id.clone(), member.clone());
        Ok(member)
    }

    /// Delete a workspace and everything in it. ADMIN only.
    pub async fn delete_workspace(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
    ) -> Result<WorkspaceId, CoreError> {
        let actor = self.state.membership(workspace_id, identity).await?;
        require_admin(&actor)?;

        self.state
            .workspaces
            .write()
            .await
            .remove(workspace_id)
            .ok_or_else(|| CoreError::not_found("Workspace", workspace_id))?;
        self.state
            .members
            .write()
            .await
            .retain(|_, m| &m.workspace_id != workspace_id);
        self.state
            .projects
            .write()
            .await
            .retain(|_, p| &p.workspace_id != workspace_id);
        self.state
            .tasks
            .write()
            .await
            .retain(|_, t| &t.workspace_id != workspace_id);
        self.state
            .teams
            .write()
            .await
            .retain(|_, t| &t.workspace_id != workspace_id);
        self.state
            .stories
            .write()
            .await
            .retain(|_, s| &s.workspace_id != workspace_id);

        info!(workspace_id = %workspace_id, user_id = %identity.user_id, "Workspace deleted");
        Ok(workspace_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{alice, bob, mallory, project, workspace_with_bob};

    #[test]
    fn test_invite_code_shape() {
        let code = generate_invite_code();
        assert_eq!(code.len(), INVITE_CODE_LEN);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_creator_becomes_admin() {
        let state = AppState::new();
        let service = WorkspaceService::new(state.clone());
        let ws = service
            .create_workspace(
                &alice(),
                CreateWorkspaceRequest {
                    name: "  Acme ".to_string(),
                    image_url: Some(String::new()),
                },
            )
            .await
            .unwrap();

        assert_eq!(ws.name, "Acme");
        assert_eq!(ws.image_url, None);
        let member = state.membership(&ws.id, &alice()).await.unwrap();
        assert_eq!(member.role, MemberRole::Admin);
        assert_eq!(member.name, "alice");
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let service = WorkspaceService::new(AppState::new());
        let err = service
            .create_workspace(
                &alice(),
                CreateWorkspaceRequest {
                    name: "   ".to_string(),
                    image_url: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[tokio::test]
    async fn test_join_requires_matching_code_once() {
        let state = AppState::new();
        let (ws, _, bob_member) = workspace_with_bob(&state).await;
        assert_eq!(bob_member.role, MemberRole::Member);
        assert_eq!(bob_member.name, "Bob");

        let service = WorkspaceService::new(state.clone());
        let again = service
            .join_workspace(
                &bob(),
                &ws.id,
                JoinWorkspaceRequest {
                    invite_code: ws.invite_code.clone(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(again, CoreError::InvalidInput("Already a member".to_string()));

        let wrong = service
            .join_workspace(
                &mallory(),
                &ws.id,
                JoinWorkspaceRequest {
                    invite_code: "nope".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(wrong, CoreError::InvalidInput("Invalid invite code".to_string()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_joins_add_one_membership() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;

        let joins: Vec<_> = (0..4)
            .map(|_| {
                let service = WorkspaceService::new(state.clone());
                let ws_id = ws.id.clone();
                let invite_code = ws.invite_code.clone();
                tokio::spawn(async move {
                    service
                        .join_workspace(&mallory(), &ws_id, JoinWorkspaceRequest { invite_code })
                        .await
                })
            })
            .collect();
        let mut joined = 0;
        for join in joins {
            if join.await.unwrap().is_ok() {
                joined += 1;
            }
        }

        assert_eq!(joined, 1);
        let mallory_rows = state
            .workspace_members(&ws.id)
            .await
            .into_iter()
            .filter(|m| m.user_id.as_str() == "mallory")
            .count();
        assert_eq!(mallory_rows, 1);
    }

    #[tokio::test]
    async fn test_list_only_returns_own_workspaces() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let service = WorkspaceService::new(state.clone());

        let listed = service.list_workspaces(&bob()).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, ws.id);
        assert!(service.list_workspaces(&mallory()).await.is_empty());
    }

    #[tokio::test]
    async fn test_admin_only_actions() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        let service = WorkspaceService::new(state.clone());

        let err = service.reset_invite_code(&bob(), &ws.id).await.unwrap_err();
        assert_eq!(err.code(), "forbidden");
        let err = service
            .get_workspace(&mallory(), &ws.id)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "unauthorized");

        let renamed = service
            .update_workspace(
                &alice(),
                &ws.id,
                UpdateWorkspaceRequest {
                    name: Some("Acme Corp".to_string()),
                    image_url: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.name, "Acme Corp");
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let state = AppState::new();
        let (ws, _, _) = workspace_with_bob(&state).await;
        project(&state, &ws).await;
        let service = WorkspaceService::new(state.clone());

        assert!(service.delete_workspace(&bob(), &ws.id).await.is_err());
        service.delete_workspace(&alice(), &ws.id).await.unwrap();

        assert_eq!(state.workspace_count().await, 0);
        assert!(state.members.read().await.is_empty());
        assert!(state.projects.read().await.is_empty());
    }
}

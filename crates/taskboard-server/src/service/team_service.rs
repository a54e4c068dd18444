use std::sync::Arc;

use tracing::info;

use taskboard_core::access::{require_admin, require_member};
use taskboard_core::wire::{AddTeamMemberRequest, CreateTeamRequest};
use taskboard_core::{ActingIdentity, CoreError, MemberId, Team, TeamId, WorkspaceId};

use crate::state::AppState;

/// Team operations.
pub struct TeamService {
    state: Arc<AppState>,
}

impl TeamService {
    /// Create a new TeamService.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Create an empty team. ADMIN only.
    pub async fn create_team(
        &self,
        identity: &ActingIdentity,
        req: CreateTeamRequest,
    ) -> Result<Team, CoreError> {
        let actor = self.state.membership(&req.workspace_id, identity).await?;
        require_admin(&actor)?;
        let name = req.name.trim();
        if name.is_empty() {
            return Err(CoreError::InvalidInput("name is required".to_string()));
        }

        let mut team = Team::new(req.workspace_id, name);
        team.description = req.description.filter(|d| !d.trim().is_empty());

        info!(team_id = %team.id, workspace_id = %team.workspace_id, "Creating team");
        self.state
            .teams
            .write()
            .await
            .insert(team.id.clone(), team.clone());
        Ok(team)
    }

    pub async fn list_teams(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<Team>, CoreError> {
        self.state.membership(workspace_id, identity).await?;
        let mut teams: Vec<Team> = self
            .state
            .teams
            .read()
            .await
            .values()
            .filter(|t| &t.workspace_id == workspace_id)
            .cloned()
            .collect();
        teams.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(teams)
    }

    /// Add a workspace member to a team. ADMIN only; adding twice is a no-op.
    pub async fn add_team_member(
        &self,
        identity: &ActingIdentity,
        team_id: &TeamId,
        req: AddTeamMemberRequest,
    ) -> Result<Team, CoreError> {
        let workspace_id = self
            .state
            .teams
            .read()
            .await
            .get(team_id)
            .map(|t| t.workspace_id.clone())
            .ok_or_else(|| CoreError::not_found("Team", team_id))?;
        let members = self.state.workspace_members(&workspace_id).await;
        let actor = require_member(&members, &workspace_id, identity)?;
        require_admin(actor)?;
        if !members.iter().any(|m| m.id == req.member_id) {
            return Err(CoreError::not_found("Member", &req.member_id));
        }

        let mut teams = self.state.teams.write().await;
        let team = teams
            .get_mut(team_id)
            .ok_or_else(|| CoreError::not_found("Team", team_id))?;
        if team.add_member(req.member_id.clone()) {
            info!(team_id = %team_id, member_id = %req.member_id, "Member added to team");
        }
        Ok(team.clone())
    }

    pub async fn get_team(
        &self,
        identity: &ActingIdentity,
        team_id: &TeamId,
    ) -> Result<Team, CoreError> {
        let team = self.lookup(team_id).await?;
        self.state.membership(&team.workspace_id, identity).await?;
        Ok(team)
    }

    /// Take a member off a team. ADMIN only.
    pub async fn remove_team_member(
        &self,
        identity: &ActingIdentity,
        team_id: &TeamId,
        member_id: &MemberId,
    ) -> Result<Team, CoreError> {
        let team = self.lookup(team_id).await?;
        let actor = self.state.membership(&team.workspace_id, identity).await?;
        require_admin(&actor)?;

        let mut teams = self.state.teams.write().await;
        let team = teams
            .get_mut(team_id)
            .ok_or_else(|| CoreError::not_found("Team", team_id))?;
        if !team.remove_member(member_id) {
            return Err(CoreError::not_found("Member", member_id));
        }
        info!(team_id = %team_id, member_id = %member_id, "Member removed from team");
        Ok(team.clone())
    }

    /// Delete a team. ADMIN only. Members keep their workspace membership.
    pub async fn delete_team(
        &self,
        identity: &ActingIdentity,
        team_id: &TeamId,
    ) -> Result<TeamId, CoreError> {
        let team = self.lookup(team_id).await?;
        let actor = self.state.membership(&team.workspace_id, identity).await?;
        require_admin(&actor)?;

        self.state.teams.write().await.remove(team_id);
        info!(team_id = %team_id, user_id = %identity.user_id, "Team deleted");
        Ok(team_id.clone())
    }

    async fn lookup(&self, team_id: &TeamId) -> Result<Team, CoreError> {
        self.state
            .teams
            .read()
            .await
            .get(team_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Team", team_id))
    }
}

use std::sync::Arc;

use tracing::info;

use taskboard_core::access::{
    check_member_removal, check_profile_edit, check_role_change, require_member,
};
use taskboard_core::wire::UpdateMemberRequest;
use taskboard_core::workspace::split_comma_list;
use taskboard_core::{ActingIdentity, CoreError, Member, MemberId, MemberRole, WorkspaceId};

use crate::state::{members_of, AppState};

/// Membership administration.
pub struct MemberService {
    state: Arc<AppState>,
}

impl MemberService {
    /// Create a new MemberService.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Members of a workspace. Caller must belong to it.
    pub async fn list_members(
        &self,
        identity: &ActingIdentity,
        workspace_id: &WorkspaceId,
    ) -> Result<Vec<Member>, CoreError> {
        self.state.membership(workspace_id, identity).await?;
        Ok(self.state.workspace_members(workspace_id).await)
    }

    /// Get one member of a workspace the caller belongs to.
    pub async fn get_member(
        &self,
        identity: &ActingIdentity,
        member_id: &MemberId,
    ) -> Result<Member, CoreError> {
        let member = self.lookup(member_id).await?;
        self.state.membership(&member.workspace_id, identity).await?;
        Ok(member)
    }

    /// Remove a member and unassign their tasks.
    ///
    /// The removal rules are checked and applied under one `members` write
    /// lock, so concurrent removals cannot both pass the last-admin check.
    pub async fn remove_member(
        &self,
        identity: &ActingIdentity,
        member_id: &MemberId,
    ) -> Result<MemberId, CoreError> {
        let mut all = self.state.members.write().await;
        let target = all
            .get(member_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Member", member_id))?;
        let members = members_of(&all, &target.workspace_id);
        let actor = require_member(&members, &target.workspace_id, identity)?;
        check_member_removal(actor, &target, &members)?;
        all.remove(member_id);

        let mut unassigned = 0usize;
        for task in self.state.tasks.write().await.values_mut() {
            if task.assignee_id.as_ref() == Some(member_id) {
                task.assignee_id = None;
                unassigned += 1;
            }
        }
        for team in self.state.teams.write().await.values_mut() {
            team.member_ids.retain(|id| id != member_id);
        }

        info!(
            member_id = %member_id,
            workspace_id = %target.workspace_id,
            removed_by = %identity.user_id,
            unassigned,
            "Member removed"
        );
        Ok(member_id.clone())
    }

    /// Change a member's role or profile.
    ///
    /// Role changes need ADMIN; name and skills may also be edited by the
    /// member themselves. Checks and writes share one `members` write lock.
    pub async fn update_member(
        &self,
        identity: &ActingIdentity,
        member_id: &MemberId,
        req: UpdateMemberRequest,
    ) -> Result<Member, CoreError> {
        let role = req.role.as_deref().map(str::parse::<MemberRole>).transpose()?;
        let name = match req.name {
            Some(name) if name.trim().is_empty() => {
                return Err(CoreError::InvalidInput("name must not be blank".to_string()))
            }
            Some(name) => Some(name.trim().to_string()),
            None => None,
        };

        let mut all = self.state.members.write().await;
        let target = all
            .get(member_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Member", member_id))?;
        let members = members_of(&all, &target.workspace_id);
        let actor = require_member(&members, &target.workspace_id, identity)?;
        if let Some(role) = role {
            check_role_change(actor, &target, role, &members)?;
        }
        if name.is_some() || req.skills.is_some() {
            check_profile_edit(actor, &target)?;
        }

        let member = all
            .get_mut(member_id)
            .ok_or_else(|| CoreError::not_found("Member", member_id))?;
        if let Some(role) = role {
            if member.role != role {
                info!(member_id = %member_id, from = ?member.role, to = ?role, "Member role changed");
            }
            member.role = role;
        }
        if let Some(name) = name {
            member.name = name;
        }
        if let Some(skills) = req.skills {
            member.skills = split_comma_list(&skills);
        }
        Ok(member.clone())
    }

    async fn lookup(&self, member_id: &MemberId) -> Result<Member, CoreError> {
        self.state
            .members
            .read()
            .await
            .get(member_id)
            .cloned()
            .ok_or_else(|| CoreError::not_found("Member", member_id))
    }
}

//! Workspace access rules.
//!
//! Callers gather the members of the workspace in question and pass them in
//! together with the [`ActingIdentity`]; nothing here reads ambient state.

use serde::{Deserialize, Serialize};

use crate::{CoreError, Member, MemberRole, UserId, WorkspaceId};

/// The user on whose behalf a request runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActingIdentity {
    pub user_id: UserId,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ActingIdentity {
    /// Create an identity with only a user id.
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            name: None,
            email: None,
        }
    }

    /// Builder method to set the email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Builder method to set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Find the identity's membership in a workspace.
pub fn find_membership<'a>(
    members: &'a [Member],
    workspace_id: &WorkspaceId,
    identity: &ActingIdentity,
) -> Option<&'a Member> {
    members
        .iter()
        .find(|m| &m.workspace_id == workspace_id && m.user_id == identity.user_id)
}

/// Require the identity to be a member of the workspace.
pub fn require_member<'a>(
    members: &'a [Member],
    workspace_id: &WorkspaceId,
    identity: &ActingIdentity,
) -> Result<&'a Member, CoreError> {
    find_membership(members, workspace_id, identity).ok_or_else(|| {
        CoreError::Unauthorized(format!(
            "user {} is not a member of workspace {}",
            identity.user_id, workspace_id
        ))
    })
}

/// Require the member to hold the ADMIN role.
pub fn require_admin(member: &Member) -> Result<(), CoreError> {
    if member.role.is_admin() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!(
            "member {} is not an admin",
            member.id
        )))
    }
}

fn admin_count(members: &[Member], workspace_id: &WorkspaceId) -> usize {
    members
        .iter()
        .filter(|m| &m.workspace_id == workspace_id && m.role.is_admin())
        .count()
}

/// Check that `actor` may remove `target` from their workspace.
///
/// Members may leave on their own; removing anyone else needs ADMIN. The
/// sole member can never be removed, and neither can the last ADMIN while
/// other members remain.
pub fn check_member_removal(
    actor: &Member,
    target: &Member,
    members: &[Member],
) -> Result<(), CoreError> {
    if actor.id != target.id {
        require_admin(actor)?;
    }

    let workspace_size = members
        .iter()
        .filter(|m| m.workspace_id == target.workspace_id)
        .count();
    if workspace_size <= 1 {
        return Err(CoreError::InvalidInput(
            "Cannot delete the last member".to_string(),
        ));
    }
    if target.role.is_admin() && admin_count(members, &target.workspace_id) <= 1 {
        return Err(CoreError::InvalidInput(
            "Cannot delete the last admin".to_string(),
        ));
    }
    Ok(())
}

/// Check that `actor` may give `target` the role `new_role`.
pub fn check_role_change(
    actor: &Member,
    target: &Member,
    new_role: MemberRole,
    members: &[Member],
) -> Result<(), CoreError> {
    require_admin(actor)?;

    if target.role.is_admin()
        && !new_role.is_admin()
        && admin_count(members, &target.workspace_id) <= 1
    {
        return Err(CoreError::InvalidInput(
            "Cannot demote the last admin".to_string(),
        ));
    }
    Ok(())
}

/// Check that `actor` may edit `target`'s profile fields.
pub fn check_profile_edit(actor: &Member, target: &Member) -> Result<(), CoreError> {
    if actor.id == target.id {
        return Ok(());
    }
    require_admin(actor)
}

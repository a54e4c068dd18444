//! Workspace, Member, Project, Team and UserStory records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MemberId, MemberRole, ProjectId, StoryId, TeamId, UserId, WorkspaceId};

/// Length of generated invite codes.
pub const INVITE_CODE_LEN: usize = 6;

/// A tenant: owns members, projects, teams and tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: WorkspaceId,
    pub name: String,
    pub image_url: Option<String>,
    /// Code a user must present to join.
    pub invite_code: String,
    /// User that created the workspace.
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl Workspace {
    /// Create a new Workspace.
    pub fn new(name: impl Into<String>, owner_id: UserId, invite_code: impl Into<String>) -> Self {
        Self {
            id: WorkspaceId::generate(),
            name: name.into(),
            image_url: None,
            invite_code: invite_code.into(),
            owner_id,
            created_at: Utc::now(),
        }
    }
}

/// Membership of a user in a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub workspace_id: WorkspaceId,
    pub user_id: UserId,
    pub role: MemberRole,
    /// Display name, falls back to the email local part.
    pub name: String,
    pub email: Option<String>,
    pub skills: Vec<String>,
    pub joined_at: DateTime<Utc>,
}

impl Member {
    /// Create a new Member.
    pub fn new(workspace_id: WorkspaceId, user_id: UserId, role: MemberRole) -> Self {
        Self {
            id: MemberId::generate(),
            workspace_id,
            name: user_id.to_string(),
            user_id,
            role,
            email: None,
            skills: Vec::new(),
            joined_at: Utc::now(),
        }
    }

    /// Builder method to set name and email.
    pub fn with_profile(mut self, name: Option<String>, email: Option<String>) -> Self {
        let fallback = email
            .as_deref()
            .and_then(|e| e.split('@').next())
            .filter(|local| !local.is_empty())
            .map(str::to_string);
        if let Some(name) = name.filter(|n| !n.trim().is_empty()).or(fallback) {
            self.name = name;
        }
        self.email = email;
        self
    }
}

/// A project inside a workspace; tasks hang off projects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub image_url: Option<String>,
    pub tech_stack: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Project {
    /// Create a new Project.
    pub fn new(workspace_id: WorkspaceId, name: impl Into<String>) -> Self {
        Self {
            id: ProjectId::generate(),
            workspace_id,
            name: name.into(),
            image_url: None,
            tech_stack: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

/// A named group of members inside a workspace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub workspace_id: WorkspaceId,
    pub name: String,
    pub description: Option<String>,
    pub member_ids: Vec<MemberId>,
    pub created_at: DateTime<Utc>,
}

impl Team {
    /// Create a new, empty Team.
    pub fn new(workspace_id: WorkspaceId, name: impl Into<String>) -> Self {
        Self {
            id: TeamId::generate(),
            workspace_id,
            name: name.into(),
            description: None,
            member_ids: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// Add a member; returns false if already present.
    pub fn add_member(&mut self, member_id: MemberId) -> bool {
        if self.member_ids.contains(&member_id) {
            return false;
        }
        self.member_ids.push(member_id);
        true
    }

    /// Remove a member; returns false if they were not on the team.
    pub fn remove_member(&mut self, member_id: &MemberId) -> bool {
        let before = self.member_ids.len();
        self.member_ids.retain(|id| id != member_id);
        self.member_ids.len() != before
    }
}

/// A user story in a project's backlog. Tasks can be created from it in
/// one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStory {
    pub id: StoryId,
    pub workspace_id: WorkspaceId,
    pub project_id: ProjectId,
    pub description: String,
    pub acceptance_criteria: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserStory {
    /// Create a new UserStory.
    pub fn new(
        workspace_id: WorkspaceId,
        project_id: ProjectId,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: StoryId::generate(),
            workspace_id,
            project_id,
            description: description.into(),
            acceptance_criteria: None,
            created_at: Utc::now(),
        }
    }
}

/// Split a comma-separated form value into trimmed, non-empty entries.
pub fn split_comma_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_comma_list() {
        assert_eq!(
            split_comma_list(" rust, axum ,,tokio "),
            vec!["rust", "axum", "tokio"]
        );
        assert!(split_comma_list("").is_empty());
    }

    #[test]
    fn test_member_profile_falls_back_to_email_local_part() {
        let member = Member::new(WorkspaceId::new("ws"), UserId::new("u1"), MemberRole::Member)
            .with_profile(None, Some("ada@example.com".to_string()));
        assert_eq!(member.name, "ada");

        let named = Member::new(WorkspaceId::new("ws"), UserId::new("u1"), MemberRole::Member)
            .with_profile(Some("Ada L".to_string()), Some("ada@example.com".to_string()));
        assert_eq!(named.name, "Ada L");
    }

    #[test]
    fn test_team_add_member_is_idempotent() {
        let mut team = Team::new(WorkspaceId::new("ws"), "Platform");
        assert!(team.add_member(MemberId::new("m1")));
        assert!(!team.add_member(MemberId::new("m1")));
        assert_eq!(team.member_ids.len(), 1);
    }

    #[test]
    fn test_team_remove_member() {
        let mut team = Team::new(WorkspaceId::new("ws"), "Platform");
        team.add_member(MemberId::new("m1"));
        team.add_member(MemberId::new("m2"));

        assert!(team.remove_member(&MemberId::new("m1")));
        assert!(!team.remove_member(&MemberId::new("m1")));
        assert_eq!(team.member_ids, vec![MemberId::new("m2")]);
    }
}

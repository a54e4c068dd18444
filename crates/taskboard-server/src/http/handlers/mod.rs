//! HTTP request handlers.

mod health;
mod members;
mod projects;
mod stories;
mod tasks;
mod teams;
mod workspaces;

pub use health::{health_check, metrics_handler};
pub use members::{get_member, list_members, remove_member, update_member};
pub use projects::{create_project, delete_project, get_project, list_projects, update_project};
pub use stories::{create_story, create_story_tasks, delete_story, get_story, list_stories};
pub use tasks::{
    bulk_create_tasks, bulk_update, create_task, delete_task, get_task, list_tasks, move_task,
    project_board, update_task,
};
pub use teams::{
    add_team_member, create_team, delete_team, get_team, list_teams, remove_team_member,
};
pub use workspaces::{
    create_workspace, delete_workspace, get_workspace, join_workspace, list_workspaces,
    reset_invite_code, update_workspace,
};

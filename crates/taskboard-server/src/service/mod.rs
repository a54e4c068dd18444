//! Service layer: access checks, validation and persistence for each
//! resource. Handlers stay thin and call into these.

pub mod member_service;
pub mod project_service;
pub mod story_service;
pub mod task_service;
pub mod team_service;
pub mod workspace_service;

pub use member_service::MemberService;
pub use project_service::ProjectService;
pub use story_service::StoryService;
pub use task_service::TaskService;
pub use team_service::TeamService;
pub use workspace_service::WorkspaceService;

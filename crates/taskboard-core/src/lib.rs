//! Taskboard Core Domain Types
//!
//! This crate contains pure domain types with no dependencies on:
//! - Network/HTTP
//! - Storage
//! - Runtime specifics
//!
//! The Kanban ordering engine lives in [`ordering`]; the optimistic board
//! view used by clients lives in [`board`]; workspace role rules live in
//! [`access`].

pub mod access;
pub mod board;
pub mod error;
pub mod ids;
pub mod ordering;
pub mod status;
pub mod task;
pub mod wire;
pub mod workspace;

// Re-export commonly used types
pub use access::ActingIdentity;
pub use board::{Board, BoardView};
pub use error::CoreError;
pub use ids::{MemberId, ProjectId, StoryId, TaskId, TeamId, UserId, WorkspaceId};
pub use ordering::{
    append_position, plan_bulk_status_update, plan_move, BulkPlan, BulkUpdateItem,
    RejectedUpdate, TaskUpdate, DEFAULT_POSITION, MAX_POSITION, POSITION_STEP,
};
pub use status::{MemberRole, TaskStatus};
pub use task::{Task, TaskFilter};
pub use workspace::{Member, Project, Team, UserStory, Workspace};

//! Taskboard Server Library
//!
//! HTTP route layer, services and the in-memory store behind them. The
//! ordering rules themselves live in `taskboard-core`; this crate checks
//! access, builds board snapshots, and persists the resulting plans.

pub mod config;
pub mod http;
pub mod metrics;
pub mod notify;
pub mod service;
pub mod state;
pub mod store;

pub use config::Config;
pub use notify::{AssignmentNotice, LogNotifier, Notifier};
pub use service::{
    MemberService, ProjectService, StoryService, TaskService, TeamService, WorkspaceService,
};
pub use state::AppState;
pub use store::TaskStore;

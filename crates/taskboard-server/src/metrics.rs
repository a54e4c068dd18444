//! Prometheus metrics in text exposition format.

use std::fmt::Write;
use std::sync::Arc;

use taskboard_core::TaskStatus;

use crate::state::AppState;

/// Collect all metrics from AppState and format as Prometheus text.
pub async fn collect_metrics(state: &Arc<AppState>) -> String {
    let mut output = String::new();

    collect_task_metrics(state, &mut output).await;
    collect_workspace_metrics(state, &mut output).await;

    output
}

/// Task count per board column.
async fn collect_task_metrics(state: &Arc<AppState>, output: &mut String) {
    let tasks = state.tasks.read().await;

    let mut counts = [0u64; TaskStatus::ALL.len()];
    for task in tasks.values() {
        if let Some(slot) = TaskStatus::ALL.iter().position(|s| *s == task.status) {
            counts[slot] += 1;
        }
    }

    writeln!(
        output,
        "# HELP taskboard_tasks_total Number of tasks by board column"
    )
    .ok();
    writeln!(output, "# TYPE taskboard_tasks_total gauge").ok();
    for (status, count) in TaskStatus::ALL.iter().zip(counts) {
        writeln!(
            output,
            "taskboard_tasks_total{{status=\"{}\"}} {count}",
            status.as_str().to_lowercase()
        )
        .ok();
    }
}

async fn collect_workspace_metrics(state: &Arc<AppState>, output: &mut String) {
    let workspaces = state.workspace_count().await;
    let members = state.members.read().await.len();

    writeln!(output).ok();
    writeln!(
        output,
        "# HELP taskboard_workspaces_total Number of workspaces"
    )
    .ok();
    writeln!(output, "# TYPE taskboard_workspaces_total gauge").ok();
    writeln!(output, "taskboard_workspaces_total {workspaces}").ok();

    writeln!(output).ok();
    writeln!(
        output,
        "# HELP taskboard_members_total Number of workspace memberships"
    )
    .ok();
    writeln!(output, "# TYPE taskboard_members_total gauge").ok();
    writeln!(output, "taskboard_members_total {members}").ok();
}
